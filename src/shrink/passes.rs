//! The reduction passes.
//!
//! Each pass reads the current formula, proposes candidates derived from it, and leaves acceptance to the oracle gate.
//! A pass never assumes a proposal was taken: the current formula is re-read wherever a pass continues after an acceptance, as canonicalisation may have reordered what remains.

use std::collections::{BTreeSet, HashMap};

use crate::{
    generic::find_integer::find_integer,
    misc::log::targets,
    reduction::ReducedSatProblem,
    structures::{Atom, CClause, CLiteral, Clause, Cnf, Formula, Literal},
};

use super::{find_first::NotFound, Shrinker};

impl<F: Fn(&[CClause]) -> bool + Sync> Shrinker<F> {
    /// Propose the core of the current formula's reduced form, progressively re-encoding the forced assignment and the merges when the bare core is refused.
    ///
    /// An inconsistent current formula is left as it is.
    pub fn replace_with_core(&self) {
        let current = self.current();
        match ReducedSatProblem::from_sat(&current) {
            Ok(problem) => {
                self.propose_reduction(&problem);
            }
            Err(inconsistency) => {
                log::trace!(target: targets::SHRINK, "core skipped: {inconsistency}");
            }
        }
    }

    /// Propose the restriction of the current formula to a single connected component of its variable co-occurrence relation, smallest component first.
    pub fn move_to_components(&self) {
        let current = self.current();

        let mut merges = UnionFind::default();
        for clause in current.iter() {
            merges.merge_all(clause.atoms());
        }

        let mut components = merges.partitions();
        if components.len() <= 1 {
            return;
        }
        log::debug!(target: targets::COMPONENTS, "{} components", components.len());

        components.sort_by_key(|component| component.len());

        for component in components {
            let members: BTreeSet<Atom> = component.into_iter().collect();
            let attempt: Cnf = current
                .iter()
                .filter(|clause| clause.atoms().any(|atom| members.contains(&atom)))
                .cloned()
                .collect();
            if self.test_function(attempt) {
                return;
            }
        }
    }

    /// Propose the current formula with variables renumbered contiguously from 1, in order of first appearance.
    ///
    /// The first appearance of a variable takes the positive sign, whatever its sign at that appearance.
    /// A test function sensitive to variable names will refuse the proposal, which is harmless.
    pub fn renumber_variables(&self) {
        let current = self.current();

        let mut renumbering: HashMap<CLiteral, CLiteral> = HashMap::new();
        let mut renumber = |literal: CLiteral| -> CLiteral {
            if let Some(&fresh) = renumbering.get(&literal) {
                return fresh;
            }
            if let Some(&fresh) = renumbering.get(&literal.negate()) {
                return fresh.negate();
            }
            let fresh = renumbering.len() as CLiteral + 1;
            renumbering.insert(literal, fresh);
            fresh
        };

        let renumbered: Cnf = current
            .iter()
            .map(|clause| clause.literals().map(&mut renumber).collect())
            .collect();

        self.test_function(renumbered);
    }

    /// Delete clauses, extending each accepted single deletion to a run of consecutive deletions.
    ///
    /// The clause list is reversed so clauses late in the canonical order, which tend to be derived, are tried first.
    pub fn delete_clauses(&self) {
        let mut cursor = 0;
        loop {
            let mut working = self.current();
            working.reverse();
            if cursor >= working.len() {
                return;
            }

            let indices: Vec<usize> = (cursor..working.len()).collect();
            let found = self.find_first(&indices, |&index| {
                let mut attempt = working.clone();
                attempt.remove(index);
                self.test_function(attempt)
            });

            let index = match found {
                Ok(offset) => indices[offset],
                Err(NotFound) => return,
            };

            let run = find_integer(|k| {
                if index + k > working.len() {
                    return false;
                }
                let mut attempt = working[..index].to_vec();
                attempt.extend_from_slice(&working[index + k..]);
                self.test_function(attempt)
            });
            log::trace!(target: targets::SHRINK, "deleted a run of {run} from {index}");

            cursor = index + 1;
        }
    }

    /// Delete single literals from the whole formula, most frequent literal first.
    pub fn delete_literals(&self) {
        let literals = self.literals_by_frequency();

        let mut start = 0;
        while start < literals.len() {
            let found = self.find_first(&literals[start..], |&literal| {
                let attempt: Cnf = self
                    .current()
                    .into_iter()
                    .map(|clause| clause.into_iter().filter(|&kept| kept != literal).collect())
                    .collect();
                self.test_function(attempt)
            });

            match found {
                Ok(offset) => start += offset + 1,
                Err(NotFound) => return,
            }
        }
    }

    /// For each literal, most frequent first, reduce the current formula under the assumption the literal holds and propose the result.
    ///
    /// Assumptions which are inconsistent with the current formula are skipped.
    pub fn force_literals(&self) {
        let literals = self.literals_by_frequency();

        let mut snapshot = self.current();
        let mut problem = match ReducedSatProblem::from_sat(&snapshot) {
            Ok(problem) => problem,
            Err(_) => return,
        };

        for &literal in literals.iter() {
            let latest = self.current();
            if latest != snapshot {
                snapshot = latest;
                problem = match ReducedSatProblem::from_sat(&snapshot) {
                    Ok(problem) => problem,
                    Err(_) => return,
                };
            }

            match problem.with_extra_clauses(&[vec![literal]]) {
                Ok(assumed) => {
                    self.propose_reduction(&assumed);
                }
                Err(_) => continue,
            }
        }
    }

    /// Delete literals from individual clauses, one position at a time.
    ///
    /// The last literal of a clause is never deleted: dropping the clause is [delete_clauses](Self::delete_clauses)' business, and an empty clause would only ever shrink towards an unsatisfiable formula.
    pub fn delete_literals_from_clauses(&self) {
        let mut clause_index = 0;
        let mut literal_index = 0;
        loop {
            let current = self.current();
            if clause_index >= current.len() {
                return;
            }

            let clause = &current[clause_index];
            if clause.len() <= 1 || literal_index >= clause.len() {
                literal_index = 0;
                clause_index += 1;
                continue;
            }

            let mut attempt = current.clone();
            attempt[clause_index].remove(literal_index);
            if !self.test_function(attempt) {
                literal_index += 1;
            }
        }
    }

    /// For each ordered pair of variables, propose the current formula with the later variable replaced by the earlier, respecting signs.
    pub fn merge_variables(&self) {
        let mut i = 0;
        let mut j = 1;
        loop {
            let current = self.current();
            let variables: Vec<Atom> = current.variables().into_iter().collect();
            if j >= variables.len() {
                i += 1;
                j = i + 1;
            }
            if j >= variables.len() {
                return;
            }

            let target = variables[i] as CLiteral;
            let replaced = variables[j] as CLiteral;

            let attempt: Cnf = current
                .iter()
                .map(|clause| {
                    clause
                        .literals()
                        .map(|literal| {
                            if literal == replaced {
                                target
                            } else if literal == replaced.negate() {
                                target.negate()
                            } else {
                                literal
                            }
                        })
                        .collect()
                })
                .collect();

            if !self.test_function(attempt) {
                j += 1;
            }
        }
    }

    /// Literals of the current formula, ordered by occurrence count descending, with value as the tiebreak.
    fn literals_by_frequency(&self) -> Vec<CLiteral> {
        let current = self.current();

        let mut counts: HashMap<CLiteral, usize> = HashMap::new();
        for clause in current.iter() {
            for literal in clause.literals() {
                *counts.entry(literal).or_default() += 1;
            }
        }

        let mut literals: Vec<CLiteral> = counts.keys().copied().collect();
        literals.sort_by_key(|literal| (std::cmp::Reverse(counts[literal]), *literal));
        literals
    }
}

/// A partition of atoms into joint sets, by the union find algorithm.
///
/// Initially everything is assumed to be in a singleton set, and calls to merge will link two sets so they are in the same partition.
#[derive(Debug, Default)]
struct UnionFind {
    table: HashMap<Atom, Atom>,
}

impl UnionFind {
    fn find(&mut self, value: Atom) -> Atom {
        let mut representative = value;
        let mut trail = Vec::new();
        loop {
            match self.table.get(&representative) {
                None => {
                    self.table.insert(representative, representative);
                    break;
                }
                Some(&parent) if parent == representative => break,
                Some(&parent) => {
                    trail.push(representative);
                    representative = parent;
                }
            }
        }
        for link in trail {
            self.table.insert(link, representative);
        }
        representative
    }

    fn merge(&mut self, left: Atom, right: Atom) {
        let left = self.find(left);
        let right = self.find(right);
        let (representative, absorbed) = match left < right {
            true => (left, right),
            false => (right, left),
        };
        self.table.insert(absorbed, representative);
    }

    fn merge_all(&mut self, values: impl Iterator<Item = Atom>) {
        let mut first = None;
        for value in values {
            match first {
                None => first = Some(value),
                Some(anchor) => self.merge(value, anchor),
            }
        }
    }

    /// The recorded sets, ordered by their least member.
    fn partitions(&mut self) -> Vec<Vec<Atom>> {
        let keys: Vec<Atom> = self.table.keys().copied().collect();
        let mut sets: std::collections::BTreeMap<Atom, Vec<Atom>> = std::collections::BTreeMap::new();
        for key in keys {
            let representative = self.find(key);
            sets.entry(representative).or_default().push(key);
        }
        let mut partitions: Vec<Vec<Atom>> = sets.into_values().collect();
        for members in partitions.iter_mut() {
            members.sort_unstable();
        }
        partitions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_find_partitions() {
        let mut sets = UnionFind::default();
        sets.merge_all([1, 2].iter().copied());
        sets.merge_all([4, 5].iter().copied());
        sets.find(7);

        assert_eq!(sets.partitions(), vec![vec![1, 2], vec![4, 5], vec![7]]);
    }
}
