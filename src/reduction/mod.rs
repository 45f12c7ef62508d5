/*!
Reduction of a formula to a canonical reduced form.

A [ReducedSatProblem] is built from a formula by running a simplification loop to a fixed point:

- Unit clauses force an assignment to their atom, recorded in [forced](ReducedSatProblem::forced).
- Binary clauses are read as a pair of implications, recorded in the [implication graph](ReducedSatProblem::implications): the clause `(a ∨ b)` is equivalent to `¬a → b` together with `¬b → a`.
- A strongly connected component of the implication graph is a set of mutually implied, hence logically equivalent, literals, and its members are merged into a single class of the [merge table](ReducedSatProblem::merge_table).

Forced assignments simplify binary clauses into units, which may create new components, so the loop repeats until the residual [core](ReducedSatProblem::core) is stable and no assignment or merge was recorded.
If at any point propagation witnesses unsatisfiability --- an empty clause, a conflicting force, or a component carrying both values --- reduction stops with an [Inconsistency].

The reduced form is a value: adding clauses through [with_extra_clauses](ReducedSatProblem::with_extra_clauses) reduces a deep copy and the parent is never mutated.
*/

use std::collections::{BTreeMap, BTreeSet};

use petgraph::{algo::tarjan_scc, prelude::DiGraphMap};

use crate::{
    misc::log::targets,
    structures::{
        Atom, BooleanEquivalence, CClause, CLiteral, Clause, Literal,
    },
    types::err::Inconsistency,
};

/// The canonical reduced form of a formula.
///
/// Invariants, on any instance obtained without an [Inconsistency]:
/// - No clause of `core` has fewer than two literals, contains a forced atom, contains two literals over the same atom, or contains a literal which is not its own representative.
/// - `core` is canonical.
/// - Every strongly connected component of `implications` is a singleton.
/// - The keys of `forced` are representatives, and forcing is closed under equivalence.
/// - `free` holds exactly the atoms of the input which are their own representative and are not forced, and both literals of every free atom appear as nodes of `implications`.
#[derive(Clone, Debug)]
pub struct ReducedSatProblem {
    /// Variable equivalences, with sign.
    pub merge_table: BooleanEquivalence,

    /// Unit-propagated assignments, keyed by representative atoms.
    pub forced: BTreeMap<Atom, bool>,

    /// Atoms of the input which remain undetermined after reduction.
    pub free: BTreeSet<Atom>,

    /// The residual clauses, canonical, with every literal replaced by its representative.
    pub core: Vec<CClause>,

    /// The binary-clause implication graph over literals.
    pub implications: DiGraphMap<CLiteral, ()>,

    changed: bool,
}

impl ReducedSatProblem {
    /// The reduced form of the given clauses.
    ///
    /// An `Err` is an [Inconsistency]: the clauses are unsatisfiable by propagation alone.
    pub fn from_sat(clauses: &[CClause]) -> Result<Self, Inconsistency> {
        let mut problem = ReducedSatProblem {
            merge_table: BooleanEquivalence::default(),
            forced: BTreeMap::new(),
            free: clauses.iter().flat_map(|clause| clause.atoms().collect::<Vec<_>>()).collect(),
            core: clauses.to_vec(),
            implications: DiGraphMap::new(),
            changed: false,
        };
        problem.reduce()?;
        Ok(problem)
    }

    /// The reduced form of the problem together with the given clauses.
    ///
    /// The receiver is deep-copied and never mutated, so a family of extensions may be built from one reduction.
    pub fn with_extra_clauses(&self, clauses: &[CClause]) -> Result<Self, Inconsistency> {
        let mut extension = self.clone();
        extension.core.extend(clauses.iter().cloned());
        extension.reduce()?;
        Ok(extension)
    }

    /// The value forced on `literal`, if any.
    ///
    /// The literal is first resolved to its representative, and a value forced on the representative's atom is read through the representative's sign.
    pub fn forced_value(&self, literal: CLiteral) -> Option<bool> {
        let representative = self.merge_table.representative(literal);
        let value = self.forced.get(&representative.atom()).copied();
        match representative.polarity() {
            true => value,
            false => value.map(|forced| !forced),
        }
    }

    /// Record `literal` as forced, through its representative.
    fn force(&mut self, literal: CLiteral) -> Result<(), Inconsistency> {
        let representative = self.merge_table.find(literal);
        let atom = representative.atom();
        let value = representative.polarity();
        match self.forced.get(&atom) {
            Some(&existing) => match existing == value {
                true => Ok(()),
                false => Err(Inconsistency::ForcedConflict(atom)),
            },
            None => {
                log::trace!(target: targets::REDUCTION, "forced {atom} = {value}");
                self.changed = true;
                self.forced.insert(atom, value);
                Ok(())
            }
        }
    }

    /// Merge the classes of two literals, propagating any forced value across the merged class.
    fn merge(&mut self, a: CLiteral, b: CLiteral) -> Result<(), Inconsistency> {
        let a = self.merge_table.find(a);
        let b = self.merge_table.find(b);
        if a == b {
            return Ok(());
        }
        log::trace!(target: targets::REDUCTION, "merged {a} with {b}");
        self.changed = true;
        self.merge_table.merge(a, b)?;

        for literal in [a, b] {
            let atom = literal.atom();
            if let Some(&value) = self.forced.get(&atom) {
                match value {
                    true => self.force(atom as CLiteral)?,
                    false => self.force(-(atom as CLiteral))?,
                }
            }
        }
        Ok(())
    }

    /// Run the simplification loop to a fixed point.
    fn reduce(&mut self) -> Result<(), Inconsistency> {
        let mut previous: Option<Vec<CClause>> = None;

        while previous.as_ref() != Some(&self.core) || self.changed {
            self.changed = false;
            let snapshot = std::mem::take(&mut self.core);
            self.implications = DiGraphMap::new();

            let mut next_core: BTreeSet<CClause> = BTreeSet::new();

            for clause in snapshot.iter() {
                // Rewrite to representatives before reading the forced assignment.
                let mut rewritten: CClause =
                    clause.literals().map(|literal| self.merge_table.find(literal)).collect();
                rewritten.sort_unstable();
                rewritten.dedup();

                let mut remaining = CClause::new();
                let mut satisfied = false;
                for literal in rewritten.literals() {
                    match self.forced.get(&literal.atom()) {
                        Some(&value) if value == literal.polarity() => {
                            satisfied = true;
                            break;
                        }
                        Some(_) => {}
                        None => remaining.push(literal),
                    }
                }
                if satisfied {
                    continue;
                }
                if remaining.is_empty() {
                    return Err(Inconsistency::UnsatisfiedClause);
                }

                let mut clause: CClause =
                    remaining.literals().map(|literal| self.merge_table.find(literal)).collect();
                clause.sort_unstable();
                clause.dedup();

                if clause.tautological() {
                    continue;
                }

                match clause.as_slice() {
                    &[unit] => {
                        self.force(unit)?;
                        continue;
                    }
                    &[a, b] => {
                        self.implications.add_edge(a.negate(), b, ());
                        self.implications.add_edge(b.negate(), a, ());
                    }
                    _ => {}
                }
                next_core.insert(clause);
            }

            let mut core: Vec<CClause> = next_core.into_iter().collect();
            core.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
            self.core = core;
            previous = Some(snapshot);

            for component in tarjan_scc(&self.implications) {
                if component.len() < 2 {
                    continue;
                }

                // A value forced on any member binds the whole component.
                let mut values = BTreeSet::new();
                for member in component.iter() {
                    let representative = self.merge_table.find(*member);
                    if representative.polarity() {
                        if let Some(&value) = self.forced.get(&representative.atom()) {
                            values.insert(value);
                        }
                    }
                }
                if values.len() > 1 {
                    return Err(Inconsistency::DivergentComponent);
                }

                let mut members = component.iter();
                if let Some(&target) = members.next() {
                    for &member in members {
                        self.merge(target, member)?;
                    }
                }
            }
        }

        let free = std::mem::take(&mut self.free);
        for atom in free {
            let literal = atom as CLiteral;
            if self.merge_table.find(literal) == literal && !self.forced.contains_key(&atom) {
                self.free.insert(atom);
            }
        }
        for &atom in self.free.iter() {
            self.implications.add_node(atom as CLiteral);
            self.implications.add_node(-(atom as CLiteral));
        }

        log::debug!(
            target: targets::REDUCTION,
            "reduced to {} core clauses, {} forced, {} free",
            self.core.len(),
            self.forced.len(),
            self.free.len(),
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn units_propagate_through_binary_clauses() {
        let problem =
            ReducedSatProblem::from_sat(&[vec![1], vec![-1, 2], vec![-2, 3]]).expect("consistent");

        assert!(problem.core.is_empty());
        assert_eq!(problem.forced_value(1), Some(true));
        assert_eq!(problem.forced_value(2), Some(true));
        assert_eq!(problem.forced_value(-3), Some(false));
        assert!(problem.free.is_empty());
    }

    #[test]
    fn components_merge_to_one_class() {
        // 1 → 2 → 3 → 1, so all three are equivalent.
        let problem = ReducedSatProblem::from_sat(&[vec![-1, 2], vec![-2, 3], vec![-3, 1]])
            .expect("consistent");

        assert!(problem.core.is_empty());
        assert_eq!(problem.merge_table.representative(2), 1);
        assert_eq!(problem.merge_table.representative(3), 1);
        assert_eq!(problem.merge_table.representative(-2), -1);
        assert_eq!(problem.free, BTreeSet::from([1]));
    }

    #[test]
    fn free_literals_appear_in_the_implication_graph() {
        let problem = ReducedSatProblem::from_sat(&[vec![1, 2, 3]]).expect("consistent");

        for atom in [1, 2, 3] {
            assert!(problem.free.contains(&atom));
            assert!(problem.implications.contains_node(atom as CLiteral));
            assert!(problem.implications.contains_node(-(atom as CLiteral)));
        }
    }

    #[test]
    fn empty_clauses_are_inconsistent() {
        assert!(ReducedSatProblem::from_sat(&[vec![]]).is_err());
        assert!(ReducedSatProblem::from_sat(&[vec![1], vec![-1]]).is_err());
    }
}
