//! Equivalence over literals, maintained by union-find with negation.
//!
//! Merging literal `a` with literal `b` declares the two logically equivalent, and so also declares `-a` equivalent to `-b`.
//! To keep both directions in step the underlying table stores an entry only for the positive key, and a negative key dispatches to the positive key with the sign flipped on both read and write.
//!
//! The representative of a class is the literal of minimum absolute value in the class.
//! As a distinct pair of literals over the same atom can only be a literal and its negation, and merging those is an [Inconsistency], ties in absolute value never arise.

use std::collections::HashMap;

use crate::{
    structures::{
        atom::Atom,
        literal::{CLiteral, Literal},
    },
    types::err::Inconsistency,
};

/// A map from literals to literals which stores only positive keys, negating on access.
///
/// For any key `k` and value `v`, `table[-k] = -table[k]`, so writing through `-k` writes `-v` through `k`.
/// The zero key belongs to no atom and access through it is fatal.
#[derive(Clone, Debug, Default)]
pub struct NegatingTable {
    table: HashMap<Atom, CLiteral>,
}

impl NegatingTable {
    /// The value stored against `key`, negated if `key` is negative.
    ///
    /// # Panics
    /// If `key` is zero.
    pub fn get(&self, key: CLiteral) -> Option<CLiteral> {
        if key == 0 {
            panic!("access to the zero key of a negating table");
        }
        match key.polarity() {
            true => self.table.get(&key.atom()).copied(),
            false => self.table.get(&key.atom()).map(|value| value.negate()),
        }
    }

    /// Store `value` against `key`, negating both if `key` is negative.
    ///
    /// # Panics
    /// If `key` is zero.
    pub fn set(&mut self, key: CLiteral, value: CLiteral) {
        if key == 0 {
            panic!("access to the zero key of a negating table");
        }
        match key.polarity() {
            true => self.table.insert(key.atom(), value),
            false => self.table.insert(key.atom(), value.negate()),
        };
    }

    /// An iterator over every key with an entry, in both polarities.
    pub fn keys(&self) -> impl Iterator<Item = CLiteral> + '_ {
        self.table
            .keys()
            .flat_map(|&atom| [atom as CLiteral, -(atom as CLiteral)])
    }
}

/// A partition of literals into equivalence classes, closed under negation.
///
/// Initially every literal is in a singleton class, and calls to [merge](BooleanEquivalence::merge) link two classes (and their negations) so they share a representative.
#[derive(Clone, Debug, Default)]
pub struct BooleanEquivalence {
    table: NegatingTable,
}

impl BooleanEquivalence {
    /// Find the canonical representative of `value` according to the current merges, compressing the path walked.
    pub fn find(&mut self, value: CLiteral) -> CLiteral {
        let mut representative = value;
        let mut trail = Vec::new();
        loop {
            match self.table.get(representative) {
                None => {
                    self.table.set(representative, representative);
                    break;
                }
                Some(parent) if parent == representative => break,
                Some(parent) => {
                    trail.push(representative);
                    representative = parent;
                }
            }
        }
        for link in trail {
            self.table.set(link, representative);
        }
        representative
    }

    /// The canonical representative of `value`, without recording anything.
    ///
    /// A literal never merged with anything is its own representative.
    pub fn representative(&self, value: CLiteral) -> CLiteral {
        let mut representative = value;
        loop {
            match self.table.get(representative) {
                None => return representative,
                Some(parent) if parent == representative => return representative,
                Some(parent) => representative = parent,
            }
        }
    }

    /// Merge the classes of `left` and `right` (and so also the classes of their negations).
    ///
    /// The representative of the merged class is the representative of smaller absolute value.
    /// Merging a literal with its own negation is an [Inconsistency].
    pub fn merge(&mut self, left: CLiteral, right: CLiteral) -> Result<(), Inconsistency> {
        let left = self.find(left);
        let right = self.find(right);
        if left == right.negate() {
            return Err(Inconsistency::MergedNegation(left));
        }
        let (representative, absorbed) = match left.atom() > right.atom() {
            true => (right, left),
            false => (left, right),
        };
        self.table.set(absorbed, representative);
        Ok(())
    }

    /// Merge every value of the iterator into a single class.
    pub fn merge_all(&mut self, values: impl Iterator<Item = CLiteral>) -> Result<(), Inconsistency> {
        let mut first = None;
        for value in values {
            match first {
                None => first = Some(value),
                Some(anchor) => self.merge(value, anchor)?,
            }
        }
        Ok(())
    }

    /// The recorded classes, as a map from representative to members.
    ///
    /// Every key touched by a find or merge appears in some class, in both polarities, so classes come in mirrored pairs.
    pub fn partitions(&self) -> std::collections::BTreeMap<CLiteral, Vec<CLiteral>> {
        let mut partitions: std::collections::BTreeMap<CLiteral, Vec<CLiteral>> =
            std::collections::BTreeMap::new();
        for key in self.table.keys() {
            partitions.entry(self.representative(key)).or_default().push(key);
        }
        for members in partitions.values_mut() {
            members.sort_unstable();
        }
        partitions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic]
    fn no_zero_key_get() {
        let table = NegatingTable::default();
        let _ = table.get(0);
    }

    #[test]
    #[should_panic]
    fn no_zero_key_set() {
        let mut table = NegatingTable::default();
        table.set(0, -1);
    }

    #[test]
    fn negative_keys_mirror() {
        let mut table = NegatingTable::default();
        table.set(-3, 5);
        assert_eq!(table.get(3), Some(-5));
        assert_eq!(table.get(-3), Some(5));
    }

    #[test]
    fn representatives_have_minimal_absolute_value() {
        let mut equivalence = BooleanEquivalence::default();
        equivalence.merge(5, 3).unwrap();
        equivalence.merge(3, -7).unwrap();
        assert_eq!(equivalence.find(5), 3);
        assert_eq!(equivalence.find(7), -3);
        assert_eq!(equivalence.find(-7), 3);
    }

    #[test]
    fn merging_a_negation_is_inconsistent() {
        let mut equivalence = BooleanEquivalence::default();
        equivalence.merge(1, 2).unwrap();
        assert!(equivalence.merge(2, -1).is_err());
    }

    #[test]
    fn merges_respect_negation() {
        let mut equivalence = BooleanEquivalence::default();
        equivalence.merge_all([2, 4, -6].iter().copied()).unwrap();
        assert_eq!(equivalence.find(6), -2);
        assert_eq!(equivalence.find(-4), -2);
    }

    #[test]
    fn clones_are_independent() {
        let mut original = BooleanEquivalence::default();
        original.merge(1, 2).unwrap();

        let mut copy = original.clone();
        copy.merge(2, 3).unwrap();

        assert_eq!(copy.find(3), 1);
        assert_eq!(original.find(3), 3);
    }
}
