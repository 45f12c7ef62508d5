//! Property-based tests of the reduction engine over arbitrary small formulas.

mod common;

use proptest::prelude::*;

use sat_shrink::{
    reduction::ReducedSatProblem,
    structures::{Clause, Cnf, Literal},
};

/// Arbitrary formulas over at most six variables, with clauses of at most four literals.
fn small_formulas() -> impl Strategy<Value = Cnf> {
    let literal = (1_i32..=6, prop::bool::ANY)
        .prop_map(|(atom, polarity)| if polarity { atom } else { -atom });
    let clause = prop::collection::vec(literal, 1..=4);
    prop::collection::vec(clause, 1..=8)
}

proptest! {
    #[test]
    fn reduction_agrees_with_some_satisfying_assignment(clauses in small_formulas()) {
        let solution = common::find_solution(&clauses);
        prop_assume!(solution.is_some());
        let solution = solution.unwrap();
        let value_of = |atom: u32| solution.iter().any(|&literal| literal == atom as i32);

        let reduced = ReducedSatProblem::from_sat(&clauses);
        prop_assert!(reduced.is_ok(), "inconsistency on a satisfiable formula");
        let reduced = reduced.unwrap();

        // Forced assignments are entailed, so any satisfying assignment agrees.
        for (&atom, &value) in reduced.forced.iter() {
            prop_assert_eq!(value_of(atom), value, "forced {}", atom);
        }

        // Merges are entailed equivalences, so reading a literal through its class
        // preserves any satisfying assignment.
        for clause in clauses.iter() {
            for literal in clause.literals() {
                let representative = reduced.merge_table.representative(literal);
                prop_assert_eq!(
                    value_of(representative.atom()) ^ !representative.polarity(),
                    value_of(literal.atom()) ^ !literal.polarity(),
                    "class of {}",
                    literal
                );
            }
        }
    }

    #[test]
    fn cores_are_reduced(clauses in small_formulas()) {
        let reduced = match ReducedSatProblem::from_sat(&clauses) {
            Ok(reduced) => reduced,
            Err(_) => {
                // Unsatisfiable by propagation, nothing to check.
                return Ok(());
            }
        };

        for clause in reduced.core.iter() {
            prop_assert!(clause.len() >= 2);
            prop_assert!(!clause.tautological());

            for &literal in clause {
                prop_assert_eq!(reduced.merge_table.representative(literal), literal);
                prop_assert!(!reduced.forced.contains_key(&literal.atom()));
            }
        }

        let mut canonical = reduced.core.clone();
        canonical.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
        prop_assert_eq!(&canonical, &reduced.core);

        for component in petgraph::algo::tarjan_scc(&reduced.implications) {
            prop_assert_eq!(component.len(), 1);
        }
    }

    #[test]
    fn extension_does_not_mutate_the_parent(
        clauses in small_formulas(),
        extra in small_formulas(),
    ) {
        let parent = match ReducedSatProblem::from_sat(&clauses) {
            Ok(reduced) => reduced,
            Err(_) => return Ok(()),
        };

        let core = parent.core.clone();
        let forced = parent.forced.clone();
        let free = parent.free.clone();
        let representatives: Vec<i32> = (1..=6)
            .map(|atom| parent.merge_table.representative(atom))
            .collect();

        let _ = parent.with_extra_clauses(&extra);

        prop_assert_eq!(&core, &parent.core);
        prop_assert_eq!(&forced, &parent.forced);
        prop_assert_eq!(&free, &parent.free);
        for (atom, &representative) in (1..=6).zip(representatives.iter()) {
            prop_assert_eq!(parent.merge_table.representative(atom), representative);
        }
    }

    #[test]
    fn inconsistency_implies_unsatisfiability(clauses in small_formulas()) {
        if ReducedSatProblem::from_sat(&clauses).is_err() {
            prop_assert!(!common::is_satisfiable(&clauses));
        }
    }
}
