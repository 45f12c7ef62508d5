//! Support for solver-level tests: a brute-force satisfiability check over small formulas.
//!
//! The tests which need satisfiability keep their variable counts low enough for exhaustive
//! search, which keeps the suite independent of any external solver binary.

#![allow(dead_code)]

use std::collections::BTreeSet;

use sat_shrink::structures::{Atom, CClause, Literal};

/// The first satisfying assignment of the clauses in mask order, as a list of literals.
///
/// The empty formula is satisfied by the empty assignment and a formula containing an empty
/// clause by nothing.
pub fn find_solution(clauses: &[CClause]) -> Option<Vec<i32>> {
    if clauses.is_empty() {
        return Some(Vec::new());
    }
    if clauses.iter().any(|clause| clause.is_empty()) {
        return None;
    }

    let variables: Vec<Atom> = clauses
        .iter()
        .flat_map(|clause| clause.iter().map(|literal| literal.atom()))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    assert!(variables.len() <= 16, "too many variables for brute force");

    'assignments: for mask in 0_u32..(1 << variables.len()) {
        let value = |atom: Atom| -> bool {
            let index = variables.binary_search(&atom).expect("atom of the formula");
            mask >> index & 1 == 1
        };

        for clause in clauses {
            if !clause.iter().any(|&literal| value(literal.atom()) == literal.polarity()) {
                continue 'assignments;
            }
        }

        return Some(
            variables
                .iter()
                .map(|&atom| match value(atom) {
                    true => atom as i32,
                    false => -(atom as i32),
                })
                .collect(),
        );
    }

    None
}

/// Whether the clauses have some satisfying assignment.
pub fn is_satisfiable(clauses: &[CClause]) -> bool {
    find_solution(clauses).is_some()
}

#[test]
fn brute_force_agrees_with_hand_checks() {
    assert!(is_satisfiable(&[]));
    assert!(!is_satisfiable(&[vec![]]));
    assert!(is_satisfiable(&[vec![1, 2], vec![-1, 2]]));
    assert!(!is_satisfiable(&[vec![1], vec![-1]]));
    assert!(!is_satisfiable(&[
        vec![1, 2],
        vec![1, -2],
        vec![-1, 2],
        vec![-1, -2]
    ]));

    assert_eq!(find_solution(&[vec![2], vec![-2, -5]]), Some(vec![2, -5]));
}
