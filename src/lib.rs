/*!
A library for shrinking boolean formulas written in conjunctive normal form.

Given a formula and a test function the formula satisfies, sat_shrink searches for a formula which is substantially smaller --- in variables, in clauses, and in literals --- while still satisfying the test function.
This is delta-debugging in the SAT domain: given a formula which triggers some behaviour (a solver crash, a slow path, a wrong answer), find a small formula which still triggers it.

The test function is an arbitrary predicate over clause lists.
The shrinker makes no attempt to understand it, and in particular never assumes the predicate is satisfiability --- only that it is deterministic with respect to the canonical form of its argument.

# Orientation

The library is designed around two parts:

- The [reduction] module builds the canonical *reduced form* of a formula: unit-propagated assignments, equivalence classes of literals obtained by collapsing cycles of the binary-clause implication graph, and the residual core clauses.
- The [shrink] module drives reduction passes against the test function, keeping the smallest accepted formula under a strict [shrink order](structures::ShrinkKey), with memoisation of every oracle answer and optional parallel speculation.

Useful starting points:

- [shrink_sat](shrink::shrink_sat) to shrink a clause list with the defaults.
- [Shrinker](shrink::Shrinker) to configure speculation or subscribe to improvements.
- [ReducedSatProblem](reduction::ReducedSatProblem) to reuse the simplifier on its own.
- [dimacs] to read and write the DIMACS CNF format.

# Example

Shrink a formula with respect to "mentions variable 3 twice", a stand-in for whatever behaviour is of interest:

```rust
# use sat_shrink::shrink::shrink_sat;
# use sat_shrink::structures::Literal;
let formula = vec![vec![1, 2], vec![2, 3], vec![-3, 4], vec![1, 4]];

let shrunk = shrink_sat(&formula, |candidate: &[Vec<i32>]| {
    let mentions = candidate
        .iter()
        .flat_map(|clause| clause.iter())
        .filter(|literal| literal.atom() == 3)
        .count();
    mentions >= 2
}).expect("the formula satisfies the test");

assert!(shrunk.len() <= 2);
```

# Logs

Calls to [log!](log) are made throughout the library, with targets listed in [misc::log] to help narrow output to relevant parts.
No log implementation is installed; the bundled command-line interface uses [env_logger](https://docs.rs/env_logger).
*/

pub mod dimacs;
pub mod generic;
pub mod misc;
pub mod reduction;
pub mod shrink;
pub mod solver;
pub mod structures;
pub mod types;
