/*!
The shrinker: a search for a small formula still satisfying a test function.

A [Shrinker] holds a current formula, always canonical, and a test function --- the *oracle*.
[Reduction passes](Shrinker#reduction-passes) propose candidate formulas derived from the current one.
Every candidate is routed through a single gate, which canonicalises the candidate, consults a cache of previous oracle answers, and queries the oracle on a miss.
Whenever an accepted candidate strictly precedes the current formula in [shrink order](crate::structures::ShrinkKey), the candidate becomes current and every subscriber registered through [on_reduce](Shrinker::on_reduce) is notified.

The oracle is expected to be pure with respect to the canonical form of its argument: the cache assumes an answer never changes, and the driver loop assumes acceptance of the initial formula.

# Reduction passes

The [reduce](Shrinker::reduce) loop interleaves housekeeping --- [replace_with_core](Shrinker::replace_with_core), [move_to_components](Shrinker::move_to_components), [renumber_variables](Shrinker::renumber_variables) --- with the heavier passes [delete_clauses](Shrinker::delete_clauses), [delete_literals](Shrinker::delete_literals), [force_literals](Shrinker::force_literals), [delete_literals_from_clauses](Shrinker::delete_literals_from_clauses), and [merge_variables](Shrinker::merge_variables), until a pass over all of these leaves the current formula unchanged.
Each pass is public, so a single pass may be driven without the loop.

# Parallelism

With a [parallelism](ShrinkConfig::parallelism) above one, passes built on a first-accepted search speculate on candidates ahead of the one awaited, caching every answer obtained.
The current formula and the notification of subscribers are guarded by one mutex, and the cache by another, so oracle calls themselves are never serialised.
*/

mod cache;
mod find_first;
mod passes;

use std::collections::HashMap;
use std::sync::Mutex;

use crate::{
    misc::log::targets,
    reduction::ReducedSatProblem,
    structures::{CClause, CLiteral, Cnf, Formula, Literal},
    types::err::{ErrorKind, ShrinkError},
};

use cache::fingerprint;

/// Configuration of a [Shrinker].
#[derive(Clone, Copy, Debug)]
pub struct ShrinkConfig {
    /// The number of worker threads used to speculate on candidates, with `1` for no speculation.
    pub parallelism: usize,
}

impl Default for ShrinkConfig {
    fn default() -> Self {
        ShrinkConfig { parallelism: 1 }
    }
}

/// A shrinker for formulas in conjunctive normal form.
pub struct Shrinker<F> {
    oracle: F,
    current: Mutex<Cnf>,
    cache: Mutex<HashMap<String, bool>>,
    subscribers: Vec<Box<dyn Fn(&[CClause]) + Sync>>,
    config: ShrinkConfig,
}

impl<F: Fn(&[CClause]) -> bool + Sync> Shrinker<F> {
    /// A shrinker over `initial` with the given test function.
    ///
    /// The initial formula is canonicalised and tested once: an initial formula the oracle refuses is an error, as the shrinker would have nothing to preserve.
    pub fn new(initial: &[CClause], oracle: F, config: ShrinkConfig) -> Result<Self, ErrorKind> {
        let current = initial.to_vec().canonical();

        let shrinker = Shrinker {
            oracle,
            current: Mutex::new(current.clone()),
            cache: Mutex::new(HashMap::new()),
            subscribers: Vec::new(),
            config,
        };

        match shrinker.test_function(current) {
            true => Ok(shrinker),
            false => Err(ErrorKind::from(ShrinkError::InitialRejected)),
        }
    }

    /// Register a subscriber, called with the new current formula on every strict shrink.
    ///
    /// Subscribers are called while the current formula is locked, and so must not query the shrinker.
    pub fn on_reduce(&mut self, subscriber: impl Fn(&[CClause]) + Sync + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    /// The current formula, canonical.
    pub fn current(&self) -> Cnf {
        self.current.lock().expect("current formula lock").clone()
    }

    fn parallelism(&self) -> usize {
        self.config.parallelism
    }

    /// Run reduction passes until none of them further shrinks the current formula.
    pub fn reduce(&self) {
        let mut previous: Option<Cnf> = None;
        loop {
            let snapshot = self.current();
            if previous.as_ref() == Some(&snapshot) {
                break;
            }
            previous = Some(snapshot);

            self.house_keeping();
            self.guarded("delete_clauses", Self::delete_clauses);
            self.guarded("delete_literals", Self::delete_literals);
            self.guarded("force_literals", Self::force_literals);
            self.guarded("delete_literals_from_clauses", Self::delete_literals_from_clauses);
            self.guarded("merge_variables", Self::merge_variables);
        }
    }

    /// The housekeeping passes, run between the heavier passes to keep the current formula in a predictable shape.
    pub fn house_keeping(&self) {
        self.replace_with_core();
        self.move_to_components();
        self.renumber_variables();
    }

    /// Run a pass, following with housekeeping if the pass shrank the current formula.
    fn guarded(&self, name: &str, pass: impl Fn(&Self)) {
        log::debug!(target: targets::SHRINK, "pass: {name}");
        let before = self.current();
        pass(self);
        if before != self.current() {
            self.house_keeping();
        }
    }

    /// Test a candidate formula, caching the answer and advancing the current formula on a strict shrink.
    ///
    /// The cache is probed with the fingerprint of the candidate as given and, on a miss, with the fingerprint of its canonical form, so repeated proposals are recognised before any canonicalisation work.
    /// The answer is stored under both fingerprints.
    fn test_function(&self, candidate: Cnf) -> bool {
        let raw_key = fingerprint(&candidate);
        if let Some(&known) = self.cache.lock().expect("cache lock").get(&raw_key) {
            return known;
        }

        let candidate = candidate.canonical();
        let canonical_key = fingerprint(&candidate);
        let known = self.cache.lock().expect("cache lock").get(&canonical_key).copied();

        let result = match known {
            Some(known) => known,
            None => {
                log::trace!(target: targets::ORACLE, "query: {} clauses", candidate.len());
                let accepted = (self.oracle)(&candidate);

                if accepted {
                    let mut current = self.current.lock().expect("current formula lock");
                    if candidate.shrink_key() < current.shrink_key() {
                        log::debug!(
                            target: targets::SHRINK,
                            "shrunk to {} clauses over {} variables",
                            candidate.len(),
                            candidate.variables().len(),
                        );
                        *current = candidate.clone();
                        for subscriber in &self.subscribers {
                            subscriber(&candidate);
                        }
                    }
                }
                accepted
            }
        };

        let mut cache = self.cache.lock().expect("cache lock");
        cache.insert(raw_key, result);
        cache.insert(canonical_key, result);
        result
    }

    /// Candidates built from a reduced form: the raw core, the core with the forced assignment as unit clauses, and the latter with each merge encoded as a pair of binary clauses.
    ///
    /// The first accepted candidate wins.
    fn propose_reduction(&self, problem: &ReducedSatProblem) -> bool {
        if self.test_function(problem.core.clone()) {
            return true;
        }

        let mut with_forced = problem.core.clone();
        for (&atom, &value) in &problem.forced {
            with_forced.push(vec![CLiteral::new(atom, value)]);
        }
        if self.test_function(with_forced.clone()) {
            return true;
        }

        let mut with_merges = with_forced;
        for (representative, members) in problem.merge_table.partitions() {
            if !representative.polarity() || members.len() < 2 {
                continue;
            }
            for &member in members.iter().filter(|&&member| member != representative) {
                with_merges.push(vec![representative.negate(), member]);
                with_merges.push(vec![representative, member.negate()]);
            }
        }
        self.test_function(with_merges)
    }
}

/// Shrink `clauses` with respect to `oracle`, without speculation.
///
/// A convenience for [Shrinker::new] followed by [Shrinker::reduce].
///
/// ```rust
/// # use sat_shrink::shrink::shrink_sat;
/// let shrunk = shrink_sat(&[vec![1, 2, 3]], |candidate: &[Vec<i32>]| {
///     candidate.iter().any(|clause| !clause.is_empty())
/// });
///
/// assert_eq!(shrunk, Ok(vec![vec![1]]));
/// ```
pub fn shrink_sat<F: Fn(&[CClause]) -> bool + Sync>(
    clauses: &[CClause],
    oracle: F,
) -> Result<Cnf, ErrorKind> {
    let shrinker = Shrinker::new(clauses, oracle, ShrinkConfig::default())?;
    shrinker.reduce();
    Ok(shrinker.current())
}
