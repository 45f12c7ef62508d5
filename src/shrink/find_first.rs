//! A search for the first accepted element of a sequence, optionally speculating ahead in parallel.
//!
//! The sequence is consumed in exponentially doubling chunks.
//! Every element of a chunk is evaluated --- across the worker threads, when parallelism has been configured --- and the first element accepted in input order wins.
//! Answers computed for elements after the winner are discarded, though as the predicate of interest caches oracle calls the work is not wasted.

use crate::structures::CClause;

use super::Shrinker;

/// No element of the sequence was accepted.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) struct NotFound;

impl<F: Fn(&[CClause]) -> bool + Sync> Shrinker<F> {
    /// The index of the first element of `items` accepted by `predicate`.
    pub(super) fn find_first<T, P>(&self, items: &[T], predicate: P) -> Result<usize, NotFound>
    where
        T: Sync,
        P: Fn(&T) -> bool + Sync,
    {
        let parallelism = self.parallelism().max(1);

        let mut start = 0;
        let mut chunk_size = 1;
        while start < items.len() {
            let end = (start + chunk_size).min(items.len());
            let chunk = &items[start..end];

            let hit = match parallelism {
                1 => chunk.iter().position(&predicate),

                _ => {
                    let decisions = map_across_workers(chunk, &predicate, parallelism);
                    decisions.iter().position(|&accepted| accepted)
                }
            };

            if let Some(offset) = hit {
                return Ok(start + offset);
            }

            start = end;
            chunk_size *= 2;
        }

        Err(NotFound)
    }
}

/// Evaluate `predicate` on every element of `chunk` across up to `parallelism` scoped workers, preserving input order.
fn map_across_workers<T, P>(chunk: &[T], predicate: &P, parallelism: usize) -> Vec<bool>
where
    T: Sync,
    P: Fn(&T) -> bool + Sync,
{
    let mut decisions = vec![false; chunk.len()];
    let workers = parallelism.min(chunk.len());
    let stride = (chunk.len() + workers - 1) / workers;

    crossbeam::thread::scope(|scope| {
        for (worker, slots) in decisions.chunks_mut(stride).enumerate() {
            let items = &chunk[worker * stride..worker * stride + slots.len()];
            scope.spawn(move |_| {
                for (slot, item) in slots.iter_mut().zip(items) {
                    *slot = predicate(item);
                }
            });
        }
    })
    .expect("a speculation worker panicked");

    decisions
}
