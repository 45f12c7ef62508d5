/*!
A procedure to maximise a monotone-from-true predicate on the non-negative integers.

Given a predicate *f* with *f*(0) true and *f*(*n*) false for all sufficiently large *n*, [find_integer] returns the largest *n* for which *f*(*n*) is true, calling *f* O(log *n*) times.

The procedure opens with a linear scan of 1..=4 rather than probing exponentially from the start, as in delta-style search the answer is very often 0 or 1 --- if the answer is 0 and 2 is probed first, twice the required work has been done.
*/

/// The largest `n` for which `f(n)` is true.
///
/// `f(0)` is assumed to be true and is not checked.
/// May not terminate unless `f(n)` is false for some `n`.
pub fn find_integer(mut f: impl FnMut(usize) -> bool) -> usize {
    for n in 1..=4 {
        if !f(n) {
            return n - 1;
        }
    }

    // f(4) holds, so probe exponentially for some value on which f fails.
    // lo is the largest value on which f is known to hold, hi the smallest on which f is known to fail.
    let mut lo = 4;
    let mut hi = 5;
    while f(hi) {
        lo = hi;
        hi *= 2;
    }

    while lo + 1 < hi {
        let mid = lo + (hi - lo) / 2;
        match f(mid) {
            true => lo = mid,
            false => hi = mid,
        }
    }
    lo
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_each_threshold() {
        for threshold in 0..100 {
            assert_eq!(find_integer(|n| n <= threshold), threshold);
        }
    }

    #[test]
    fn large_thresholds_use_logarithmic_probes() {
        let threshold = 1 << 20;
        let mut calls = 0;
        let found = find_integer(|n| {
            calls += 1;
            n <= threshold
        });
        assert_eq!(found, threshold);
        assert!(calls <= 64, "{calls} probes for a 2^20 threshold");
    }
}
