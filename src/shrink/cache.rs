//! Fingerprints of candidate formulas, used as oracle cache keys.
//!
//! A fingerprint is `{clause_count}:{length}:{digest}` where `length` is the length of a deterministic rendering of the clause list and `digest` is the first 8 hex characters of the SHA-1 of that rendering.
//! The counts keep accidental collisions of the truncated digest from conflating formulas of different shapes.

use sha1::{Digest, Sha1};

use crate::structures::CClause;

/// The cache fingerprint of a clause list, as given (not canonicalised).
pub fn fingerprint(clauses: &[CClause]) -> String {
    let rendering = format!("{clauses:?}");
    let digest = Sha1::digest(rendering.as_bytes());

    let mut hex = String::with_capacity(8);
    for byte in &digest[..4] {
        hex.push_str(&format!("{byte:02x}"));
    }

    format!("{}:{}:{hex}", clauses.len(), rendering.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape() {
        let print = fingerprint(&[vec![1, 2], vec![-3]]);
        let mut parts = print.split(':');

        assert_eq!(parts.next(), Some("2"));
        assert_eq!(parts.next().map(|l| l.parse::<usize>().is_ok()), Some(true));

        let digest = parts.next().expect("digest part");
        assert_eq!(digest.len(), 8);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(parts.next(), None);
    }

    #[test]
    fn distinguishes_order() {
        assert_ne!(fingerprint(&[vec![1, 2]]), fingerprint(&[vec![2, 1]]));
    }

    #[test]
    fn stable_across_calls() {
        let clauses = vec![vec![1, -2], vec![3]];
        assert_eq!(fingerprint(&clauses), fingerprint(&clauses));
    }
}
