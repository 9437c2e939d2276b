//! Order- and duplicate-independent handling of wire sequences that are
//! semantically sets: tags, category lists, recipients.
//!
//! The remote API transports these as ordered arrays; comparing them
//! positionally produces phantom diffs on every cycle. Everything here works
//! on the normalized set form instead.

use std::collections::BTreeSet;

/// Collapses a wire sequence into its semantic set.
///
/// Idempotent: normalizing an already normalized sequence yields the same
/// set, so repeated read/write cycles are stable.
pub fn normalize<T: Ord>(raw: impl IntoIterator<Item = T>) -> BTreeSet<T> {
    raw.into_iter().collect()
}

/// Membership changes between two sets.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SetDiff<T> {
    pub added: BTreeSet<T>,
    pub removed: BTreeSet<T>,
}

impl<T> SetDiff<T> {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Computes which members were added and which were removed going from `old`
/// to `new`.
pub fn diff<T: Ord + Clone>(old: &BTreeSet<T>, new: &BTreeSet<T>) -> SetDiff<T> {
    SetDiff {
        added: new.difference(old).cloned().collect(),
        removed: old.difference(new).cloned().collect(),
    }
}

/// Order- and duplicate-independent equality of two raw sequences.
pub fn equal<T: Ord + Clone>(a: &[T], b: &[T]) -> bool {
    normalize(a.iter().cloned()) == normalize(b.iter().cloned())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn normalize_ignores_order_and_duplicates() {
        assert_eq!(normalize([3, 1, 2, 2]), normalize([1, 2, 3]));
    }

    #[test]
    fn normalize_is_idempotent() {
        let once = normalize([5, 5, 1, 3]);
        let twice = normalize(once.clone());
        assert_eq!(once, twice);
    }

    #[rstest]
    #[case(&[1, 2, 3], &[3, 2, 1, 1], true)]
    #[case(&[], &[], true)]
    #[case(&[1, 2], &[1, 2, 3], false)]
    fn sequence_equality(#[case] a: &[i64], #[case] b: &[i64], #[case] expected: bool) {
        assert_eq!(equal(a, b), expected);
    }

    #[test]
    fn diff_reports_membership_changes() {
        let old = normalize([1, 2, 3]);
        let new = normalize([2, 3, 4]);
        let diff = diff(&old, &new);
        assert_eq!(diff.added, normalize([4]));
        assert_eq!(diff.removed, normalize([1]));
        assert!(!diff.is_empty());
        assert!(super::diff(&old, &old).is_empty());
    }
}
