//! Sibling resolution policies.
//!
//! A store never merges siblings itself. Clients fold the sibling values of
//! an entry back into a single local value through a [`MergePolicy`], so the
//! conflict-resolution rule belongs to the value type, not to the store.

use std::collections::HashSet;
use std::hash::Hash;

use crate::VersionedEntry;

/// Strategy that folds the sibling values of an entry into one value.
///
/// Any `Fn(&[&V]) -> V` closure is a policy, so one-off rules don't need a
/// named type:
///
/// ```
/// use sibling_kit::prelude::*;
///
/// let longest = |siblings: &[&Vec<u32>]| {
///     siblings.iter().max_by_key(|s| s.len()).map(|s| (*s).clone()).unwrap_or_default()
/// };
/// assert_eq!(longest.merge(&[&vec![1], &vec![2, 3]]), vec![2, 3]);
/// ```
pub trait MergePolicy<V> {
    /// Fold `siblings` (in version order) into a single value.
    fn merge(&self, siblings: &[&V]) -> V;

    /// Fold every sibling of `entry`.
    fn merge_entry<K>(&self, entry: &VersionedEntry<K, V>) -> V
    where
        Self: Sized,
    {
        self.merge(&entry.siblings())
    }
}

impl<V, F> MergePolicy<V> for F
where
    F: Fn(&[&V]) -> V,
{
    fn merge(&self, siblings: &[&V]) -> V {
        self(siblings)
    }
}

/// Deduplicated union of the items of every sibling.
///
/// Items keep the order of their first occurrence, walking siblings in
/// version order. Only membership is meaningful: callers comparing results
/// should compare as sets.
///
/// # Example
///
/// ```
/// use sibling_kit::prelude::*;
///
/// let merged = SetUnion.merge(&[&vec!["milk", "eggs"], &vec!["eggs", "ham"]]);
/// assert_eq!(merged, vec!["milk", "eggs", "ham"]);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SetUnion;

impl<T> MergePolicy<Vec<T>> for SetUnion
where
    T: Clone + Eq + Hash,
{
    fn merge(&self, siblings: &[&Vec<T>]) -> Vec<T> {
        let mut seen = HashSet::new();
        let mut merged = Vec::new();
        for item in siblings.iter().flat_map(|s| s.iter()) {
            if seen.insert(item) {
                merged.push(item.clone());
            }
        }
        merged
    }
}

/// Keep only the sibling with the highest version number.
///
/// Discards every other sibling, so concurrent data is lost. Useful where a
/// register-like value is wanted and losing concurrent writes is acceptable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HighestVersion;

impl<V> MergePolicy<V> for HighestVersion
where
    V: Clone + Default,
{
    fn merge(&self, siblings: &[&V]) -> V {
        siblings.last().map(|v| (*v).clone()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::VersionStore;

    #[test]
    fn set_union_dedups() {
        let merged = SetUnion.merge(&[&vec![1, 2, 2], &vec![3, 1]]);
        assert_eq!(merged, vec![1, 2, 3]);
    }

    #[test]
    fn set_union_of_nothing_is_empty() {
        let merged: Vec<u8> = SetUnion.merge(&[]);
        assert!(merged.is_empty());
    }

    #[test]
    fn set_union_is_idempotent() {
        let a = vec!["x", "y"];
        let b = vec!["y", "z"];
        let once = SetUnion.merge(&[&a, &b]);
        let twice = SetUnion.merge(&[&once]);
        assert_eq!(once, twice);
    }

    #[test]
    fn highest_version_takes_last_sibling() {
        let store = VersionStore::new();
        store.store_value("k", vec![1], None).unwrap();
        let stored = store.store_value("k", vec![2], None).unwrap();
        assert_eq!(HighestVersion.merge_entry(&stored.entry), vec![2]);
    }

    #[test]
    fn closures_are_policies() {
        let concat = |siblings: &[&Vec<u8>]| -> Vec<u8> {
            siblings.iter().flat_map(|s| s.iter().copied()).collect()
        };
        let merged: Vec<u8> = MergePolicy::merge(&concat, &[&vec![1], &vec![1, 2]]);
        assert_eq!(merged, vec![1, 1, 2]);
    }
}
