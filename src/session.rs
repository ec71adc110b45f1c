use std::fmt::Debug;

use tracing::{debug, instrument};

use crate::backend::{Stored, VersionedKv};
use crate::merge::{MergePolicy, SetUnion};
use crate::Version;

/// A client that accumulates items and writes them back to a store.
///
/// Every [`add`](Self::add) is one read-merge-modify-write cycle: the item is
/// appended to the local value, the whole local value is written with the
/// last version this session saw as its base, and the returned siblings are
/// folded back into the local value through the session's [`MergePolicy`].
///
/// Sessions hold no lock between calls. Any number of other sessions may
/// write the same key in between, and a write whose base has gone stale is
/// not detected.
///
/// # Example
///
/// ```
/// use sibling_kit::prelude::*;
///
/// let store = VersionStore::new();
/// let mut alice = ClientSession::new("alice");
/// let mut bob = ClientSession::new("bob");
///
/// alice.add(&store, "cart", "milk").unwrap();
/// bob.add(&store, "cart", "eggs").unwrap();
/// alice.add(&store, "cart", "flour").unwrap();
///
/// let mut seen = alice.local_value().to_vec();
/// seen.sort();
/// assert_eq!(seen, vec!["eggs", "flour", "milk"]);
/// ```
#[derive(Debug, Clone)]
pub struct ClientSession<K, T, M = SetUnion> {
    name: String,
    last_version: Option<Version>,
    local_value: Vec<T>,
    last_stored: Option<Stored<K, Vec<T>>>,
    merge: M,
}

impl<K, T> ClientSession<K, T, SetUnion> {
    /// Create a session that merges siblings with [`SetUnion`].
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_merge(name, SetUnion)
    }
}

impl<K, T, M> ClientSession<K, T, M> {
    /// Create a session that merges siblings with `merge`.
    pub fn with_merge(name: impl Into<String>, merge: M) -> Self {
        Self {
            name: name.into(),
            last_version: None,
            local_value: Vec::new(),
            last_stored: None,
            merge,
        }
    }

    /// The session's name. Used for tracing only.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The version this session last wrote, or `None` before its first write.
    #[must_use]
    pub fn last_version(&self) -> Option<Version> {
        self.last_version
    }

    /// The session's current merged view.
    #[must_use]
    pub fn local_value(&self) -> &[T] {
        &self.local_value
    }

    /// The version and entry returned by the most recent successful write.
    #[must_use]
    pub fn last_stored(&self) -> Option<&Stored<K, Vec<T>>> {
        self.last_stored.as_ref()
    }
}

impl<K, T, M> ClientSession<K, T, M>
where
    K: Debug,
    T: Clone,
    M: MergePolicy<Vec<T>>,
{
    /// Append `item` and write the result to `store` under `id`.
    ///
    /// On success the session remembers the new version and replaces its
    /// local value with the merge of every surviving sibling. If the store
    /// fails, the error is returned and the session is left exactly as it was.
    #[instrument(level = "debug", skip(self, store, id, item), fields(session = %self.name, key = ?id))]
    pub fn add<S>(&mut self, store: &S, id: K, item: T) -> Result<(), S::Error>
    where
        S: VersionedKv<K, Vec<T>>,
    {
        let mut value = self.local_value.clone();
        value.push(item);

        let stored = store.store_value(id, value, self.last_version)?;
        self.last_version = Some(stored.last_version);
        self.local_value = self.merge.merge_entry(&stored.entry);
        debug!(
            version = %stored.last_version,
            siblings = stored.entry.len(),
            local_len = self.local_value.len(),
            "session write applied"
        );
        self.last_stored = Some(stored);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{HighestVersion, VersionStore};

    #[test]
    fn new_session_is_empty() {
        let s: ClientSession<&str, &str> = ClientSession::new("c1");
        assert_eq!(s.name(), "c1");
        assert_eq!(s.last_version(), None);
        assert!(s.local_value().is_empty());
        assert!(s.last_stored().is_none());
    }

    #[test]
    fn first_add_is_blind() {
        let store = VersionStore::new();
        let mut s = ClientSession::new("c1");
        s.add(&store, "k", 1).unwrap();

        assert_eq!(s.last_version(), Some(Version::FIRST));
        assert_eq!(s.local_value(), &[1]);
        assert_eq!(s.last_stored().unwrap().entry.len(), 1);
    }

    #[test]
    fn repeated_adds_by_one_session_stay_collapsed() {
        let store = VersionStore::new();
        let mut s = ClientSession::new("c1");
        for item in 1..=5 {
            s.add(&store, "k", item).unwrap();
        }

        assert_eq!(s.last_version(), Version::new(5));
        assert_eq!(s.local_value(), &[1, 2, 3, 4, 5]);
        assert!(!store.get(&"k").unwrap().is_conflicted());
    }

    #[test]
    fn duplicates_in_local_value_are_removed_by_merge() {
        let store = VersionStore::new();
        let mut s = ClientSession::new("c1");
        s.add(&store, "k", "x").unwrap();
        s.add(&store, "k", "x").unwrap();
        assert_eq!(s.local_value(), &["x"]);
    }

    #[test]
    fn custom_policy_is_used() {
        let store = VersionStore::new();
        let mut a = ClientSession::with_merge("a", HighestVersion);
        let mut b = ClientSession::with_merge("b", HighestVersion);

        a.add(&store, "k", 1).unwrap();
        b.add(&store, "k", 2).unwrap();
        // b sees siblings {1: [1], 2: [2]} and keeps only the highest
        assert_eq!(b.local_value(), &[2]);
        assert_eq!(a.local_value(), &[1]);
    }
}
