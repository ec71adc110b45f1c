use std::collections::BTreeMap;

use crate::Version;

/// All surviving versions of a single key.
///
/// Each version number maps to the value written under it. More than one
/// version means the entry holds siblings: values the store could not order
/// causally and therefore keeps side by side until a client merges them.
///
/// Entries are created and mutated only by a [`VersionStore`](crate::VersionStore);
/// the copies handed out to callers are snapshots.
///
/// # Example
///
/// ```
/// use sibling_kit::prelude::*;
///
/// let store = VersionStore::new();
/// store.store_value("cart", vec!["milk"], None).unwrap();
/// let stored = store.store_value("cart", vec!["eggs"], None).unwrap();
///
/// let entry = stored.entry;
/// assert!(entry.is_conflicted());
/// assert_eq!(entry.siblings(), vec![&vec!["milk"], &vec!["eggs"]]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VersionedEntry<K, V> {
    id: K,
    versions: BTreeMap<Version, V>,
}

/// What a dependent write did to an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Collapse {
    pub(crate) version: Version,
    pub(crate) base_present: bool,
    pub(crate) overwritten: usize,
}

impl<K, V> VersionedEntry<K, V> {
    /// The key this entry belongs to.
    #[must_use]
    pub fn id(&self) -> &K {
        &self.id
    }

    /// The full version mapping, ordered by version number.
    #[must_use]
    pub fn versions(&self) -> &BTreeMap<Version, V> {
        &self.versions
    }

    /// The value stored under `version`, if that version survives.
    #[must_use]
    pub fn get(&self, version: Version) -> Option<&V> {
        self.versions.get(&version)
    }

    /// Returns `true` if `version` is present in this entry.
    #[must_use]
    pub fn contains(&self, version: Version) -> bool {
        self.versions.contains_key(&version)
    }

    /// Number of surviving versions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.versions.len()
    }

    /// Returns `true` if no versions survive.
    ///
    /// Always `false` for entries handed out by a store: creation writes
    /// version 1 and every later write inserts a version. Only a
    /// deserialized entry can be empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    /// The highest version number present.
    #[must_use]
    pub fn max_version(&self) -> Option<Version> {
        self.versions.keys().next_back().copied()
    }

    /// The version number the next write to this entry will receive.
    #[must_use]
    pub fn next_version(&self) -> Version {
        self.max_version().map_or(Version::FIRST, Version::next)
    }

    /// All sibling values in version order.
    #[must_use]
    pub fn siblings(&self) -> Vec<&V> {
        self.versions.values().collect()
    }

    /// Returns `true` if the entry holds more than one sibling.
    #[must_use]
    pub fn is_conflicted(&self) -> bool {
        self.versions.len() > 1
    }
}

impl<K, V: Clone> VersionedEntry<K, V> {
    /// A fresh entry holding `value` at [`Version::FIRST`].
    pub(crate) fn create(id: K, value: V) -> Self {
        let mut versions = BTreeMap::new();
        versions.insert(Version::FIRST, value);
        Self { id, versions }
    }

    /// Blind write: add `value` as a new sibling, keeping every existing version.
    pub(crate) fn insert_sibling(&mut self, value: V) -> Version {
        let version = self.next_version();
        self.versions.insert(version, value);
        version
    }

    /// Dependent write on top of `base`.
    ///
    /// Inserts `value` at the next version, drops `base`, and overwrites every
    /// remaining version numbered below `base` with `value`. Versions above
    /// `base` are left alone. A missing `base` only skips the removal; the
    /// overwrite still applies to lower numbers. The removal looks at the
    /// entry as it was before the write, so a `base` equal to the new version
    /// never deletes the value just written.
    pub(crate) fn collapse(&mut self, value: V, base: Version) -> Collapse {
        let version = self.next_version();
        let base_present = self.versions.remove(&base).is_some();

        let mut overwritten = 0;
        for (_, stored) in self.versions.range_mut(..base) {
            *stored = value.clone();
            overwritten += 1;
        }
        self.versions.insert(version, value);

        Collapse {
            version,
            base_present,
            overwritten,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(raw: u64) -> Version {
        Version::new(raw).unwrap()
    }

    #[test]
    fn create_starts_at_first_version() {
        let e = VersionedEntry::create("k", "a");
        assert_eq!(e.len(), 1);
        assert_eq!(e.get(Version::FIRST), Some(&"a"));
        assert_eq!(e.next_version(), v(2));
        assert!(!e.is_conflicted());
    }

    #[test]
    fn insert_sibling_keeps_existing() {
        let mut e = VersionedEntry::create("k", "a");
        assert_eq!(e.insert_sibling("b"), v(2));
        assert_eq!(e.insert_sibling("c"), v(3));
        assert_eq!(e.siblings(), vec![&"a", &"b", &"c"]);
    }

    #[test]
    fn collapse_drops_base_and_overwrites_lower() {
        let mut e = VersionedEntry::create("k", "a");
        e.insert_sibling("b");
        e.insert_sibling("c");
        e.insert_sibling("d");

        let c = e.collapse("new", v(3));
        assert_eq!(c.version, v(5));
        assert!(c.base_present);
        assert_eq!(c.overwritten, 2);

        assert_eq!(e.get(v(1)), Some(&"new"));
        assert_eq!(e.get(v(2)), Some(&"new"));
        assert_eq!(e.get(v(3)), None);
        assert_eq!(e.get(v(4)), Some(&"d"));
        assert_eq!(e.get(v(5)), Some(&"new"));
    }

    #[test]
    fn collapse_with_missing_base_still_overwrites_lower() {
        let mut e = VersionedEntry::create("k", "a");
        e.insert_sibling("b");
        e.collapse("x", v(2));
        // entry is now {1: x, 3: x}; version 2 is gone
        let c = e.collapse("y", v(2));
        assert!(!c.base_present);
        assert_eq!(c.version, v(4));
        assert_eq!(c.overwritten, 1);
        assert_eq!(e.get(v(1)), Some(&"y"));
        assert_eq!(e.get(v(3)), Some(&"x"));
        assert_eq!(e.get(v(4)), Some(&"y"));
    }

    #[test]
    fn collapse_never_removes_its_own_version() {
        let mut e = VersionedEntry::create("k", "a");
        let c = e.collapse("b", v(2));
        assert_eq!(c.version, v(2));
        assert!(!c.base_present);
        assert_eq!(c.overwritten, 1);
        assert_eq!(e.siblings(), vec![&"b", &"b"]);
    }

    #[test]
    fn written_entries_are_never_empty() {
        let mut e = VersionedEntry::create("k", "a");
        assert!(!e.is_empty());
        e.collapse("b", Version::FIRST);
        assert!(!e.is_empty());
        assert_eq!(e.len(), 1);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialized_entry_rejects_version_zero() {
        let empty: VersionedEntry<String, String> =
            serde_json::from_str(r#"{"id":"k","versions":{}}"#).unwrap();
        assert!(empty.is_empty());
        assert_eq!(empty.next_version(), Version::FIRST);

        let zero = serde_json::from_str::<VersionedEntry<String, String>>(
            r#"{"id":"k","versions":{"0":"a"}}"#,
        );
        assert!(zero.is_err());
    }

    #[test]
    fn collapse_with_unassigned_base_overwrites_everything() {
        let mut e = VersionedEntry::create("k", "a");
        e.insert_sibling("b");
        let c = e.collapse("z", v(10));
        assert!(!c.base_present);
        assert_eq!(c.version, v(3));
        assert_eq!(c.overwritten, 2);
        assert_eq!(e.siblings(), vec![&"z", &"z", &"z"]);
    }
}
