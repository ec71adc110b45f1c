use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::{debug, instrument, warn};

use crate::backend::{Stored, VersionedKv};
use crate::config::StoreConfig;
use crate::{StoreError, Version, VersionedEntry};

/// In-memory versioned key-value store.
///
/// Each key maps to a [`VersionedEntry`]. Writes without a base version are
/// blind and pile up as siblings; writes with a base version collapse the
/// entry by comparing version numbers:
///
/// - the value is inserted at `max + 1`,
/// - the base version is removed,
/// - every remaining version numbered below the base is overwritten with the
///   new value,
/// - versions numbered above the base survive untouched.
///
/// Version numbers are compared as plain integers. The store has no notion of
/// which older versions a writer actually saw, so the overwrite can stamp the
/// new value over a version whose content came from an unrelated branch.
/// This loss of causal information is part of the model and is preserved.
///
/// Each call to [`store_value`](Self::store_value) runs under a lock scoped to
/// its key; writes to different keys never wait on each other.
///
/// # Example
///
/// ```
/// use sibling_kit::prelude::*;
///
/// let store = VersionStore::new();
/// let first = store.store_value("cart", vec!["milk"], None).unwrap();
/// assert_eq!(first.last_version, Version::FIRST);
///
/// // A concurrent writer that never read the key
/// store.store_value("cart", vec!["eggs"], None).unwrap();
///
/// // The first writer builds on what it saw
/// let next = store
///     .store_value("cart", vec!["milk", "flour"], Some(first.last_version))
///     .unwrap();
/// assert_eq!(next.last_version.get(), 3);
/// assert_eq!(next.entry.len(), 2);
/// ```
pub struct VersionStore<K, V> {
    entries: DashMap<K, Arc<Mutex<VersionedEntry<K, V>>>>,
    config: StoreConfig,
}

impl<K: Eq + Hash, V> VersionStore<K, V> {
    /// Create an empty store with the default configuration.
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    /// Create an empty store with the given configuration.
    ///
    /// A `shard_amount` that is not a power of two is rounded up.
    pub fn with_config(config: StoreConfig) -> Self {
        let config = config.normalized();
        let entries = match config.shard_amount {
            Some(shards) => DashMap::with_shard_amount(shards),
            None => DashMap::new(),
        };
        Self { entries, config }
    }

    /// The configuration this store was built with.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Number of keys with an entry.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no key has been written yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` if `id` has an entry.
    pub fn contains_key(&self, id: &K) -> bool {
        self.entries.contains_key(id)
    }
}

impl<K, V> VersionStore<K, V>
where
    K: Eq + Hash + Clone + Debug,
    V: Clone,
{
    /// Record `value` under `id` and return the new version with the updated entry.
    ///
    /// - Unknown `id`: creates the entry at [`Version::FIRST`], whatever `base` is.
    /// - `base` is `None`: adds `value` as a new sibling.
    /// - `base` is `Some`: collapses the entry as described on [`VersionStore`].
    ///
    /// A base version missing from the entry is tolerated: the removal is
    /// skipped and the overwrite of lower versions still runs. With
    /// [`StoreConfig::strict_base_version`] set, such a write is rejected
    /// instead and nothing changes.
    #[instrument(level = "debug", skip(self, id, value), fields(key = ?id))]
    pub fn store_value(
        &self,
        id: K,
        value: V,
        base: Option<Version>,
    ) -> Result<Stored<K, V>, StoreError> {
        let slot = match self.entries.entry(id) {
            Entry::Occupied(occupied) => Arc::clone(occupied.get()),
            Entry::Vacant(vacant) => {
                let entry = VersionedEntry::create(vacant.key().clone(), value);
                let snapshot = entry.clone();
                vacant.insert(Arc::new(Mutex::new(entry)));
                debug!(version = %Version::FIRST, "created entry");
                return Ok(Stored {
                    last_version: Version::FIRST,
                    entry: snapshot,
                });
            }
        };

        let mut entry = slot.lock();
        let last_version = match base {
            None => {
                let version = entry.insert_sibling(value);
                debug!(%version, siblings = entry.len(), "blind write added sibling");
                version
            }
            Some(base) => {
                if self.config.strict_base_version && !entry.contains(base) {
                    warn!(%base, "rejecting write against missing base version");
                    return Err(StoreError::StaleBaseVersion {
                        key: format!("{:?}", entry.id()),
                        base,
                    });
                }
                let collapse = entry.collapse(value, base);
                if !collapse.base_present {
                    debug!(%base, "base version not present, nothing removed");
                }
                debug!(
                    version = %collapse.version,
                    overwritten = collapse.overwritten,
                    siblings = entry.len(),
                    "dependent write collapsed entry"
                );
                collapse.version
            }
        };

        Ok(Stored {
            last_version,
            entry: entry.clone(),
        })
    }

    /// Snapshot of the entry for `id`, if it exists.
    pub fn get(&self, id: &K) -> Option<VersionedEntry<K, V>> {
        let slot = self.entries.get(id).map(|r| Arc::clone(r.value()))?;
        let entry = slot.lock().clone();
        Some(entry)
    }

    /// All keys currently holding an entry, in no particular order.
    pub fn keys(&self) -> Vec<K> {
        self.entries.iter().map(|r| r.key().clone()).collect()
    }
}

impl<K: Eq + Hash, V> Default for VersionStore<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> VersionedKv<K, V> for VersionStore<K, V>
where
    K: Eq + Hash + Clone + Debug,
    V: Clone,
{
    type Error = StoreError;

    fn store_value(
        &self,
        id: K,
        value: V,
        base: Option<Version>,
    ) -> Result<Stored<K, V>, Self::Error> {
        VersionStore::store_value(self, id, value, base)
    }
}
