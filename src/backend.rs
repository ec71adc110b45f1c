use core::fmt;

use crate::{Version, VersionedEntry};

/// The outcome of a write: the version just assigned and the entry after it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stored<K, V> {
    /// Version number assigned to the written value.
    pub last_version: Version,
    /// Snapshot of the full entry, siblings included, right after the write.
    pub entry: VersionedEntry<K, V>,
}

/// A store that sessions can write versioned values to.
///
/// [`VersionStore`](crate::VersionStore) is the in-process implementation.
/// Anything that forwards writes elsewhere (a remote replica, a test double
/// that fails on demand) implements this trait and reports transport problems
/// through its own error type.
pub trait VersionedKv<K, V> {
    /// Error type for this backend.
    type Error: fmt::Debug + fmt::Display;

    /// Record `value` under `id`.
    ///
    /// `base` is the version the caller last observed, or `None` for a blind
    /// write that is concurrent with everything already stored.
    fn store_value(&self, id: K, value: V, base: Option<Version>)
        -> Result<Stored<K, V>, Self::Error>;
}
