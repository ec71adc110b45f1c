use thiserror::Error;

use crate::Version;

/// Errors returned by [`VersionStore`](crate::VersionStore).
///
/// With the default [`StoreConfig`](crate::StoreConfig) the store never fails:
/// a dependent write against a version that no longer exists is applied as
/// far as it can be. The variants below only appear when a stricter mode is
/// switched on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A dependent write named a base version the entry does not hold.
    ///
    /// Only returned when [`StoreConfig::strict_base_version`](crate::StoreConfig::strict_base_version)
    /// is set. The entry is left untouched.
    #[error("base version {base} is not present for key {key}")]
    StaleBaseVersion {
        /// Debug rendering of the key.
        key: String,
        /// The base version the caller supplied.
        base: Version,
    },
}

/// A raw version number of zero. Version numbers start at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("version numbers start at 1")]
pub struct ZeroVersion;
