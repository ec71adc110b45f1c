use crate::VersionStore;

/// Configuration for a [`VersionStore`].
///
/// The defaults reproduce the store's reference behavior exactly; every
/// option here is opt-in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StoreConfig {
    /// Reject dependent writes whose base version is missing from the entry
    /// with [`StoreError::StaleBaseVersion`](crate::StoreError::StaleBaseVersion)
    /// instead of applying them. Off by default.
    pub strict_base_version: bool,
    /// Shard count for the key table. Rounded up to a power of two of at
    /// least 2 when the store is built. `None` picks a default from the
    /// number of CPUs.
    pub shard_amount: Option<usize>,
}

impl StoreConfig {
    /// Round `shard_amount` up to a shard count the key table accepts.
    pub(crate) fn normalized(mut self) -> Self {
        self.shard_amount = self.shard_amount.map(|shards| {
            shards
                .checked_next_power_of_two()
                .unwrap_or(1 << (usize::BITS - 1))
                .max(2)
        });
        self
    }
}

/// Builder for a [`VersionStore`] with custom configuration.
///
/// # Example
///
/// ```
/// use sibling_kit::prelude::*;
///
/// let store: VersionStore<&str, Vec<u8>> = VersionStoreBuilder::new()
///     .strict_base_version(true)
///     .build();
/// assert!(store.config().strict_base_version);
/// ```
#[derive(Debug, Clone, Default)]
pub struct VersionStoreBuilder {
    config: StoreConfig,
}

impl VersionStoreBuilder {
    /// Start from the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject dependent writes against missing base versions.
    pub fn strict_base_version(mut self, strict: bool) -> Self {
        self.config.strict_base_version = strict;
        self
    }

    /// Set the shard count of the key table, rounded up to a power of two.
    pub fn shard_amount(mut self, shards: usize) -> Self {
        self.config.shard_amount = Some(shards);
        self
    }

    /// Build the store.
    pub fn build<K, V>(self) -> VersionStore<K, V>
    where
        K: Eq + std::hash::Hash,
    {
        VersionStore::with_config(self.config)
    }
}
