//! Convenient re-exports for common usage.
//!
//! ```
//! use sibling_kit::prelude::*;
//! ```

pub use crate::ClientSession;
pub use crate::HighestVersion;
pub use crate::MergePolicy;
pub use crate::SetUnion;
pub use crate::Stored;
pub use crate::StoreConfig;
pub use crate::StoreError;
pub use crate::Version;
pub use crate::VersionStore;
pub use crate::VersionStoreBuilder;
pub use crate::VersionedEntry;
pub use crate::VersionedKv;
pub use crate::ZeroVersion;
