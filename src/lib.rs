//! # sibling-kit
//!
//! A versioned key-value store that keeps concurrent writes side by side as
//! siblings, and the client sessions that read, merge, and resubmit them.
//!
//! Every key holds a [`VersionedEntry`]: a map from [`Version`] number to
//! value. A write either names the version the writer last saw, or names
//! nothing and is treated as concurrent with everything already stored.
//!
//! ## Quick Start
//!
//! ```
//! use sibling_kit::prelude::*;
//!
//! let store = VersionStore::new();
//! let mut c1 = ClientSession::new("c1");
//! let mut c2 = ClientSession::new("c2");
//!
//! c1.add(&store, "list", "milk").unwrap();
//! c2.add(&store, "list", "eggs").unwrap();
//!
//! // c2 wrote blind, so the entry now holds two siblings
//! let entry = store.get(&"list").unwrap();
//! assert!(entry.is_conflicted());
//!
//! // c1 builds on version 1; version 2 survives as a sibling
//! c1.add(&store, "list", "flour").unwrap();
//! let mut view = c1.local_value().to_vec();
//! view.sort();
//! assert_eq!(view, vec!["eggs", "flour", "milk"]);
//! ```
//!
//! ## Causality model
//!
//! Version numbers are one counter per key, not a vector clock. A dependent
//! write removes its base version and overwrites every lower-numbered
//! version with the new value; higher-numbered versions survive as
//! siblings. Because the rule compares integers, it cannot tell a version
//! the writer actually saw from one that merely has a smaller number, and
//! causal provenance between branches is lost. The store reproduces this
//! behavior as is.
//!
//! ## Components
//!
//! - [`VersionStore`] - thread-safe in-memory store, one lock per key
//! - [`ClientSession`] - read-merge-modify-write client
//! - [`MergePolicy`] - how a session folds siblings ([`SetUnion`], [`HighestVersion`], or any closure)
//! - [`VersionedKv`] - the store seam a session writes through
//! - [`StoreConfig`] - opt-in strictness and sharding

mod backend;
mod config;
mod entry;
mod error;
mod merge;
mod session;
mod store;
mod version;

pub mod prelude;

pub use backend::{Stored, VersionedKv};
pub use config::{StoreConfig, VersionStoreBuilder};
pub use entry::VersionedEntry;
pub use error::{StoreError, ZeroVersion};
pub use merge::{HighestVersion, MergePolicy, SetUnion};
pub use session::ClientSession;
pub use store::VersionStore;
pub use version::Version;
