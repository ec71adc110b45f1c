use core::fmt;

use crate::error::ZeroVersion;

/// A version number assigned by a [`VersionStore`](crate::VersionStore).
///
/// Version numbers are positive and strictly increasing per key. They give a
/// total order of *store assignment*, not a happens-before order: two
/// siblings written with no causal relationship still compare as ordered
/// integers.
///
/// # Example
///
/// ```
/// use sibling_kit::Version;
///
/// let v = Version::FIRST;
/// assert_eq!(v.get(), 1);
/// assert_eq!(v.next(), Version::new(2).unwrap());
/// assert!(Version::new(0).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u64", into = "u64"))]
pub struct Version(u64);

impl Version {
    /// The version every newly created entry starts at.
    pub const FIRST: Version = Version(1);

    /// Wrap a raw version number. Returns `None` for zero.
    #[must_use]
    pub fn new(raw: u64) -> Option<Self> {
        (raw > 0).then_some(Self(raw))
    }

    /// The raw version number.
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }

    /// The version immediately after this one.
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl TryFrom<u64> for Version {
    type Error = ZeroVersion;

    fn try_from(raw: u64) -> Result<Self, Self::Error> {
        Self::new(raw).ok_or(ZeroVersion)
    }
}

impl From<Version> for u64 {
    fn from(version: Version) -> Self {
        version.0
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}
