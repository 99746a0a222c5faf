use std::fmt;

use serde::{Deserialize, Serialize};

/// Version of the on-storage schema.
///
/// Written into the root [`Header`](crate::Header) of every mapping so that a
/// reader can refuse layouts produced by a newer writer instead of
/// misinterpreting them.
#[derive(
    Default, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
#[must_use = "Version values should be used for compatibility checks"]
pub struct Version(u32);

impl Version {
    pub const ONE: Self = Self(1);
}

/// Schema version written by this crate.
pub const FORMAT_VERSION: Version = Version::ONE;

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

impl From<Version> for u32 {
    fn from(value: Version) -> u32 {
        value.0
    }
}

impl From<u32> for Version {
    fn from(value: u32) -> Self {
        Self(value)
    }
}
