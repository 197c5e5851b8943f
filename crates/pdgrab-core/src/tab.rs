//! Browser tab identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Prefix of the key-value store key holding a tab's captures.
const STORAGE_KEY_PREFIX: &str = "captures:";

/// Identifier of a browser tab.
///
/// Hosts report tab ids as signed integers and use negative values (usually
/// `-1`) for requests that are not tied to a tab. Only non-negative ids can be
/// turned into a `TabId`; everything else is ignored by the capture core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(pub(crate) u64);

impl TabId {
    /// Validate a raw host tab id. Returns `None` for negative values.
    pub fn new(raw: i64) -> Option<Self> {
        u64::try_from(raw).ok().map(Self)
    }

    pub fn get(self) -> u64 {
        self.0
    }

    /// Store key for this tab: `captures:<tabId>`.
    pub fn storage_key(self) -> String {
        format!("{STORAGE_KEY_PREFIX}{}", self.0)
    }

    /// Parse a store key produced by [`TabId::storage_key`].
    pub fn from_storage_key(key: &str) -> Option<Self> {
        key.strip_prefix(STORAGE_KEY_PREFIX)?.parse().ok().map(Self)
    }
}

impl From<u32> for TabId {
    fn from(value: u32) -> Self {
        Self(u64::from(value))
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
