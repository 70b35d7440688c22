//! Block identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Length in bytes of a block hash.
pub const BLOCK_HASH_LEN: usize = 32;

/// A 32-byte block hash.
///
/// Displays and serializes as `0x`-prefixed lowercase hex.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockHash([u8; BLOCK_HASH_LEN]);

/// Error returned when bytes or text do not form a valid block hash.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BlockHashError {
    /// Wrong number of bytes.
    #[error("block hash must be 32 bytes, got {0}")]
    InvalidLength(usize),

    /// Text was not valid hex.
    #[error("block hash is not valid hex: {0}")]
    InvalidHex(String),
}

impl BlockHash {
    /// Creates a block hash from raw bytes.
    #[must_use]
    pub const fn new(bytes: [u8; BLOCK_HASH_LEN]) -> Self {
        Self(bytes)
    }

    /// Creates a block hash from a byte slice.
    ///
    /// # Errors
    ///
    /// Returns `BlockHashError::InvalidLength` unless `bytes` is exactly 32
    /// bytes long.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, BlockHashError> {
        let array: [u8; BLOCK_HASH_LEN] = bytes
            .try_into()
            .map_err(|_| BlockHashError::InvalidLength(bytes.len()))?;
        Ok(Self(array))
    }

    /// Returns the raw bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; BLOCK_HASH_LEN] {
        &self.0
    }
}

impl From<[u8; BLOCK_HASH_LEN]> for BlockHash {
    fn from(bytes: [u8; BLOCK_HASH_LEN]) -> Self {
        Self(bytes)
    }
}

impl FromStr for BlockHash {
    type Err = BlockHashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        let bytes = hex::decode(digits).map_err(|e| BlockHashError::InvalidHex(e.to_string()))?;
        Self::from_slice(&bytes)
    }
}

impl fmt::Display for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockHash({self})")
    }
}

impl Serialize for BlockHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BlockHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
