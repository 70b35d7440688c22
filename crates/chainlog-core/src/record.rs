//! Consumption records and their compound key.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::block::BlockHash;
use crate::consumer::ConsumerId;

/// Identity of one log delivered to one consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BroadcastKey {
    /// Block containing the log.
    pub block_hash: BlockHash,
    /// Position of the log within the block.
    pub log_index: u32,
    /// The job the log is delivered to.
    pub consumer: ConsumerId,
}

impl BroadcastKey {
    /// Creates a new `BroadcastKey`.
    #[must_use]
    pub const fn new(block_hash: BlockHash, log_index: u32, consumer: ConsumerId) -> Self {
        Self {
            block_hash,
            log_index,
            consumer,
        }
    }
}

impl fmt::Display for BroadcastKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "block {} log {} ({})",
            self.block_hash, self.log_index, self.consumer
        )
    }
}

/// Stored representation of a consumption record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsumptionRecord {
    /// The event/consumer pair this record covers.
    pub key: BroadcastKey,
    /// Whether the consumer finished processing the log. Never reset once set.
    pub consumed: bool,
    /// Timestamp of record creation.
    pub created_at: DateTime<Utc>,
}
