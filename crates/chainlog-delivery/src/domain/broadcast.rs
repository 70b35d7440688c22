//! Log broadcasts received from the chain feed.

use chainlog_core::block::BlockHash;

/// One log emitted in a block, as handed over by the log feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogBroadcast {
    /// Block containing the log.
    pub block_hash: BlockHash,
    /// Position of the log within the block.
    pub log_index: u32,
    /// Raw log payload.
    pub payload: Vec<u8>,
}

impl LogBroadcast {
    /// Creates a new `LogBroadcast`.
    #[must_use]
    pub fn new(block_hash: BlockHash, log_index: u32, payload: Vec<u8>) -> Self {
        Self {
            block_hash,
            log_index,
            payload,
        }
    }
}
