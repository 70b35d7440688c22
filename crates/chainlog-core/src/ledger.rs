//! Broadcast ledger abstraction.

use async_trait::async_trait;

use crate::block::BlockHash;
use crate::consumer::ConsumerId;
use crate::error::LedgerError;

/// Records which consumers have processed which log broadcasts.
///
/// Implementations hold no per-call state and may be shared across any number
/// of concurrent delivery workers. Uniqueness of a record per
/// (block hash, log index, consumer) must be enforced by the backing store.
#[async_trait]
pub trait BroadcastLedger: Send + Sync {
    /// Returns whether `consumer` has already processed the log at
    /// `log_index` in block `block_hash`.
    ///
    /// A missing record is not an error: it yields `Ok(false)`.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Storage` if the lookup fails. Callers must not
    /// treat the log as unconsumed in that case.
    async fn was_consumed(
        &self,
        block_hash: &BlockHash,
        log_index: u32,
        consumer: ConsumerId,
    ) -> Result<bool, LedgerError>;

    /// Records that `consumer` has processed the log, creating the record in
    /// a single atomic insert.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::AlreadyConsumed` if a record for this key
    /// already exists, or `LedgerError::Storage` on any other fault.
    async fn mark_consumed(
        &self,
        block_hash: &BlockHash,
        log_index: u32,
        consumer: ConsumerId,
    ) -> Result<(), LedgerError>;
}
