//! Test ledgers: mock `BroadcastLedger` implementations for tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chainlog_core::block::BlockHash;
use chainlog_core::clock::{Clock, SystemClock};
use chainlog_core::consumer::ConsumerId;
use chainlog_core::error::LedgerError;
use chainlog_core::ledger::BroadcastLedger;
use chainlog_core::record::{BroadcastKey, ConsumptionRecord};

/// An in-memory ledger with the same uniqueness and monotonicity rules as the
/// `PostgreSQL` ledger. The whole map is locked per call, so concurrent marks
/// of one key resolve to exactly one success.
#[derive(Debug)]
pub struct InMemoryBroadcastLedger {
    records: Mutex<HashMap<BroadcastKey, ConsumptionRecord>>,
    clock: Arc<dyn Clock>,
}

impl Default for InMemoryBroadcastLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryBroadcastLedger {
    /// Creates an empty ledger stamping records with the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates an empty ledger stamping records with `clock`.
    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            clock,
        }
    }

    /// Seeds a record with `consumed = false`, as a row written by another
    /// component might look.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn insert_unconsumed(&self, key: BroadcastKey) {
        let record = ConsumptionRecord {
            key,
            consumed: false,
            created_at: self.clock.now(),
        };
        self.records.lock().unwrap().insert(key, record);
    }

    /// Returns a snapshot of all stored records.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn records(&self) -> Vec<ConsumptionRecord> {
        self.records.lock().unwrap().values().cloned().collect()
    }
}

#[async_trait]
impl BroadcastLedger for InMemoryBroadcastLedger {
    async fn was_consumed(
        &self,
        block_hash: &BlockHash,
        log_index: u32,
        consumer: ConsumerId,
    ) -> Result<bool, LedgerError> {
        let key = BroadcastKey::new(*block_hash, log_index, consumer);
        Ok(self
            .records
            .lock()
            .unwrap()
            .get(&key)
            .is_some_and(|record| record.consumed))
    }

    async fn mark_consumed(
        &self,
        block_hash: &BlockHash,
        log_index: u32,
        consumer: ConsumerId,
    ) -> Result<(), LedgerError> {
        let key = BroadcastKey::new(*block_hash, log_index, consumer);
        let mut records = self.records.lock().unwrap();
        if records.contains_key(&key) {
            return Err(LedgerError::AlreadyConsumed(key));
        }
        records.insert(
            key,
            ConsumptionRecord {
                key,
                consumed: true,
                created_at: self.clock.now(),
            },
        );
        Ok(())
    }
}

/// A ledger that always returns a storage error. Useful for testing
/// error-handling paths.
#[derive(Debug)]
pub struct FailingBroadcastLedger;

#[async_trait]
impl BroadcastLedger for FailingBroadcastLedger {
    async fn was_consumed(
        &self,
        _block_hash: &BlockHash,
        _log_index: u32,
        _consumer: ConsumerId,
    ) -> Result<bool, LedgerError> {
        Err(LedgerError::storage(
            "checking whether log broadcast was consumed",
            "connection refused",
        ))
    }

    async fn mark_consumed(
        &self,
        _block_hash: &BlockHash,
        _log_index: u32,
        _consumer: ConsumerId,
    ) -> Result<(), LedgerError> {
        Err(LedgerError::storage(
            "marking log broadcast as consumed",
            "connection refused",
        ))
    }
}
