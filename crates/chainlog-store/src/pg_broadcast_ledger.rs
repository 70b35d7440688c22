//! `PostgreSQL` implementation of the `BroadcastLedger` trait.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::postgres::{PgArguments, PgPool};
use sqlx::query::Query;
use sqlx::{Postgres, Row};
use tracing::{debug, instrument};

use chainlog_core::block::BlockHash;
use chainlog_core::clock::{Clock, SystemClock};
use chainlog_core::consumer::{ConsumerId, JobId, LegacyJobId};
use chainlog_core::error::LedgerError;
use chainlog_core::ledger::BroadcastLedger;
use chainlog_core::record::BroadcastKey;

use crate::schema::{insert_consumed_sql, select_consumed_sql};

const CHECK_CONTEXT: &str = "checking whether log broadcast was consumed";
const MARK_CONTEXT: &str = "marking log broadcast as consumed";

/// PostgreSQL-backed broadcast ledger.
///
/// Holds a shared handle to an externally owned pool; cloning the ledger
/// clones the handle, never the underlying connections.
#[derive(Debug, Clone)]
pub struct PgBroadcastLedger {
    pool: PgPool,
    clock: Arc<dyn Clock>,
}

impl PgBroadcastLedger {
    /// Creates a new `PgBroadcastLedger` stamping records with the system clock.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self::with_clock(pool, Arc::new(SystemClock))
    }

    /// Creates a new `PgBroadcastLedger` stamping records with `clock`.
    #[must_use]
    pub fn with_clock(pool: PgPool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }
}

fn bind_consumer(
    query: Query<'_, Postgres, PgArguments>,
    consumer: ConsumerId,
) -> Query<'_, Postgres, PgArguments> {
    match consumer {
        ConsumerId::Legacy(LegacyJobId(id)) => query.bind(id),
        ConsumerId::V2(JobId(id)) => query.bind(id),
    }
}

#[async_trait]
impl BroadcastLedger for PgBroadcastLedger {
    #[instrument(skip_all, fields(block_hash = %block_hash, log_index = log_index, consumer = %consumer))]
    async fn was_consumed(
        &self,
        block_hash: &BlockHash,
        log_index: u32,
        consumer: ConsumerId,
    ) -> Result<bool, LedgerError> {
        let sql = select_consumed_sql(consumer.column());
        let query = sqlx::query(&sql)
            .bind(&block_hash.as_bytes()[..])
            .bind(i64::from(log_index));

        let row = bind_consumer(query, consumer)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| LedgerError::storage(CHECK_CONTEXT, e.to_string()))?;

        let Some(row) = row else {
            debug!("no consumption record");
            return Ok(false);
        };

        let consumed: bool = row
            .try_get("consumed")
            .map_err(|e| LedgerError::storage(CHECK_CONTEXT, e.to_string()))?;
        debug!(consumed, "found consumption record");
        Ok(consumed)
    }

    #[instrument(skip_all, fields(block_hash = %block_hash, log_index = log_index, consumer = %consumer))]
    async fn mark_consumed(
        &self,
        block_hash: &BlockHash,
        log_index: u32,
        consumer: ConsumerId,
    ) -> Result<(), LedgerError> {
        let key = BroadcastKey::new(*block_hash, log_index, consumer);
        let sql = insert_consumed_sql(consumer.column());
        let query = sqlx::query(&sql)
            .bind(&block_hash.as_bytes()[..])
            .bind(i64::from(log_index));

        let done = bind_consumer(query, consumer)
            .bind(self.clock.now())
            .execute(&self.pool)
            .await
            .map_err(|e| LedgerError::storage(MARK_CONTEXT, e.to_string()))?;

        // Duplicates are absorbed by the conflict clause and affect no rows.
        if done.rows_affected() == 0 {
            debug!("consumption record already exists");
            return Err(LedgerError::AlreadyConsumed(key));
        }
        debug!("marked log broadcast as consumed");
        Ok(())
    }
}
