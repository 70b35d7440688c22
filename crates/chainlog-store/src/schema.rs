//! Ledger database schema.
//!
//! The table DDL lives in `migrations/0001_create_log_broadcasts.sql`. This
//! module holds the identifiers and statements the ledger issues against it.

use chainlog_core::consumer::ConsumerColumn;

/// Table holding one row per (log, consumer) pair.
pub const LOG_BROADCASTS_TABLE: &str = "log_broadcasts";

/// SQL selecting the `consumed` flag for one key. Binds `$1` block hash,
/// `$2` log index, `$3` consumer id.
#[must_use]
pub fn select_consumed_sql(column: ConsumerColumn) -> String {
    format!(
        "SELECT consumed FROM {LOG_BROADCASTS_TABLE} \
         WHERE block_hash = $1 AND log_index = $2 AND {} = $3",
        column.name()
    )
}

/// SQL inserting a consumed record unless one already exists for the key.
/// Binds `$1` block hash, `$2` log index, `$3` consumer id, `$4` created at.
#[must_use]
pub fn insert_consumed_sql(column: ConsumerColumn) -> String {
    format!(
        "INSERT INTO {LOG_BROADCASTS_TABLE} (block_hash, log_index, {}, consumed, created_at) \
         VALUES ($1, $2, $3, TRUE, $4) \
         ON CONFLICT DO NOTHING",
        column.name()
    )
}
