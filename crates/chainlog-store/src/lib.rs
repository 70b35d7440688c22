//! Chainlog Store: PostgreSQL persistence for the broadcast ledger.

pub mod config;
pub mod pg_broadcast_ledger;
pub mod schema;
