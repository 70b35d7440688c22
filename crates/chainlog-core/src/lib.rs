//! Chainlog Core: shared domain abstractions.
//!
//! This crate defines the identity model for log broadcasts (block hash, log
//! index, consumer) and the `BroadcastLedger` trait that records whether a
//! consumer has already processed a given log. It contains no infrastructure
//! code.

pub mod block;
pub mod clock;
pub mod consumer;
pub mod error;
pub mod ledger;
pub mod record;
