//! Shared test ledgers and utilities for chainlog.

mod clock;
mod ledger;

pub use clock::ManualClock;
pub use ledger::{FailingBroadcastLedger, InMemoryBroadcastLedger};
