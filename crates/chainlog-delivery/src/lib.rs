//! Chainlog: log-broadcast delivery.
//!
//! Dispatches logs from the chain feed to subscribed jobs at most once per
//! job, consulting and updating a `BroadcastLedger` around each dispatch.

pub mod application;
pub mod domain;
pub mod error;
