//! Domain model for log delivery.

pub mod broadcast;
pub mod job;
