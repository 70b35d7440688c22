//! Application layer for log delivery.

pub mod deliver;
