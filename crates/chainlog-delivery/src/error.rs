//! Delivery error types.

use chainlog_core::consumer::ConsumerId;
use chainlog_core::error::LedgerError;
use thiserror::Error;

/// Failure reported by a job while processing a log.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct JobError(pub String);

impl JobError {
    /// Creates a new `JobError`.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Errors raised while delivering a log broadcast to a job.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The job failed to process the log. The log was not marked consumed and
    /// may be redelivered.
    #[error("{consumer} failed to handle log: {source}")]
    Job {
        /// The job that failed.
        consumer: ConsumerId,
        /// The job's failure.
        source: JobError,
    },

    /// The ledger could not be read or written.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}
