//! Ledger error types.

use thiserror::Error;

use crate::record::BroadcastKey;

/// Top-level ledger error type.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// A consumption record for this key already exists. Callers retrying a
    /// delivery can treat this as success.
    #[error("cannot mark log broadcast as consumed: already exists for {0}")]
    AlreadyConsumed(BroadcastKey),

    /// Any storage fault other than an existing record.
    #[error("storage error while {context}: {message}")]
    Storage {
        /// The operation that was in progress.
        context: &'static str,
        /// Description of the underlying fault.
        message: String,
    },
}

impl LedgerError {
    /// Creates a `Storage` error for the given operation.
    #[must_use]
    pub fn storage(context: &'static str, message: impl Into<String>) -> Self {
        Self::Storage {
            context,
            message: message.into(),
        }
    }

    /// Returns `true` if this error reports an already-existing record.
    #[must_use]
    pub fn is_already_consumed(&self) -> bool {
        matches!(self, Self::AlreadyConsumed(_))
    }
}
