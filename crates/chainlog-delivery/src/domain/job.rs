//! Job abstraction.

use async_trait::async_trait;
use chainlog_core::consumer::ConsumerId;

use crate::domain::broadcast::LogBroadcast;
use crate::error::JobError;

/// A subscriber that processes log broadcasts.
#[async_trait]
pub trait Job: Send + Sync {
    /// The identifier under which this job's consumption is recorded.
    fn consumer_id(&self) -> ConsumerId;

    /// Processes one log.
    ///
    /// # Errors
    ///
    /// Returns `JobError` if processing fails; the log is then left unmarked.
    async fn handle_log(&self, broadcast: &LogBroadcast) -> Result<(), JobError>;
}
