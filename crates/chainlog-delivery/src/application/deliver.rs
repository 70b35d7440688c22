//! Deliver-once dispatch.
//!
//! Each delivery checks the ledger, hands the log to the job, and marks the
//! log consumed once the job succeeds. A job that fails leaves no record, so
//! the feed may redeliver the log later.

use chainlog_core::consumer::ConsumerId;
use chainlog_core::error::LedgerError;
use chainlog_core::ledger::BroadcastLedger;
use tracing::{debug, error, info, instrument, warn};

use crate::domain::broadcast::LogBroadcast;
use crate::domain::job::Job;
use crate::error::DeliveryError;

/// Result of a successful delivery attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// The job processed the log and the ledger recorded it.
    Delivered,
    /// The ledger already held a consumed record; the job was not called.
    AlreadyConsumed,
    /// The job processed the log, but another worker recorded it first.
    MarkedConcurrently,
}

/// Delivers `broadcast` to `job` unless the ledger shows it was already
/// consumed.
///
/// # Errors
///
/// Returns `DeliveryError::Ledger` if the ledger lookup or mark fails, and
/// `DeliveryError::Job` if the job fails. A mark that finds an existing record
/// is not an error: it yields `DeliveryOutcome::MarkedConcurrently`.
#[instrument(skip_all, fields(block_hash = %broadcast.block_hash, log_index = broadcast.log_index, consumer = %job.consumer_id()))]
pub async fn deliver_once(
    broadcast: &LogBroadcast,
    job: &dyn Job,
    ledger: &dyn BroadcastLedger,
) -> Result<DeliveryOutcome, DeliveryError> {
    let consumer = job.consumer_id();

    if ledger
        .was_consumed(&broadcast.block_hash, broadcast.log_index, consumer)
        .await?
    {
        debug!("skipping log already consumed");
        return Ok(DeliveryOutcome::AlreadyConsumed);
    }

    if let Err(source) = job.handle_log(broadcast).await {
        error!(error = %source, "job failed to handle log");
        return Err(DeliveryError::Job { consumer, source });
    }

    match ledger
        .mark_consumed(&broadcast.block_hash, broadcast.log_index, consumer)
        .await
    {
        Ok(()) => {
            info!("delivered log");
            Ok(DeliveryOutcome::Delivered)
        }
        Err(LedgerError::AlreadyConsumed(_)) => {
            warn!("log was marked consumed by another worker");
            Ok(DeliveryOutcome::MarkedConcurrently)
        }
        Err(e) => Err(e.into()),
    }
}

/// Delivers `broadcast` to every job in turn. A failure for one job does not
/// stop delivery to the rest.
pub async fn deliver_to_all(
    broadcast: &LogBroadcast,
    jobs: &[&dyn Job],
    ledger: &dyn BroadcastLedger,
) -> Vec<(ConsumerId, Result<DeliveryOutcome, DeliveryError>)> {
    let mut outcomes = Vec::with_capacity(jobs.len());
    for job in jobs {
        let outcome = deliver_once(broadcast, *job, ledger).await;
        outcomes.push((job.consumer_id(), outcome));
    }
    outcomes
}
