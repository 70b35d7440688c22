//! Integration tests for `PgBroadcastLedger`.

use std::sync::Arc;

use chainlog_core::block::BlockHash;
use chainlog_core::consumer::{ConsumerId, JobId, LegacyJobId};
use chainlog_core::error::LedgerError;
use chainlog_core::ledger::BroadcastLedger;
use chainlog_store::pg_broadcast_ledger::PgBroadcastLedger;
use chainlog_test_support::ManualClock;
use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use sqlx::PgPool;
use tokio::task::JoinSet;
use uuid::Uuid;

const BLOCK: BlockHash = BlockHash::new([0xaa; 32]);

async fn count_rows(pool: &PgPool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM log_broadcasts")
        .fetch_one(pool)
        .await
        .unwrap()
}

// --- was_consumed ---

#[sqlx::test(migrations = "../../migrations")]
async fn test_was_consumed_is_false_for_unseen_key(pool: PgPool) {
    let ledger = PgBroadcastLedger::new(pool);

    let consumed = ledger
        .was_consumed(&BLOCK, 3, ConsumerId::from(JobId(42)))
        .await
        .unwrap();

    assert!(!consumed);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_was_consumed_surfaces_storage_fault(pool: PgPool) {
    let ledger = PgBroadcastLedger::new(pool.clone());
    pool.close().await;

    let result = ledger
        .was_consumed(&BLOCK, 3, ConsumerId::from(JobId(42)))
        .await;

    match result {
        Err(LedgerError::Storage { context, .. }) => {
            assert_eq!(context, "checking whether log broadcast was consumed");
        }
        other => panic!("expected Storage, got {other:?}"),
    }
}

// --- mark_consumed + was_consumed ---

#[sqlx::test(migrations = "../../migrations")]
async fn test_mark_then_check_v2_job(pool: PgPool) {
    let ledger = PgBroadcastLedger::new(pool);
    let consumer = ConsumerId::from(JobId(42));

    assert!(!ledger.was_consumed(&BLOCK, 3, consumer).await.unwrap());

    ledger.mark_consumed(&BLOCK, 3, consumer).await.unwrap();

    assert!(ledger.was_consumed(&BLOCK, 3, consumer).await.unwrap());
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_mark_then_check_legacy_job(pool: PgPool) {
    let ledger = PgBroadcastLedger::new(pool);
    let consumer = ConsumerId::from(LegacyJobId(Uuid::new_v4()));

    ledger.mark_consumed(&BLOCK, 0, consumer).await.unwrap();

    assert!(ledger.was_consumed(&BLOCK, 0, consumer).await.unwrap());
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_mark_persists_clock_timestamp(pool: PgPool) {
    let fixed_now = Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap();
    let clock = Arc::new(ManualClock::new(fixed_now));
    let ledger = PgBroadcastLedger::with_clock(pool.clone(), clock.clone());
    let consumer = ConsumerId::from(JobId(9));

    ledger.mark_consumed(&BLOCK, 1, consumer).await.unwrap();
    clock.advance(TimeDelta::hours(1));
    let remark = ledger.mark_consumed(&BLOCK, 1, consumer).await;
    assert!(remark.unwrap_err().is_already_consumed());

    let (created_at, consumed): (DateTime<Utc>, bool) =
        sqlx::query_as("SELECT created_at, consumed FROM log_broadcasts")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(created_at, fixed_now);
    assert!(consumed);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_mark_consumed_surfaces_storage_fault(pool: PgPool) {
    let ledger = PgBroadcastLedger::new(pool.clone());
    pool.close().await;

    let result = ledger
        .mark_consumed(&BLOCK, 3, ConsumerId::from(JobId(42)))
        .await;

    match result {
        Err(LedgerError::Storage { context, .. }) => {
            assert_eq!(context, "marking log broadcast as consumed");
        }
        other => panic!("expected Storage, got {other:?}"),
    }
}

// --- duplicates ---

#[sqlx::test(migrations = "../../migrations")]
async fn test_unconsumed_row_reports_false_and_blocks_mark(pool: PgPool) {
    let ledger = PgBroadcastLedger::new(pool.clone());
    sqlx::query(
        "INSERT INTO log_broadcasts (block_hash, log_index, job_id_v2, consumed, created_at) \
         VALUES ($1, $2, $3, FALSE, NOW())",
    )
    .bind(&BLOCK.as_bytes()[..])
    .bind(3_i64)
    .bind(42_i32)
    .execute(&pool)
    .await
    .unwrap();
    let consumer = ConsumerId::from(JobId(42));

    let consumed = ledger.was_consumed(&BLOCK, 3, consumer).await.unwrap();
    let mark = ledger.mark_consumed(&BLOCK, 3, consumer).await;

    assert!(!consumed);
    assert!(matches!(mark, Err(LedgerError::AlreadyConsumed(_))));
    assert_eq!(count_rows(&pool).await, 1);
    assert!(!ledger.was_consumed(&BLOCK, 3, consumer).await.unwrap());
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_duplicate_mark_reports_already_consumed(pool: PgPool) {
    let ledger = PgBroadcastLedger::new(pool.clone());
    let consumer = ConsumerId::from(JobId(42));

    ledger.mark_consumed(&BLOCK, 3, consumer).await.unwrap();
    let result = ledger.mark_consumed(&BLOCK, 3, consumer).await;

    match result {
        Err(LedgerError::AlreadyConsumed(key)) => {
            assert_eq!(key.block_hash, BLOCK);
            assert_eq!(key.log_index, 3);
            assert_eq!(key.consumer, consumer);
        }
        other => panic!("expected AlreadyConsumed, got {other:?}"),
    }
    assert_eq!(count_rows(&pool).await, 1);
    assert!(ledger.was_consumed(&BLOCK, 3, consumer).await.unwrap());
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_concurrent_marks_of_same_key_succeed_once(pool: PgPool) {
    let ledger = PgBroadcastLedger::new(pool.clone());
    let consumer = ConsumerId::from(JobId(7));

    let mut tasks = JoinSet::new();
    for _ in 0..8 {
        let ledger = ledger.clone();
        tasks.spawn(async move { ledger.mark_consumed(&BLOCK, 5, consumer).await });
    }

    let mut successes = 0;
    let mut duplicates = 0;
    while let Some(joined) = tasks.join_next().await {
        match joined.unwrap() {
            Ok(()) => successes += 1,
            Err(e) if e.is_already_consumed() => duplicates += 1,
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    assert_eq!(successes, 1);
    assert_eq!(duplicates, 7);
    assert_eq!(count_rows(&pool).await, 1);
}

// --- key isolation ---

#[sqlx::test(migrations = "../../migrations")]
async fn test_schemes_are_isolated_for_equal_raw_values(pool: PgPool) {
    let ledger = PgBroadcastLedger::new(pool.clone());
    let legacy = ConsumerId::from(LegacyJobId(Uuid::from_u128(42)));
    let v2 = ConsumerId::from(JobId(42));

    ledger.mark_consumed(&BLOCK, 3, legacy).await.unwrap();

    assert!(ledger.was_consumed(&BLOCK, 3, legacy).await.unwrap());
    assert!(!ledger.was_consumed(&BLOCK, 3, v2).await.unwrap());

    ledger.mark_consumed(&BLOCK, 3, v2).await.unwrap();
    assert_eq!(count_rows(&pool).await, 2);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_block_and_log_index_are_part_of_key(pool: PgPool) {
    let ledger = PgBroadcastLedger::new(pool);
    let consumer = ConsumerId::from(JobId(1));
    let other_block = BlockHash::new([0xbb; 32]);

    ledger.mark_consumed(&BLOCK, 3, consumer).await.unwrap();

    assert!(!ledger.was_consumed(&BLOCK, 4, consumer).await.unwrap());
    assert!(!ledger.was_consumed(&other_block, 3, consumer).await.unwrap());
    assert!(
        !ledger
            .was_consumed(&BLOCK, 3, ConsumerId::from(JobId(2)))
            .await
            .unwrap()
    );
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_max_log_index_round_trips(pool: PgPool) {
    let ledger = PgBroadcastLedger::new(pool);
    let consumer = ConsumerId::from(JobId(3));

    ledger.mark_consumed(&BLOCK, u32::MAX, consumer).await.unwrap();

    assert!(ledger.was_consumed(&BLOCK, u32::MAX, consumer).await.unwrap());
}
