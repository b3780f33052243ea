use std::sync::atomic::{AtomicUsize, Ordering};

use sea_orm::DbErr;

use super::*;
use crate::server::data::guild_policy::with_retry;

/// Tests a store call that succeeds on its first attempt.
///
/// Expected: Ok after a single attempt
#[tokio::test]
async fn runs_successful_attempt_once() -> Result<(), AppError> {
    let attempts = AtomicUsize::new(0);

    let value = with_retry(TIMEOUT, "policy read", || {
        attempts.fetch_add(1, Ordering::SeqCst);
        async { Ok::<_, PolicyError>(7) }
    })
    .await?;

    assert_eq!(value, 7);
    assert_eq!(attempts.load(Ordering::SeqCst), 1);

    Ok(())
}

/// Tests a connection failure followed by a successful attempt.
///
/// Expected: Ok after exactly two attempts
#[tokio::test]
async fn retries_transient_failure_once() -> Result<(), AppError> {
    let attempts = AtomicUsize::new(0);

    let value = with_retry(TIMEOUT, "policy read", || {
        let attempt = attempts.fetch_add(1, Ordering::SeqCst);
        async move {
            if attempt == 0 {
                Err(PolicyError::StoreUnavailable("connection reset".to_string()))
            } else {
                Ok(7)
            }
        }
    })
    .await?;

    assert_eq!(value, 7);
    assert_eq!(attempts.load(Ordering::SeqCst), 2);

    Ok(())
}

/// Tests two consecutive connection failures.
///
/// Verifies that the second failure is not retried again.
///
/// Expected: Err(StoreUnavailable) after exactly two attempts
#[tokio::test]
async fn surfaces_second_transient_failure() -> Result<(), AppError> {
    let attempts = AtomicUsize::new(0);

    let result: Result<(), PolicyError> = with_retry(TIMEOUT, "rule mutation", || {
        attempts.fetch_add(1, Ordering::SeqCst);
        async {
            Err::<(), _>(PolicyError::from(DbErr::Conn(sea_orm::RuntimeErr::Internal(
                "refused".to_string(),
            ))))
        }
    })
    .await;

    assert!(matches!(result, Err(PolicyError::StoreUnavailable(_))));
    assert_eq!(attempts.load(Ordering::SeqCst), 2);

    Ok(())
}

/// Tests a non-transient database error.
///
/// Expected: Err(Database) after a single attempt
#[tokio::test]
async fn does_not_retry_non_transient_error() -> Result<(), AppError> {
    let attempts = AtomicUsize::new(0);

    let result: Result<(), PolicyError> = with_retry(TIMEOUT, "rule mutation", || {
        attempts.fetch_add(1, Ordering::SeqCst);
        async { Err::<(), _>(PolicyError::from(DbErr::Custom("constraint failed".to_string()))) }
    })
    .await;

    assert!(matches!(result, Err(PolicyError::Database(_))));
    assert_eq!(attempts.load(Ordering::SeqCst), 1);

    Ok(())
}

/// Tests attempts that exceed the store timeout.
///
/// Verifies that a timed out attempt is retried once and then reported as
/// unavailable.
///
/// Expected: Err(StoreUnavailable) naming the timeout after two attempts
#[tokio::test]
async fn times_out_each_attempt() -> Result<(), AppError> {
    let attempts = AtomicUsize::new(0);

    let result: Result<(), PolicyError> =
        with_retry(Duration::from_millis(10), "policy read", || {
            attempts.fetch_add(1, Ordering::SeqCst);
            async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok::<(), PolicyError>(())
            }
        })
        .await;

    match result {
        Err(PolicyError::StoreUnavailable(reason)) => {
            assert_eq!(reason, "policy read timed out after 10ms")
        }
        other => panic!("expected StoreUnavailable, got {:?}", other),
    }
    assert_eq!(attempts.load(Ordering::SeqCst), 2);

    Ok(())
}
