//! Waiting for a freshly created user to become readable.
//!
//! The proxy may acknowledge `/user/new` before `/user/info` can see the
//! user. Creation therefore reads back under a [`ConsistencyPolicy`] and
//! never reports success with an empty record.

use std::future::Future;
use std::time::Duration;

use litellm_user_sdk::{UserId, UserRecord, UserResourceError};
use tokio::time::Instant;

/// How long and how often to read back after create.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsistencyPolicy {
    /// Read until the user is visible, pausing `interval` between attempts,
    /// giving up once `timeout` has elapsed.
    Poll { interval: Duration, timeout: Duration },
    /// Sleep once, then read exactly once.
    FixedDelay(Duration),
}

impl Default for ConsistencyPolicy {
    fn default() -> Self {
        ConsistencyPolicy::Poll {
            interval: Duration::from_millis(200),
            timeout: Duration::from_secs(2),
        }
    }
}

/// A read that returned an all-empty record has not settled yet.
fn is_settled(record: &UserRecord) -> bool {
    *record != UserRecord::default()
}

/// Read back a created user according to `policy`.
///
/// `read` is invoked once per attempt. Not-found answers and empty records
/// are retried (poll mode); any other failure ends the wait immediately.
///
/// # Errors
///
/// - `PostCreateReadTimeout` if the user never became visible
/// - `PostCreateRead` wrapping any other read failure
pub async fn read_after_create<F, Fut>(
    policy: ConsistencyPolicy,
    id: &UserId,
    mut read: F,
) -> Result<UserRecord, UserResourceError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<UserRecord, UserResourceError>>,
{
    match policy {
        ConsistencyPolicy::FixedDelay(delay) => {
            tokio::time::sleep(delay).await;
            match read().await {
                Ok(record) if is_settled(&record) => Ok(record),
                Ok(_) => Err(timed_out(id, delay)),
                Err(e) if e.is_not_found() => Err(timed_out(id, delay)),
                Err(e) => Err(read_failed(id, &e)),
            }
        }
        ConsistencyPolicy::Poll { interval, timeout } => {
            let started = Instant::now();
            // `None` means the budget is past the clock's range
            let deadline = started.checked_add(timeout);
            let mut attempt: u32 = 0;
            loop {
                attempt += 1;
                match read().await {
                    Ok(record) if is_settled(&record) => {
                        tracing::debug!(user_id = %id, attempt, "created user is readable");
                        return Ok(record);
                    }
                    Ok(_) => {}
                    Err(e) if e.is_not_found() => {}
                    Err(e) => return Err(read_failed(id, &e)),
                }

                let exhausted = match (Instant::now().checked_add(interval), deadline) {
                    (Some(next), Some(deadline)) => next > deadline,
                    (Some(_), None) => false,
                    (None, _) => true,
                };
                if exhausted {
                    return Err(timed_out(id, started.elapsed()));
                }
                tracing::debug!(user_id = %id, attempt, "created user not visible yet");
                tokio::time::sleep(interval).await;
            }
        }
    }
}

fn timed_out(id: &UserId, waited: Duration) -> UserResourceError {
    UserResourceError::PostCreateReadTimeout {
        user_id: id.to_string(),
        waited,
    }
}

fn read_failed(id: &UserId, err: &UserResourceError) -> UserResourceError {
    UserResourceError::PostCreateRead {
        user_id: id.to_string(),
        message: err.to_string(),
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use litellm_user_sdk::UserRole;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn record() -> UserRecord {
        UserRecord {
            user_id: Some("u-1".to_owned()),
            user_role: Some(UserRole::Team),
            ..UserRecord::default()
        }
    }

    fn not_found() -> UserResourceError {
        UserResourceError::NotFound {
            user_id: "u-1".to_owned(),
        }
    }

    fn poll() -> ConsistencyPolicy {
        ConsistencyPolicy::Poll {
            interval: Duration::from_millis(200),
            timeout: Duration::from_secs(2),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn poll_returns_first_settled_read() {
        let id = UserId::new("u-1").unwrap();
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let result = read_after_create(poll(), &id, || {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            async move {
                match n {
                    0 => Err(not_found()),
                    1 => Ok(UserRecord::default()),
                    _ => Ok(record()),
                }
            }
        })
        .await
        .unwrap();

        assert_eq!(result, record());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn poll_gives_up_after_timeout() {
        let id = UserId::new("u-1").unwrap();
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let err = read_after_create(poll(), &id, || {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Err(not_found()) }
        })
        .await
        .unwrap_err();

        match err {
            UserResourceError::PostCreateReadTimeout { user_id, waited } => {
                assert_eq!(user_id, "u-1");
                assert!(waited <= Duration::from_secs(2));
            }
            other => panic!("unexpected error: {other}"),
        }
        // attempts at 0ms, 200ms, ..., 2000ms
        assert_eq!(calls.load(Ordering::SeqCst), 11);
    }

    #[tokio::test(start_paused = true)]
    async fn poll_stops_on_hard_error() {
        let id = UserId::new("u-1").unwrap();
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let err = read_after_create(poll(), &id, || {
            counter.fetch_add(1, Ordering::SeqCst);
            async {
                Err(UserResourceError::Api {
                    operation: "reading user",
                    status: 500,
                    body: "boom".to_owned(),
                })
            }
        })
        .await
        .unwrap_err();

        assert!(matches!(err, UserResourceError::PostCreateRead { .. }));
        assert!(err.to_string().contains("HTTP 500"));
        assert_eq!(err.orphaned_user_id(), Some("u-1"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn poll_with_unbounded_durations_does_not_panic() {
        let id = UserId::new("u-1").unwrap();
        let policy = ConsistencyPolicy::Poll {
            interval: Duration::MAX,
            timeout: Duration::MAX,
        };

        let err = read_after_create(policy, &id, || async { Err(not_found()) })
            .await
            .unwrap_err();
        assert!(matches!(err, UserResourceError::PostCreateReadTimeout { .. }));

        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let policy = ConsistencyPolicy::Poll {
            interval: Duration::from_millis(200),
            timeout: Duration::MAX,
        };
        let result = read_after_create(policy, &id, || {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            async move { if n < 3 { Err(not_found()) } else { Ok(record()) } }
        })
        .await
        .unwrap();
        assert_eq!(result, record());
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn fixed_delay_reads_once_after_sleeping() {
        let id = UserId::new("u-1").unwrap();
        let started = Instant::now();

        let result = read_after_create(
            ConsistencyPolicy::FixedDelay(Duration::from_secs(2)),
            &id,
            || async { Ok(record()) },
        )
        .await
        .unwrap();

        assert_eq!(result, record());
        assert!(started.elapsed() >= Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn fixed_delay_reports_missing_user_as_timeout() {
        let id = UserId::new("u-1").unwrap();
        let err = read_after_create(
            ConsistencyPolicy::FixedDelay(Duration::from_secs(2)),
            &id,
            || async { Err(not_found()) },
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            UserResourceError::PostCreateReadTimeout { waited, .. } if waited == Duration::from_secs(2)
        ));
    }
}
