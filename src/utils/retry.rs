use std::future::Future;
use tracing::warn;

use crate::errors::Result;

/// 乐观锁冲突时重新执行整个读-改-写单元，最多重试 `max_retries` 次
pub async fn retry_on_conflict<T, F, Fut>(max_retries: u32, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut retries = 0;
    loop {
        match op().await {
            Err(e) if e.is_retryable() && retries < max_retries => {
                retries += 1;
                warn!("Concurrency conflict, retrying ({}/{}): {}", retries, max_retries, e);
            }
            result => return result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::LmsError;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn test_conflict_is_retried_until_success() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let result = retry_on_conflict(3, move || async move {
            if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(LmsError::concurrency_conflict("stale version"))
            } else {
                Ok(42)
            }
        })
        .await;
        assert_eq!(result, Ok(42));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retries_are_bounded() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let result: Result<()> = retry_on_conflict(2, move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(LmsError::concurrency_conflict("stale version"))
        })
        .await;
        assert!(matches!(result, Err(LmsError::ConcurrencyConflict(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_other_errors_are_not_retried() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let result: Result<()> = retry_on_conflict(5, move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(LmsError::not_found("enrollment 1"))
        })
        .await;
        assert!(matches!(result, Err(LmsError::NotFound(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
