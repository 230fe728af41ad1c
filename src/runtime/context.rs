//! Deadline context for runtime calls

use crate::error::{Error, Result};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

/// Caller-supplied deadline shared by every runtime call in one pass
#[derive(Debug, Clone, Copy)]
pub struct CallContext {
    deadline: Instant,
    budget: Duration,
}

impl CallContext {
    /// Context whose deadline is `budget` from now
    pub fn with_timeout(budget: Duration) -> Self {
        Self {
            deadline: Instant::now() + budget,
            budget,
        }
    }

    /// Run a runtime call, failing with `Error::Timeout` if the deadline passes
    pub async fn run<T, F>(&self, operation: &'static str, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        match tokio::time::timeout_at(self.deadline, fut).await {
            Ok(result) => result,
            Err(_) => Err(Error::Timeout {
                operation,
                after: self.budget,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_call_within_deadline() {
        let ctx = CallContext::with_timeout(Duration::from_secs(5));
        let value = ctx
            .run("inspect", async {
                tokio::time::sleep(Duration::from_secs(1)).await;
                Ok(7)
            })
            .await
            .unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test(start_paused = true)]
    async fn test_call_past_deadline_times_out() {
        let ctx = CallContext::with_timeout(Duration::from_secs(2));
        let err = ctx
            .run("create", async {
                tokio::time::sleep(Duration::from_secs(10)).await;
                Ok(())
            })
            .await
            .unwrap_err();

        match err {
            Error::Timeout { operation, after } => {
                assert_eq!(operation, "create");
                assert_eq!(after, Duration::from_secs(2));
            }
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_is_shared_across_calls() {
        let ctx = CallContext::with_timeout(Duration::from_secs(3));
        ctx.run("inspect", async {
            tokio::time::sleep(Duration::from_secs(2)).await;
            Ok(())
        })
        .await
        .unwrap();

        let result = ctx
            .run("create", async {
                tokio::time::sleep(Duration::from_secs(2)).await;
                Ok(())
            })
            .await;
        assert!(matches!(result, Err(Error::Timeout { .. })));
    }

    #[tokio::test]
    async fn test_inner_error_passes_through() {
        let ctx = CallContext::with_timeout(Duration::from_secs(5));
        let result: Result<()> = ctx
            .run("inspect", async { Err(Error::NetworkNotFound("x".into())) })
            .await;
        assert!(result.unwrap_err().is_not_found());
    }
}
