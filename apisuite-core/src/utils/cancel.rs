//! Cancellation utilities
//!
//! Provides cancellation handles and per-call deadlines for orchestrated requests.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::error::ApiSuiteError;

/// A handle that can be used to request cancellation.
#[derive(Clone, Debug, Default)]
pub struct CancelHandle {
    token: CancellationToken,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Calls observing this handle stop at their next
    /// suspension point (cache access, transport call or backoff sleep).
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }
}

/// Per-call execution controls.
#[derive(Clone, Debug, Default)]
pub struct ExecuteOptions {
    pub cancel: Option<CancellationToken>,
    /// Upper bound on the whole call, retries and session bootstrap included.
    pub deadline: Option<Duration>,
}

impl ExecuteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cancel(mut self, handle: &CancelHandle) -> Self {
        self.cancel = Some(handle.token());
        self
    }

    pub fn with_token(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Runs `future` under this call's deadline and cancellation token.
    pub async fn guard<F, T>(&self, future: F) -> Result<T, ApiSuiteError>
    where
        F: Future<Output = Result<T, ApiSuiteError>>,
    {
        let bounded = async {
            match self.deadline {
                Some(deadline) => tokio::time::timeout(deadline, future)
                    .await
                    .map_err(|_| {
                        ApiSuiteError::Cancelled(format!("deadline of {deadline:?} elapsed"))
                    })?,
                None => future.await,
            }
        };

        match &self.cancel {
            Some(token) => {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => {
                        Err(ApiSuiteError::Cancelled("operation cancelled".to_string()))
                    }
                    result = bounded => result,
                }
            }
            None => bounded.await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn passes_through_without_controls() {
        let value = ExecuteOptions::new().guard(async { Ok(7) }).await.unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn pre_cancelled_token_short_circuits() {
        let handle = CancelHandle::new();
        handle.cancel();
        let err = ExecuteOptions::new()
            .with_cancel(&handle)
            .guard(async { Ok::<_, ApiSuiteError>(1) })
            .await
            .unwrap_err();
        assert!(matches!(err, ApiSuiteError::Cancelled(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_elapses() {
        let err = ExecuteOptions::new()
            .with_deadline(Duration::from_secs(1))
            .guard(async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok::<_, ApiSuiteError>(())
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApiSuiteError::Cancelled(msg) if msg.contains("deadline")));
    }
}
