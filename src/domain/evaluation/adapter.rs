//! Provider invocation with per-attempt timeout and bounded retry

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::{ModelOutput, RetryPolicy};
use crate::domain::llm::{LlmProvider, LlmRequest, ProviderError};

/// Result of a call after retries
#[derive(Debug, Clone)]
pub struct CallOutcome {
    pub output: Result<ModelOutput, ProviderError>,
    pub attempts: u32,
    pub latency_ms: u64,
}

/// The run was cancelled while waiting to retry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interrupted {
    pub attempts: u32,
}

/// Calls one provider model and normalizes what comes back
#[derive(Debug, Clone)]
pub struct CallAdapter {
    provider: Arc<dyn LlmProvider>,
    model: String,
    retry: RetryPolicy,
    timeout: Duration,
}

impl CallAdapter {
    pub fn new(provider: Arc<dyn LlmProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            retry: RetryPolicy::default(),
            timeout: Duration::from_secs(60),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.provider_name()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Invoke the provider, retrying transient failures
    ///
    /// Backoff waits end early on cancellation; an attempt already in flight
    /// is left to finish.
    pub async fn call(
        &self,
        request: LlmRequest,
        cancel: &CancellationToken,
    ) -> Result<CallOutcome, Interrupted> {
        let start = Instant::now();
        let max_attempts = self.retry.max_attempts();
        let mut attempt = 0;

        loop {
            if cancel.is_cancelled() {
                return Err(Interrupted { attempts: attempt });
            }
            attempt += 1;

            let error = match self.attempt(request.clone()).await {
                Ok(output) => return Ok(self.outcome(Ok(output), attempt, start)),
                Err(error) => error,
            };

            if !error.is_retryable() || attempt >= max_attempts {
                if error.is_retryable() {
                    warn!(
                        provider = self.provider_name(),
                        attempts = attempt,
                        error = %error,
                        "Retries exhausted"
                    );
                }
                return Ok(self.outcome(Err(error), attempt, start));
            }

            let delay = self.retry.delay_after(&error, attempt - 1);
            debug!(
                provider = self.provider_name(),
                attempt,
                delay_ms = delay.as_millis() as u64,
                error = %error,
                "Retrying provider call"
            );

            tokio::select! {
                _ = cancel.cancelled() => return Err(Interrupted { attempts: attempt }),
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }

    async fn attempt(&self, request: LlmRequest) -> Result<ModelOutput, ProviderError> {
        let future = self.provider.invoke(&self.model, request);

        match tokio::time::timeout(self.timeout, future).await {
            Ok(result) => result.map(ModelOutput::from_response),
            Err(_) => Err(ProviderError::timeout(self.timeout)),
        }
    }

    fn outcome(
        &self,
        output: Result<ModelOutput, ProviderError>,
        attempts: u32,
        start: Instant,
    ) -> CallOutcome {
        CallOutcome {
            output,
            attempts,
            latency_ms: start.elapsed().as_millis() as u64,
        }
    }
}
