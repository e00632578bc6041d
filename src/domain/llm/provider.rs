use async_trait::async_trait;
use std::fmt::Debug;

use super::{LlmRequest, LlmResponse, ProviderError};

/// Trait for function-calling LLM providers (OpenAI, Anthropic, etc.)
#[async_trait]
pub trait LlmProvider: Send + Sync + Debug {
    /// Send a single generation request with the request's tools attached
    async fn invoke(&self, model: &str, request: LlmRequest)
        -> Result<LlmResponse, ProviderError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    type Handler = Arc<dyn Fn(&LlmRequest) -> Result<LlmResponse, ProviderError> + Send + Sync>;

    /// Scripted provider: queued results first, then the handler, then the default response
    pub struct MockLlmProvider {
        name: &'static str,
        script: Mutex<VecDeque<Result<LlmResponse, ProviderError>>>,
        response: Option<LlmResponse>,
        handler: Option<Handler>,
        delay: Option<Duration>,
        calls: AtomicUsize,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    impl Debug for MockLlmProvider {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("MockLlmProvider")
                .field("name", &self.name)
                .field("calls", &self.calls.load(Ordering::SeqCst))
                .finish()
        }
    }

    impl MockLlmProvider {
        pub fn new(name: &'static str) -> Self {
            Self {
                name,
                script: Mutex::new(VecDeque::new()),
                response: None,
                handler: None,
                delay: None,
                calls: AtomicUsize::new(0),
                in_flight: AtomicUsize::new(0),
                max_in_flight: AtomicUsize::new(0),
            }
        }

        pub fn with_response(mut self, response: LlmResponse) -> Self {
            self.response = Some(response);
            self
        }

        pub fn with_error(self, error: ProviderError) -> Self {
            self.then(Err(error))
        }

        /// Queue a one-shot result consumed in order
        pub fn then(self, result: Result<LlmResponse, ProviderError>) -> Self {
            if let Ok(mut script) = self.script.lock() {
                script.push_back(result);
            }
            self
        }

        pub fn with_handler<F>(mut self, handler: F) -> Self
        where
            F: Fn(&LlmRequest) -> Result<LlmResponse, ProviderError> + Send + Sync + 'static,
        {
            self.handler = Some(Arc::new(handler));
            self
        }

        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn max_in_flight(&self) -> usize {
            self.max_in_flight.load(Ordering::SeqCst)
        }

        fn next_result(&self, request: &LlmRequest) -> Result<LlmResponse, ProviderError> {
            let scripted = self.script.lock().ok().and_then(|mut s| s.pop_front());
            if let Some(result) = scripted {
                return result;
            }
            if let Some(ref handler) = self.handler {
                return handler(request);
            }
            self.response
                .clone()
                .ok_or_else(|| ProviderError::configuration("No mock response configured"))
        }
    }

    #[async_trait]
    impl LlmProvider for MockLlmProvider {
        async fn invoke(
            &self,
            _model: &str,
            request: LlmRequest,
        ) -> Result<LlmResponse, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(current, Ordering::SeqCst);

            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            let result = self.next_result(&request);

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            result
        }

        fn provider_name(&self) -> &'static str {
            self.name
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MockLlmProvider;
    use super::*;

    #[tokio::test]
    async fn test_mock_script_order() {
        let provider = MockLlmProvider::new("mock")
            .with_error(ProviderError::server("mock", 500, "boom"))
            .with_response(LlmResponse::new("r1", "m"));

        let request = LlmRequest::builder().user("hi").build();
        assert!(provider.invoke("m", request.clone()).await.is_err());
        assert!(provider.invoke("m", request).await.is_ok());
        assert_eq!(provider.calls(), 2);
        assert_eq!(provider.max_in_flight(), 1);
    }

    #[tokio::test]
    async fn test_mock_without_response() {
        let provider = MockLlmProvider::new("mock");
        let result = provider.invoke("m", LlmRequest::new(Vec::new())).await;
        assert!(matches!(result, Err(ProviderError::Configuration { .. })));
    }
}
