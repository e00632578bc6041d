use std::time::Duration;

use thiserror::Error;

/// Failures talking to an LLM provider
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Authentication failed for {provider}: {message}")]
    Authentication { provider: String, message: String },

    #[error("Rate limited by {provider}: {message}")]
    RateLimited {
        provider: String,
        retry_after: Option<Duration>,
        message: String,
    },

    #[error("{provider} server error ({status}): {message}")]
    Server {
        provider: String,
        status: u16,
        message: String,
    },

    #[error("{provider} rejected the request ({status}): {message}")]
    Rejected {
        provider: String,
        status: u16,
        message: String,
    },

    #[error("Transport error talking to {provider}: {message}")]
    Transport { provider: String, message: String },

    #[error("Request timed out after {elapsed_ms} ms")]
    Timeout { elapsed_ms: u64 },

    #[error("Malformed response from {provider}: {message}")]
    MalformedResponse { provider: String, message: String },

    #[error("Provider configuration error: {message}")]
    Configuration { message: String },
}

impl ProviderError {
    pub fn authentication(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Authentication {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn rate_limited(
        provider: impl Into<String>,
        retry_after: Option<Duration>,
        message: impl Into<String>,
    ) -> Self {
        Self::RateLimited {
            provider: provider.into(),
            retry_after,
            message: message.into(),
        }
    }

    pub fn server(provider: impl Into<String>, status: u16, message: impl Into<String>) -> Self {
        Self::Server {
            provider: provider.into(),
            status,
            message: message.into(),
        }
    }

    pub fn rejected(provider: impl Into<String>, status: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            provider: provider.into(),
            status,
            message: message.into(),
        }
    }

    pub fn transport(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn timeout(elapsed: Duration) -> Self {
        Self::Timeout {
            elapsed_ms: elapsed.as_millis() as u64,
        }
    }

    pub fn malformed(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Transient failures worth another attempt
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited { .. }
                | Self::Server { .. }
                | Self::Transport { .. }
                | Self::Timeout { .. }
                | Self::MalformedResponse { .. }
        )
    }

    /// Failures that will repeat for every request and must stop the run
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Authentication { .. } | Self::Configuration { .. })
    }

    /// Server-requested wait before the next attempt
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after, .. } => *retry_after,
            _ => None,
        }
    }

    /// Map an HTTP error status to the matching variant
    pub fn from_status(
        provider: impl Into<String>,
        status: u16,
        retry_after: Option<Duration>,
        body: impl Into<String>,
    ) -> Self {
        let provider = provider.into();
        let body = body.into();

        match status {
            401 | 403 => Self::authentication(provider, body),
            408 => Self::transport(provider, format!("request timeout: {}", body)),
            429 => Self::rate_limited(provider, retry_after, body),
            500..=599 => Self::server(provider, status, body),
            _ => Self::rejected(provider, status, body),
        }
    }
}
