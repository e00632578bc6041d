use async_trait::async_trait;
use reqwest::header::RETRY_AFTER;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::domain::ProviderError;

/// Provider-agnostic HTTP failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HttpError {
    #[error("HTTP {status}: {body}")]
    Status {
        status: u16,
        retry_after: Option<Duration>,
        body: String,
    },

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Failed to parse response: {0}")]
    Decode(String),

    #[error("Failed to build HTTP client: {0}")]
    Build(String),
}

impl HttpError {
    /// Attribute the failure to a provider
    pub fn for_provider(self, provider: &str) -> ProviderError {
        match self {
            Self::Status {
                status,
                retry_after,
                body,
            } => ProviderError::from_status(provider, status, retry_after, body),
            Self::Transport(message) => ProviderError::transport(provider, message),
            Self::Timeout => ProviderError::transport(provider, "request timed out"),
            Self::Decode(message) => ProviderError::malformed(provider, message),
            Self::Build(message) => ProviderError::configuration(message),
        }
    }
}

/// Parse a Retry-After header given in seconds
pub fn parse_retry_after(value: &str) -> Option<Duration> {
    let seconds: f64 = value.trim().parse().ok()?;
    (seconds.is_finite() && seconds >= 0.0).then(|| Duration::from_secs_f64(seconds))
}

/// Trait for HTTP client operations (for mocking)
#[async_trait]
pub trait HttpClientTrait: Send + Sync + std::fmt::Debug {
    async fn post_json(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        body: &Value,
    ) -> Result<Value, HttpError>;

    /// POST an `application/x-www-form-urlencoded` body and decode a JSON reply
    async fn post_form(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        form: &[(&str, &str)],
    ) -> Result<Value, HttpError>;
}

/// Real HTTP client using reqwest
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, HttpError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| HttpError::Build(e.to_string()))?;

        Ok(Self { client })
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Value, HttpError> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                HttpError::Timeout
            } else {
                HttpError::Transport(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(parse_retry_after);
            let body = response.text().await.unwrap_or_default();

            return Err(HttpError::Status {
                status: status.as_u16(),
                retry_after,
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| HttpError::Decode(e.to_string()))
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClientTrait for HttpClient {
    async fn post_json(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        body: &Value,
    ) -> Result<Value, HttpError> {
        let mut request = self.client.post(url);

        for (key, value) in headers {
            request = request.header(key, value);
        }

        self.send(request.json(body)).await
    }

    async fn post_form(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        form: &[(&str, &str)],
    ) -> Result<Value, HttpError> {
        let mut request = self.client.post(url);

        for (key, value) in headers {
            request = request.header(key, value);
        }

        self.send(request.form(form)).await
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_parse_retry_after() {
        assert_eq!(parse_retry_after("3"), Some(Duration::from_secs(3)));
        assert_eq!(parse_retry_after(" 0.5 "), Some(Duration::from_millis(500)));
        assert_eq!(parse_retry_after("Wed, 21 Oct 2015 07:28:00 GMT"), None);
        assert_eq!(parse_retry_after("-1"), None);
    }

    #[test]
    fn test_for_provider_mapping() {
        let err = HttpError::Status {
            status: 401,
            retry_after: None,
            body: "bad key".to_string(),
        };
        assert!(err.for_provider("openai").is_fatal());
        assert!(matches!(
            HttpError::Decode("eof".to_string()).for_provider("openai"),
            ProviderError::MalformedResponse { .. }
        ));
        assert!(HttpError::Timeout.for_provider("openai").is_retryable());
    }

    #[tokio::test]
    async fn test_post_json_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat"))
            .and(header("authorization", "Bearer k"))
            .and(body_json(json!({"model": "m"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .mount(&server)
            .await;

        let client = HttpClient::new();
        let value = client
            .post_json(
                &format!("{}/v1/chat", server.uri()),
                vec![("Authorization", "Bearer k")],
                &json!({"model": "m"}),
            )
            .await
            .unwrap();

        assert_eq!(value, json!({"ok": true}));
    }

    #[tokio::test]
    async fn test_rate_limit_carries_retry_after() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(429)
                    .insert_header("retry-after", "7")
                    .set_body_string("slow down"),
            )
            .mount(&server)
            .await;

        let err = HttpClient::new()
            .post_json(&server.uri(), vec![], &json!({}))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            HttpError::Status {
                status: 429,
                retry_after: Some(Duration::from_secs(7)),
                body: "slow down".to_string(),
            }
        );
        assert_eq!(
            err.for_provider("anthropic").retry_after(),
            Some(Duration::from_secs(7))
        );
    }

    #[tokio::test]
    async fn test_status_mapping_through_server() {
        let server = MockServer::start().await;
        Mock::given(path("/auth"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid key"))
            .mount(&server)
            .await;
        Mock::given(path("/down"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;
        Mock::given(path("/bad"))
            .respond_with(ResponseTemplate::new(400).set_body_string("bad schema"))
            .mount(&server)
            .await;
        Mock::given(path("/garbage"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = HttpClient::new();
        let call = |p: &'static str| {
            let url = format!("{}{}", server.uri(), p);
            let client = client.clone();
            async move { client.post_json(&url, vec![], &json!({})).await.unwrap_err() }
        };

        assert!(call("/auth").await.for_provider("x").is_fatal());
        assert!(matches!(
            call("/down").await.for_provider("x"),
            ProviderError::Server { status: 503, .. }
        ));
        assert!(matches!(
            call("/bad").await.for_provider("x"),
            ProviderError::Rejected { status: 400, .. }
        ));
        assert!(matches!(call("/garbage").await, HttpError::Decode(_)));
    }

    #[tokio::test]
    async fn test_post_form() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth"))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "t"})))
            .mount(&server)
            .await;

        let value = HttpClient::new()
            .post_form(
                &format!("{}/oauth", server.uri()),
                vec![],
                &[("scope", "GIGACHAT_API_PERS")],
            )
            .await
            .unwrap();

        assert_eq!(value["access_token"], "t");
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport() {
        let err = HttpClient::new()
            .post_json("http://127.0.0.1:9/unreachable", vec![], &json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, HttpError::Transport(_) | HttpError::Timeout));
    }
}
