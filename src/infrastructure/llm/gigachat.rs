use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use super::http_client::{HttpClientTrait, HttpError};
use super::openai::parse_finish_reason;
use crate::domain::llm::Usage;
use crate::domain::{
    Credential, CredentialType, LlmProvider, LlmRequest, LlmResponse, MessageRole, ProviderError,
    ToolCall,
};

const DEFAULT_GIGACHAT_BASE_URL: &str = "https://gigachat.devices.sberbank.ru/api/v1";
const DEFAULT_GIGACHAT_AUTH_URL: &str = "https://ngw.devices.sberbank.ru:9443/api/v2/oauth";
pub const DEFAULT_GIGACHAT_SCOPE: &str = "GIGACHAT_API_PERS";
const PROVIDER: &str = "gigachat";

/// Tokens this close to expiry are refreshed before use
const TOKEN_REFRESH_MARGIN_SECS: i64 = 60;

/// GigaChat provider: OAuth token exchange plus `functions`
#[derive(Debug)]
pub struct GigaChatProvider<C: HttpClientTrait> {
    client: C,
    authorization_key: String,
    scope: String,
    base_url: String,
    auth_url: String,
    token: Mutex<Option<Credential>>,
}

impl<C: HttpClientTrait> GigaChatProvider<C> {
    /// `authorization_key` is the base64 client credentials issued by the portal
    pub fn new(client: C, authorization_key: impl Into<String>, scope: impl Into<String>) -> Self {
        Self {
            client,
            authorization_key: authorization_key.into(),
            scope: scope.into(),
            base_url: DEFAULT_GIGACHAT_BASE_URL.to_string(),
            auth_url: DEFAULT_GIGACHAT_AUTH_URL.to_string(),
            token: Mutex::new(None),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_auth_url(mut self, auth_url: impl Into<String>) -> Self {
        self.auth_url = auth_url.into();
        self
    }

    fn chat_completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    async fn access_token(&self) -> Result<String, ProviderError> {
        let mut cached = self.token.lock().await;

        if let Some(token) = cached.as_ref() {
            let fresh = token.expires_at().is_none_or(|exp| {
                exp - ChronoDuration::seconds(TOKEN_REFRESH_MARGIN_SECS) > Utc::now()
            });
            if fresh {
                return Ok(token.api_key().to_string());
            }
        }

        let token = self.fetch_token().await?;
        let access = token.api_key().to_string();
        *cached = Some(token);
        Ok(access)
    }

    async fn fetch_token(&self) -> Result<Credential, ProviderError> {
        debug!(scope = %self.scope, "Requesting GigaChat access token");

        let authorization = format!("Basic {}", self.authorization_key);
        let request_id = Uuid::new_v4().to_string();
        let headers = vec![
            ("Authorization", authorization.as_str()),
            ("RqUID", request_id.as_str()),
            ("Accept", "application/json"),
        ];

        let response = self
            .client
            .post_form(&self.auth_url, headers, &[("scope", self.scope.as_str())])
            .await
            .map_err(|e| match e {
                HttpError::Status { status: 400, body, .. } => {
                    ProviderError::authentication(PROVIDER, format!("token request rejected: {}", body))
                }
                other => other.for_provider(PROVIDER),
            })?;

        let token: GigaChatToken = serde_json::from_value(response)
            .map_err(|e| ProviderError::malformed(PROVIDER, format!("Failed to parse token: {}", e)))?;

        let mut credential = Credential::new(CredentialType::GigaChat, token.access_token);
        if let Some(expires_at) = token.expires_at.and_then(DateTime::from_timestamp_millis) {
            credential = credential.with_expiration(expires_at);
        }

        Ok(credential)
    }

    async fn invalidate_token(&self) {
        *self.token.lock().await = None;
    }

    fn build_request(&self, model: &str, request: &LlmRequest) -> Value {
        let messages: Vec<Value> = request
            .messages
            .iter()
            .map(|m| {
                let role = match m.role {
                    MessageRole::System => "system",
                    MessageRole::User => "user",
                    MessageRole::Assistant => "assistant",
                };
                json!({"role": role, "content": m.content_text()})
            })
            .collect();

        let mut body = json!({
            "model": model,
            "messages": messages,
        });

        if !request.tools.is_empty() {
            body["functions"] = json!(request.tools);
            body["function_call"] = json!("auto");
        }

        if let Some(temp) = request.temperature {
            body["temperature"] = json!(temp);
        }

        if let Some(max_tokens) = request.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }

        body
    }

    async fn post_chat(&self, token: &str, body: &Value) -> Result<Value, HttpError> {
        let authorization = format!("Bearer {}", token);
        let headers = vec![
            ("Authorization", authorization.as_str()),
            ("Content-Type", "application/json"),
        ];

        self.client
            .post_json(&self.chat_completions_url(), headers, body)
            .await
    }

    fn parse_response(&self, json: Value) -> Result<LlmResponse, ProviderError> {
        let response: GigaChatResponse = serde_json::from_value(json)
            .map_err(|e| ProviderError::malformed(PROVIDER, format!("Failed to parse response: {}", e)))?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::malformed(PROVIDER, "No choices in response"))?;

        let mut llm_response = LlmResponse::new(response.id.unwrap_or_default(), response.model);

        if let Some(content) = choice.message.content.filter(|c| !c.is_empty()) {
            llm_response = llm_response.with_content(content);
        }

        if let Some(call) = choice.message.function_call {
            let tool_call = match call.arguments {
                Value::String(raw) => ToolCall::from_json_arguments(call.name, &raw),
                arguments => ToolCall::new(call.name, arguments),
            };
            llm_response = llm_response.with_tool_call(match choice.message.functions_state_id {
                Some(id) => tool_call.with_id(id),
                None => tool_call,
            });
        }

        if let Some(reason) = choice.finish_reason {
            llm_response = llm_response.with_finish_reason(parse_finish_reason(&reason));
        }

        if let Some(usage) = response.usage {
            llm_response =
                llm_response.with_usage(Usage::new(usage.prompt_tokens, usage.completion_tokens));
        }

        Ok(llm_response)
    }
}

#[async_trait]
impl<C: HttpClientTrait> LlmProvider for GigaChatProvider<C> {
    async fn invoke(&self, model: &str, request: LlmRequest) -> Result<LlmResponse, ProviderError> {
        let body = self.build_request(model, &request);

        let token = self.access_token().await?;

        let response = match self.post_chat(&token, &body).await {
            Err(HttpError::Status { status: 401, .. }) => {
                // Token revoked or expired early
                self.invalidate_token().await;
                let token = self.access_token().await?;
                self.post_chat(&token, &body).await
            }
            other => other,
        }
        .map_err(|e| e.for_provider(PROVIDER))?;

        self.parse_response(response)
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}

// GigaChat API types

#[derive(Debug, Deserialize)]
struct GigaChatToken {
    access_token: String,
    /// Unix time in milliseconds
    expires_at: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct GigaChatResponse {
    id: Option<String>,
    #[serde(default)]
    model: String,
    choices: Vec<GigaChatChoice>,
    usage: Option<GigaChatUsage>,
}

#[derive(Debug, Deserialize)]
struct GigaChatChoice {
    message: GigaChatMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GigaChatMessage {
    content: Option<String>,
    function_call: Option<GigaChatFunctionCall>,
    functions_state_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GigaChatFunctionCall {
    name: String,
    #[serde(default)]
    arguments: Value,
}

#[derive(Debug, Deserialize)]
struct GigaChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}
