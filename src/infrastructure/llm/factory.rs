use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use super::gigachat::DEFAULT_GIGACHAT_SCOPE;
use super::http_client::HttpClient;
use super::{AnthropicProvider, GigaChatProvider, GoogleProvider, OpenAiProvider};
use crate::domain::{Credential, CredentialType, DomainError, LlmProvider};

/// Credential parameter holding the GigaChat OAuth scope
pub const GIGACHAT_SCOPE_PARAM: &str = "scope";

/// Supported provider backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    OpenAi,
    Anthropic,
    Google,
    GigaChat,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 4] = [
        ProviderKind::OpenAi,
        ProviderKind::Anthropic,
        ProviderKind::Google,
        ProviderKind::GigaChat,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
            Self::Google => "google",
            Self::GigaChat => "gigachat",
        }
    }

    pub fn credential_type(&self) -> CredentialType {
        match self {
            Self::OpenAi => CredentialType::OpenAi,
            Self::Anthropic => CredentialType::Anthropic,
            Self::Google => CredentialType::Google,
            Self::GigaChat => CredentialType::GigaChat,
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" | "open_ai" => Ok(Self::OpenAi),
            "anthropic" | "claude" => Ok(Self::Anthropic),
            "google" | "gemini" => Ok(Self::Google),
            "gigachat" => Ok(Self::GigaChat),
            other => Err(DomainError::configuration(format!(
                "Unknown provider '{}', expected one of: openai, anthropic, google, gigachat",
                other
            ))),
        }
    }
}

/// Factory for creating LLM providers
#[derive(Debug)]
pub struct LlmProviderFactory;

impl LlmProviderFactory {
    /// Create a provider for `kind`, optionally pointed at a different endpoint
    pub fn create(
        kind: ProviderKind,
        credential: &Credential,
        base_url: Option<&str>,
    ) -> Result<Arc<dyn LlmProvider>, DomainError> {
        Self::validate_credential_type(credential, kind.credential_type())?;

        if credential.is_expired() {
            return Err(DomainError::credential(format!(
                "Credential for {} has expired",
                kind
            )));
        }

        let http_client = HttpClient::new();
        let api_key = credential.api_key();

        let provider: Arc<dyn LlmProvider> = match (kind, base_url) {
            (ProviderKind::OpenAi, None) => Arc::new(OpenAiProvider::new(http_client, api_key)),
            (ProviderKind::OpenAi, Some(url)) => {
                Arc::new(OpenAiProvider::with_base_url(http_client, api_key, url))
            }
            (ProviderKind::Anthropic, None) => {
                Arc::new(AnthropicProvider::new(http_client, api_key))
            }
            (ProviderKind::Anthropic, Some(url)) => {
                Arc::new(AnthropicProvider::with_base_url(http_client, api_key, url))
            }
            (ProviderKind::Google, None) => Arc::new(GoogleProvider::new(http_client, api_key)),
            (ProviderKind::Google, Some(url)) => {
                Arc::new(GoogleProvider::with_base_url(http_client, api_key, url))
            }
            (ProviderKind::GigaChat, base_url) => {
                let scope = credential
                    .get_param(GIGACHAT_SCOPE_PARAM)
                    .unwrap_or(DEFAULT_GIGACHAT_SCOPE);
                let provider = GigaChatProvider::new(http_client, api_key, scope);
                match base_url {
                    Some(url) => Arc::new(provider.with_base_url(url)),
                    None => Arc::new(provider),
                }
            }
        };

        Ok(provider)
    }

    fn validate_credential_type(
        credential: &Credential,
        expected: CredentialType,
    ) -> Result<(), DomainError> {
        if credential.credential_type() != expected {
            return Err(DomainError::configuration(format!(
                "Expected credential type {}, got {}",
                expected,
                credential.credential_type()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[test]
    fn test_provider_kind_from_str() {
        assert_eq!("openai".parse::<ProviderKind>().unwrap(), ProviderKind::OpenAi);
        assert_eq!(" Anthropic ".parse::<ProviderKind>().unwrap(), ProviderKind::Anthropic);
        assert_eq!("gemini".parse::<ProviderKind>().unwrap(), ProviderKind::Google);
        assert_eq!("GigaChat".parse::<ProviderKind>().unwrap(), ProviderKind::GigaChat);
        assert!("mistral".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn test_provider_kind_display_round_trips() {
        for kind in ProviderKind::ALL {
            assert_eq!(kind.to_string().parse::<ProviderKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_factory_creates_each_provider() {
        for kind in ProviderKind::ALL {
            let credential = Credential::new(kind.credential_type(), "key");
            let provider = LlmProviderFactory::create(kind, &credential, None).unwrap();
            assert_eq!(provider.provider_name(), kind.as_str());
        }
    }

    #[test]
    fn test_factory_custom_base_url() {
        let credential = Credential::new(CredentialType::OpenAi, "sk-test");
        let provider = LlmProviderFactory::create(
            ProviderKind::OpenAi,
            &credential,
            Some("http://localhost:8080"),
        )
        .unwrap();
        assert_eq!(provider.provider_name(), "openai");
    }

    #[test]
    fn test_factory_wrong_credential_type() {
        let credential = Credential::new(CredentialType::Anthropic, "sk-test");

        let result = LlmProviderFactory::create(ProviderKind::OpenAi, &credential, None);
        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }

    #[test]
    fn test_factory_rejects_expired_credential() {
        let credential = Credential::new(CredentialType::Google, "g")
            .with_expiration(Utc::now() - Duration::minutes(5));

        let result = LlmProviderFactory::create(ProviderKind::Google, &credential, None);
        assert!(matches!(result, Err(DomainError::Credential { .. })));
    }
}
