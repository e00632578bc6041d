use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Which LLM provider a credential belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialType {
    OpenAi,
    Anthropic,
    Google,
    GigaChat,
}

/// API key (or authorization key) plus provider-specific extras
#[derive(Debug, Clone)]
pub struct Credential {
    credential_type: CredentialType,
    api_key: String,
    additional_params: HashMap<String, String>,
    expires_at: Option<DateTime<Utc>>,
}

impl Credential {
    pub fn new(credential_type: CredentialType, api_key: impl Into<String>) -> Self {
        Self {
            credential_type,
            api_key: api_key.into(),
            additional_params: HashMap::new(),
            expires_at: None,
        }
    }

    pub fn with_expiration(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.additional_params.insert(key.into(), value.into());
        self
    }

    pub fn credential_type(&self) -> CredentialType {
        self.credential_type
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn get_param(&self, key: &str) -> Option<&str> {
        self.additional_params.get(key).map(String::as_str)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|exp| exp < Utc::now())
    }
}

impl std::fmt::Display for CredentialType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CredentialType::OpenAi => write!(f, "openai"),
            CredentialType::Anthropic => write!(f, "anthropic"),
            CredentialType::Google => write!(f, "google"),
            CredentialType::GigaChat => write!(f, "gigachat"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_creation() {
        let cred = Credential::new(CredentialType::OpenAi, "sk-test-key");

        assert_eq!(cred.credential_type(), CredentialType::OpenAi);
        assert_eq!(cred.api_key(), "sk-test-key");
        assert!(!cred.is_expired());
    }

    #[test]
    fn test_credential_with_params() {
        let cred = Credential::new(CredentialType::GigaChat, "auth-key")
            .with_param("scope", "GIGACHAT_API_PERS");

        assert_eq!(cred.get_param("scope"), Some("GIGACHAT_API_PERS"));
        assert_eq!(cred.get_param("missing"), None);
    }

    #[test]
    fn test_credential_expiration() {
        let past = Utc::now() - chrono::Duration::hours(1);
        let cred = Credential::new(CredentialType::GigaChat, "token").with_expiration(past);

        assert!(cred.is_expired());
    }

    #[test]
    fn test_credential_type_display() {
        assert_eq!(CredentialType::Google.to_string(), "google");
        assert_eq!(CredentialType::GigaChat.to_string(), "gigachat");
    }
}
