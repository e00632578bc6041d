use async_trait::async_trait;
use std::collections::HashMap;
use std::env;
use tracing::debug;

use crate::domain::{Credential, CredentialProvider, CredentialType, DomainError};
use crate::infrastructure::llm::GIGACHAT_SCOPE_PARAM;

/// Which variables hold a credential type's key and extra parameters
#[derive(Debug, Clone)]
pub struct EnvMapping {
    pub api_key_var: String,
    pub additional_vars: HashMap<String, String>,
}

impl EnvMapping {
    pub fn new(api_key_var: impl Into<String>) -> Self {
        Self {
            api_key_var: api_key_var.into(),
            additional_vars: HashMap::new(),
        }
    }

    pub fn with_var(mut self, param_name: impl Into<String>, env_var: impl Into<String>) -> Self {
        self.additional_vars.insert(param_name.into(), env_var.into());
        self
    }
}

/// Credential provider that reads provider keys from environment variables
#[derive(Debug)]
pub struct EnvCredentialProvider {
    mappings: HashMap<CredentialType, EnvMapping>,
}

impl EnvCredentialProvider {
    pub fn new() -> Self {
        Self {
            mappings: HashMap::new(),
        }
    }

    pub fn with_mapping(mut self, credential_type: CredentialType, mapping: EnvMapping) -> Self {
        self.mappings.insert(credential_type, mapping);
        self
    }

    pub fn with_defaults(self) -> Self {
        self.with_mapping(CredentialType::OpenAi, EnvMapping::new("OPENAI_API_KEY"))
            .with_mapping(CredentialType::Anthropic, EnvMapping::new("ANTHROPIC_API_KEY"))
            .with_mapping(CredentialType::Google, EnvMapping::new("GOOGLE_API_KEY"))
            .with_mapping(
                CredentialType::GigaChat,
                EnvMapping::new("GIGACHAT_CREDENTIALS").with_var(GIGACHAT_SCOPE_PARAM, "GIGACHAT_SCOPE"),
            )
    }

    /// Unset and blank variables both count as missing
    fn read_var(name: &str) -> Option<String> {
        env::var(name)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    fn read_credential(&self, credential_type: &CredentialType) -> Result<Credential, DomainError> {
        let mapping = self.mappings.get(credential_type).ok_or_else(|| {
            DomainError::credential(format!(
                "No environment mapping configured for credential type: {}",
                credential_type
            ))
        })?;

        let api_key = Self::read_var(&mapping.api_key_var).ok_or_else(|| {
            DomainError::credential(format!(
                "Environment variable '{}' not set for credential type: {}",
                mapping.api_key_var, credential_type
            ))
        })?;

        let mut credential = Credential::new(*credential_type, api_key);

        for (param_name, env_var) in &mapping.additional_vars {
            if let Some(value) = Self::read_var(env_var) {
                credential = credential.with_param(param_name, value);
            }
        }

        debug!(credential_type = %credential_type, var = %mapping.api_key_var, "Loaded credential from environment");
        Ok(credential)
    }
}

impl Default for EnvCredentialProvider {
    fn default() -> Self {
        Self::new().with_defaults()
    }
}

#[async_trait]
impl CredentialProvider for EnvCredentialProvider {
    async fn get_credential(
        &self,
        credential_type: CredentialType,
    ) -> Result<Credential, DomainError> {
        self.read_credential(&credential_type)
    }

    async fn has_credential(&self, credential_type: CredentialType) -> bool {
        self.mappings
            .get(&credential_type)
            .is_some_and(|mapping| Self::read_var(&mapping.api_key_var).is_some())
    }

    fn source_name(&self) -> &'static str {
        "env"
    }
}
