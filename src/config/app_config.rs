use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::domain::evaluation::{
    EngineConfig, ProviderErrorPolicy, RetryPolicy, DEFAULT_SYSTEM_MESSAGE, MAX_CONCURRENCY,
};
use crate::infrastructure::llm::ProviderKind;
use crate::infrastructure::storage::{StorageConfig, StorageType};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub evaluation: EvaluationConfig,
    pub dataset: DatasetConfig,
    pub results: ResultsConfig,
    pub providers: ProvidersConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    pub concurrency: usize,
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
    pub backoff_multiplier: f64,
    pub request_timeout_secs: u64,
    pub cancel_grace_secs: u64,
    pub provider_error_policy: ProviderErrorPolicy,
    /// Replaces the built-in instruction to always call a function; empty disables it
    pub system_message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    pub path: PathBuf,
    pub max_samples: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ResultsConfig {
    pub dir: PathBuf,
    pub storage: StorageType,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    pub default: ProviderKind,
    pub openai: ProviderSettings,
    pub anthropic: ProviderSettings,
    pub google: ProviderSettings,
    pub gigachat: ProviderSettings,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        let retry = RetryPolicy::default();
        let engine = EngineConfig::default();

        Self {
            concurrency: engine.concurrency,
            max_retries: retry.max_retries,
            initial_backoff_ms: retry.initial_delay_ms,
            max_backoff_ms: retry.max_delay_ms,
            backoff_multiplier: retry.backoff_multiplier,
            request_timeout_secs: 60,
            cancel_grace_secs: engine.cancel_grace.as_secs(),
            provider_error_policy: ProviderErrorPolicy::default(),
            system_message: None,
        }
    }
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data"),
            max_samples: None,
        }
    }
}

impl Default for ResultsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("results"),
            storage: StorageType::File,
        }
    }
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            default: ProviderKind::OpenAi,
            openai: ProviderSettings::default(),
            anthropic: ProviderSettings::default(),
            google: ProviderSettings::default(),
            gigachat: ProviderSettings::default(),
        }
    }
}

impl EvaluationConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries)
            .with_initial_delay(self.initial_backoff_ms)
            .with_max_delay(self.max_backoff_ms)
            .with_backoff_multiplier(self.backoff_multiplier)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn engine_config(&self, settings: &ProviderSettings) -> EngineConfig {
        EngineConfig {
            concurrency: self.concurrency,
            system_message: self
                .system_message
                .clone()
                .unwrap_or_else(|| DEFAULT_SYSTEM_MESSAGE.to_string()),
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
            cancel_grace: Duration::from_secs(self.cancel_grace_secs),
        }
    }
}

impl ResultsConfig {
    pub fn storage_config(&self) -> StorageConfig {
        match self.storage {
            StorageType::InMemory => StorageConfig::in_memory(),
            StorageType::File => StorageConfig::file(&self.dir),
        }
    }
}

impl ProvidersConfig {
    pub fn settings(&self, kind: ProviderKind) -> &ProviderSettings {
        match kind {
            ProviderKind::OpenAi => &self.openai,
            ProviderKind::Anthropic => &self.anthropic,
            ProviderKind::Google => &self.google,
            ProviderKind::GigaChat => &self.gigachat,
        }
    }

    /// `DEFAULT_LLM_PROVIDER` wins over the configured default
    pub fn default_provider(&self) -> ProviderKind {
        env::var("DEFAULT_LLM_PROVIDER")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(self.default)
    }

    /// Configured model, else `<PROVIDER>_MODEL`, else `DEFAULT_MODEL`
    pub fn model_for(&self, kind: ProviderKind) -> Option<String> {
        self.model_with(kind, |name| env::var(name).ok())
    }

    fn model_with(
        &self,
        kind: ProviderKind,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Option<String> {
        let non_empty = |value: String| {
            let value = value.trim().to_string();
            (!value.is_empty()).then_some(value)
        };

        self.settings(kind)
            .model
            .clone()
            .and_then(non_empty)
            .or_else(|| {
                lookup(&format!("{}_MODEL", kind.as_str().to_uppercase())).and_then(non_empty)
            })
            .or_else(|| lookup("DEFAULT_MODEL").and_then(non_empty))
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(Path::new("config"))
    }

    /// `<dir>/default`, then `<dir>/local`, then `APP__SECTION__KEY` variables
    pub fn load_from(dir: &Path) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(
                config::File::with_name(&dir.join("default").to_string_lossy()).required(false),
            )
            .add_source(
                config::File::with_name(&dir.join("local").to_string_lossy()).required(false),
            )
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let app_config: Self = config.try_deserialize()?;
        app_config.validate()?;
        Ok(app_config)
    }

    pub fn validate(&self) -> Result<(), config::ConfigError> {
        let concurrency = self.evaluation.concurrency;
        if concurrency == 0 || concurrency > MAX_CONCURRENCY {
            return Err(config::ConfigError::Message(format!(
                "evaluation.concurrency must be between 1 and {}, got {}",
                MAX_CONCURRENCY, concurrency
            )));
        }
        Ok(())
    }
}
