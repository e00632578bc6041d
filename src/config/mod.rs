//! Configuration module

mod app_config;

pub use app_config::{
    AppConfig, DatasetConfig, EvaluationConfig, LogFormat, LoggingConfig, ProviderSettings,
    ProvidersConfig, ResultsConfig,
};
