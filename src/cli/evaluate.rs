//! `evaluate` command - run a dataset against one provider

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::Args;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::{table, EXIT_ABORTED, EXIT_CANCELLED};
use crate::config::AppConfig;
use crate::domain::checker::warm_up;
use crate::domain::evaluation::{
    CallAdapter, EvaluationEngine, ProviderErrorPolicy, ResultAggregator, RunReport, RunStatus,
};
use crate::domain::{CredentialProvider, LlmProvider, Storage};
use crate::infrastructure::credentials::EnvCredentialProvider;
use crate::infrastructure::dataset::DatasetLoader;
use crate::infrastructure::llm::{LlmProviderFactory, ProviderKind};
use crate::infrastructure::storage::{StorageConfig, StorageFactory};

#[derive(Args, Clone)]
pub struct EvaluateArgs {
    /// Provider: openai, anthropic, google or gigachat
    #[arg(long)]
    pub provider: Option<String>,

    /// Model id (defaults to config, then `<PROVIDER>_MODEL`, then `DEFAULT_MODEL`)
    #[arg(long)]
    pub model: Option<String>,

    /// Maximum in-flight provider calls
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Dataset directory or file
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Limit the number of dataset records
    #[arg(long)]
    pub max_samples: Option<usize>,

    #[arg(long)]
    pub temperature: Option<f32>,

    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Directory the run report is written to
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// `exclude` or `count_as_failure`
    #[arg(long)]
    pub provider_error_policy: Option<String>,
}

pub async fn run(args: EvaluateArgs, config: &AppConfig) -> anyhow::Result<ExitCode> {
    let kind = match args.provider.as_deref() {
        Some(name) => name.parse::<ProviderKind>()?,
        None => config.providers.default_provider(),
    };

    let policy = match args.provider_error_policy.as_deref() {
        Some(value) => value.parse::<ProviderErrorPolicy>().map_err(anyhow::Error::msg)?,
        None => config.evaluation.provider_error_policy,
    };

    let mut settings = config.providers.settings(kind).clone();
    if args.temperature.is_some() {
        settings.temperature = args.temperature;
    }
    if args.max_tokens.is_some() {
        settings.max_tokens = args.max_tokens;
    }

    let Some(model) = args.model.clone().or_else(|| config.providers.model_for(kind)) else {
        bail!(
            "no model configured for {}: pass --model or set {}_MODEL",
            kind,
            kind.as_str().to_uppercase()
        );
    };

    warm_up();

    let data_path = args.data.clone().unwrap_or_else(|| config.dataset.path.clone());
    let cases: Vec<_> = DatasetLoader::new(&data_path)
        .with_max_samples(args.max_samples.or(config.dataset.max_samples))
        .load()
        .await?
        .into_iter()
        .map(Arc::new)
        .collect();

    let provider = build_provider(
        &EnvCredentialProvider::default(),
        kind,
        settings.base_url.as_deref(),
    )
    .await?;

    let adapter = CallAdapter::new(provider, &model)
        .with_retry(config.evaluation.retry_policy())
        .with_timeout(config.evaluation.request_timeout());

    let mut engine_config = config.evaluation.engine_config(&settings);
    if let Some(concurrency) = args.concurrency {
        engine_config.concurrency = concurrency;
    }
    engine_config.validate()?;
    let engine = EvaluationEngine::new(adapter, engine_config);

    info!(provider = %kind, model = %model, data = %data_path.display(), "Starting evaluation");

    let cancel = CancellationToken::new();
    let interrupt = tokio::spawn(cancel_on_interrupt(cancel.clone()));
    let result = engine.run_with_cancel(cases, cancel).await;
    interrupt.abort();
    let report = result?;

    let storage_config = match &args.output {
        Some(dir) => StorageConfig::file(dir),
        None => config.results.storage_config(),
    };
    let storage = StorageFactory::create::<RunReport>(&storage_config);
    save_report(storage.as_ref(), &report).await?;
    if let StorageConfig::File { dir } = &storage_config {
        info!(path = %dir.join(format!("{}.json", report.id)).display(), "Report saved");
    }

    let table = ResultAggregator::new(policy).aggregate(&report);
    println!("{}", table::run_status_line(&report));
    print!("{}", table::render(&table));

    Ok(ExitCode::from(exit_status(&report.status)))
}

async fn build_provider(
    credentials: &dyn CredentialProvider,
    kind: ProviderKind,
    base_url: Option<&str>,
) -> anyhow::Result<Arc<dyn LlmProvider>> {
    let credential = credentials
        .get_credential(kind.credential_type())
        .await
        .with_context(|| format!("no {} credential from {}", kind, credentials.source_name()))?;

    Ok(LlmProviderFactory::create(kind, &credential, base_url)?)
}

async fn save_report(storage: &dyn Storage<RunReport>, report: &RunReport) -> anyhow::Result<()> {
    storage
        .create(report.clone())
        .await
        .with_context(|| format!("failed to store report {}", report.id))?;
    Ok(())
}

async fn cancel_on_interrupt(cancel: CancellationToken) {
    match signal::ctrl_c().await {
        Ok(()) => {
            warn!("Received Ctrl+C, cancelling evaluation");
            cancel.cancel();
        }
        Err(e) => warn!(error = %e, "Failed to install Ctrl+C handler"),
    }
}

/// Pass rates never affect the exit status, only how the run ended
fn exit_status(status: &RunStatus) -> u8 {
    match status {
        RunStatus::Completed => 0,
        RunStatus::Cancelled => EXIT_CANCELLED,
        RunStatus::Aborted { .. } => EXIT_ABORTED,
    }
}
