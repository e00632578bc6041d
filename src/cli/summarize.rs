//! `summarize` command - aggregate a stored run report

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Args;

use super::table;
use crate::config::AppConfig;
use crate::domain::evaluation::{ProviderErrorPolicy, ResultAggregator, RunId, RunReport};
use crate::domain::{DomainError, Storage};
use crate::infrastructure::storage::FileStorage;

#[derive(Args, Clone)]
pub struct SummarizeArgs {
    /// Report file, or a run id looked up in the results directory
    pub report: String,

    /// `exclude` or `count_as_failure`
    #[arg(long)]
    pub provider_error_policy: Option<String>,

    /// Print the aggregate table as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: SummarizeArgs, config: &AppConfig) -> anyhow::Result<ExitCode> {
    let policy = match args.provider_error_policy.as_deref() {
        Some(value) => value.parse::<ProviderErrorPolicy>().map_err(anyhow::Error::msg)?,
        None => config.evaluation.provider_error_policy,
    };

    let results = FileStorage::<RunReport>::new(&config.results.dir);
    let report = load_report(&args.report, &results).await?;
    let table = ResultAggregator::new(policy).aggregate(&report);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&table)?);
    } else {
        println!("{}", table::run_status_line(&report));
        print!("{}", table::render(&table));
    }

    Ok(ExitCode::SUCCESS)
}

/// A path to an existing file wins over a run id
async fn load_report(
    reference: &str,
    results: &dyn Storage<RunReport>,
) -> anyhow::Result<RunReport> {
    let path = PathBuf::from(reference);
    if tokio::fs::try_exists(&path).await.unwrap_or(false) {
        let bytes = tokio::fs::read(&path)
            .await
            .with_context(|| format!("failed to read '{}'", path.display()))?;
        return serde_json::from_slice(&bytes)
            .with_context(|| format!("'{}' is not a run report", path.display()));
    }

    let id = RunId::new(reference.trim_end_matches(".json"));
    let report = results
        .get(&id)
        .await?
        .ok_or_else(|| DomainError::not_found(format!("Run report '{}' not found", id)))?;
    Ok(report)
}
