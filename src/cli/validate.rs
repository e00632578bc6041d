//! `validate` command

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;

use crate::config::AppConfig;
use crate::domain::CheckerKind;
use crate::infrastructure::dataset::DatasetLoader;

#[derive(Args, Clone)]
pub struct ValidateArgs {
    /// Dataset directory or file (defaults to `dataset.path`)
    pub path: Option<PathBuf>,

    /// Limit the number of records read
    #[arg(long)]
    pub max_samples: Option<usize>,
}

pub async fn run(args: ValidateArgs, config: &AppConfig) -> anyhow::Result<ExitCode> {
    let path = args.path.unwrap_or_else(|| config.dataset.path.clone());
    let cases = DatasetLoader::new(&path)
        .with_max_samples(args.max_samples.or(config.dataset.max_samples))
        .load()
        .await?;

    let mut per_kind: BTreeMap<CheckerKind, usize> = BTreeMap::new();
    for case in &cases {
        *per_kind.entry(case.checker_kind()).or_default() += 1;
    }

    for (kind, count) in &per_kind {
        println!("{:<36} {:<16} {:>6}", kind.as_str(), kind.group().as_str(), count);
    }
    println!("{} test cases in '{}'", cases.len(), path.display());

    Ok(ExitCode::SUCCESS)
}
