use std::process::ExitCode;

use clap::Parser;
use ifeval_fc::cli::{self, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    cli::run(cli).await
}
