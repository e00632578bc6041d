//! `checkers` and `check` commands

use std::process::ExitCode;

use anyhow::Context;
use clap::Args;
use serde_json::Value;

use crate::domain::{CheckerKind, CheckerRegistry};

#[derive(Args, Clone)]
pub struct CheckersArgs {
    /// Print the catalog as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Clone)]
pub struct CheckArgs {
    /// Checker kind, e.g. `NCommasChecker` or `ncommas`
    pub kind: String,

    /// Text to check
    pub value: String,

    /// Parameter record as a JSON object
    #[arg(long, default_value = "{}")]
    pub params: String,
}

pub fn list(args: CheckersArgs) -> anyhow::Result<ExitCode> {
    let entries = CheckerRegistry::entries();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(ExitCode::SUCCESS);
    }

    for entry in entries {
        println!("{:<36} {}", entry.kind.as_str(), entry.group);
        for field in entry.params {
            let requirement = match field.default {
                Some(default) => format!("default {}", default),
                None if field.required => "required".to_string(),
                None => "optional".to_string(),
            };
            println!("    {:<24} {} ({})", field.name, field.param_type, requirement);
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Exit status reflects the verdict: success when the value follows the rule
pub fn run(args: CheckArgs) -> anyhow::Result<ExitCode> {
    let kind: CheckerKind = args.kind.parse()?;
    let params: Value = serde_json::from_str(&args.params).context("--params is not valid JSON")?;
    let checker = CheckerRegistry::build(kind, &params)?;

    let passed = checker.check(&args.value);

    println!("{}: {}", kind, checker.description());
    println!("{}", if passed { "PASS" } else { "FAIL" });

    Ok(if passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
