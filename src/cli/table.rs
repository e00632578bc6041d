//! Plain-text rendering of aggregate tables

use std::fmt::Write;

use crate::domain::evaluation::{AggregateTable, ProviderErrorPolicy, RunReport};

fn percent(rate: Option<f64>) -> String {
    match rate {
        Some(rate) => format!("{:.2}%", rate * 100.0),
        None => "n/a".to_string(),
    }
}

pub fn render(table: &AggregateTable) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Provider: {}  Model: {}  Provider errors: {} ({})",
        table.provider,
        table.model,
        table.provider_errors,
        match table.policy {
            ProviderErrorPolicy::Exclude => "excluded",
            ProviderErrorPolicy::CountAsFailure => "counted as failures",
        }
    );

    if table.is_empty() {
        let _ = writeln!(out, "No verdicts.");
        return out;
    }

    let _ = writeln!(
        out,
        "{:<36} {:<16} {:>7} {:>9} {:>8} {:>10}",
        "CHECKER", "GROUP", "PASSED", "EVALUATED", "EXCLUDED", "PASS RATE"
    );
    for row in &table.rows {
        let _ = writeln!(
            out,
            "{:<36} {:<16} {:>7} {:>9} {:>8} {:>10}",
            row.checker_kind.as_str(),
            row.group,
            row.passed,
            row.evaluated,
            row.excluded,
            percent(row.pass_rate)
        );
    }

    let funnel = &table.funnel;
    let _ = writeln!(out);
    let _ = writeln!(out, "Overall average:     {}", percent(table.overall_average));
    let _ = writeln!(
        out,
        "Function called:     {} ({}/{})",
        percent(funnel.function_called_rate),
        funnel.function_called,
        funnel.evaluated
    );
    let _ = writeln!(
        out,
        "Parameter provided:  {} ({}/{})",
        percent(funnel.parameter_provided_rate),
        funnel.parameter_provided,
        funnel.evaluated
    );
    let _ = writeln!(
        out,
        "Format correct:      {} ({}/{})",
        percent(funnel.format_correct_rate),
        funnel.format_correct,
        funnel.evaluated
    );

    out
}

/// One line describing how the run ended
pub fn run_status_line(report: &RunReport) -> String {
    let mut line = format!(
        "Run {} {}: {}/{} cases",
        report.id,
        report.status,
        report.verdicts.len(),
        report.total_cases
    );
    if report.is_partial() {
        let _ = write!(line, " ({} without verdict)", report.missing_cases());
    }
    line
}
