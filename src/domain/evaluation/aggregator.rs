//! Reduction of a run report into per-checker pass rates

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{RunReport, Verdict};
use crate::domain::checker::CheckerKind;

/// How verdicts with PROVIDER_ERROR enter the table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderErrorPolicy {
    /// Left out of every denominator
    #[default]
    Exclude,
    /// Counted as a failed case
    CountAsFailure,
}

impl std::str::FromStr for ProviderErrorPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "exclude" => Ok(Self::Exclude),
            "count_as_failure" => Ok(Self::CountAsFailure),
            other => Err(format!("unknown provider error policy: {}", other)),
        }
    }
}

/// Per-checker results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateRow {
    pub checker_kind: CheckerKind,
    pub group: String,
    pub total: usize,
    pub evaluated: usize,
    pub passed: usize,
    pub excluded: usize,
    pub pass_rate: Option<f64>,
}

/// Share of evaluated cases reaching each stage of the pipeline
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FunnelMetrics {
    pub evaluated: usize,
    pub function_called: usize,
    pub parameter_provided: usize,
    pub format_correct: usize,
    pub function_called_rate: Option<f64>,
    pub parameter_provided_rate: Option<f64>,
    pub format_correct_rate: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateTable {
    pub provider: String,
    pub model: String,
    pub policy: ProviderErrorPolicy,
    /// Rows sorted by checker kind
    pub rows: Vec<AggregateRow>,
    /// Mean of the defined per-checker pass rates
    pub overall_average: Option<f64>,
    pub funnel: FunnelMetrics,
    pub provider_errors: usize,
}

impl AggregateTable {
    pub fn row(&self, kind: CheckerKind) -> Option<&AggregateRow> {
        self.rows.iter().find(|row| row.checker_kind == kind)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Default)]
struct Tally {
    total: usize,
    evaluated: usize,
    passed: usize,
    excluded: usize,
}

fn ratio(numerator: usize, denominator: usize) -> Option<f64> {
    (denominator > 0).then(|| numerator as f64 / denominator as f64)
}

/// Builds aggregate tables under one provider error policy
#[derive(Debug, Clone, Copy, Default)]
pub struct ResultAggregator {
    policy: ProviderErrorPolicy,
}

impl ResultAggregator {
    pub fn new(policy: ProviderErrorPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> ProviderErrorPolicy {
        self.policy
    }

    fn counts(&self, verdict: &Verdict) -> bool {
        !verdict.is_provider_error() || self.policy == ProviderErrorPolicy::CountAsFailure
    }

    pub fn aggregate(&self, report: &RunReport) -> AggregateTable {
        let mut tallies: BTreeMap<CheckerKind, Tally> = BTreeMap::new();
        let mut funnel = FunnelMetrics::default();
        let mut provider_errors = 0;

        for verdict in &report.verdicts {
            let tally = tallies.entry(verdict.checker_kind).or_default();
            tally.total += 1;

            if verdict.is_provider_error() {
                provider_errors += 1;
            }

            if !self.counts(verdict) {
                tally.excluded += 1;
                continue;
            }

            tally.evaluated += 1;
            funnel.evaluated += 1;
            if verdict.passed {
                tally.passed += 1;
                funnel.format_correct += 1;
            }
            if verdict.function_called {
                funnel.function_called += 1;
            }
            if verdict.argument_provided {
                funnel.parameter_provided += 1;
            }
        }

        funnel.function_called_rate = ratio(funnel.function_called, funnel.evaluated);
        funnel.parameter_provided_rate = ratio(funnel.parameter_provided, funnel.evaluated);
        funnel.format_correct_rate = ratio(funnel.format_correct, funnel.evaluated);

        let rows: Vec<AggregateRow> = tallies
            .into_iter()
            .map(|(kind, tally)| AggregateRow {
                checker_kind: kind,
                group: kind.group().as_str().to_string(),
                total: tally.total,
                evaluated: tally.evaluated,
                passed: tally.passed,
                excluded: tally.excluded,
                pass_rate: ratio(tally.passed, tally.evaluated),
            })
            .collect();

        let rates: Vec<f64> = rows.iter().filter_map(|row| row.pass_rate).collect();
        let overall_average = (!rates.is_empty()).then(|| rates.iter().sum::<f64>() / rates.len() as f64);

        AggregateTable {
            provider: report.provider.clone(),
            model: report.model.clone(),
            policy: self.policy,
            rows,
            overall_average,
            funnel,
            provider_errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::evaluation::{FailureReason, RunId, RunStatus};
    use crate::domain::test_case::TestCaseId;
    use chrono::Utc;

    fn id(n: usize) -> TestCaseId {
        TestCaseId::new(format!("d#{}", n)).unwrap()
    }

    fn pass(n: usize, kind: CheckerKind) -> Verdict {
        Verdict::pass(id(n), kind, "value")
    }

    fn fail(n: usize, kind: CheckerKind, reason: FailureReason) -> Verdict {
        Verdict::fail(id(n), kind, reason)
    }

    fn report(verdicts: Vec<Verdict>) -> RunReport {
        let now = Utc::now();
        RunReport {
            id: RunId::new("r"),
            provider: "mock".to_string(),
            model: "m".to_string(),
            started_at: now,
            finished_at: now,
            status: RunStatus::Completed,
            total_cases: verdicts.len(),
            verdicts,
        }
    }

    #[test]
    fn test_empty_report() {
        let table = ResultAggregator::default().aggregate(&report(Vec::new()));
        assert!(table.is_empty());
        assert_eq!(table.overall_average, None);
        assert_eq!(table.funnel.function_called_rate, None);
    }

    #[test]
    fn test_all_pass_is_one() {
        let verdicts = (0..4).map(|n| pass(n, CheckerKind::NCommas)).collect();
        let table = ResultAggregator::default().aggregate(&report(verdicts));

        let row = table.row(CheckerKind::NCommas).unwrap();
        assert_eq!(row.pass_rate, Some(1.0));
        assert_eq!(row.group, "PUNCTUATION");
        assert_eq!(table.overall_average, Some(1.0));
    }

    #[test]
    fn test_provider_errors_excluded_by_default() {
        let verdicts = vec![
            pass(0, CheckerKind::WordCount),
            fail(1, CheckerKind::WordCount, FailureReason::FormatViolation),
            fail(2, CheckerKind::WordCount, FailureReason::ProviderError),
        ];
        let table = ResultAggregator::default().aggregate(&report(verdicts));

        let row = table.row(CheckerKind::WordCount).unwrap();
        assert_eq!(row.total, 3);
        assert_eq!(row.evaluated, 2);
        assert_eq!(row.excluded, 1);
        assert_eq!(row.pass_rate, Some(0.5));
        assert_eq!(table.provider_errors, 1);
        assert_eq!(table.funnel.evaluated, 2);
    }

    #[test]
    fn test_count_as_failure_policy() {
        let verdicts = vec![
            pass(0, CheckerKind::WordCount),
            fail(1, CheckerKind::WordCount, FailureReason::ProviderError),
        ];
        let table =
            ResultAggregator::new(ProviderErrorPolicy::CountAsFailure).aggregate(&report(verdicts));

        let row = table.row(CheckerKind::WordCount).unwrap();
        assert_eq!(row.evaluated, 2);
        assert_eq!(row.excluded, 0);
        assert_eq!(row.pass_rate, Some(0.5));
    }

    #[test]
    fn test_only_provider_errors_leave_rate_undefined() {
        let verdicts = vec![fail(0, CheckerKind::Quotation, FailureReason::ProviderError)];
        let table = ResultAggregator::default().aggregate(&report(verdicts));

        assert_eq!(table.row(CheckerKind::Quotation).unwrap().pass_rate, None);
        assert_eq!(table.overall_average, None);
    }

    #[test]
    fn test_overall_average_is_mean_of_kinds() {
        let mut verdicts = vec![pass(0, CheckerKind::NCommas)];
        verdicts.extend((1..4).map(|n| fail(n, CheckerKind::Quotation, FailureReason::FormatViolation)));
        verdicts.push(pass(4, CheckerKind::Quotation));

        let table = ResultAggregator::default().aggregate(&report(verdicts));
        assert_eq!(table.row(CheckerKind::Quotation).unwrap().pass_rate, Some(0.25));
        assert_eq!(table.overall_average, Some(0.625));
    }

    #[test]
    fn test_rows_sorted_by_kind() {
        let verdicts = vec![
            pass(0, CheckerKind::NCommas),
            pass(1, CheckerKind::KeywordsPresence),
            pass(2, CheckerKind::WordCount),
        ];
        let table = ResultAggregator::default().aggregate(&report(verdicts));
        let kinds: Vec<_> = table.rows.iter().map(|r| r.checker_kind).collect();

        let mut sorted = kinds.clone();
        sorted.sort();
        assert_eq!(kinds, sorted);
    }

    #[test]
    fn test_funnel_metrics() {
        let verdicts = vec![
            fail(0, CheckerKind::NCommas, FailureReason::NoFunctionCall),
            fail(1, CheckerKind::NCommas, FailureReason::ArgumentMissing),
            fail(2, CheckerKind::NCommas, FailureReason::FormatViolation),
            pass(3, CheckerKind::NCommas),
        ];
        let funnel = ResultAggregator::default().aggregate(&report(verdicts)).funnel;

        assert_eq!(funnel.function_called_rate, Some(0.75));
        assert_eq!(funnel.parameter_provided_rate, Some(0.5));
        assert_eq!(funnel.format_correct_rate, Some(0.25));
    }

    #[test]
    fn test_aggregate_is_idempotent() {
        let verdicts = vec![
            pass(0, CheckerKind::NCommas),
            fail(1, CheckerKind::TitleFormat, FailureReason::WrongFunction),
        ];
        let report = report(verdicts);
        let aggregator = ResultAggregator::default();

        assert_eq!(aggregator.aggregate(&report), aggregator.aggregate(&report));
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("exclude".parse(), Ok(ProviderErrorPolicy::Exclude));
        assert_eq!("count-as-failure".parse(), Ok(ProviderErrorPolicy::CountAsFailure));
        assert!("ignore".parse::<ProviderErrorPolicy>().is_err());
    }
}
