use serde::{Deserialize, Serialize};

use crate::domain::checker::CheckerKind;
use crate::domain::test_case::TestCaseId;

/// Why a test case did not pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureReason {
    NoFunctionCall,
    WrongFunction,
    ArgumentMissing,
    NonStringArgument,
    FormatViolation,
    ProviderError,
}

impl FailureReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoFunctionCall => "NO_FUNCTION_CALL",
            Self::WrongFunction => "WRONG_FUNCTION",
            Self::ArgumentMissing => "ARGUMENT_MISSING",
            Self::NonStringArgument => "NON_STRING_ARGUMENT",
            Self::FormatViolation => "FORMAT_VIOLATION",
            Self::ProviderError => "PROVIDER_ERROR",
        }
    }
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one test case in one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub test_case_id: TestCaseId,
    pub checker_kind: CheckerKind,
    pub passed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<FailureReason>,
    /// Argument value that was checked (the first failing one for multiple calls)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_value: Option<String>,
    pub function_called: bool,
    pub argument_provided: bool,
    #[serde(default)]
    pub attempts: u32,
    #[serde(default)]
    pub latency_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl Verdict {
    pub fn pass(
        test_case_id: TestCaseId,
        checker_kind: CheckerKind,
        raw_value: impl Into<String>,
    ) -> Self {
        Self {
            test_case_id,
            checker_kind,
            passed: true,
            failure_reason: None,
            raw_value: Some(raw_value.into()),
            function_called: true,
            argument_provided: true,
            attempts: 0,
            latency_ms: 0,
            detail: None,
        }
    }

    /// A failing verdict; the funnel flags follow from the reason
    pub fn fail(test_case_id: TestCaseId, checker_kind: CheckerKind, reason: FailureReason) -> Self {
        let function_called = !matches!(
            reason,
            FailureReason::NoFunctionCall | FailureReason::ProviderError
        );
        let argument_provided = matches!(
            reason,
            FailureReason::NonStringArgument | FailureReason::FormatViolation
        );

        Self {
            test_case_id,
            checker_kind,
            passed: false,
            failure_reason: Some(reason),
            raw_value: None,
            function_called,
            argument_provided,
            attempts: 0,
            latency_ms: 0,
            detail: None,
        }
    }

    pub fn with_raw_value(mut self, value: impl Into<String>) -> Self {
        self.raw_value = Some(value.into());
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_timing(mut self, attempts: u32, latency_ms: u64) -> Self {
        self.attempts = attempts;
        self.latency_ms = latency_ms;
        self
    }

    pub fn is_provider_error(&self) -> bool {
        self.failure_reason == Some(FailureReason::ProviderError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id() -> TestCaseId {
        TestCaseId::new("d.json#3").unwrap()
    }

    #[test]
    fn test_failure_reason_serde() {
        let json = serde_json::to_string(&FailureReason::NonStringArgument).unwrap();
        assert_eq!(json, "\"NON_STRING_ARGUMENT\"");

        let parsed: FailureReason = serde_json::from_str("\"PROVIDER_ERROR\"").unwrap();
        assert_eq!(parsed, FailureReason::ProviderError);
        assert_eq!(parsed.to_string(), "PROVIDER_ERROR");
    }

    #[test]
    fn test_fail_sets_funnel_flags() {
        let no_call = Verdict::fail(id(), CheckerKind::NCommas, FailureReason::NoFunctionCall);
        assert!(!no_call.function_called && !no_call.argument_provided);

        let missing = Verdict::fail(id(), CheckerKind::NCommas, FailureReason::ArgumentMissing);
        assert!(missing.function_called && !missing.argument_provided);

        let violation = Verdict::fail(id(), CheckerKind::NCommas, FailureReason::FormatViolation);
        assert!(violation.function_called && violation.argument_provided);

        let provider = Verdict::fail(id(), CheckerKind::NCommas, FailureReason::ProviderError);
        assert!(provider.is_provider_error());
        assert!(!provider.function_called);
    }

    #[test]
    fn test_verdict_serialization() {
        let verdict = Verdict::pass(id(), CheckerKind::Quotation, "\"hi\"").with_timing(2, 120);
        let json = serde_json::to_value(&verdict).unwrap();

        assert_eq!(json["test_case_id"], "d.json#3");
        assert_eq!(json["checker_kind"], "QuotationChecker");
        assert_eq!(json["attempts"], 2);
        assert!(json.get("failure_reason").is_none());

        let back: Verdict = serde_json::from_value(json).unwrap();
        assert_eq!(back, verdict);
    }
}
