use serde::Deserialize;

use super::comparison::Comparison;
use super::format_checker::{plural, FormatChecker};
use super::kind::CheckerKind;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NCommasChecker {
    #[serde(rename = "N", alias = "count")]
    pub n: usize,
    #[serde(default)]
    pub comparison_option: Comparison,
}

impl FormatChecker for NCommasChecker {
    fn kind(&self) -> CheckerKind {
        CheckerKind::NCommas
    }

    fn check(&self, value: &str) -> bool {
        let count = value.matches(',').count();
        self.comparison_option.compare(count, self.n)
    }

    fn description(&self) -> String {
        format!(
            "The argument value must contain {} {} comma{}. The commas may appear anywhere in the value.",
            self.comparison_option,
            self.n,
            plural(self.n)
        )
    }
}
