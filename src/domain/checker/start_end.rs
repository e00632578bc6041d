//! START_END group: ending phrase and wrapping quotes

use serde::Deserialize;

use super::format_checker::{FormatChecker, InvalidParam};
use super::kind::CheckerKind;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EndPhraseChecker {
    pub end_phrase: String,
}

impl FormatChecker for EndPhraseChecker {
    fn kind(&self) -> CheckerKind {
        CheckerKind::EndPhrase
    }

    fn check(&self, value: &str) -> bool {
        let value = value.trim().to_lowercase();
        let phrase = self.end_phrase.trim().to_lowercase();
        value.ends_with(&phrase)
    }

    fn description(&self) -> String {
        format!(
            "The argument value must end with the exact phrase '{}'. Only whitespaces are allowed after it. Case doesn't matter.",
            self.end_phrase
        )
    }

    fn validate(&self) -> Result<(), InvalidParam> {
        if self.end_phrase.trim().is_empty() {
            return Err(InvalidParam::new("end_phrase", "phrase must not be blank"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuotationType {
    Single,
    #[default]
    Double,
}

impl QuotationType {
    fn mark(&self) -> char {
        match self {
            Self::Single => '\'',
            Self::Double => '"',
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Double => "double",
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QuotationChecker {
    #[serde(default)]
    pub quotation_type: QuotationType,
}

impl FormatChecker for QuotationChecker {
    fn kind(&self) -> CheckerKind {
        CheckerKind::Quotation
    }

    fn check(&self, value: &str) -> bool {
        let mark = self.quotation_type.mark();
        value.chars().count() >= 2 && value.starts_with(mark) && value.ends_with(mark)
    }

    fn description(&self) -> String {
        format!(
            "The argument value must be wrapped in {} quotation marks.\n No additional characters should appear outside the quotes.",
            self.quotation_type.as_str()
        )
    }
}
