//! LENGTH CONSTRAINTS group: word and sentence counts

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use super::comparison::Comparison;
use super::format_checker::{plural, FormatChecker};
use super::kind::CheckerKind;
use super::sentence::extract_sentences;

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").unwrap());

pub(crate) fn warm_up() {
    Lazy::force(&WORD);
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WordCountChecker {
    #[serde(rename = "N", alias = "count")]
    pub n: usize,
    #[serde(default)]
    pub comparison_option: Comparison,
}

impl FormatChecker for WordCountChecker {
    fn kind(&self) -> CheckerKind {
        CheckerKind::WordCount
    }

    fn check(&self, value: &str) -> bool {
        let count = WORD.find_iter(value).count();
        self.comparison_option.compare(count, self.n)
    }

    fn description(&self) -> String {
        format!(
            "The argument value must contain {} {} word{}.",
            self.comparison_option,
            self.n,
            plural(self.n)
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SentenceCountChecker {
    #[serde(rename = "N", alias = "count")]
    pub n: usize,
    #[serde(default)]
    pub comparison_option: Comparison,
}

impl FormatChecker for SentenceCountChecker {
    fn kind(&self) -> CheckerKind {
        CheckerKind::SentenceCount
    }

    fn check(&self, value: &str) -> bool {
        let count = extract_sentences(value).len();
        self.comparison_option.compare(count, self.n)
    }

    fn description(&self) -> String {
        let tail = if self.n == 1 {
            "."
        } else {
            "s. Each sentence should be properly punctuated."
        };

        format!(
            "The argument value must have {} {} sentence{}",
            self.comparison_option, self.n, tail
        )
    }
}
