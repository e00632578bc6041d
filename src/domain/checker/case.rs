//! CASE group

use serde::Deserialize;

use super::comparison::Comparison;
use super::format_checker::{plural, FormatChecker};
use super::kind::CheckerKind;
use super::text::{clean_and_split, is_lower, is_upper};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AllUppercaseChecker {}

impl FormatChecker for AllUppercaseChecker {
    fn kind(&self) -> CheckerKind {
        CheckerKind::AllUppercase
    }

    fn check(&self, value: &str) -> bool {
        is_upper(value)
    }

    fn description(&self) -> String {
        "The argument value must be in uppercase. A string is uppercase if all cased characters in the string are uppercase and there is at least one cased character in the string.".to_string()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AllLowercaseChecker {}

impl FormatChecker for AllLowercaseChecker {
    fn kind(&self) -> CheckerKind {
        CheckerKind::AllLowercase
    }

    fn check(&self, value: &str) -> bool {
        is_lower(value)
    }

    fn description(&self) -> String {
        "The argument value must be in lowercase. A string is lowercase if all cased characters in the string are lowercase and there is at least one cased character in the string.".to_string()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NAllCapitalWordsChecker {
    #[serde(rename = "N", alias = "count")]
    pub n: usize,
    #[serde(default)]
    pub comparison_option: Comparison,
}

impl FormatChecker for NAllCapitalWordsChecker {
    fn kind(&self) -> CheckerKind {
        CheckerKind::NAllCapitalWords
    }

    fn check(&self, value: &str) -> bool {
        let count = clean_and_split(value, false)
            .iter()
            .filter(|word| is_upper(word))
            .count();

        self.comparison_option.compare(count, self.n)
    }

    fn description(&self) -> String {
        format!(
            "The argument value must contain {} {} word{} written entirely in capital (uppercase) letters.",
            self.comparison_option,
            self.n,
            plural(self.n)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capitals(n: usize, comparison_option: Comparison) -> NAllCapitalWordsChecker {
        NAllCapitalWordsChecker {
            n,
            comparison_option,
        }
    }

    #[test]
    fn test_all_uppercase() {
        let checker = AllUppercaseChecker::default();
        assert!(checker.check("HELLO"));
        assert!(checker.check("UPPERCASE"));
        assert!(checker.check("HELLO, WORLD 42!"));
        assert!(!checker.check("Hello"));
        assert!(!checker.check("123"));
        assert!(!checker.check("!@#"));
        assert!(!checker.check(""));
        assert!(!checker.check("HELLO world"));
    }

    #[test]
    fn test_all_lowercase() {
        let checker = AllLowercaseChecker::default();
        assert!(checker.check("hello"));
        assert!(checker.check("привет, мир"));
        assert!(!checker.check("Hello"));
        assert!(!checker.check("123"));
        assert!(!checker.check(""));
        assert!(!checker.check("hello WORLD"));
    }

    #[test]
    fn test_n_all_capital_words() {
        let exactly = capitals(2, Comparison::Exactly);
        assert!(exactly.check("HELLO WORLD"));
        assert!(exactly.check("HELLO, WORLD!"));
        assert!(!exactly.check("HELLO"));
        assert!(!exactly.check("HELLO world"));
        assert!(!exactly.check(""));

        let at_least = capitals(2, Comparison::AtLeast);
        assert!(at_least.check("HELLO world WORLD"));
        assert!(!at_least.check("hello world"));

        let at_most = capitals(2, Comparison::AtMost);
        assert!(at_most.check(""));
        assert!(at_most.check("HELLO!"));
        assert!(!at_most.check("HELLO WORLD AGAIN"));
    }

    #[test]
    fn test_digits_alone_are_not_capital_words() {
        assert!(capitals(1, Comparison::Exactly).check("NASA 2024"));
        assert!(capitals(1, Comparison::Exactly).check("A1 b2"));
    }
}
