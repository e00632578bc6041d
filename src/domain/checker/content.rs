//! DETECTABLE CONTENT group: postscripts and placeholders

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use super::comparison::Comparison;
use super::format_checker::{plural, FormatChecker, InvalidParam};
use super::kind::CheckerKind;

static PS: Lazy<Regex> = Lazy::new(|| Regex::new(r"p\.\s?s\.").unwrap());

static PPS: Lazy<Regex> = Lazy::new(|| Regex::new(r"p\.\s?p\.\s?s").unwrap());

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[.*?\]").unwrap());

pub(crate) fn warm_up() {
    Lazy::force(&PS);
    Lazy::force(&PPS);
    Lazy::force(&PLACEHOLDER);
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PostscriptChecker {
    pub postscript_marker: String,
}

impl FormatChecker for PostscriptChecker {
    fn kind(&self) -> CheckerKind {
        CheckerKind::Postscript
    }

    fn check(&self, value: &str) -> bool {
        let value = value.to_lowercase();

        match self.postscript_marker.trim() {
            "P.S." => PS.is_match(&value),
            "P.P.S." => PPS.is_match(&value),
            custom => value.contains(&custom.to_lowercase()),
        }
    }

    fn description(&self) -> String {
        match self.postscript_marker.trim() {
            "P.S." => "The argument value must contain a postscript that begins with the marker 'P.S.'. The marker may have optional whitespace (e.g., 'P. S.').".to_string(),
            "P.P.S." => "The argument value must contain a postscript that begins with the marker 'P.P.S.'. The marker may have optional whitespace (e.g., 'P. P. S.').".to_string(),
            custom => format!(
                "The argument value must contain a postscript that begins with the marker '{}'.",
                custom
            ),
        }
    }

    fn validate(&self) -> Result<(), InvalidParam> {
        if self.postscript_marker.trim().is_empty() {
            return Err(InvalidParam::new(
                "postscript_marker",
                "marker must not be blank",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlaceholderCountChecker {
    #[serde(rename = "N", alias = "count")]
    pub n: usize,
    #[serde(default)]
    pub comparison_option: Comparison,
}

impl FormatChecker for PlaceholderCountChecker {
    fn kind(&self) -> CheckerKind {
        CheckerKind::PlaceholderCount
    }

    fn check(&self, value: &str) -> bool {
        let count = PLACEHOLDER.find_iter(value).count();
        self.comparison_option.compare(count, self.n)
    }

    fn description(&self) -> String {
        format!(
            "The argument value must contain {} {} placeholder{}, each enclosed in square brackets (e.g., [address]).",
            self.comparison_option,
            self.n,
            plural(self.n)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn postscript(marker: &str) -> PostscriptChecker {
        PostscriptChecker {
            postscript_marker: marker.to_string(),
        }
    }

    fn placeholders(n: usize, comparison_option: Comparison) -> PlaceholderCountChecker {
        PlaceholderCountChecker {
            n,
            comparison_option,
        }
    }

    #[test]
    fn test_ps_marker() {
        let checker = postscript("P.S.");
        assert!(checker.check("This is a letter. P.S. Don't forget to call."));
        assert!(checker.check("P. S. This is a postscript."));
        assert!(checker.check("ps is a part of pps, hence, it's okay: P.    P.S. This is a postscript."));
        assert!(checker.check("p.s. lower case"));
        assert!(!checker.check("This is a letter."));
        assert!(!checker.check(""));
        assert!(!checker.check("PS. This is not valid."));
        assert!(!checker.check("P. S S. Something."));
    }

    #[test]
    fn test_pps_marker() {
        let checker = postscript("P.P.S.");
        assert!(checker.check("This is a letter. P.P.S. Don't forget to call."));
        assert!(checker.check("P. P. S. This is a postscript."));
        assert!(!checker.check("P.S. This is a postscript."));
        assert!(!checker.check("PPS. This is not valid."));
        assert!(!checker.check("P. S. S. Something."));
        assert!(!checker.check(""));
    }

    #[test]
    fn test_custom_marker_is_literal() {
        let checker = postscript("NB:");
        assert!(checker.check("Main text.\nnb: remember this"));
        assert!(!checker.check("Main text. NB remember"));

        let checker = postscript("(*)");
        assert!(checker.check("text (*) note"));
        assert!(!checker.check("text () note"));
    }

    #[test]
    fn test_blank_marker_is_invalid() {
        assert!(postscript("  ").validate().is_err());
        assert!(postscript("P.S.").validate().is_ok());
    }

    #[test]
    fn test_placeholder_count() {
        let checker = placeholders(2, Comparison::Exactly);
        assert!(checker.check("This is [one] and [two]."));
        assert!(checker.check("[a][b]"));
        assert!(!checker.check("This is [one]."));
        assert!(!checker.check("[a][b][c]"));
        assert!(!checker.check(""));

        assert!(placeholders(2, Comparison::AtLeast).check("[foo] [bar] [baz]"));
        assert!(placeholders(2, Comparison::AtMost).check("No placeholders here."));
        assert!(!placeholders(2, Comparison::AtMost).check("[a][b][c][d]"));
    }

    #[test]
    fn test_placeholder_does_not_span_lines() {
        assert!(placeholders(0, Comparison::Exactly).check("[open\nclose]"));
    }
}
