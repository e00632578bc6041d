//! DETECTABLE FORMAT group: spacing, titles, highlights, JSON and Python lists

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use super::comparison::Comparison;
use super::format_checker::{plural, FormatChecker, InvalidParam};
use super::kind::CheckerKind;
use super::python_literal::is_string_list_literal;
use super::text::strip_code_fence;

static BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\*\*.*?\*\*").unwrap());

static ITALIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\*.*?\*").unwrap());

pub(crate) fn warm_up() {
    Lazy::force(&BOLD);
    Lazy::force(&ITALIC);
}

fn default_spaces() -> usize {
    1
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpacesInBetweenChecker {
    #[serde(rename = "N", alias = "count", default = "default_spaces")]
    pub n: usize,
}

impl FormatChecker for SpacesInBetweenChecker {
    fn kind(&self) -> CheckerKind {
        CheckerKind::SpacesInBetween
    }

    fn check(&self, value: &str) -> bool {
        if value.is_empty() {
            return true;
        }

        if value != value.trim() {
            return false;
        }

        let separator = " ".repeat(self.n);

        value
            .split(separator.as_str())
            .all(|part| !part.is_empty() && !part.chars().any(char::is_whitespace))
    }

    fn description(&self) -> String {
        format!(
            "The argument value must use exactly {n} consecutive space{s} between every pair of words. Only {n} space{s} in a row {verb} allowed in the string.",
            n = self.n,
            s = plural(self.n),
            verb = if self.n == 1 { "is" } else { "are" }
        )
    }

    fn validate(&self) -> Result<(), InvalidParam> {
        if self.n == 0 {
            return Err(InvalidParam::new("N", "must be at least 1"));
        }
        Ok(())
    }
}

fn default_open() -> String {
    "<<".to_string()
}

fn default_close() -> String {
    ">>".to_string()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TitleFormatChecker {
    #[serde(default = "default_open")]
    pub open: String,
    #[serde(default = "default_close")]
    pub close: String,
}

impl Default for TitleFormatChecker {
    fn default() -> Self {
        Self {
            open: default_open(),
            close: default_close(),
        }
    }
}

impl TitleFormatChecker {
    /// Widest delimited span on a line: first opener to last closer
    fn title_on_line<'a>(&self, line: &'a str) -> Option<&'a str> {
        let start = line.find(&self.open)?;
        let content_start = start + self.open.len();
        let end = line.rfind(&self.close)?;

        if end <= content_start {
            return None;
        }

        Some(&line[start..end + self.close.len()])
    }

    fn has_content(&self, title: &str) -> bool {
        title
            .strip_prefix(self.open.as_str())
            .and_then(|rest| rest.strip_suffix(self.close.as_str()))
            .is_some_and(|content| !content.trim().is_empty())
    }
}

impl FormatChecker for TitleFormatChecker {
    fn kind(&self) -> CheckerKind {
        CheckerKind::TitleFormat
    }

    fn check(&self, value: &str) -> bool {
        value
            .split('\n')
            .filter_map(|line| self.title_on_line(line))
            .any(|title| self.has_content(title))
    }

    fn description(&self) -> String {
        format!(
            "The argument value must contain a title wrapped in {open}{close}, such as {open}poem of joy{close} (everything except for the title is allowed).",
            open = self.open,
            close = self.close
        )
    }

    fn validate(&self) -> Result<(), InvalidParam> {
        for (field, delimiter) in [("open", &self.open), ("close", &self.close)] {
            if delimiter.trim().is_empty() || delimiter.contains('\n') {
                return Err(InvalidParam::new(
                    field,
                    "delimiter must be non-blank and single-line",
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HighlightedSectionsCountChecker {
    #[serde(rename = "N", alias = "count")]
    pub n: usize,
    #[serde(default)]
    pub comparison_option: Comparison,
}

/// Non-empty `**bold**` spans plus non-empty `*italic*` spans outside them
pub fn count_highlighted_sections(value: &str) -> usize {
    let bold = BOLD
        .find_iter(value)
        .filter(|m| !m.as_str()[2..m.len() - 2].trim().is_empty())
        .count();

    let remainder = BOLD.replace_all(value, "");

    let italic = ITALIC
        .find_iter(&remainder)
        .filter(|m| !m.as_str()[1..m.len() - 1].trim().is_empty())
        .count();

    bold + italic
}

impl FormatChecker for HighlightedSectionsCountChecker {
    fn kind(&self) -> CheckerKind {
        CheckerKind::HighlightedSectionsCount
    }

    fn check(&self, value: &str) -> bool {
        self.comparison_option
            .compare(count_highlighted_sections(value), self.n)
    }

    fn description(&self) -> String {
        format!(
            "The argument value must contain {} {} section{} highlighted using markdown syntax (e.g., *highlighted section* or **highlighted section**). Each section must not be empty.",
            self.comparison_option,
            self.n,
            plural(self.n)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonShape {
    #[default]
    Any,
    Object,
    Array,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JsonFormatChecker {
    #[serde(default)]
    pub shape: JsonShape,
}

impl FormatChecker for JsonFormatChecker {
    fn kind(&self) -> CheckerKind {
        CheckerKind::JsonFormat
    }

    fn check(&self, value: &str) -> bool {
        let body = strip_code_fence(value, &["json", "Json", "JSON"]);

        match serde_json::from_str::<Value>(body) {
            Ok(parsed) => match self.shape {
                JsonShape::Any => true,
                JsonShape::Object => parsed.is_object(),
                JsonShape::Array => parsed.is_array(),
            },
            Err(_) => false,
        }
    }

    fn description(&self) -> String {
        let what = match self.shape {
            JsonShape::Any => "valid JSON",
            JsonShape::Object => "a valid JSON object",
            JsonShape::Array => "a valid JSON array",
        };
        format!(
            "The argument value must be {}. The JSON must be syntactically correct and parseable.",
            what
        )
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PythonListFormatChecker {}

impl FormatChecker for PythonListFormatChecker {
    fn kind(&self) -> CheckerKind {
        CheckerKind::PythonListFormat
    }

    fn check(&self, value: &str) -> bool {
        let body = strip_code_fence(value, &["python", "Python", "PYTHON"]);
        is_string_list_literal(body)
    }

    fn description(&self) -> String {
        "The argument value must be a valid python list of strings. The list must be syntactically correct and parseable with ast.literal_eval().".to_string()
    }
}
