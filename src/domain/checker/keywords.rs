//! KEYWORDS group: keyword presence, keyword frequency and letter frequency

use serde::Deserialize;
use unicode_segmentation::UnicodeSegmentation;

use super::comparison::Comparison;
use super::format_checker::{plural, FormatChecker, InvalidParam};
use super::kind::CheckerKind;
use super::text::clean_and_split;

fn default_true() -> bool {
    true
}

/// Normalize a keyword the same way checked text is tokenized
fn normalize_keyword(field: &'static str, keyword: &str) -> Result<String, InvalidParam> {
    let mut words = clean_and_split(keyword, true);
    match (words.pop(), words.is_empty()) {
        (Some(word), true) => Ok(word),
        (None, _) => Err(InvalidParam::new(field, "keyword must not be blank")),
        (Some(_), false) => Err(InvalidParam::new(
            field,
            format!("keyword '{}' must be a single word", keyword),
        )),
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KeywordsPresenceChecker {
    pub list_of_keywords: Vec<String>,
    #[serde(default = "default_true")]
    pub must_include: bool,
}

impl FormatChecker for KeywordsPresenceChecker {
    fn kind(&self) -> CheckerKind {
        CheckerKind::KeywordsPresence
    }

    fn check(&self, value: &str) -> bool {
        let words = clean_and_split(value, true);

        self.list_of_keywords
            .iter()
            .all(|keyword| words.contains(keyword) == self.must_include)
    }

    fn description(&self) -> String {
        if self.must_include {
            format!(
                "The argument value must include the keywords: {:?}. Each keyword must appear at least once, in any order. Case does not matter.",
                self.list_of_keywords
            )
        } else {
            format!(
                "The argument value must not include the keywords: {:?}. None of these words should appear anywhere in the value. Case does not matter.",
                self.list_of_keywords
            )
        }
    }

    fn validate(&self) -> Result<(), InvalidParam> {
        if self.list_of_keywords.is_empty() {
            return Err(InvalidParam::new(
                "list_of_keywords",
                "at least one keyword is required",
            ));
        }

        for keyword in &self.list_of_keywords {
            normalize_keyword("list_of_keywords", keyword)?;
        }

        Ok(())
    }

    fn prepared(mut self) -> Self {
        self.list_of_keywords = self
            .list_of_keywords
            .iter()
            .map(|keyword| normalize_keyword("list_of_keywords", keyword).unwrap_or_default())
            .collect();
        self
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KeywordFrequencyChecker {
    pub keyword: String,
    #[serde(rename = "N", alias = "count")]
    pub n: usize,
    #[serde(default)]
    pub comparison_option: Comparison,
}

impl FormatChecker for KeywordFrequencyChecker {
    fn kind(&self) -> CheckerKind {
        CheckerKind::KeywordFrequency
    }

    fn check(&self, value: &str) -> bool {
        let count = clean_and_split(value, true)
            .iter()
            .filter(|word| **word == self.keyword)
            .count();

        self.comparison_option.compare(count, self.n)
    }

    fn description(&self) -> String {
        format!(
            "The argument value must contain the keyword '{}' {} {} time{}. The keyword must appear as a whole word. Case does not matter.",
            self.keyword,
            self.comparison_option,
            self.n,
            plural(self.n)
        )
    }

    fn validate(&self) -> Result<(), InvalidParam> {
        normalize_keyword("keyword", &self.keyword).map(|_| ())
    }

    fn prepared(mut self) -> Self {
        self.keyword = normalize_keyword("keyword", &self.keyword).unwrap_or_default();
        self
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LetterFrequencyChecker {
    pub letter: String,
    #[serde(rename = "N", alias = "count")]
    pub n: usize,
    #[serde(default)]
    pub comparison_option: Comparison,
    #[serde(default)]
    pub case_sensitive: bool,
}

impl FormatChecker for LetterFrequencyChecker {
    fn kind(&self) -> CheckerKind {
        CheckerKind::LetterFrequency
    }

    fn check(&self, value: &str) -> bool {
        let count = if self.case_sensitive {
            value.graphemes(true).filter(|g| *g == self.letter).count()
        } else {
            let letter = self.letter.to_lowercase();
            value
                .to_lowercase()
                .graphemes(true)
                .filter(|g| *g == letter)
                .count()
        };

        self.comparison_option.compare(count, self.n)
    }

    fn description(&self) -> String {
        let case_note = if self.case_sensitive {
            "Case matters."
        } else {
            "Case does not matter."
        };

        format!(
            "The argument value must contain the letter '{}' {} {} time{}. {}",
            self.letter,
            self.comparison_option,
            self.n,
            plural(self.n),
            case_note
        )
    }

    fn validate(&self) -> Result<(), InvalidParam> {
        if self.letter.graphemes(true).count() != 1 {
            return Err(InvalidParam::new(
                "letter",
                format!("'{}' must be exactly one character", self.letter),
            ));
        }

        if self.letter.trim().is_empty() {
            return Err(InvalidParam::new("letter", "letter must not be whitespace"));
        }

        Ok(())
    }
}
