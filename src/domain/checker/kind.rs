use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Instruction group a checker belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InstructionGroup {
    Keywords,
    Language,
    LengthConstraints,
    DetectableContent,
    DetectableFormat,
    Case,
    StartEnd,
    Punctuation,
}

impl InstructionGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Keywords => "KEYWORDS",
            Self::Language => "LANGUAGE",
            Self::LengthConstraints => "LENGTH CONSTRAINTS",
            Self::DetectableContent => "DETECTABLE CONTENT",
            Self::DetectableFormat => "DETECTABLE FORMAT",
            Self::Case => "CASE",
            Self::StartEnd => "START_END",
            Self::Punctuation => "PUNCTUATION",
        }
    }
}

impl fmt::Display for InstructionGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Closed set of formatting rules a test case can be bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CheckerKind {
    KeywordsPresence,
    KeywordFrequency,
    LetterFrequency,
    CyrillicGreek,
    WordCount,
    SentenceCount,
    Postscript,
    PlaceholderCount,
    SpacesInBetween,
    TitleFormat,
    HighlightedSectionsCount,
    JsonFormat,
    PythonListFormat,
    AllUppercase,
    AllLowercase,
    NAllCapitalWords,
    EndPhrase,
    Quotation,
    NCommas,
}

impl CheckerKind {
    pub const ALL: [CheckerKind; 19] = [
        Self::KeywordsPresence,
        Self::KeywordFrequency,
        Self::LetterFrequency,
        Self::CyrillicGreek,
        Self::WordCount,
        Self::SentenceCount,
        Self::Postscript,
        Self::PlaceholderCount,
        Self::SpacesInBetween,
        Self::TitleFormat,
        Self::HighlightedSectionsCount,
        Self::JsonFormat,
        Self::PythonListFormat,
        Self::AllUppercase,
        Self::AllLowercase,
        Self::NAllCapitalWords,
        Self::EndPhrase,
        Self::Quotation,
        Self::NCommas,
    ];

    /// Dataset name of the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::KeywordsPresence => "KeywordsPresenceChecker",
            Self::KeywordFrequency => "KeywordFrequencyChecker",
            Self::LetterFrequency => "LetterFrequencyChecker",
            Self::CyrillicGreek => "CyrillicGreekChecker",
            Self::WordCount => "WordCountChecker",
            Self::SentenceCount => "SentenceCountChecker",
            Self::Postscript => "PostscriptChecker",
            Self::PlaceholderCount => "PlaceholderCountChecker",
            Self::SpacesInBetween => "SpacesInBetweenChecker",
            Self::TitleFormat => "TitleFormatChecker",
            Self::HighlightedSectionsCount => "HighlightedSectionsCountChecker",
            Self::JsonFormat => "JsonFormatChecker",
            Self::PythonListFormat => "PythonListFormatChecker",
            Self::AllUppercase => "AllUppercaseChecker",
            Self::AllLowercase => "AllLowercaseChecker",
            Self::NAllCapitalWords => "NAllCapitalWordsChecker",
            Self::EndPhrase => "EndPhraseChecker",
            Self::Quotation => "QuotationChecker",
            Self::NCommas => "NCommasChecker",
        }
    }

    pub fn group(&self) -> InstructionGroup {
        match self {
            Self::KeywordsPresence | Self::KeywordFrequency | Self::LetterFrequency => {
                InstructionGroup::Keywords
            }
            Self::CyrillicGreek => InstructionGroup::Language,
            Self::WordCount | Self::SentenceCount => InstructionGroup::LengthConstraints,
            Self::Postscript | Self::PlaceholderCount => InstructionGroup::DetectableContent,
            Self::SpacesInBetween
            | Self::TitleFormat
            | Self::HighlightedSectionsCount
            | Self::JsonFormat
            | Self::PythonListFormat => InstructionGroup::DetectableFormat,
            Self::AllUppercase | Self::AllLowercase | Self::NAllCapitalWords => {
                InstructionGroup::Case
            }
            Self::EndPhrase | Self::Quotation => InstructionGroup::StartEnd,
            Self::NCommas => InstructionGroup::Punctuation,
        }
    }
}

impl fmt::Display for CheckerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown checker kind '{0}'")]
pub struct UnknownCheckerKind(pub String);

impl FromStr for CheckerKind {
    type Err = UnknownCheckerKind;

    /// Accepts the exact dataset name, or the name without the `Checker` suffix in any case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        if let Some(kind) = Self::ALL.iter().find(|k| k.as_str() == trimmed) {
            return Ok(*kind);
        }

        let short = trimmed.to_ascii_lowercase();
        let short = short.strip_suffix("checker").unwrap_or(&short);

        Self::ALL
            .iter()
            .find(|k| {
                k.as_str()
                    .trim_end_matches("Checker")
                    .eq_ignore_ascii_case(short)
            })
            .copied()
            .ok_or_else(|| UnknownCheckerKind(s.to_string()))
    }
}

impl Serialize for CheckerKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CheckerKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}
