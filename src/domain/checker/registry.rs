//! Catalog of checker kinds with their parameter schemas and constructors

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use super::case::{AllLowercaseChecker, AllUppercaseChecker, NAllCapitalWordsChecker};
use super::content::{PlaceholderCountChecker, PostscriptChecker};
use super::format::{
    HighlightedSectionsCountChecker, JsonFormatChecker, PythonListFormatChecker,
    SpacesInBetweenChecker, TitleFormatChecker,
};
use super::format_checker::{BoundChecker, CheckerParamsError, FormatChecker};
use super::keywords::{KeywordFrequencyChecker, KeywordsPresenceChecker, LetterFrequencyChecker};
use super::kind::{CheckerKind, InstructionGroup};
use super::language::CyrillicGreekChecker;
use super::length::{SentenceCountChecker, WordCountChecker};
use super::punctuation::NCommasChecker;
use super::schema::{ParamField, ParamType, COMPARISON_FIELD, COUNT_FIELDS, N_FIELD};
use super::start_end::{EndPhraseChecker, QuotationChecker};
use super::text::nfc_value;

type BuildFn = fn(CheckerKind, Value) -> Result<Arc<dyn FormatChecker>, CheckerParamsError>;

const NO_FIELDS: &[ParamField] = &[];

const KEYWORDS_PRESENCE_FIELDS: &[ParamField] = &[
    ParamField::required("list_of_keywords", ParamType::StringList),
    ParamField::optional("must_include", ParamType::Boolean, "true"),
];

const KEYWORD_FREQUENCY_FIELDS: &[ParamField] = &[
    ParamField::required("keyword", ParamType::String),
    N_FIELD,
    COMPARISON_FIELD,
];

const LETTER_FREQUENCY_FIELDS: &[ParamField] = &[
    ParamField::required("letter", ParamType::String),
    N_FIELD,
    COMPARISON_FIELD,
    ParamField::optional("case_sensitive", ParamType::Boolean, "false"),
];

const CYRILLIC_GREEK_FIELDS: &[ParamField] = &[ParamField::optional(
    "script",
    ParamType::Choice(&["cyrillic", "greek"]),
    "either",
)];

const POSTSCRIPT_FIELDS: &[ParamField] =
    &[ParamField::required("postscript_marker", ParamType::String)];

const SPACES_FIELDS: &[ParamField] = &[ParamField::optional("N", ParamType::Integer, "1")];

const TITLE_FIELDS: &[ParamField] = &[
    ParamField::optional("open", ParamType::String, "<<"),
    ParamField::optional("close", ParamType::String, ">>"),
];

const JSON_FIELDS: &[ParamField] = &[ParamField::optional(
    "shape",
    ParamType::Choice(&["any", "object", "array"]),
    "any",
)];

const END_PHRASE_FIELDS: &[ParamField] = &[ParamField::required("end_phrase", ParamType::String)];

const QUOTATION_FIELDS: &[ParamField] = &[ParamField::optional(
    "quotation_type",
    ParamType::Choice(&["single", "double"]),
    "double",
)];

/// Catalog entry as listed to users
#[derive(Debug, Clone, Serialize)]
pub struct CheckerEntry {
    pub kind: CheckerKind,
    pub group: &'static str,
    pub params: &'static [ParamField],
}

/// Deserialize a parameter record into `C` and run its extra validation
fn bind<C>(kind: CheckerKind, params: Value) -> Result<Arc<dyn FormatChecker>, CheckerParamsError>
where
    C: FormatChecker + DeserializeOwned + 'static,
{
    let checker: C = serde_json::from_value(params)
        .map_err(|e| CheckerParamsError::malformed(kind, e.to_string()))?;

    checker
        .validate()
        .map_err(|e| CheckerParamsError::invalid_field(kind, e))?;

    Ok(Arc::new(checker.prepared()))
}

struct Entry {
    params: &'static [ParamField],
    build: BuildFn,
}

fn entry(kind: CheckerKind) -> Entry {
    match kind {
        CheckerKind::KeywordsPresence => Entry {
            params: KEYWORDS_PRESENCE_FIELDS,
            build: bind::<KeywordsPresenceChecker>,
        },
        CheckerKind::KeywordFrequency => Entry {
            params: KEYWORD_FREQUENCY_FIELDS,
            build: bind::<KeywordFrequencyChecker>,
        },
        CheckerKind::LetterFrequency => Entry {
            params: LETTER_FREQUENCY_FIELDS,
            build: bind::<LetterFrequencyChecker>,
        },
        CheckerKind::CyrillicGreek => Entry {
            params: CYRILLIC_GREEK_FIELDS,
            build: bind::<CyrillicGreekChecker>,
        },
        CheckerKind::WordCount => Entry {
            params: COUNT_FIELDS,
            build: bind::<WordCountChecker>,
        },
        CheckerKind::SentenceCount => Entry {
            params: COUNT_FIELDS,
            build: bind::<SentenceCountChecker>,
        },
        CheckerKind::Postscript => Entry {
            params: POSTSCRIPT_FIELDS,
            build: bind::<PostscriptChecker>,
        },
        CheckerKind::PlaceholderCount => Entry {
            params: COUNT_FIELDS,
            build: bind::<PlaceholderCountChecker>,
        },
        CheckerKind::SpacesInBetween => Entry {
            params: SPACES_FIELDS,
            build: bind::<SpacesInBetweenChecker>,
        },
        CheckerKind::TitleFormat => Entry {
            params: TITLE_FIELDS,
            build: bind::<TitleFormatChecker>,
        },
        CheckerKind::HighlightedSectionsCount => Entry {
            params: COUNT_FIELDS,
            build: bind::<HighlightedSectionsCountChecker>,
        },
        CheckerKind::JsonFormat => Entry {
            params: JSON_FIELDS,
            build: bind::<JsonFormatChecker>,
        },
        CheckerKind::PythonListFormat => Entry {
            params: NO_FIELDS,
            build: bind::<PythonListFormatChecker>,
        },
        CheckerKind::AllUppercase => Entry {
            params: NO_FIELDS,
            build: bind::<AllUppercaseChecker>,
        },
        CheckerKind::AllLowercase => Entry {
            params: NO_FIELDS,
            build: bind::<AllLowercaseChecker>,
        },
        CheckerKind::NAllCapitalWords => Entry {
            params: COUNT_FIELDS,
            build: bind::<NAllCapitalWordsChecker>,
        },
        CheckerKind::EndPhrase => Entry {
            params: END_PHRASE_FIELDS,
            build: bind::<EndPhraseChecker>,
        },
        CheckerKind::Quotation => Entry {
            params: QUOTATION_FIELDS,
            build: bind::<QuotationChecker>,
        },
        CheckerKind::NCommas => Entry {
            params: COUNT_FIELDS,
            build: bind::<NCommasChecker>,
        },
    }
}

/// Fixed registry of all formatting checkers
pub struct CheckerRegistry;

impl CheckerRegistry {
    pub fn params(kind: CheckerKind) -> &'static [ParamField] {
        entry(kind).params
    }

    pub fn group(kind: CheckerKind) -> InstructionGroup {
        kind.group()
    }

    pub fn entries() -> Vec<CheckerEntry> {
        CheckerKind::ALL
            .iter()
            .map(|kind| CheckerEntry {
                kind: *kind,
                group: kind.group().as_str(),
                params: Self::params(*kind),
            })
            .collect()
    }

    /// Validate `params` against the kind and bind them to a checker
    ///
    /// `null` is treated as an empty record. Anything other than an object
    /// is rejected. String parameters are NFC-normalized, matching the
    /// normalization applied to checked values.
    pub fn build(kind: CheckerKind, params: &Value) -> Result<BoundChecker, CheckerParamsError> {
        let record = match params {
            Value::Null => Value::Object(Map::new()),
            Value::Object(_) => nfc_value(params),
            other => {
                return Err(CheckerParamsError::malformed(
                    kind,
                    format!("expected an object, got {}", other),
                ));
            }
        };

        let checker = (entry(kind).build)(kind, record.clone())?;

        Ok(BoundChecker::new(record, checker))
    }
}

/// Compile every shared pattern up front
pub fn warm_up() {
    super::sentence::warm_up();
    super::length::warm_up();
    super::content::warm_up();
    super::format::warm_up();
}
