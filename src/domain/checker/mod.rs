//! Checker domain - Formatting rules applied to produced argument values

mod case;
mod comparison;
mod content;
mod format;
mod format_checker;
mod keywords;
mod kind;
mod language;
mod length;
mod punctuation;
mod python_literal;
mod registry;
mod schema;
mod sentence;
mod start_end;
mod text;

pub use case::{AllLowercaseChecker, AllUppercaseChecker, NAllCapitalWordsChecker};
pub use comparison::Comparison;
pub use content::{PlaceholderCountChecker, PostscriptChecker};
pub use format::{
    count_highlighted_sections, HighlightedSectionsCountChecker, JsonFormatChecker, JsonShape,
    PythonListFormatChecker, SpacesInBetweenChecker, TitleFormatChecker,
};
pub use format_checker::{BoundChecker, CheckerParamsError, FormatChecker, InvalidParam};
pub use keywords::{KeywordFrequencyChecker, KeywordsPresenceChecker, LetterFrequencyChecker};
pub use kind::{CheckerKind, InstructionGroup, UnknownCheckerKind};
pub use language::{CyrillicGreekChecker, Script};
pub use length::{SentenceCountChecker, WordCountChecker};
pub use punctuation::NCommasChecker;
pub use python_literal::is_string_list_literal;
pub use registry::{warm_up, CheckerEntry, CheckerRegistry};
pub use schema::{ParamField, ParamType};
pub use sentence::extract_sentences;
pub use start_end::{EndPhraseChecker, QuotationChecker, QuotationType};
pub use text::{clean_and_split, nfc};
