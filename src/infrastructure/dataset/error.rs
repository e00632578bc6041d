use std::path::PathBuf;

use thiserror::Error;

use crate::domain::checker::UnknownCheckerKind;
use crate::domain::TestCaseValidationError;

/// Failures while turning a dataset into test cases
///
/// Every variant is fatal: a run never starts on a partially loaded dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Dataset path '{}' does not exist", path.display())]
    NotFound { path: PathBuf },

    #[error("No JSON files found in '{}'", path.display())]
    Empty { path: PathBuf },

    #[error("Failed to read '{}': {message}", path.display())]
    Io { path: PathBuf, message: String },

    #[error("Failed to parse '{source_name}': {message}")]
    Parse { source_name: String, message: String },

    #[error("Malformed record '{source_name}': {message}")]
    InvalidRecord { source_name: String, message: String },

    #[error("Record '{source_name}': {error}")]
    UnknownChecker {
        source_name: String,
        error: UnknownCheckerKind,
    },

    #[error("Test case '{id}': {error}")]
    InvalidCase {
        id: String,
        error: TestCaseValidationError,
    },

    #[error("Duplicate test case id '{id}'")]
    DuplicateId { id: String },
}

impl DatasetError {
    pub fn io(path: impl Into<PathBuf>, error: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: error.to_string(),
        }
    }

    pub fn parse(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    pub fn invalid_record(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidRecord {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    pub fn invalid_case(id: impl Into<String>, error: TestCaseValidationError) -> Self {
        Self::InvalidCase {
            id: id.into(),
            error,
        }
    }
}
