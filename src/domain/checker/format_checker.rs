//! Checker trait and the bound form stored on a test case

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use super::kind::CheckerKind;
use super::text::nfc;

/// A parameter value that deserialized but breaks a checker constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidParam {
    pub field: &'static str,
    pub message: String,
}

impl InvalidParam {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Errors raised while binding parameters to a checker
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CheckerParamsError {
    #[error("Malformed parameters for {kind}: {message}")]
    Malformed { kind: CheckerKind, message: String },

    #[error("Invalid parameter '{field}' for {kind}: {message}")]
    InvalidField {
        kind: CheckerKind,
        field: String,
        message: String,
    },
}

impl CheckerParamsError {
    pub fn malformed(kind: CheckerKind, message: impl Into<String>) -> Self {
        Self::Malformed {
            kind,
            message: message.into(),
        }
    }

    pub fn invalid_field(kind: CheckerKind, param: InvalidParam) -> Self {
        Self::InvalidField {
            kind,
            field: param.field.to_string(),
            message: param.message,
        }
    }
}

/// A single formatting rule over one produced string
///
/// Implementations must be total and deterministic: every `&str` yields a
/// boolean, never a panic, and the same input always yields the same answer.
pub trait FormatChecker: Send + Sync + fmt::Debug {
    fn kind(&self) -> CheckerKind;

    fn check(&self, value: &str) -> bool;

    /// Instruction text shown to the model for this rule
    fn description(&self) -> String;

    /// Constraints serde cannot express on its own
    fn validate(&self) -> Result<(), InvalidParam> {
        Ok(())
    }

    /// Rewrite validated parameters into the form `check` compares against
    fn prepared(self) -> Self
    where
        Self: Sized,
    {
        self
    }
}

/// A checker bound to the parameter record it was built from
#[derive(Clone)]
pub struct BoundChecker {
    params: Value,
    inner: Arc<dyn FormatChecker>,
}

impl BoundChecker {
    pub(crate) fn new(params: Value, inner: Arc<dyn FormatChecker>) -> Self {
        Self { params, inner }
    }

    pub fn kind(&self) -> CheckerKind {
        self.inner.kind()
    }

    pub fn params(&self) -> &Value {
        &self.params
    }

    pub fn description(&self) -> String {
        self.inner.description()
    }

    /// Check a value after NFC normalization
    pub fn check(&self, value: &str) -> bool {
        self.inner.check(&nfc(value))
    }
}

impl fmt::Debug for BoundChecker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundChecker")
            .field("kind", &self.inner.kind())
            .field("params", &self.params)
            .finish()
    }
}

/// Plural suffix for instruction text
pub(crate) fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}
