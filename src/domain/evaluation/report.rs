use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Verdict;
use crate::domain::storage::{StorageEntity, StorageKey};

/// Run identifier: `<YYYYmmdd_HHMMSS>_<provider>_<model>`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(String);

impl RunId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn generate(started_at: DateTime<Utc>, provider: &str, model: &str) -> Self {
        Self(format!(
            "{}_{}_{}",
            started_at.format("%Y%m%d_%H%M%S"),
            sanitize(provider),
            sanitize(model)
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Keep the id usable as a file stem
fn sanitize(part: &str) -> String {
    part.chars()
        .map(|c| match c {
            '/' | '\\' | ' ' | ':' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StorageKey for RunId {
    fn as_str(&self) -> &str {
        &self.0
    }
}

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RunStatus {
    Completed,
    Cancelled,
    Aborted { reason: String },
}

impl RunStatus {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Completed => write!(f, "completed"),
            Self::Cancelled => write!(f, "cancelled"),
            Self::Aborted { reason } => write!(f, "aborted: {}", reason),
        }
    }
}

/// Verdicts of one run in dataset order, plus run metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub id: RunId,
    pub provider: String,
    pub model: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub status: RunStatus,
    pub total_cases: usize,
    pub verdicts: Vec<Verdict>,
}

impl RunReport {
    /// Cases dispatched but without a verdict
    pub fn missing_cases(&self) -> usize {
        self.total_cases.saturating_sub(self.verdicts.len())
    }

    pub fn is_partial(&self) -> bool {
        self.missing_cases() > 0
    }
}

impl StorageEntity for RunReport {
    type Key = RunId;

    fn key(&self) -> &Self::Key {
        &self.id
    }
}
