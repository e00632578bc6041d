use std::fmt;

use serde::{Deserialize, Serialize};

/// How an observed count is compared with the target count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Comparison {
    #[default]
    #[serde(rename = "exactly")]
    Exactly,
    #[serde(rename = "at most")]
    AtMost,
    #[serde(rename = "at least")]
    AtLeast,
}

impl Comparison {
    pub fn compare(&self, observed: usize, target: usize) -> bool {
        match self {
            Self::Exactly => observed == target,
            Self::AtMost => observed <= target,
            Self::AtLeast => observed >= target,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exactly => "exactly",
            Self::AtMost => "at most",
            Self::AtLeast => "at least",
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
