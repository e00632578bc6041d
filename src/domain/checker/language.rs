//! LANGUAGE group: Cyrillic / Greek script restriction

use std::ops::RangeInclusive;

use serde::Deserialize;

use super::format_checker::FormatChecker;
use super::kind::CheckerKind;

const CYRILLIC_BLOCKS: &[RangeInclusive<char>] = &[
    '\u{0400}'..='\u{04FF}',
    '\u{0500}'..='\u{052F}',
    '\u{2DE0}'..='\u{2DFF}',
    '\u{A640}'..='\u{A69F}',
];

const GREEK_BLOCKS: &[RangeInclusive<char>] = &['\u{0370}'..='\u{03FF}', '\u{1F00}'..='\u{1FFF}'];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Script {
    Cyrillic,
    Greek,
}

impl Script {
    fn blocks(&self) -> &'static [RangeInclusive<char>] {
        match self {
            Self::Cyrillic => CYRILLIC_BLOCKS,
            Self::Greek => GREEK_BLOCKS,
        }
    }

    fn display_name(&self) -> &'static str {
        match self {
            Self::Cyrillic => "Cyrillic",
            Self::Greek => "Greek",
        }
    }

    /// Every word character is an ASCII digit or sits in one of the script's blocks
    fn admits(&self, value: &str) -> bool {
        let blocks = self.blocks();

        value
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == '_')
            .all(|c| c.is_ascii_digit() || blocks.iter().any(|block| block.contains(&c)))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CyrillicGreekChecker {
    #[serde(default)]
    pub script: Option<Script>,
}

impl FormatChecker for CyrillicGreekChecker {
    fn kind(&self) -> CheckerKind {
        CheckerKind::CyrillicGreek
    }

    fn check(&self, value: &str) -> bool {
        match self.script {
            Some(script) => script.admits(value),
            None => Script::Cyrillic.admits(value) || Script::Greek.admits(value),
        }
    }

    fn description(&self) -> String {
        let script = match self.script {
            Some(script) => script.display_name(),
            None => "either Cyrillic or Greek",
        };

        format!(
            "The argument value must be written entirely in {} letters. No letters from other scripts are allowed.",
            script
        )
    }
}
