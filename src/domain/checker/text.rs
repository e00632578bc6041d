//! Text helpers shared by the checkers

use std::borrow::Cow;

use serde_json::Value;
use unicode_normalization::{is_nfc, UnicodeNormalization};

/// NFC-normalize a value, borrowing when it is already normalized
pub fn nfc(value: &str) -> Cow<'_, str> {
    if is_nfc(value) {
        Cow::Borrowed(value)
    } else {
        Cow::Owned(value.nfc().collect())
    }
}

/// NFC-normalize every string inside a JSON value, keys included
pub fn nfc_value(value: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(nfc(s).into_owned()),
        Value::Array(items) => Value::Array(items.iter().map(nfc_value).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, item)| (nfc(key).into_owned(), nfc_value(item)))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Replace ASCII punctuation with spaces and split on whitespace
pub fn clean_and_split(text: &str, lower: bool) -> Vec<String> {
    let cleaned: String = text
        .chars()
        .map(|c| if c.is_ascii_punctuation() { ' ' } else { c })
        .collect();

    let cleaned = if lower {
        cleaned.to_lowercase()
    } else {
        cleaned
    };

    cleaned.split_whitespace().map(str::to_string).collect()
}

/// True if the text has at least one cased character and none of them is lower-case
pub fn is_upper(text: &str) -> bool {
    let mut cased = false;

    for c in text.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            cased = true;
        }
    }

    cased
}

/// True if the text has at least one cased character and none of them is upper-case
pub fn is_lower(text: &str) -> bool {
    let mut cased = false;

    for c in text.chars() {
        if c.is_uppercase() {
            return false;
        }
        if c.is_lowercase() {
            cased = true;
        }
    }

    cased
}

/// Strip a leading markdown code fence (with an optional language tag) and a trailing one
pub fn strip_code_fence<'a>(value: &'a str, languages: &[&str]) -> &'a str {
    let mut value = value.trim();

    if let Some(rest) = value.strip_prefix("```") {
        value = languages
            .iter()
            .find_map(|lang| rest.strip_prefix(lang))
            .unwrap_or(rest);
    }

    if let Some(rest) = value.strip_suffix("```") {
        value = rest;
    }

    value.trim()
}
