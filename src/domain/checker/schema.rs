//! Parameter schemas advertised by the registry

use serde::Serialize;

/// Type of a checker parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamType {
    Integer,
    Boolean,
    String,
    StringList,
    Choice(&'static [&'static str]),
}

impl std::fmt::Display for ParamType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer => write!(f, "integer"),
            Self::Boolean => write!(f, "boolean"),
            Self::String => write!(f, "string"),
            Self::StringList => write!(f, "list of strings"),
            Self::Choice(options) => write!(f, "one of {}", options.join(" | ")),
        }
    }
}

/// One field of a checker parameter record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParamField {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub param_type: ParamType,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<&'static str>,
}

impl ParamField {
    pub const fn required(name: &'static str, param_type: ParamType) -> Self {
        Self {
            name,
            param_type,
            required: true,
            default: None,
        }
    }

    pub const fn optional(name: &'static str, param_type: ParamType, default: &'static str) -> Self {
        Self {
            name,
            param_type,
            required: false,
            default: Some(default),
        }
    }
}

pub const COMPARISON_OPTIONS: &[&str] = &["exactly", "at most", "at least"];

pub const N_FIELD: ParamField = ParamField::required("N", ParamType::Integer);

pub const COMPARISON_FIELD: ParamField = ParamField::optional(
    "comparison_option",
    ParamType::Choice(COMPARISON_OPTIONS),
    "exactly",
);

pub const COUNT_FIELDS: &[ParamField] = &[N_FIELD, COMPARISON_FIELD];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_serialization() {
        let json = serde_json::to_value(COMPARISON_FIELD).unwrap();
        assert_eq!(json["name"], "comparison_option");
        assert_eq!(json["required"], false);
        assert_eq!(json["default"], "exactly");
        assert_eq!(json["type"]["choice"][1], "at most");
    }

    #[test]
    fn test_type_display() {
        assert_eq!(ParamType::StringList.to_string(), "list of strings");
        assert_eq!(
            ParamType::Choice(&["single", "double"]).to_string(),
            "one of single | double"
        );
    }
}
