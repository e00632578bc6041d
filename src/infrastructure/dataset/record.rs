//! Dataset record shapes

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use super::DatasetError;
use crate::domain::{CheckerKind, FunctionSchema, TestCase, TestCaseId};

/// Benchmark record: one function, one formatting rule, several user queries
#[derive(Debug, Deserialize)]
pub struct BenchmarkRecord {
    pub fn_schema: FunctionSchema,
    #[serde(default, alias = "target_argument")]
    pub chosen_param: Option<String>,
    pub format: FormatSpec,
    #[serde(default)]
    pub user_queries: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct FormatSpec {
    pub name: String,
    #[serde(default)]
    pub args: Value,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub group: Option<String>,
}

/// One fully spelled-out test case
#[derive(Debug, Deserialize)]
pub struct FlatRecord {
    pub id: String,
    pub checker_kind: String,
    #[serde(default)]
    pub checker_params: Value,
    pub prompt_text: String,
    pub function_schema: FunctionSchema,
    #[serde(default)]
    pub target_argument: Option<String>,
}

#[derive(Debug)]
pub enum DatasetRecord {
    Benchmark(BenchmarkRecord),
    Flat(FlatRecord),
}

impl DatasetRecord {
    /// Pick the record shape by its distinguishing key
    pub fn from_value(source_name: &str, value: Value) -> Result<Self, DatasetError> {
        let Value::Object(ref map) = value else {
            return Err(DatasetError::invalid_record(source_name, "record must be a JSON object"));
        };

        let decode_err = |e: serde_json::Error| DatasetError::invalid_record(source_name, e.to_string());

        if map.contains_key("fn_schema") || map.contains_key("user_queries") {
            serde_json::from_value(value).map(Self::Benchmark).map_err(decode_err)
        } else if map.contains_key("checker_kind") {
            serde_json::from_value(value).map(Self::Flat).map_err(decode_err)
        } else {
            Err(DatasetError::invalid_record(
                source_name,
                "expected either `fn_schema`/`user_queries` or `checker_kind`",
            ))
        }
    }

    /// Expand into test cases; benchmark records yield one case per query
    pub fn into_cases(self, source_name: &str) -> Result<Vec<TestCase>, DatasetError> {
        match self {
            Self::Benchmark(record) => record.into_cases(source_name),
            Self::Flat(record) => record.into_case(source_name).map(|case| vec![case]),
        }
    }
}

fn parse_kind(source_name: &str, name: &str) -> Result<CheckerKind, DatasetError> {
    name.parse().map_err(|error| DatasetError::UnknownChecker {
        source_name: source_name.to_string(),
        error,
    })
}

impl BenchmarkRecord {
    fn into_cases(self, source_name: &str) -> Result<Vec<TestCase>, DatasetError> {
        let kind = parse_kind(source_name, &self.format.name)?;

        if let Some(group) = self.format.group.as_deref() {
            if !group.eq_ignore_ascii_case(kind.group().as_str()) {
                warn!(
                    source = source_name,
                    declared = group,
                    actual = kind.group().as_str(),
                    "Instruction group does not match checker kind"
                );
            }
        }

        if self.user_queries.is_empty() {
            warn!(source = source_name, "Record has no user queries");
        }

        self.user_queries
            .iter()
            .enumerate()
            .map(|(index, query)| {
                let id = format!("{}#{}", source_name, index);
                let case_id =
                    TestCaseId::new(id.clone()).map_err(|e| DatasetError::invalid_case(&id, e))?;
                TestCase::new(
                    case_id,
                    kind,
                    self.format.args.clone(),
                    query.as_str(),
                    self.fn_schema.clone(),
                    self.chosen_param.as_deref(),
                )
                .map_err(|e| DatasetError::invalid_case(id, e))
            })
            .collect()
    }
}

impl FlatRecord {
    fn into_case(self, source_name: &str) -> Result<TestCase, DatasetError> {
        let kind = parse_kind(source_name, &self.checker_kind)?;
        let id = TestCaseId::new(self.id.clone()).map_err(|e| DatasetError::invalid_case(source_name, e))?;

        TestCase::new(
            id,
            kind,
            self.checker_params,
            self.prompt_text,
            self.function_schema,
            self.target_argument.as_deref(),
        )
        .map_err(|e| DatasetError::invalid_case(self.id, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn benchmark() -> Value {
        json!({
            "fn_schema": {
                "name": "send_message",
                "description": "Send a chat message",
                "parameters": {
                    "type": "object",
                    "properties": {
                        "recipient": {"type": "string"},
                        "text": {"type": "string"}
                    }
                }
            },
            "chosen_param": "text",
            "format": {
                "name": "NCommasChecker",
                "args": {"N": 2},
                "description": "Use exactly 2 commas.",
                "group": "PUNCTUATION"
            },
            "user_queries": ["Tell Bob hi", "Tell Ann bye"]
        })
    }

    #[test]
    fn test_benchmark_record_expands_per_query() {
        let record = DatasetRecord::from_value("commas", benchmark()).unwrap();
        let cases = record.into_cases("commas").unwrap();

        assert_eq!(cases.len(), 2);
        assert_eq!(cases[0].id().as_str(), "commas#0");
        assert_eq!(cases[1].id().as_str(), "commas#1");
        assert_eq!(cases[1].prompt_text(), "Tell Ann bye");
        assert_eq!(cases[0].checker_kind(), CheckerKind::NCommas);
        assert_eq!(cases[0].target_argument(), "text");
        assert!(cases[0].checker().check("a, b, c"));
    }

    #[test]
    fn test_benchmark_record_unknown_checker() {
        let mut value = benchmark();
        value["format"]["name"] = json!("RhymeChecker");

        let err = DatasetRecord::from_value("x", value)
            .unwrap()
            .into_cases("x")
            .unwrap_err();
        assert!(matches!(err, DatasetError::UnknownChecker { .. }));
    }

    #[test]
    fn test_benchmark_record_bad_params() {
        let mut value = benchmark();
        value["format"]["args"] = json!({"N": "two"});

        let err = DatasetRecord::from_value("x", value)
            .unwrap()
            .into_cases("x")
            .unwrap_err();
        assert!(matches!(err, DatasetError::InvalidCase { ref id, .. } if id == "x#0"));
    }

    #[test]
    fn test_benchmark_record_without_chosen_param_needs_single_property() {
        let mut value = benchmark();
        value.as_object_mut().unwrap().remove("chosen_param");

        let err = DatasetRecord::from_value("x", value)
            .unwrap()
            .into_cases("x")
            .unwrap_err();
        assert!(matches!(err, DatasetError::InvalidCase { .. }));
    }

    #[test]
    fn test_flat_record() {
        let value = json!({
            "id": "lower-1",
            "checker_kind": "AllLowercaseChecker",
            "prompt_text": "post in lowercase",
            "function_schema": {
                "name": "post",
                "parameters": {"type": "object", "properties": {"body": {"type": "string"}}}
            }
        });

        let cases = DatasetRecord::from_value("flat", value)
            .unwrap()
            .into_cases("flat")
            .unwrap();

        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].id().as_str(), "lower-1");
        assert_eq!(cases[0].target_argument(), "body");
    }

    #[test]
    fn test_unrecognised_shape() {
        let err = DatasetRecord::from_value("x", json!({"prompt": "hi"})).unwrap_err();
        assert!(matches!(err, DatasetError::InvalidRecord { .. }));

        let err = DatasetRecord::from_value("x", json!([1, 2])).unwrap_err();
        assert!(matches!(err, DatasetError::InvalidRecord { .. }));
    }

    #[test]
    fn test_missing_format_is_invalid() {
        let mut value = benchmark();
        value.as_object_mut().unwrap().remove("format");

        let err = DatasetRecord::from_value("x", value).unwrap_err();
        assert!(matches!(err, DatasetError::InvalidRecord { .. }));
    }
}
