use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::llm::{LlmResponse, ToolCall};

/// A normalized tool invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub function_name: String,
    pub arguments: Map<String, Value>,
}

impl FunctionCall {
    pub fn new(function_name: impl Into<String>, arguments: Map<String, Value>) -> Self {
        Self {
            id: None,
            function_name: function_name.into(),
            arguments,
        }
    }

    pub fn argument(&self, name: &str) -> Option<&Value> {
        self.arguments.get(name)
    }
}

impl From<ToolCall> for FunctionCall {
    /// Arguments that are not a JSON object normalize to an empty map
    fn from(call: ToolCall) -> Self {
        let arguments = match call.arguments {
            Value::Object(map) => map,
            Value::String(raw) => match serde_json::from_str::<Value>(&raw) {
                Ok(Value::Object(map)) => map,
                _ => Map::new(),
            },
            _ => Map::new(),
        };

        Self {
            id: call.id,
            function_name: call.name,
            arguments,
        }
    }
}

/// What the model produced for one request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ModelOutput {
    /// The model answered without calling any function
    NoCall { content: Option<String> },
    /// One or more calls; never empty
    Calls { calls: Vec<FunctionCall> },
}

impl ModelOutput {
    pub fn from_response(response: LlmResponse) -> Self {
        if response.tool_calls.is_empty() {
            return Self::NoCall {
                content: response.content,
            };
        }

        Self::Calls {
            calls: response.tool_calls.into_iter().map(FunctionCall::from).collect(),
        }
    }

    pub fn calls(&self) -> &[FunctionCall] {
        match self {
            Self::NoCall { .. } => &[],
            Self::Calls { calls } => calls,
        }
    }

    pub fn is_call(&self) -> bool {
        matches!(self, Self::Calls { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_no_tool_calls_is_explicit_no_call() {
        let response = LlmResponse::new("r", "m").with_content("Which city?");
        let output = ModelOutput::from_response(response);

        assert_eq!(
            output,
            ModelOutput::NoCall {
                content: Some("Which city?".to_string())
            }
        );
        assert!(output.calls().is_empty());
    }

    #[test]
    fn test_calls_keep_order_and_arguments() {
        let response = LlmResponse::new("r", "m")
            .with_tool_call(ToolCall::new("a", json!({"text": "one"})).with_id("c1"))
            .with_tool_call(ToolCall::new("b", json!({"text": "two"})));

        let output = ModelOutput::from_response(response);
        let calls = output.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].id.as_deref(), Some("c1"));
        assert_eq!(calls[1].function_name, "b");
        assert_eq!(calls[1].argument("text"), Some(&json!("two")));
    }

    #[test]
    fn test_non_object_arguments_become_empty() {
        let garbled = FunctionCall::from(ToolCall::new("f", json!("not json")));
        assert!(garbled.arguments.is_empty());

        let list = FunctionCall::from(ToolCall::new("f", json!([1, 2])));
        assert!(list.arguments.is_empty());

        let encoded = FunctionCall::from(ToolCall::new("f", json!("{\"text\": \"x\"}")));
        assert_eq!(encoded.argument("text"), Some(&json!("x")));
    }
}
