//! Test case entity and related types

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::validation::{resolve_target_argument, validate_function_schema, TestCaseValidationError};
use crate::domain::checker::{BoundChecker, CheckerKind, CheckerRegistry, InstructionGroup};
use crate::domain::llm::FunctionSchema;

/// Test case identifier, `<source>#<index>` for dataset-loaded cases
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TestCaseId(String);

impl TestCaseId {
    pub fn new(id: impl Into<String>) -> Result<Self, TestCaseValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(TestCaseValidationError::IdRequired);
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TestCaseId {
    type Error = TestCaseValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TestCaseId> for String {
    fn from(id: TestCaseId) -> Self {
        id.0
    }
}

impl std::fmt::Display for TestCaseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One benchmark item: a prompt, the function the model must call, and the
/// formatting rule the target argument must satisfy
#[derive(Debug, Clone, Serialize)]
pub struct TestCase {
    id: TestCaseId,
    checker_kind: CheckerKind,
    checker_params: Value,
    prompt_text: String,
    function_schema: FunctionSchema,
    target_argument: String,
    #[serde(skip)]
    checker: BoundChecker,
}

impl TestCase {
    /// Validate every field and bind the checker
    pub fn new(
        id: TestCaseId,
        checker_kind: CheckerKind,
        checker_params: Value,
        prompt_text: impl Into<String>,
        function_schema: FunctionSchema,
        target_argument: Option<&str>,
    ) -> Result<Self, TestCaseValidationError> {
        let prompt_text = prompt_text.into();
        if prompt_text.trim().is_empty() {
            return Err(TestCaseValidationError::PromptRequired);
        }

        validate_function_schema(&function_schema)?;
        let target_argument = resolve_target_argument(&function_schema, target_argument)?;
        let checker = CheckerRegistry::build(checker_kind, &checker_params)?;

        Ok(Self {
            id,
            checker_kind,
            checker_params: checker.params().clone(),
            prompt_text,
            function_schema,
            target_argument,
            checker,
        })
    }

    pub fn id(&self) -> &TestCaseId {
        &self.id
    }

    pub fn checker_kind(&self) -> CheckerKind {
        self.checker_kind
    }

    pub fn group(&self) -> InstructionGroup {
        self.checker_kind.group()
    }

    pub fn checker_params(&self) -> &Value {
        &self.checker_params
    }

    pub fn prompt_text(&self) -> &str {
        &self.prompt_text
    }

    pub fn function_schema(&self) -> &FunctionSchema {
        &self.function_schema
    }

    pub fn target_argument(&self) -> &str {
        &self.target_argument
    }

    pub fn checker(&self) -> &BoundChecker {
        &self.checker
    }

    #[cfg(test)]
    pub(crate) fn with_checker(mut self, checker: BoundChecker) -> Self {
        self.checker = checker;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::checker::CheckerParamsError;
    use serde_json::json;

    fn post_schema() -> FunctionSchema {
        FunctionSchema::new(
            "publish_post",
            "Publish a blog post",
            json!({
                "type": "object",
                "properties": {"text": {"type": "string", "description": "Post body"}},
                "required": ["text"]
            }),
        )
    }

    fn id(s: &str) -> TestCaseId {
        TestCaseId::new(s).unwrap()
    }

    #[test]
    fn test_test_case_id_validation() {
        assert!(TestCaseId::new("posts.json#0").is_ok());
        assert_eq!(TestCaseId::new(""), Err(TestCaseValidationError::IdRequired));
        assert_eq!(TestCaseId::new("   "), Err(TestCaseValidationError::IdRequired));
    }

    #[test]
    fn test_test_case_id_serde() {
        let parsed: TestCaseId = serde_json::from_str("\"a#1\"").unwrap();
        assert_eq!(parsed.as_str(), "a#1");
        assert!(serde_json::from_str::<TestCaseId>("\"\"").is_err());
    }

    #[test]
    fn test_new_binds_checker() {
        let case = TestCase::new(
            id("posts.json#0"),
            CheckerKind::NCommas,
            json!({"N": 2}),
            "Write a post with two commas",
            post_schema(),
            None,
        )
        .unwrap();

        assert_eq!(case.target_argument(), "text");
        assert_eq!(case.checker_kind(), CheckerKind::NCommas);
        assert_eq!(case.group(), InstructionGroup::Punctuation);
        assert!(case.checker().check("a, b, c"));
        assert!(!case.checker().check("a, b"));
    }

    #[test]
    fn test_new_rejects_invalid_params() {
        let err = TestCase::new(
            id("posts.json#0"),
            CheckerKind::NCommas,
            json!({"N": "two"}),
            "Write a post",
            post_schema(),
            Some("text"),
        )
        .unwrap_err();

        assert!(matches!(
            err,
            TestCaseValidationError::Checker(CheckerParamsError::Malformed { .. })
        ));
    }

    #[test]
    fn test_new_rejects_blank_prompt() {
        let err = TestCase::new(
            id("x#0"),
            CheckerKind::AllLowercase,
            json!({}),
            "  ",
            post_schema(),
            None,
        )
        .unwrap_err();

        assert_eq!(err, TestCaseValidationError::PromptRequired);
    }

    #[test]
    fn test_new_rejects_unknown_target() {
        let err = TestCase::new(
            id("x#0"),
            CheckerKind::AllLowercase,
            json!({}),
            "write in lowercase",
            post_schema(),
            Some("title"),
        )
        .unwrap_err();

        assert!(matches!(err, TestCaseValidationError::UnknownTargetArgument { .. }));
    }

    #[test]
    fn test_serialization_skips_checker() {
        let case = TestCase::new(
            id("x#0"),
            CheckerKind::AllLowercase,
            json!({}),
            "write in lowercase",
            post_schema(),
            None,
        )
        .unwrap();

        let json = serde_json::to_value(&case).unwrap();
        assert_eq!(json["checker_kind"], "AllLowercaseChecker");
        assert_eq!(json["target_argument"], "text");
        assert!(json.get("checker").is_none());
    }
}
