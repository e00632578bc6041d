//! Test case validation

use thiserror::Error;

use crate::domain::checker::CheckerParamsError;
use crate::domain::llm::FunctionSchema;

/// Validation errors for test cases
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TestCaseValidationError {
    #[error("Test case ID is required")]
    IdRequired,

    #[error("Prompt text is required")]
    PromptRequired,

    #[error("Function schema name is required")]
    FunctionNameRequired,

    #[error("Target argument is required")]
    TargetArgumentRequired,

    #[error("Target argument '{argument}' is not a parameter of function '{function}'")]
    UnknownTargetArgument { function: String, argument: String },

    #[error("Cannot infer the target argument of function '{function}': {reason}")]
    AmbiguousTargetArgument { function: String, reason: String },

    #[error("Invalid function schema: {0}")]
    InvalidSchema(String),

    #[error(transparent)]
    Checker(#[from] CheckerParamsError),
}

/// Validate a function schema offered as the single tool of a test case
pub fn validate_function_schema(schema: &FunctionSchema) -> Result<(), TestCaseValidationError> {
    if schema.name.trim().is_empty() {
        return Err(TestCaseValidationError::FunctionNameRequired);
    }

    if !schema.parameters.is_object() {
        return Err(TestCaseValidationError::InvalidSchema(format!(
            "parameters of '{}' must be a JSON object",
            schema.name
        )));
    }

    if let Some(properties) = schema.parameters.get("properties") {
        if !properties.is_object() {
            return Err(TestCaseValidationError::InvalidSchema(format!(
                "properties of '{}' must be a JSON object",
                schema.name
            )));
        }
    }

    Ok(())
}

/// Pick the argument the checker applies to
///
/// An explicit name wins and must be a declared property when the schema
/// declares any; otherwise the schema's only property is used.
pub fn resolve_target_argument(
    schema: &FunctionSchema,
    explicit: Option<&str>,
) -> Result<String, TestCaseValidationError> {
    let properties = schema.property_names();

    if let Some(name) = explicit {
        let name = name.trim();
        if name.is_empty() {
            return Err(TestCaseValidationError::TargetArgumentRequired);
        }
        if !properties.is_empty() && !schema.has_property(name) {
            return Err(TestCaseValidationError::UnknownTargetArgument {
                function: schema.name.clone(),
                argument: name.to_string(),
            });
        }
        return Ok(name.to_string());
    }

    match properties.as_slice() {
        [only] => Ok((*only).to_string()),
        [] => Err(TestCaseValidationError::AmbiguousTargetArgument {
            function: schema.name.clone(),
            reason: "the schema declares no properties".to_string(),
        }),
        many => Err(TestCaseValidationError::AmbiguousTargetArgument {
            function: schema.name.clone(),
            reason: format!("the schema declares {} properties", many.len()),
        }),
    }
}
