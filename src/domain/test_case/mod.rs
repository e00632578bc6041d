//! Test case domain - Benchmark items pairing a prompt, a function and a formatting rule

mod entity;
mod validation;

pub use entity::{TestCase, TestCaseId};
pub use validation::{resolve_target_argument, validate_function_schema, TestCaseValidationError};
