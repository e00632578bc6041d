use thiserror::Error;

/// Failures that end a run without a report
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EvaluationError {
    #[error("Checker defect while evaluating '{test_case_id}': {message}")]
    CheckerDefect {
        test_case_id: String,
        message: String,
    },

    #[error("Evaluation task failed: {message}")]
    TaskFailed { message: String },

    #[error("Invalid evaluation configuration: {message}")]
    Configuration { message: String },
}

impl EvaluationError {
    pub fn checker_defect(test_case_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CheckerDefect {
            test_case_id: test_case_id.into(),
            message: message.into(),
        }
    }

    pub fn task_failed(message: impl Into<String>) -> Self {
        Self::TaskFailed {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

/// Best-effort text of a panic payload
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
