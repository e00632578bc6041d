//! Domain layer - Checkers, test cases, evaluation and the ports they depend on

pub mod checker;
pub mod credentials;
pub mod error;
pub mod evaluation;
pub mod llm;
pub mod storage;
pub mod test_case;

pub use checker::{BoundChecker, CheckerKind, CheckerRegistry, FormatChecker, InstructionGroup};
pub use credentials::{Credential, CredentialProvider, CredentialType};
pub use error::DomainError;
pub use evaluation::{
    AggregateTable, CallAdapter, EngineConfig, EvaluationEngine, EvaluationError, FailureReason,
    ModelOutput, ProviderErrorPolicy, ResultAggregator, RetryPolicy, RunId, RunReport, RunStatus,
    Verdict,
};
pub use llm::{
    FunctionSchema, LlmProvider, LlmRequest, LlmResponse, Message, MessageRole, ProviderError,
    ToolCall,
};
pub use storage::{Storage, StorageEntity, StorageKey};
pub use test_case::{TestCase, TestCaseId, TestCaseValidationError};
