//! Evaluation domain - Running test cases against a provider and scoring the results

mod adapter;
mod aggregator;
mod engine;
mod error;
mod output;
mod report;
mod retry;
mod verdict;

pub use adapter::{CallAdapter, CallOutcome, Interrupted};
pub use aggregator::{
    AggregateRow, AggregateTable, FunnelMetrics, ProviderErrorPolicy, ResultAggregator,
};
pub use engine::{judge, EngineConfig, EvaluationEngine, DEFAULT_SYSTEM_MESSAGE, MAX_CONCURRENCY};
pub use error::EvaluationError;
pub use output::{FunctionCall, ModelOutput};
pub use report::{RunId, RunReport, RunStatus};
pub use retry::RetryPolicy;
pub use verdict::{FailureReason, Verdict};
