//! LLM provider domain models and traits

mod error;
mod message;
mod provider;
mod request;
mod response;

pub use error::ProviderError;
pub use message::{Message, MessageRole};
pub use provider::LlmProvider;
pub use request::{FunctionSchema, LlmRequest, LlmRequestBuilder};
pub use response::{FinishReason, LlmResponse, ToolCall, Usage};

#[cfg(test)]
pub use provider::mock::MockLlmProvider;
