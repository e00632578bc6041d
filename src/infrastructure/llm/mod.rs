//! LLM provider implementations

mod anthropic;
mod factory;
mod gigachat;
mod google;
pub mod http_client;
mod openai;

pub use anthropic::AnthropicProvider;
pub use factory::{GIGACHAT_SCOPE_PARAM, LlmProviderFactory, ProviderKind};
pub use gigachat::{DEFAULT_GIGACHAT_SCOPE, GigaChatProvider};
pub use google::GoogleProvider;
pub use http_client::{HttpClient, HttpClientTrait, HttpError};
pub use openai::OpenAiProvider;
