//! IFEval-FC
//!
//! Measures whether LLMs follow formatting instructions inside function-call
//! arguments:
//! - A closed family of format checkers with typed parameter records
//! - Dataset loading into validated test cases
//! - Concurrent evaluation against OpenAI, Anthropic, Google and GigaChat
//! - Per-checker aggregation with funnel metrics

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
