//! Infrastructure layer - External service implementations

pub mod credentials;
pub mod dataset;
pub mod llm;
pub mod logging;
pub mod storage;
