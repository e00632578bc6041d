//! Dataset infrastructure - Loading benchmark files into test cases

mod error;
mod loader;
mod record;

pub use error::DatasetError;
pub use loader::DatasetLoader;
pub use record::{BenchmarkRecord, DatasetRecord, FlatRecord, FormatSpec};
