//! Storage factory for runtime storage selection

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use serde::Deserialize;

use crate::domain::storage::{Storage, StorageEntity};
use crate::domain::DomainError;

use super::file::FileStorage;
use super::in_memory::InMemoryStorage;

/// Supported storage types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageType {
    /// Results are kept for the process lifetime only
    InMemory,
    /// One JSON file per result in a directory
    File,
}

impl FromStr for StorageType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" | "inmemory" | "in-memory" | "in_memory" => Ok(Self::InMemory),
            "file" | "fs" | "json" => Ok(Self::File),
            other => Err(DomainError::configuration(format!(
                "Unknown storage type '{}'",
                other
            ))),
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    InMemory,
    File { dir: PathBuf },
}

impl StorageConfig {
    pub fn in_memory() -> Self {
        Self::InMemory
    }

    pub fn file(dir: impl Into<PathBuf>) -> Self {
        Self::File { dir: dir.into() }
    }

    pub fn storage_type(&self) -> StorageType {
        match self {
            Self::InMemory => StorageType::InMemory,
            Self::File { .. } => StorageType::File,
        }
    }
}

/// Factory for creating storage instances
#[derive(Debug)]
pub struct StorageFactory;

impl StorageFactory {
    pub fn create<E>(config: &StorageConfig) -> Arc<dyn Storage<E>>
    where
        E: StorageEntity + 'static,
    {
        match config {
            StorageConfig::InMemory => Arc::new(InMemoryStorage::<E>::new()),
            StorageConfig::File { dir } => Arc::new(FileStorage::<E>::new(dir.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::evaluation::RunReport;
    use crate::infrastructure::storage::in_memory::fixtures::report;

    #[test]
    fn test_storage_type_from_str() {
        assert_eq!("memory".parse::<StorageType>().unwrap(), StorageType::InMemory);
        assert_eq!("In-Memory".parse::<StorageType>().unwrap(), StorageType::InMemory);
        assert_eq!("file".parse::<StorageType>().unwrap(), StorageType::File);
        assert!("postgres".parse::<StorageType>().is_err());
    }

    #[test]
    fn test_storage_config_types() {
        assert_eq!(StorageConfig::in_memory().storage_type(), StorageType::InMemory);
        assert_eq!(StorageConfig::file("results").storage_type(), StorageType::File);
    }

    #[tokio::test]
    async fn test_factory_file_storage_persists() {
        let dir = tempfile::tempdir().unwrap();
        let config = StorageConfig::file(dir.path());

        let storage = StorageFactory::create::<RunReport>(&config);
        storage.create(report("run")).await.unwrap();

        assert!(dir.path().join("run.json").exists());
    }
}
