//! JSON-file storage: one `<key>.json` per entity in a directory

use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::domain::storage::{Storage, StorageEntity, StorageKey};
use crate::domain::DomainError;

const EXTENSION: &str = "json";

#[derive(Debug)]
pub struct FileStorage<E>
where
    E: StorageEntity,
{
    dir: PathBuf,
    _entity: PhantomData<fn() -> E>,
}

impl<E> FileStorage<E>
where
    E: StorageEntity,
{
    /// The directory is created on first write
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            _entity: PhantomData,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path an entity with `key` is stored at
    pub fn path_for(&self, key: &str) -> Result<PathBuf, DomainError> {
        if key.is_empty()
            || key.starts_with('.')
            || key.contains(['/', '\\'])
            || key.chars().any(char::is_control)
        {
            return Err(DomainError::validation(format!(
                "Storage key '{}' is not a valid file name",
                key
            )));
        }

        Ok(self.dir.join(format!("{}.{}", key, EXTENSION)))
    }

    async fn read_entity(path: &Path) -> Result<Option<E>, DomainError> {
        let bytes = match fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(DomainError::storage(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )));
            }
        };

        serde_json::from_slice(&bytes).map(Some).map_err(|e| {
            DomainError::storage(format!("Failed to parse {}: {}", path.display(), e))
        })
    }
}

#[async_trait]
impl<E> Storage<E> for FileStorage<E>
where
    E: StorageEntity + 'static,
{
    async fn get(&self, key: &E::Key) -> Result<Option<E>, DomainError> {
        let path = self.path_for(key.as_str())?;
        Self::read_entity(&path).await
    }

    async fn list(&self) -> Result<Vec<E>, DomainError> {
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(DomainError::storage(format!(
                    "Failed to list {}: {}",
                    self.dir.display(),
                    e
                )));
            }
        };

        let mut paths = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to list {}: {}", self.dir.display(), e)))?
        {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == EXTENSION) {
                paths.push(path);
            }
        }
        paths.sort();

        let mut entities = Vec::with_capacity(paths.len());
        for path in paths {
            match Self::read_entity(&path).await {
                Ok(Some(entity)) => entities.push(entity),
                Ok(None) => {}
                Err(e) => warn!(path = %path.display(), error = %e, "Skipping unreadable entry"),
            }
        }

        Ok(entities)
    }

    async fn create(&self, entity: E) -> Result<E, DomainError> {
        let key = entity.key().as_str();
        let path = self.path_for(key)?;

        fs::create_dir_all(&self.dir).await.map_err(|e| {
            DomainError::storage(format!("Failed to create {}: {}", self.dir.display(), e))
        })?;

        let body = serde_json::to_vec_pretty(&entity)
            .map_err(|e| DomainError::storage(format!("Failed to serialize '{}': {}", key, e)))?;

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| {
                if e.kind() == ErrorKind::AlreadyExists {
                    DomainError::conflict(format!("Entity with key '{}' already exists", key))
                } else {
                    DomainError::storage(format!("Failed to create {}: {}", path.display(), e))
                }
            })?;

        file.write_all(&body).await.map_err(|e| {
            DomainError::storage(format!("Failed to write {}: {}", path.display(), e))
        })?;
        file.flush().await.map_err(|e| {
            DomainError::storage(format!("Failed to write {}: {}", path.display(), e))
        })?;

        debug!(path = %path.display(), "Stored entity");
        Ok(entity)
    }

    async fn delete(&self, key: &E::Key) -> Result<bool, DomainError> {
        let path = self.path_for(key.as_str())?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(DomainError::storage(format!(
                "Failed to delete {}: {}",
                path.display(),
                e
            ))),
        }
    }

    async fn exists(&self, key: &E::Key) -> Result<bool, DomainError> {
        let path = self.path_for(key.as_str())?;
        fs::try_exists(&path)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to stat {}: {}", path.display(), e)))
    }
}
