//! Dataset loading from a directory of JSON files or a single JSON/JSONL file

use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tokio::fs;
use tracing::{debug, info};

use super::record::DatasetRecord;
use super::DatasetError;
use crate::domain::TestCase;

/// One file's worth of records, with the name used to build case ids
#[derive(Debug)]
struct Source {
    name: String,
    records: Vec<Value>,
}

#[derive(Debug, Clone)]
pub struct DatasetLoader {
    path: PathBuf,
    max_samples: Option<usize>,
}

impl DatasetLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_samples: None,
        }
    }

    /// Keep only the first `max_samples` records (each may expand to several cases)
    pub fn with_max_samples(mut self, max_samples: Option<usize>) -> Self {
        self.max_samples = max_samples;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load and validate every case; the first bad record fails the whole load
    pub async fn load(&self) -> Result<Vec<TestCase>, DatasetError> {
        let metadata = match fs::metadata(&self.path).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(DatasetError::NotFound {
                    path: self.path.clone(),
                });
            }
            Err(e) => return Err(DatasetError::io(&self.path, e)),
        };

        let sources = if metadata.is_dir() {
            self.read_dir().await?
        } else {
            read_file(&self.path).await?
        };

        let mut remaining = self.max_samples.unwrap_or(usize::MAX);
        let mut seen = HashSet::new();
        let mut cases = Vec::new();

        'sources: for source in sources {
            let multi = source.records.len() > 1;
            for (index, value) in source.records.into_iter().enumerate() {
                if remaining == 0 {
                    break 'sources;
                }
                remaining -= 1;

                let name = if multi {
                    format!("{}:{}", source.name, index)
                } else {
                    source.name.clone()
                };

                for case in DatasetRecord::from_value(&name, value)?.into_cases(&name)? {
                    if !seen.insert(case.id().as_str().to_string()) {
                        return Err(DatasetError::DuplicateId {
                            id: case.id().to_string(),
                        });
                    }
                    cases.push(case);
                }
            }
        }

        info!(path = %self.path.display(), cases = cases.len(), "Loaded dataset");
        Ok(cases)
    }

    async fn read_dir(&self) -> Result<Vec<Source>, DatasetError> {
        let mut entries = fs::read_dir(&self.path)
            .await
            .map_err(|e| DatasetError::io(&self.path, e))?;

        let mut files = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| DatasetError::io(&self.path, e))?
        {
            let path = entry.path();
            let is_file = entry
                .file_type()
                .await
                .map(|file_type| file_type.is_file())
                .unwrap_or(false);
            if is_file && path.extension().is_some_and(|ext| ext == "json") {
                files.push(path);
            }
        }

        if files.is_empty() {
            return Err(DatasetError::Empty {
                path: self.path.clone(),
            });
        }

        files.sort();

        let mut sources = Vec::with_capacity(files.len());
        for file in files {
            sources.extend(read_file(&file).await?);
        }
        Ok(sources)
    }
}

async fn read_file(path: &Path) -> Result<Vec<Source>, DatasetError> {
    let text = fs::read_to_string(path)
        .await
        .map_err(|e| DatasetError::io(path, e))?;

    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let records = if path.extension().is_some_and(|ext| ext == "jsonl") {
        parse_lines(&name, &text)?
    } else {
        match serde_json::from_str(&text) {
            Ok(Value::Array(items)) => items,
            Ok(value) => vec![value],
            Err(e) => return Err(DatasetError::parse(&name, e.to_string())),
        }
    };

    debug!(file = %path.display(), records = records.len(), "Read dataset file");
    Ok(vec![Source { name, records }])
}

fn parse_lines(name: &str, text: &str) -> Result<Vec<Value>, DatasetError> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(number, line)| {
            serde_json::from_str(line)
                .map_err(|e| DatasetError::parse(name, format!("line {}: {}", number + 1, e)))
        })
        .collect()
}
