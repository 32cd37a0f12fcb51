//! JSON file data source

use std::path::{Path, PathBuf};

use super::{parse_records, DataSource, FetchError};
use crate::model::Record;

/// Reads a JSON record array from disk
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DataSource for FileSource {
    async fn fetch(&self) -> Result<Vec<Record>, FetchError> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|e| {
            FetchError::Unreachable(format!("failed to read {}: {}", self.path.display(), e))
        })?;
        parse_records(&bytes)
    }

    fn describe(&self) -> String {
        format!("file://{}", self.path.display())
    }
}
