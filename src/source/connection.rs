//! Connection string parsing
//!
//! Supported formats:
//! - `builtin://mushrooms` - bundled demo dataset
//! - `file://path/to/records.json` or a bare path ending in `.json`
//! - `http://...`, `https://...` - remote JSON document

use super::{DataSource, FetchError, FileSource};
use crate::model::Record;
use crate::{Result, ShroomError};

#[cfg(feature = "builtin-data")]
use super::builtin::{BuiltinSource, DATASETS};
#[cfg(feature = "http")]
use super::HttpSource;

/// Any of the shipped data sources, chosen at runtime
#[derive(Debug, Clone)]
pub enum Source {
    #[cfg(feature = "builtin-data")]
    Builtin(BuiltinSource),
    File(FileSource),
    #[cfg(feature = "http")]
    Http(HttpSource),
}

impl Source {
    /// Parse a connection string into a data source
    pub fn from_connection_string(uri: &str) -> Result<Self> {
        let uri = uri.trim();

        if let Some(name) = uri.strip_prefix("builtin://") {
            #[cfg(feature = "builtin-data")]
            {
                if DATASETS.contains(&name) {
                    return Ok(Source::Builtin(BuiltinSource));
                }
                return Err(ShroomError::SourceError(format!(
                    "Unknown builtin dataset '{}'. Available: {}",
                    name,
                    DATASETS.join(", ")
                )));
            }
            #[cfg(not(feature = "builtin-data"))]
            return Err(ShroomError::SourceError(format!(
                "Builtin dataset '{}' requested but the builtin-data feature is disabled",
                name
            )));
        }

        if let Some(path) = uri.strip_prefix("file://") {
            if path.is_empty() {
                return Err(ShroomError::SourceError(
                    "File path cannot be empty".to_string(),
                ));
            }
            return Ok(Source::File(FileSource::new(path)));
        }

        if uri.starts_with("http://") || uri.starts_with("https://") {
            #[cfg(feature = "http")]
            return Ok(Source::Http(HttpSource::new(uri)));
            #[cfg(not(feature = "http"))]
            return Err(ShroomError::SourceError(
                "HTTP sources require the http feature".to_string(),
            ));
        }

        if uri.ends_with(".json") {
            return Ok(Source::File(FileSource::new(uri)));
        }

        Err(ShroomError::SourceError(format!(
            "Unsupported connection string: '{}'. Expected builtin://, file://, http:// or https://",
            uri
        )))
    }
}

impl DataSource for Source {
    async fn fetch(&self) -> std::result::Result<Vec<Record>, FetchError> {
        match self {
            #[cfg(feature = "builtin-data")]
            Source::Builtin(source) => source.fetch().await,
            Source::File(source) => source.fetch().await,
            #[cfg(feature = "http")]
            Source::Http(source) => source.fetch().await,
        }
    }

    fn describe(&self) -> String {
        match self {
            #[cfg(feature = "builtin-data")]
            Source::Builtin(source) => source.describe(),
            Source::File(source) => source.describe(),
            #[cfg(feature = "http")]
            Source::Http(source) => source.describe(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(feature = "builtin-data")]
    fn test_builtin() {
        let source = Source::from_connection_string("builtin://mushrooms").unwrap();
        assert!(matches!(source, Source::Builtin(_)));
        assert!(Source::from_connection_string("builtin://penguins").is_err());
    }

    #[test]
    fn test_file_paths() {
        let source = Source::from_connection_string("file:///tmp/records.json").unwrap();
        assert_eq!(source.describe(), "file:///tmp/records.json");

        let source = Source::from_connection_string("data/records.json").unwrap();
        assert!(matches!(source, Source::File(_)));

        assert!(Source::from_connection_string("file://").is_err());
    }

    #[test]
    #[cfg(feature = "http")]
    fn test_http() {
        let source = Source::from_connection_string("https://example.com/mushrooms").unwrap();
        assert!(matches!(source, Source::Http(_)));
        assert_eq!(source.describe(), "https://example.com/mushrooms");
    }

    #[test]
    fn test_unsupported() {
        let err = Source::from_connection_string("postgres://localhost/db").unwrap_err();
        assert!(err.to_string().contains("Unsupported connection string"));
    }
}
