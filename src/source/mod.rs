//! Data source abstraction layer
//!
//! A data source performs one asynchronous bulk fetch and returns the full
//! record sequence, or a [`FetchError`]. There is no pagination or streaming.
//!
//! # Sources
//!
//! - [`BuiltinSource`] - the bundled demo dataset (`builtin://mushrooms`)
//! - [`FileSource`] - a JSON file on disk (`file://path/to/records.json`)
//! - [`HttpSource`] - a JSON document over HTTP(S) (feature `http`)
//!
//! [`Source`] picks one of these from a connection string.
//!
//! # Payload
//!
//! A JSON array of records:
//!
//! ```json
//! [{"name": "Fly agaric", "position": [52.0812, 5.2359], "color": "red", "spotPattern": "white"}]
//! ```

use std::future::Future;
use thiserror::Error;

use crate::model::Record;

#[cfg(feature = "builtin-data")]
pub mod builtin;
pub mod connection;
pub mod file;
#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "builtin-data")]
pub use builtin::BuiltinSource;
pub use connection::Source;
pub use file::FileSource;
#[cfg(feature = "http")]
pub use http::HttpSource;

/// Failure of the bulk fetch
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Data source unreachable: {0}")]
    Unreachable(String),

    #[error("Malformed payload: {0}")]
    Malformed(String),

    #[error("Records were already loaded for this session")]
    AlreadyLoaded,
}

/// Trait for record data sources
pub trait DataSource {
    /// Fetch the complete record sequence in one call
    fn fetch(&self) -> impl Future<Output = Result<Vec<Record>, FetchError>> + Send;

    /// Short description for logs
    fn describe(&self) -> String;
}

/// Decode a JSON record array.
pub fn parse_records(bytes: &[u8]) -> Result<Vec<Record>, FetchError> {
    serde_json::from_slice(bytes).map_err(|e| FetchError::Malformed(e.to_string()))
}
