//! HTTP(S) JSON data source

use reqwest::Client;

use super::{parse_records, DataSource, FetchError};
use crate::model::Record;

/// Fetches a JSON record array with a single GET request
#[derive(Debug, Clone)]
pub struct HttpSource {
    url: String,
    client: Client,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: Client::new(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl DataSource for HttpSource {
    async fn fetch(&self) -> Result<Vec<Record>, FetchError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| FetchError::Unreachable(format!("request error: {}", e)))?;
        if !response.status().is_success() {
            return Err(FetchError::Unreachable(format!(
                "server responded with {}",
                response.status()
            )));
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::Unreachable(format!("failed to read response: {}", e)))?;
        parse_records(&bytes)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}
