//! Bundled demo dataset

use super::{parse_records, DataSource, FetchError};
use crate::model::Record;

static MUSHROOMS: &str = include_str!("../../data/mushrooms.json");

/// Names accepted after `builtin://`
pub const DATASETS: &[&str] = &["mushrooms"];

/// Serves the observations bundled with the crate
#[derive(Debug, Clone, Default)]
pub struct BuiltinSource;

impl DataSource for BuiltinSource {
    async fn fetch(&self) -> Result<Vec<Record>, FetchError> {
        parse_records(MUSHROOMS.as_bytes())
    }

    fn describe(&self) -> String {
        "builtin://mushrooms".to_string()
    }
}
