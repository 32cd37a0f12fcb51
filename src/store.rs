//! Canonical and visible record sets
//!
//! The canonical set is written once, by [`RecordStore::load`]. The visible
//! set starts equal to it and afterwards only changes through
//! [`RecordStore::refilter`], which always derives it from the canonical set.

use std::future::Future;
use tracing::{info, warn};

use crate::filter::{self, FilterSelection};
use crate::model::{Record, RecordId};
use crate::source::FetchError;

/// Owner of the session's record sets
#[derive(Debug, Default)]
pub struct RecordStore {
    canonical: Vec<Record>,
    visible: Vec<Record>,
    loaded: bool,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run one bulk fetch and store the result.
    ///
    /// On success the canonical set holds the fetched records, with ids
    /// assigned by position, and the visible set equals it. On failure both
    /// sets stay empty and the error is returned to the caller.
    pub async fn load<F, Fut>(&mut self, fetch: F) -> Result<(), FetchError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<Record>, FetchError>>,
    {
        if self.loaded {
            warn!("Ignoring second load; canonical set is write-once");
            return Err(FetchError::AlreadyLoaded);
        }

        match fetch().await {
            Ok(records) => {
                self.canonical = records
                    .into_iter()
                    .enumerate()
                    .map(|(idx, record)| record.with_id(RecordId(idx)))
                    .collect();
                self.visible = self.canonical.clone();
                self.loaded = true;
                info!("Loaded {} records", self.canonical.len());
                Ok(())
            }
            Err(err) => {
                self.canonical.clear();
                self.visible.clear();
                warn!("Record fetch failed: {}", err);
                Err(err)
            }
        }
    }

    /// The full, unfiltered record set
    pub fn canonical(&self) -> &[Record] {
        &self.canonical
    }

    /// The current visible subset
    pub fn visible(&self) -> &[Record] {
        &self.visible
    }

    /// Recompute the visible set for `selection`
    pub fn refilter(&mut self, selection: &FilterSelection) -> &[Record] {
        self.visible = filter::apply(&self.canonical, selection);
        &self.visible
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn is_empty(&self) -> bool {
        self.canonical.is_empty()
    }
}
