//! In-memory reference implementation of the storage contract.
//!
//! Backs the integration tests and doubles as a fixture for downstream
//! crates. Tracks how many storage calls were issued so tests can assert
//! that guarded operations never hit storage.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::{LibraryItem, MediaProgress, MediaType, SeriesRecord};

use super::CatalogStore;

/// Vec-backed catalog store
#[derive(Default)]
pub struct MemoryStore {
    items: Vec<LibraryItem>,
    progress: Vec<MediaProgress>,
    series: Vec<SeriesRecord>,
    feeds: HashMap<String, serde_json::Value>,
    calls: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_item(mut self, item: LibraryItem) -> Self {
        self.items.push(item);
        self
    }

    pub fn with_progress(mut self, record: MediaProgress) -> Self {
        self.progress.push(record);
        self
    }

    pub fn with_series(mut self, series: SeriesRecord) -> Self {
        self.series.push(series);
        self
    }

    /// Register an open feed (already-minified view) for an entity
    pub fn with_feed(mut self, entity_id: impl Into<String>, view: serde_json::Value) -> Self {
        self.feeds.insert(entity_id.into(), view);
        self
    }

    /// Number of storage queries issued so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn library_items(
        &self,
        library_id: &str,
        media_type: MediaType,
    ) -> Result<Vec<LibraryItem>> {
        self.record_call();
        Ok(self
            .items
            .iter()
            .filter(|i| i.library_id == library_id && i.media.media_type() == media_type)
            .cloned()
            .collect())
    }

    async fn progress_for_user(&self, user_id: &str) -> Result<Vec<MediaProgress>> {
        self.record_call();
        Ok(self
            .progress
            .iter()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn series_for_library(&self, library_id: &str) -> Result<Vec<SeriesRecord>> {
        self.record_call();
        Ok(self
            .series
            .iter()
            .filter(|s| s.library_id == library_id)
            .cloned()
            .collect())
    }

    async fn feed_for_entity(&self, entity_id: &str) -> Result<Option<serde_json::Value>> {
        self.record_call();
        Ok(self.feeds.get(entity_id).cloned())
    }
}
