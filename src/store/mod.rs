//! The narrow storage contract the engine consumes.
//!
//! The engine never owns a schema or a connection pool; it is handed an
//! implementation of [`CatalogStore`] at construction time and reads
//! through it. Storage failures propagate unchanged, no retries.

pub mod memory;

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::{LibraryItem, MediaProgress, MediaType, SeriesRecord};

// Re-export the in-memory reference store
pub use memory::MemoryStore;

/// Read-only storage access for one media catalog
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// All items of one media kind in a library
    async fn library_items(
        &self,
        library_id: &str,
        media_type: MediaType,
    ) -> Result<Vec<LibraryItem>>;

    /// All progress records owned by a user
    async fn progress_for_user(&self, user_id: &str) -> Result<Vec<MediaProgress>>;

    /// All series rows in a library
    async fn series_for_library(&self, library_id: &str) -> Result<Vec<SeriesRecord>>;

    /// Minified feed view for an entity (item or series), when one is open
    async fn feed_for_entity(&self, entity_id: &str) -> Result<Option<serde_json::Value>>;
}
