//! Assembled result shapes returned to callers.
//!
//! A `CatalogEntry` is a fresh projection built from a stored row; the
//! enricher decorates it (feed view, size backfill, sequence annotation)
//! without ever touching the storage-owned record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::item::{LibraryItem, Media};

/// One assembled catalog item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,

    pub added_at: DateTime<Utc>,

    /// Item-level size on disk
    pub size: u64,

    /// Media payload projection (size may be backfilled by the enricher)
    pub media: Media,

    /// Minified feed view, attached when requested and available
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rss_feed: Option<serde_json::Value>,

    /// Series position computed during shelf assembly
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series_sequence: Option<String>,

    /// Present when this entry stands in for a whole series
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collapsed_series: Option<CollapsedSeries>,
}

impl CatalogEntry {
    /// Build a fresh projection from a stored row
    pub fn from_item(item: &LibraryItem) -> Self {
        Self {
            id: item.id.clone(),
            added_at: item.added_at,
            size: item.size,
            media: item.media.clone(),
            rss_feed: None,
            series_sequence: None,
            collapsed_series: None,
        }
    }
}

/// Summary carried by a series-collapsed entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollapsedSeries {
    pub id: String,
    pub name: String,
    /// Number of library items merged into this entry
    pub num_books: usize,
}

/// A paginated slice of catalog entries.
///
/// `count` is the total number of matches before pagination and is
/// invariant across limit/offset for a fixed filter and sort.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShelfResult {
    pub items: Vec<CatalogEntry>,
    pub count: usize,
}

impl ShelfResult {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            count: 0,
        }
    }
}

/// A series with its books ordered by sequence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesView {
    pub id: String,
    pub name: String,
    pub added_at: DateTime<Utc>,
    /// Constituent books, each annotated with its series sequence
    pub books: Vec<CatalogEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rss_feed: Option<serde_json::Value>,
}

/// Result shape of the recently-added-series shelf
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesShelf {
    pub series: Vec<SeriesView>,
    pub count: usize,
}
