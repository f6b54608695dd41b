//! Filter + sort + paginate strategies, one per media kind.
//!
//! `apply` is the single strategy-selection point: the media kind is a
//! closed enum and dispatch happens exactly once, never re-checked
//! downstream. The store hands over raw rows; predicate evaluation,
//! ordering and pagination all happen here so results are deterministic
//! for a fixed data set.

pub mod book;
pub mod podcast;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{
    CatalogEntry, LibraryItem, MediaProgress, MediaType, ShelfResult,
};
use crate::filter::{DecodeError, FilterSpec};
use crate::store::CatalogStore;

/// Query failure surfaced to the caller as a client-input error, except
/// for `Storage` which propagates the backend failure unchanged
#[derive(Debug, Error)]
pub enum QueryError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("filter group '{group}' is not supported for {media_type} libraries")]
    UnsupportedFilterGroup {
        group: String,
        media_type: MediaType,
    },

    #[error("invalid sort field '{field}' for {media_type} libraries")]
    InvalidSortField {
        field: String,
        media_type: MediaType,
    },

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// Requested ordering, by wire field name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    pub descending: bool,
}

impl SortSpec {
    pub fn new(field: impl Into<String>, descending: bool) -> Self {
        Self {
            field: field.into(),
            descending,
        }
    }
}

/// Page window over the filtered result. `limit == 0` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub limit: usize,
    pub offset: usize,
}

impl Pagination {
    pub fn new(limit: usize, offset: usize) -> Self {
        Self { limit, offset }
    }

    /// Everything, from the start
    pub fn all() -> Self {
        Self {
            limit: 0,
            offset: 0,
        }
    }

    /// Apply the window after filtering and sorting; `count` stays the
    /// pre-pagination total
    pub(crate) fn slice(&self, entries: Vec<CatalogEntry>) -> ShelfResult {
        let count = entries.len();
        let take = if self.limit == 0 {
            usize::MAX
        } else {
            self.limit
        };
        let items = entries.into_iter().skip(self.offset).take(take).collect();
        ShelfResult { items, count }
    }
}

/// One resolved catalog query
#[derive(Debug, Clone)]
pub struct QueryParams<'a> {
    pub library_id: &'a str,
    /// Scopes progress predicates; empty means no user context
    pub user_id: &'a str,
    pub spec: Option<&'a FilterSpec>,
    pub sort: &'a SortSpec,
    pub collapse_series: bool,
    pub page: Pagination,
}

/// Execute a catalog query for one media kind
pub async fn apply(
    store: &dyn CatalogStore,
    media_type: MediaType,
    params: &QueryParams<'_>,
) -> Result<ShelfResult, QueryError> {
    let sort = SortField::resolve(&params.sort.field, media_type)?;
    match media_type {
        MediaType::Book => book::apply(store, params, sort).await,
        MediaType::Podcast => podcast::apply(store, params, sort).await,
    }
}

/// Sort keys resolved per media kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SortField {
    AddedAt,
    Title,
    AuthorName,
    Duration,
    Size,
    EpisodeCount,
    Progress,
}

impl SortField {
    fn resolve(field: &str, media_type: MediaType) -> Result<Self, QueryError> {
        use MediaType::{Book, Podcast};
        let resolved = match (media_type, field) {
            (_, "addedAt") => Self::AddedAt,
            (_, "title") => Self::Title,
            (_, "size") => Self::Size,
            (Book, "authorName") | (Podcast, "author") => Self::AuthorName,
            (Book, "duration") => Self::Duration,
            (Book, "progress") => Self::Progress,
            (Podcast, "episodeCount") => Self::EpisodeCount,
            _ => {
                return Err(QueryError::InvalidSortField {
                    field: field.to_string(),
                    media_type,
                })
            }
        };
        Ok(resolved)
    }
}

/// Order entries by the resolved key. Ties always fall through to the
/// ascending item id so repeated calls paginate identically.
pub(crate) fn sort_entries(
    entries: &mut [CatalogEntry],
    field: SortField,
    descending: bool,
    progress: &HashMap<String, MediaProgress>,
) {
    entries.sort_by(|a, b| {
        let ord = match field {
            SortField::AddedAt => a.added_at.cmp(&b.added_at),
            SortField::Title => title_key(a).cmp(&title_key(b)),
            SortField::AuthorName => author_key(a).cmp(&author_key(b)),
            SortField::Duration => duration_key(a).total_cmp(&duration_key(b)),
            SortField::Size => a.size.cmp(&b.size),
            SortField::EpisodeCount => episode_key(a).cmp(&episode_key(b)),
            // progress order is recency of the update, not percentage
            SortField::Progress => {
                let ka = progress.get(&a.id).map(|p| p.updated_at);
                let kb = progress.get(&b.id).map(|p| p.updated_at);
                ka.cmp(&kb)
            }
        };
        let ord = if descending { ord.reverse() } else { ord };
        ord.then_with(|| a.id.cmp(&b.id))
    });
}

fn title_key(entry: &CatalogEntry) -> String {
    entry.media.title().unwrap_or_default().to_lowercase()
}

fn author_key(entry: &CatalogEntry) -> String {
    match &entry.media {
        crate::domain::Media::Book(b) => b.author_name().to_lowercase(),
        crate::domain::Media::Podcast(p) => {
            p.author.as_deref().unwrap_or_default().to_lowercase()
        }
    }
}

fn duration_key(entry: &CatalogEntry) -> f64 {
    entry
        .media
        .as_book()
        .and_then(|b| b.duration)
        .unwrap_or(0.0)
}

fn episode_key(entry: &CatalogEntry) -> u32 {
    entry
        .media
        .as_podcast()
        .map(|p| p.episode_count)
        .unwrap_or(0)
}

/// Named boolean flags addressable by raw (ungrouped) filter strings
pub(crate) fn raw_flag(item: &LibraryItem, name: &str) -> bool {
    match name {
        "issues" => item.is_missing || item.is_invalid,
        "explicit" => item.media.explicit(),
        "abridged" => item.media.as_book().is_some_and(|b| b.abridged),
        _ => false,
    }
}

/// `tracks` filter buckets against a file/episode count
pub(crate) fn count_bucket_matches(value: &str, count: u32) -> bool {
    match value {
        "none" => count == 0,
        "single" => count == 1,
        "multi" => count > 1,
        _ => false,
    }
}

/// Index progress records by library item id
pub(crate) fn progress_by_item(
    records: Vec<MediaProgress>,
) -> HashMap<String, MediaProgress> {
    records
        .into_iter()
        .map(|p| (p.library_item_id.clone(), p))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_field_vocabulary_per_kind() {
        assert!(SortField::resolve("addedAt", MediaType::Book).is_ok());
        assert!(SortField::resolve("progress", MediaType::Book).is_ok());
        assert!(SortField::resolve("episodeCount", MediaType::Podcast).is_ok());

        assert!(matches!(
            SortField::resolve("progress", MediaType::Podcast),
            Err(QueryError::InvalidSortField { .. })
        ));
        assert!(matches!(
            SortField::resolve("episodeCount", MediaType::Book),
            Err(QueryError::InvalidSortField { .. })
        ));
        assert!(matches!(
            SortField::resolve("nope", MediaType::Book),
            Err(QueryError::InvalidSortField { .. })
        ));
    }

    #[test]
    fn test_count_buckets() {
        assert!(count_bucket_matches("none", 0));
        assert!(count_bucket_matches("single", 1));
        assert!(count_bucket_matches("multi", 7));
        assert!(!count_bucket_matches("multi", 1));
        assert!(!count_bucket_matches("lots", 7));
    }

    #[test]
    fn test_pagination_window() {
        let page = Pagination::new(2, 1);
        let entries: Vec<CatalogEntry> = Vec::new();
        let result = page.slice(entries);
        assert_eq!(result.count, 0);
        assert!(result.items.is_empty());
    }
}
