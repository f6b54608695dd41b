//! The shelf assembler: filtered queries plus four fixed-preset shelves.
//!
//! Every operation is an independent read-only unit of work over the
//! injected store; concurrent invocations share nothing mutable. The
//! book-only shelves return empty results for podcast libraries without
//! touching storage.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, instrument};

use crate::domain::{
    CatalogEntry, LibraryItem, MediaType, SeriesRef, SeriesShelf, SeriesView,
    ShelfResult,
};
use crate::filter::{compare_sequences, FilterGroup, FilterSpec};
use crate::query::{
    self, progress_by_item, Pagination, QueryError, QueryParams, SortSpec,
};
use crate::store::CatalogStore;

/// A library handle: id plus its closed media kind
#[derive(Debug, Clone)]
pub struct Library {
    pub id: String,
    pub media_type: MediaType,
}

impl Library {
    pub fn new(id: impl Into<String>, media_type: MediaType) -> Self {
        Self {
            id: id.into(),
            media_type,
        }
    }
}

/// Recognized result-shaping options, spelled out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IncludeFlags {
    /// Attach minified feed views where a feed is open
    pub rss_feed: bool,
}

impl IncludeFlags {
    /// Parse a comma-separated include list; only `rssfeed` is recognized
    pub fn parse(raw: &str) -> Self {
        Self {
            rss_feed: raw.split(',').any(|f| f.trim() == "rssfeed"),
        }
    }
}

/// Parameters of a filtered catalog query
#[derive(Debug, Clone)]
pub struct FilteredItemsRequest {
    pub library_id: String,
    /// Scopes progress predicates; empty means no user context
    pub user_id: String,
    pub media_type: MediaType,
    /// `"<group>.<token>"` or a bare raw field name
    pub filter_by: Option<String>,
    pub sort_by: String,
    pub sort_desc: bool,
    /// Merge series members into one representative entry (books only)
    pub collapse_series: bool,
    pub include: IncludeFlags,
    /// 0 means unbounded
    pub limit: usize,
    pub offset: usize,
}

impl FilteredItemsRequest {
    pub fn new(library_id: impl Into<String>, media_type: MediaType) -> Self {
        Self {
            library_id: library_id.into(),
            user_id: String::new(),
            media_type,
            filter_by: None,
            sort_by: "addedAt".to_string(),
            sort_desc: false,
            collapse_series: false,
            include: IncludeFlags::default(),
            limit: 0,
            offset: 0,
        }
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }

    pub fn with_filter(mut self, filter_by: impl Into<String>) -> Self {
        self.filter_by = Some(filter_by.into());
        self
    }

    pub fn with_sort(mut self, sort_by: impl Into<String>, descending: bool) -> Self {
        self.sort_by = sort_by.into();
        self.sort_desc = descending;
        self
    }

    pub fn with_collapse_series(mut self, collapse: bool) -> Self {
        self.collapse_series = collapse;
        self
    }

    pub fn with_include(mut self, include: IncludeFlags) -> Self {
        self.include = include;
        self
    }

    pub fn with_page(mut self, limit: usize, offset: usize) -> Self {
        self.limit = limit;
        self.offset = offset;
        self
    }
}

/// Assembles filtered catalog pages and derived shelves over an
/// injected store
pub struct ShelfAssembler {
    store: Arc<dyn CatalogStore>,
}

impl ShelfAssembler {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// Resolve a filter token and sort spec into a paginated,
    /// deterministically ordered slice of the catalog
    #[instrument(skip(self, req), fields(library = %req.library_id, media_type = %req.media_type))]
    pub async fn filtered_items(
        &self,
        req: &FilteredItemsRequest,
    ) -> Result<ShelfResult, QueryError> {
        let spec = FilterSpec::parse(req.filter_by.as_deref())?;
        let sort = SortSpec::new(&req.sort_by, req.sort_desc);
        let params = QueryParams {
            library_id: &req.library_id,
            user_id: &req.user_id,
            spec: spec.as_ref(),
            sort: &sort,
            collapse_series: req.collapse_series,
            page: Pagination::new(req.limit, req.offset),
        };

        let mut result =
            query::apply(self.store.as_ref(), req.media_type, &params).await?;
        self.attach_feeds(&req.include, &mut result.items).await?;

        debug!(count = result.count, returned = result.items.len(), "filtered items assembled");
        Ok(result)
    }

    /// Items the user is partway through, most recently touched first.
    /// Book libraries only; podcast libraries get an empty shelf without
    /// a storage call.
    #[instrument(skip(self, library, include), fields(library = %library.id, ebook))]
    pub async fn in_progress(
        &self,
        library: &Library,
        user_id: &str,
        include: &IncludeFlags,
        limit: usize,
        ebook: bool,
    ) -> Result<ShelfResult, QueryError> {
        if library.media_type != MediaType::Book {
            debug!("in-progress shelf on a non-book library, empty");
            return Ok(ShelfResult::empty());
        }

        let state = if ebook {
            "ebook-in-progress"
        } else {
            "audio-in-progress"
        };
        let spec = FilterSpec {
            group: FilterGroup::Progress,
            value: Some(state.to_string()),
        };
        let sort = SortSpec::new("progress", true);
        let params = QueryParams {
            library_id: &library.id,
            user_id,
            spec: Some(&spec),
            sort: &sort,
            collapse_series: false,
            page: Pagination::new(limit, 0),
        };

        let mut result =
            query::apply(self.store.as_ref(), MediaType::Book, &params).await?;
        self.attach_feeds(include, &mut result.items).await?;
        Ok(result)
    }

    /// Latest additions to the library, either media kind. Media payload
    /// sizes are backfilled from the item-level size when absent.
    #[instrument(skip(self, library, include), fields(library = %library.id))]
    pub async fn most_recently_added(
        &self,
        library: &Library,
        user_id: &str,
        include: &IncludeFlags,
        limit: usize,
    ) -> Result<ShelfResult, QueryError> {
        let sort = SortSpec::new("addedAt", true);
        let params = QueryParams {
            library_id: &library.id,
            user_id,
            spec: None,
            sort: &sort,
            collapse_series: false,
            page: Pagination::new(limit, 0),
        };

        let mut result = query::apply(self.store.as_ref(), library.media_type, &params).await?;
        for entry in &mut result.items {
            entry.backfill_media_size();
        }
        self.attach_feeds(include, &mut result.items).await?;
        Ok(result)
    }

    /// The next unread book of each series the user has finished part
    /// of, most recently active series first. Book libraries only.
    #[instrument(skip(self, library, include), fields(library = %library.id))]
    pub async fn continue_series(
        &self,
        library: &Library,
        user_id: &str,
        include: &IncludeFlags,
        limit: usize,
    ) -> Result<ShelfResult, QueryError> {
        if library.media_type != MediaType::Book {
            debug!("continue-series shelf on a non-book library, empty");
            return Ok(ShelfResult::empty());
        }
        if user_id.is_empty() {
            return Ok(ShelfResult::empty());
        }

        let items = self
            .store
            .library_items(&library.id, MediaType::Book)
            .await?;
        let progress =
            progress_by_item(self.store.progress_for_user(user_id).await?);

        // Group items under every series they belong to
        let mut groups: BTreeMap<&str, Vec<(&LibraryItem, &SeriesRef)>> =
            BTreeMap::new();
        for item in &items {
            if let Some(book) = item.media.as_book() {
                for sref in &book.series {
                    groups.entry(&sref.id).or_default().push((item, sref));
                }
            }
        }

        // (entry, recency of the user's latest touch in the series, series id)
        let mut candidates: Vec<(CatalogEntry, DateTime<Utc>, String)> = Vec::new();
        for (series_id, mut members) in groups {
            members.sort_by(|(ia, ra), (ib, rb)| {
                compare_sequences(ra.sequence.as_deref(), rb.sequence.as_deref())
                    .then_with(|| ia.id.cmp(&ib.id))
            });

            let Some(last_finished) = members
                .iter()
                .rposition(|(item, _)| {
                    progress.get(&item.id).is_some_and(|p| p.is_finished)
                })
            else {
                continue;
            };

            // first book after the last finished one the user has not
            // touched (in-progress books live on the in-progress shelf)
            let next = members[last_finished + 1..].iter().find(|(item, _)| {
                match progress.get(&item.id) {
                    None => true,
                    Some(p) => {
                        !p.is_finished
                            && p.progress <= 0.0
                            && p.ebook_progress <= 0.0
                    }
                }
            });

            if let Some((item, sref)) = next {
                let last_update = members
                    .iter()
                    .filter_map(|(i, _)| progress.get(&i.id))
                    .map(|p| p.updated_at)
                    .max()
                    .unwrap_or(item.added_at);
                candidates.push((
                    CatalogEntry::from_item(item)
                        .with_sequence(sref.sequence.clone()),
                    last_update,
                    series_id.to_string(),
                ));
            }
        }

        candidates.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.2.cmp(&b.2)));

        // an item can be the next book of several series; keep its most
        // recently active occurrence
        let mut seen = std::collections::HashSet::new();
        let mut entries: Vec<CatalogEntry> = candidates
            .into_iter()
            .filter(|(entry, _, _)| seen.insert(entry.id.clone()))
            .map(|(entry, _, _)| entry)
            .collect();

        let count = entries.len();
        if limit > 0 {
            entries.truncate(limit);
        }
        self.attach_feeds(include, &mut entries).await?;
        Ok(ShelfResult {
            items: entries,
            count,
        })
    }

    /// Series for the library, newest first, each with its books ordered
    /// by sequence. Book libraries only.
    #[instrument(skip(self, library, include), fields(library = %library.id))]
    pub async fn recent_series(
        &self,
        library: &Library,
        include: &IncludeFlags,
        limit: usize,
    ) -> Result<SeriesShelf, QueryError> {
        if library.media_type != MediaType::Book {
            debug!("recent-series shelf on a non-book library, empty");
            return Ok(SeriesShelf {
                series: Vec::new(),
                count: 0,
            });
        }

        let mut records = self.store.series_for_library(&library.id).await?;
        records.sort_by(|a, b| {
            b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id))
        });
        let count = records.len();
        if limit > 0 {
            records.truncate(limit);
        }

        let items = self
            .store
            .library_items(&library.id, MediaType::Book)
            .await?;

        let mut views = Vec::with_capacity(records.len());
        for record in records {
            let mut books: Vec<(&LibraryItem, &SeriesRef)> = items
                .iter()
                .filter_map(|item| {
                    let sref = item
                        .media
                        .as_book()?
                        .series
                        .iter()
                        .find(|s| s.id == record.id)?;
                    Some((item, sref))
                })
                .collect();
            books.sort_by(|(ia, ra), (ib, rb)| {
                compare_sequences(ra.sequence.as_deref(), rb.sequence.as_deref())
                    .then_with(|| ia.id.cmp(&ib.id))
            });

            let rss_feed = if include.rss_feed {
                self.store.feed_for_entity(&record.id).await?
            } else {
                None
            };

            views.push(SeriesView {
                id: record.id,
                name: record.name,
                added_at: record.created_at,
                books: books
                    .into_iter()
                    .map(|(item, sref)| {
                        CatalogEntry::from_item(item)
                            .with_sequence(sref.sequence.clone())
                    })
                    .collect(),
                rss_feed,
            });
        }

        Ok(SeriesShelf {
            series: views,
            count,
        })
    }

    async fn attach_feeds(
        &self,
        include: &IncludeFlags,
        entries: &mut [CatalogEntry],
    ) -> Result<(), QueryError> {
        if !include.rss_feed {
            return Ok(());
        }
        for entry in entries.iter_mut() {
            if let Some(view) = self.store.feed_for_entity(&entry.id).await? {
                entry.attach_feed(view);
            }
        }
        Ok(())
    }
}
