//! Book-library filter strategy.
//!
//! Books carry the full filter vocabulary: authors, series, narrators,
//! publishers, per-user progress, ebook and track presence, plus the
//! shared membership groups. Only books can be collapsed by series.

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::domain::{
    CatalogEntry, CollapsedSeries, LibraryItem, MediaProgress, MediaType,
    ProgressState, SeriesRef, ShelfResult,
};
use crate::filter::{compare_sequences, FilterGroup, FilterSpec};
use crate::store::CatalogStore;

use super::{
    count_bucket_matches, progress_by_item, raw_flag, sort_entries, QueryError,
    QueryParams, SortField,
};

pub(crate) async fn apply(
    store: &dyn CatalogStore,
    params: &QueryParams<'_>,
    sort: SortField,
) -> Result<ShelfResult, QueryError> {
    // Progress predicates are user-scoped; without a user they match
    // nothing, and there is no point in touching storage.
    let wants_progress_filter =
        matches!(params.spec, Some(s) if s.group == FilterGroup::Progress);
    if wants_progress_filter && params.user_id.is_empty() {
        debug!("progress filter without user context, returning empty");
        return Ok(ShelfResult::empty());
    }

    let items = store
        .library_items(params.library_id, MediaType::Book)
        .await?;

    let progress = if (wants_progress_filter || sort == SortField::Progress)
        && !params.user_id.is_empty()
    {
        progress_by_item(store.progress_for_user(params.user_id).await?)
    } else {
        HashMap::new()
    };

    let matched: Vec<&LibraryItem> = items
        .iter()
        .filter(|item| matches_filter(item, params.spec, &progress))
        .collect();

    let mut entries = if params.collapse_series {
        collapse_by_series(matched)
    } else {
        matched.iter().map(|i| CatalogEntry::from_item(i)).collect()
    };

    sort_entries(&mut entries, sort, params.sort.descending, &progress);
    Ok(params.page.slice(entries))
}

fn matches_filter(
    item: &LibraryItem,
    spec: Option<&FilterSpec>,
    progress: &HashMap<String, MediaProgress>,
) -> bool {
    let Some(spec) = spec else { return true };
    let Some(book) = item.media.as_book() else {
        return false;
    };
    let value = spec.value.as_deref().unwrap_or("");

    match &spec.group {
        FilterGroup::Genres => book.genres.iter().any(|g| g == value),
        FilterGroup::Tags => book.tags.iter().any(|t| t == value),
        FilterGroup::Narrators => book.narrators.iter().any(|n| n == value),
        FilterGroup::Publishers => book.publisher.as_deref() == Some(value),
        FilterGroup::Languages => book.language.as_deref() == Some(value),
        FilterGroup::Authors => {
            book.authors.iter().any(|a| a.id == value || a.name == value)
        }
        FilterGroup::Series => {
            book.series.iter().any(|s| s.id == value || s.name == value)
        }
        FilterGroup::Progress => ProgressState::parse(value)
            .is_some_and(|state| state.matches(progress.get(&item.id))),
        FilterGroup::Missing => book.field_present(value) == Some(false),
        FilterGroup::Tracks => count_bucket_matches(value, book.audio_tracks),
        FilterGroup::Ebooks => match value {
            "ebook" => book.has_ebook,
            "none" => !book.has_ebook,
            _ => false,
        },
        FilterGroup::Raw(name) => raw_flag(item, name),
    }
}

/// Merge items sharing a series into one representative entry each.
///
/// An item in several series belongs to the bucket of its lowest series
/// id, so it is emitted at most once. The representative is the member
/// with the lowest sequence (ties by item id); the entry carries the
/// series summary and the representative's own sequence.
fn collapse_by_series(items: Vec<&LibraryItem>) -> Vec<CatalogEntry> {
    let mut buckets: BTreeMap<String, Vec<(&LibraryItem, &SeriesRef)>> =
        BTreeMap::new();
    let mut entries = Vec::new();

    for item in items {
        let Some(book) = item.media.as_book() else {
            continue;
        };
        match book.series.iter().min_by(|a, b| a.id.cmp(&b.id)) {
            Some(sref) => buckets
                .entry(sref.id.clone())
                .or_default()
                .push((item, sref)),
            None => entries.push(CatalogEntry::from_item(item)),
        }
    }

    for (series_id, mut members) in buckets {
        members.sort_by(|(ia, ra), (ib, rb)| {
            compare_sequences(ra.sequence.as_deref(), rb.sequence.as_deref())
                .then_with(|| ia.id.cmp(&ib.id))
        });
        let (rep, rep_ref) = members[0];
        entries.push(
            CatalogEntry::from_item(rep)
                .with_sequence(rep_ref.sequence.clone())
                .with_collapsed_series(CollapsedSeries {
                    id: series_id,
                    name: rep_ref.name.clone(),
                    num_books: members.len(),
                }),
        );
    }

    entries
}
