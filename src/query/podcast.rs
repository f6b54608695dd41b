//! Podcast-library filter strategy.
//!
//! Podcasts share the membership groups (genres, tags, languages), the
//! missing-field check and the tracks bucket (against episode count).
//! Book-only groups are rejected up front with a typed error rather
//! than silently returning unfiltered rows.

use crate::domain::{CatalogEntry, LibraryItem, MediaType, ShelfResult};
use crate::filter::{FilterGroup, FilterSpec};
use crate::store::CatalogStore;

use super::{
    count_bucket_matches, raw_flag, sort_entries, QueryError, QueryParams,
    SortField,
};

pub(crate) async fn apply(
    store: &dyn CatalogStore,
    params: &QueryParams<'_>,
    sort: SortField,
) -> Result<ShelfResult, QueryError> {
    if let Some(spec) = params.spec {
        ensure_supported(spec)?;
    }

    let items = store
        .library_items(params.library_id, MediaType::Podcast)
        .await?;

    let mut entries: Vec<CatalogEntry> = items
        .iter()
        .filter(|item| matches_filter(item, params.spec))
        .map(CatalogEntry::from_item)
        .collect();

    // collapse_series is meaningless for podcasts and is ignored
    sort_entries(
        &mut entries,
        sort,
        params.sort.descending,
        &Default::default(),
    );
    Ok(params.page.slice(entries))
}

fn ensure_supported(spec: &FilterSpec) -> Result<(), QueryError> {
    match spec.group {
        FilterGroup::Series
        | FilterGroup::Ebooks
        | FilterGroup::Progress
        | FilterGroup::Narrators => Err(QueryError::UnsupportedFilterGroup {
            group: spec.group.name().to_string(),
            media_type: MediaType::Podcast,
        }),
        _ => Ok(()),
    }
}

fn matches_filter(item: &LibraryItem, spec: Option<&FilterSpec>) -> bool {
    let Some(spec) = spec else { return true };
    let Some(podcast) = item.media.as_podcast() else {
        return false;
    };
    let value = spec.value.as_deref().unwrap_or("");

    match &spec.group {
        FilterGroup::Genres => podcast.genres.iter().any(|g| g == value),
        FilterGroup::Tags => podcast.tags.iter().any(|t| t == value),
        FilterGroup::Languages => podcast.language.as_deref() == Some(value),
        // podcasts carry no publisher field
        FilterGroup::Publishers => false,
        FilterGroup::Authors => podcast.author.as_deref() == Some(value),
        FilterGroup::Missing => podcast.field_present(value) == Some(false),
        FilterGroup::Tracks => count_bucket_matches(value, podcast.episode_count),
        FilterGroup::Raw(name) => raw_flag(item, name),
        // rejected by ensure_supported before rows are fetched
        FilterGroup::Series
        | FilterGroup::Ebooks
        | FilterGroup::Progress
        | FilterGroup::Narrators => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_book_only_groups_rejected() {
        for group in [
            FilterGroup::Series,
            FilterGroup::Ebooks,
            FilterGroup::Progress,
            FilterGroup::Narrators,
        ] {
            let spec = FilterSpec {
                group,
                value: Some("x".to_string()),
            };
            assert!(matches!(
                ensure_supported(&spec),
                Err(QueryError::UnsupportedFilterGroup { .. })
            ));
        }
    }

    #[test]
    fn test_shared_groups_accepted() {
        for group in [
            FilterGroup::Genres,
            FilterGroup::Tags,
            FilterGroup::Languages,
            FilterGroup::Missing,
            FilterGroup::Tracks,
            FilterGroup::Raw("issues".to_string()),
        ] {
            let spec = FilterSpec {
                group,
                value: Some("x".to_string()),
            };
            assert!(ensure_supported(&spec).is_ok());
        }
    }
}
