//! Integration tests for the filtered catalog query.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use shelver::filter::token::encode;
use shelver::{
    AuthorRef, BookMedia, FilteredItemsRequest, LibraryItem, Media, MediaProgress,
    MediaType, MemoryStore, PodcastMedia, QueryError, SeriesRef, ShelfAssembler,
};

fn book_item(
    id: &str,
    added_secs: i64,
    build: impl FnOnce(&mut BookMedia),
) -> LibraryItem {
    let mut media = BookMedia {
        id: format!("m-{id}"),
        title: Some(id.to_string()),
        subtitle: None,
        authors: vec![AuthorRef {
            id: "a1".to_string(),
            name: "Default Author".to_string(),
        }],
        narrators: vec![],
        series: vec![],
        genres: vec![],
        tags: vec![],
        publisher: None,
        language: None,
        duration: None,
        audio_tracks: 1,
        has_ebook: false,
        explicit: false,
        abridged: false,
        size: None,
    };
    build(&mut media);
    LibraryItem {
        id: id.to_string(),
        library_id: "lib1".to_string(),
        added_at: Utc.timestamp_opt(1_700_000_000 + added_secs, 0).unwrap(),
        size: 1000,
        is_missing: false,
        is_invalid: false,
        media: Media::Book(Box::new(media)),
    }
}

fn podcast_item(id: &str, build: impl FnOnce(&mut PodcastMedia)) -> LibraryItem {
    let mut media = PodcastMedia {
        id: format!("m-{id}"),
        title: Some(id.to_string()),
        author: None,
        feed_url: None,
        genres: vec![],
        tags: vec![],
        language: None,
        episode_count: 3,
        explicit: false,
        size: None,
    };
    build(&mut media);
    LibraryItem {
        id: id.to_string(),
        library_id: "pod1".to_string(),
        added_at: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
        size: 500,
        is_missing: false,
        is_invalid: false,
        media: Media::Podcast(Box::new(media)),
    }
}

fn progress(user: &str, item: &str, fraction: f64, updated_secs: i64) -> MediaProgress {
    MediaProgress {
        user_id: user.to_string(),
        library_item_id: item.to_string(),
        progress: fraction,
        ebook_progress: 0.0,
        is_finished: false,
        updated_at: Utc.timestamp_opt(1_700_100_000 + updated_secs, 0).unwrap(),
    }
}

fn genre_store() -> MemoryStore {
    MemoryStore::new()
        .with_item(book_item("li1", 10, |b| {
            b.genres.push("Fantasy".to_string())
        }))
        .with_item(book_item("li2", 20, |b| {
            b.genres.push("Fantasy".to_string())
        }))
        .with_item(book_item("li3", 30, |b| b.genres.push("Sci-Fi".to_string())))
}

#[tokio::test]
async fn test_genre_filter_via_token() {
    let assembler = ShelfAssembler::new(Arc::new(genre_store()));
    let req = FilteredItemsRequest::new("lib1", MediaType::Book)
        .with_filter(format!("genres.{}", encode("Fantasy")));

    let result = assembler.filtered_items(&req).await.unwrap();
    assert_eq!(result.count, 2);
    let ids: Vec<_> = result.items.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["li1", "li2"]);
}

#[tokio::test]
async fn test_count_invariant_across_pagination() {
    let assembler = ShelfAssembler::new(Arc::new(genre_store()));
    let filter = format!("genres.{}", encode("Fantasy"));

    let small = assembler
        .filtered_items(
            &FilteredItemsRequest::new("lib1", MediaType::Book)
                .with_filter(filter.clone())
                .with_page(1, 0),
        )
        .await
        .unwrap();
    let large = assembler
        .filtered_items(
            &FilteredItemsRequest::new("lib1", MediaType::Book)
                .with_filter(filter)
                .with_page(1000, 0),
        )
        .await
        .unwrap();

    assert_eq!(small.items.len(), 1);
    assert_eq!(small.count, large.count);
}

#[tokio::test]
async fn test_pagination_is_a_contiguous_partition() {
    let mut store = MemoryStore::new();
    for i in 0..5 {
        store = store.with_item(book_item(&format!("li{i}"), i * 10, |_| {}));
    }
    let assembler = ShelfAssembler::new(Arc::new(store));

    let mut collected = Vec::new();
    for offset in [0usize, 2, 4] {
        let page = assembler
            .filtered_items(
                &FilteredItemsRequest::new("lib1", MediaType::Book)
                    .with_sort("title", false)
                    .with_page(2, offset),
            )
            .await
            .unwrap();
        assert_eq!(page.count, 5);
        collected.extend(page.items.into_iter().map(|e| e.id));
    }

    // no duplicates, no gaps, full ordered result
    assert_eq!(collected, vec!["li0", "li1", "li2", "li3", "li4"]);
}

#[tokio::test]
async fn test_raw_flag_filter() {
    let store = MemoryStore::new()
        .with_item(book_item("li1", 0, |b| b.explicit = true))
        .with_item(book_item("li2", 0, |_| {}));
    let assembler = ShelfAssembler::new(Arc::new(store));

    let result = assembler
        .filtered_items(
            &FilteredItemsRequest::new("lib1", MediaType::Book).with_filter("explicit"),
        )
        .await
        .unwrap();
    assert_eq!(result.count, 1);
    assert_eq!(result.items[0].id, "li1");
}

#[tokio::test]
async fn test_malformed_token_is_a_decode_error() {
    let assembler = ShelfAssembler::new(Arc::new(genre_store()));
    let err = assembler
        .filtered_items(
            &FilteredItemsRequest::new("lib1", MediaType::Book)
                .with_filter("genres.!!notbase64!!"),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, QueryError::Decode(_)));
}

#[tokio::test]
async fn test_invalid_sort_field_rejected() {
    let assembler = ShelfAssembler::new(Arc::new(genre_store()));
    let err = assembler
        .filtered_items(
            &FilteredItemsRequest::new("lib1", MediaType::Book)
                .with_sort("popularity", true),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, QueryError::InvalidSortField { .. }));
}

#[tokio::test]
async fn test_podcast_rejects_book_only_group() {
    let store = MemoryStore::new().with_item(podcast_item("p1", |_| {}));
    let assembler = ShelfAssembler::new(Arc::new(store));

    let err = assembler
        .filtered_items(
            &FilteredItemsRequest::new("pod1", MediaType::Podcast)
                .with_filter(format!("progress.{}", encode("finished"))),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, QueryError::UnsupportedFilterGroup { .. }));
}

#[tokio::test]
async fn test_podcast_membership_filters() {
    let store = MemoryStore::new()
        .with_item(podcast_item("p1", |p| p.tags.push("news".to_string())))
        .with_item(podcast_item("p2", |p| p.tags.push("tech".to_string())));
    let assembler = ShelfAssembler::new(Arc::new(store));

    let result = assembler
        .filtered_items(
            &FilteredItemsRequest::new("pod1", MediaType::Podcast)
                .with_filter(format!("tags.{}", encode("tech"))),
        )
        .await
        .unwrap();
    assert_eq!(result.count, 1);
    assert_eq!(result.items[0].id, "p2");
}

#[tokio::test]
async fn test_progress_filter_without_user_is_empty() {
    let store = genre_store()
        .with_progress(progress("u1", "li1", 0.5, 0));
    let assembler = ShelfAssembler::new(Arc::new(store));

    let result = assembler
        .filtered_items(
            &FilteredItemsRequest::new("lib1", MediaType::Book)
                .with_filter(format!("progress.{}", encode("in-progress"))),
        )
        .await
        .unwrap();
    assert_eq!(result.count, 0);
    assert!(result.items.is_empty());
}

#[tokio::test]
async fn test_progress_filter_scoped_to_user() {
    let store = genre_store()
        .with_progress(progress("u1", "li1", 0.5, 0))
        .with_progress(progress("u2", "li2", 0.5, 0));
    let assembler = ShelfAssembler::new(Arc::new(store));

    let result = assembler
        .filtered_items(
            &FilteredItemsRequest::new("lib1", MediaType::Book)
                .with_user("u1")
                .with_filter(format!("progress.{}", encode("in-progress"))),
        )
        .await
        .unwrap();
    assert_eq!(result.count, 1);
    assert_eq!(result.items[0].id, "li1");
}

#[tokio::test]
async fn test_progress_sort_orders_by_recency() {
    let store = genre_store()
        .with_progress(progress("u1", "li1", 0.9, 10))
        .with_progress(progress("u1", "li3", 0.1, 50));
    let assembler = ShelfAssembler::new(Arc::new(store));

    let result = assembler
        .filtered_items(
            &FilteredItemsRequest::new("lib1", MediaType::Book)
                .with_user("u1")
                .with_sort("progress", true),
        )
        .await
        .unwrap();

    // li3 was touched last, so it leads despite the lower percentage;
    // the untouched li2 sorts after anything with a record
    let ids: Vec<_> = result.items.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["li3", "li1", "li2"]);
}

#[tokio::test]
async fn test_collapse_series_merges_members() {
    let store = MemoryStore::new()
        .with_item(book_item("li1", 10, |b| {
            b.series.push(SeriesRef {
                id: "s1".to_string(),
                name: "Saga".to_string(),
                sequence: Some("2".to_string()),
            })
        }))
        .with_item(book_item("li2", 20, |b| {
            b.series.push(SeriesRef {
                id: "s1".to_string(),
                name: "Saga".to_string(),
                sequence: Some("1".to_string()),
            })
        }))
        .with_item(book_item("li3", 30, |_| {}));
    let assembler = ShelfAssembler::new(Arc::new(store));

    let result = assembler
        .filtered_items(
            &FilteredItemsRequest::new("lib1", MediaType::Book)
                .with_collapse_series(true)
                .with_sort("addedAt", false),
        )
        .await
        .unwrap();

    assert_eq!(result.count, 2);
    let rep = result
        .items
        .iter()
        .find(|e| e.collapsed_series.is_some())
        .unwrap();
    assert_eq!(rep.id, "li2");
    assert_eq!(rep.series_sequence.as_deref(), Some("1"));
    let summary = rep.collapsed_series.as_ref().unwrap();
    assert_eq!(summary.name, "Saga");
    assert_eq!(summary.num_books, 2);
}

#[tokio::test]
async fn test_missing_field_filter() {
    let store = MemoryStore::new()
        .with_item(book_item("li1", 0, |b| {
            b.narrators.push("Reader".to_string())
        }))
        .with_item(book_item("li2", 0, |_| {}));
    let assembler = ShelfAssembler::new(Arc::new(store));

    let result = assembler
        .filtered_items(
            &FilteredItemsRequest::new("lib1", MediaType::Book)
                .with_filter(format!("missing.{}", encode("narrators"))),
        )
        .await
        .unwrap();
    assert_eq!(result.count, 1);
    assert_eq!(result.items[0].id, "li2");
}
