//! shelver - catalog filtering, sorting and shelf assembly for media
//! libraries
//!
//! Given a library of books or podcasts, the engine resolves a filter
//! token and sort specification into a paginated, deterministically
//! ordered set of catalog items, and assembles derived shelves
//! (in-progress, recently added, continue-series, recent series) from
//! the same primitives.
//!
//! # Architecture
//!
//! - Filter strings are classified into a (group, value) pair; values
//!   travel as base64 tokens so they survive URL plumbing.
//! - Each media kind has its own filter strategy; dispatch happens once,
//!   on a closed enum.
//! - Storage is an injected read-only trait; every operation is a pure
//!   function of its inputs plus what the store returns.
//!
//! # Modules
//!
//! - `domain`: request-scoped data model and result shapes
//! - `filter`: token codec, filter classification, sequence ordering
//! - `store`: the `CatalogStore` contract and an in-memory reference
//! - `query`: filter + sort + paginate strategies per media kind
//! - `shelf`: the exposed operations (`ShelfAssembler`)
//! - `enrich`: additive decoration of assembled entries
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use shelver::{FilteredItemsRequest, MediaType, MemoryStore, ShelfAssembler};
//!
//! # async fn demo() -> Result<(), shelver::QueryError> {
//! let assembler = ShelfAssembler::new(Arc::new(MemoryStore::new()));
//! let req = FilteredItemsRequest::new("lib1", MediaType::Book)
//!     .with_sort("addedAt", true)
//!     .with_page(25, 0);
//! let page = assembler.filtered_items(&req).await?;
//! println!("{} of {} items", page.items.len(), page.count);
//! # Ok(())
//! # }
//! ```

pub mod domain;
pub mod enrich;
pub mod filter;
pub mod query;
pub mod shelf;
pub mod store;

// Re-export main types at crate root for convenience
pub use domain::{
    AuthorRef, BookMedia, CatalogEntry, CollapsedSeries, LibraryItem, Media,
    MediaProgress, MediaType, PodcastMedia, ProgressState, SeriesRecord,
    SeriesRef, SeriesShelf, SeriesView, ShelfResult,
};
pub use filter::{compare_sequences, DecodeError, FilterGroup, FilterSpec};
pub use query::{Pagination, QueryError, SortSpec};
pub use shelf::{FilteredItemsRequest, IncludeFlags, Library, ShelfAssembler};
pub use store::{CatalogStore, MemoryStore};
