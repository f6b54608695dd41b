//! Data structures for the catalog engine.
//!
//! Everything here is a request-scoped projection: rows arrive from
//! storage, get filtered and reshaped, and are discarded after the
//! response is returned. Nothing in this module is persisted or mutated
//! in place.

pub mod entry;
pub mod item;
pub mod progress;
pub mod series;

pub use entry::{CatalogEntry, CollapsedSeries, SeriesShelf, SeriesView, ShelfResult};
pub use item::{AuthorRef, BookMedia, LibraryItem, Media, MediaType, PodcastMedia, SeriesRef};
pub use progress::{MediaProgress, ProgressState};
pub use series::SeriesRecord;
