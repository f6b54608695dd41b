//! Shelf assembly: the exposed operation surface of the engine.

pub mod assembler;

pub use assembler::{FilteredItemsRequest, IncludeFlags, Library, ShelfAssembler};
