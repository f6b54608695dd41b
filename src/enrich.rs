//! Additive decoration of assembled entries.
//!
//! Strictly additive: nothing here filters or reorders. Every method
//! works on the engine's own projection, never on the storage-owned
//! record.

use crate::domain::{CatalogEntry, CollapsedSeries};

impl CatalogEntry {
    /// Attach the series position computed during assembly
    pub fn with_sequence(mut self, sequence: Option<String>) -> Self {
        self.series_sequence = sequence;
        self
    }

    /// Mark this entry as the representative of a collapsed series
    pub fn with_collapsed_series(mut self, series: CollapsedSeries) -> Self {
        self.collapsed_series = Some(series);
        self
    }

    /// Attach a minified feed view
    pub fn attach_feed(&mut self, view: serde_json::Value) {
        self.rss_feed = Some(view);
    }

    /// Copy the item-level size into the media payload when the payload
    /// carries none of its own
    pub fn backfill_media_size(&mut self) {
        if self.media.size().is_none() {
            self.media.set_size(self.size);
        }
    }
}
