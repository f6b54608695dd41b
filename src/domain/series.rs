//! Series rows as handed over by storage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A series row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesRecord {
    pub id: String,
    pub name: String,
    pub library_id: String,
    pub created_at: DateTime<Utc>,
}
