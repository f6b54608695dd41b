//! Library items and their media payloads.
//!
//! A `LibraryItem` is the raw stored record as handed over by storage;
//! the engine never writes one back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The two media kinds a library can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Book,
    Podcast,
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaType::Book => write!(f, "book"),
            MediaType::Podcast => write!(f, "podcast"),
        }
    }
}

/// A raw stored library record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryItem {
    /// Unique item identifier (opaque, assigned by storage)
    pub id: String,

    /// Library this item belongs to
    pub library_id: String,

    /// When the item was added to the library
    pub added_at: DateTime<Utc>,

    /// Total size of the item's files on disk
    pub size: u64,

    /// Some of the item's files are missing on disk
    #[serde(default)]
    pub is_missing: bool,

    /// The item failed a scan and is unusable
    #[serde(default)]
    pub is_invalid: bool,

    /// Media payload (book or podcast)
    pub media: Media,
}

/// Media payload, tagged by kind
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "mediaType", rename_all = "lowercase")]
pub enum Media {
    Book(Box<BookMedia>),
    Podcast(Box<PodcastMedia>),
}

impl Media {
    pub fn media_type(&self) -> MediaType {
        match self {
            Media::Book(_) => MediaType::Book,
            Media::Podcast(_) => MediaType::Podcast,
        }
    }

    /// Payload-level size, when the media itself carries one
    pub fn size(&self) -> Option<u64> {
        match self {
            Media::Book(b) => b.size,
            Media::Podcast(p) => p.size,
        }
    }

    pub(crate) fn set_size(&mut self, size: u64) {
        match self {
            Media::Book(b) => b.size = Some(size),
            Media::Podcast(p) => p.size = Some(size),
        }
    }

    pub fn title(&self) -> Option<&str> {
        match self {
            Media::Book(b) => b.title.as_deref(),
            Media::Podcast(p) => p.title.as_deref(),
        }
    }

    pub fn genres(&self) -> &[String] {
        match self {
            Media::Book(b) => &b.genres,
            Media::Podcast(p) => &p.genres,
        }
    }

    pub fn tags(&self) -> &[String] {
        match self {
            Media::Book(b) => &b.tags,
            Media::Podcast(p) => &p.tags,
        }
    }

    pub fn language(&self) -> Option<&str> {
        match self {
            Media::Book(b) => b.language.as_deref(),
            Media::Podcast(p) => p.language.as_deref(),
        }
    }

    pub fn explicit(&self) -> bool {
        match self {
            Media::Book(b) => b.explicit,
            Media::Podcast(p) => p.explicit,
        }
    }

    /// Book payload, if this is a book
    pub fn as_book(&self) -> Option<&BookMedia> {
        match self {
            Media::Book(b) => Some(b),
            Media::Podcast(_) => None,
        }
    }

    /// Podcast payload, if this is a podcast
    pub fn as_podcast(&self) -> Option<&PodcastMedia> {
        match self {
            Media::Book(_) => None,
            Media::Podcast(p) => Some(p),
        }
    }
}

/// Reference to an author by id and display name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorRef {
    pub id: String,
    pub name: String,
}

/// A book's membership in a series, with its position string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesRef {
    pub id: String,
    pub name: String,
    /// Position within the series ("1", "2.5", ...); None when unordered
    pub sequence: Option<String>,
}

/// Book media payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookMedia {
    pub id: String,
    pub title: Option<String>,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub authors: Vec<AuthorRef>,
    #[serde(default)]
    pub narrators: Vec<String>,
    #[serde(default)]
    pub series: Vec<SeriesRef>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    /// Total audio duration in seconds
    #[serde(default)]
    pub duration: Option<f64>,
    /// Number of audio files
    #[serde(default)]
    pub audio_tracks: u32,
    /// An ebook file is attached to this book
    #[serde(default)]
    pub has_ebook: bool,
    #[serde(default)]
    pub explicit: bool,
    #[serde(default)]
    pub abridged: bool,
    /// Payload size in bytes, when known
    #[serde(default)]
    pub size: Option<u64>,
}

impl BookMedia {
    /// Joined author display name, in stored order
    pub fn author_name(&self) -> String {
        self.authors
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Presence of a named metadata field. `None` means the field name
    /// is not part of the book vocabulary.
    pub fn field_present(&self, field: &str) -> Option<bool> {
        let present = match field {
            "title" => self.title.is_some(),
            "subtitle" => self.subtitle.is_some(),
            "authors" => !self.authors.is_empty(),
            "narrators" => !self.narrators.is_empty(),
            "series" => !self.series.is_empty(),
            "genres" => !self.genres.is_empty(),
            "tags" => !self.tags.is_empty(),
            "publisher" => self.publisher.is_some(),
            "language" => self.language.is_some(),
            "ebook" => self.has_ebook,
            _ => return None,
        };
        Some(present)
    }
}

/// Podcast media payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PodcastMedia {
    pub id: String,
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub feed_url: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub language: Option<String>,
    /// Number of downloaded episodes
    #[serde(default)]
    pub episode_count: u32,
    #[serde(default)]
    pub explicit: bool,
    /// Payload size in bytes, when known
    #[serde(default)]
    pub size: Option<u64>,
}

impl PodcastMedia {
    /// Presence of a named metadata field. `None` means the field name
    /// is not part of the podcast vocabulary.
    pub fn field_present(&self, field: &str) -> Option<bool> {
        let present = match field {
            "title" => self.title.is_some(),
            "author" => self.author.is_some(),
            "feedUrl" => self.feed_url.is_some(),
            "genres" => !self.genres.is_empty(),
            "tags" => !self.tags.is_empty(),
            "language" => self.language.is_some(),
            _ => return None,
        };
        Some(present)
    }
}
