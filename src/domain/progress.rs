//! Per-user media progress and the states derived from it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user's progress record for one library item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaProgress {
    pub user_id: String,

    pub library_item_id: String,

    /// Audio progress fraction in [0, 1]
    #[serde(default)]
    pub progress: f64,

    /// Ebook progress fraction in [0, 1]
    #[serde(default)]
    pub ebook_progress: f64,

    /// The user marked (or played) the item to completion
    #[serde(default)]
    pub is_finished: bool,

    /// Last time this record was touched
    pub updated_at: DateTime<Utc>,
}

/// Progress state derived from a user's record; never stored.
///
/// A record can satisfy several states at once: an item with both audio
/// and ebook progress is `InProgress`, `AudioInProgress` and
/// `EbookInProgress`. Use [`ProgressState::matches`] rather than deriving
/// a single state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProgressState {
    NotStarted,
    InProgress,
    Finished,
    EbookInProgress,
    AudioInProgress,
}

impl ProgressState {
    /// Parse the wire name of a state ("not-started", "in-progress", ...)
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "not-started" => Some(Self::NotStarted),
            "in-progress" => Some(Self::InProgress),
            "finished" => Some(Self::Finished),
            "ebook-in-progress" => Some(Self::EbookInProgress),
            "audio-in-progress" => Some(Self::AudioInProgress),
            _ => None,
        }
    }

    /// Whether a user's record (or its absence) satisfies this state
    pub fn matches(&self, record: Option<&MediaProgress>) -> bool {
        match record {
            None => *self == Self::NotStarted,
            Some(p) => match self {
                Self::NotStarted => {
                    !p.is_finished && p.progress <= 0.0 && p.ebook_progress <= 0.0
                }
                Self::Finished => p.is_finished,
                Self::InProgress => {
                    !p.is_finished && (p.progress > 0.0 || p.ebook_progress > 0.0)
                }
                Self::AudioInProgress => !p.is_finished && p.progress > 0.0,
                Self::EbookInProgress => !p.is_finished && p.ebook_progress > 0.0,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(progress: f64, ebook: f64, finished: bool) -> MediaProgress {
        MediaProgress {
            user_id: "u1".to_string(),
            library_item_id: "li1".to_string(),
            progress,
            ebook_progress: ebook,
            is_finished: finished,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_no_record_is_not_started() {
        assert!(ProgressState::NotStarted.matches(None));
        assert!(!ProgressState::InProgress.matches(None));
        assert!(!ProgressState::Finished.matches(None));
    }

    #[test]
    fn test_audio_and_ebook_split() {
        let audio = record(0.4, 0.0, false);
        assert!(ProgressState::AudioInProgress.matches(Some(&audio)));
        assert!(!ProgressState::EbookInProgress.matches(Some(&audio)));
        assert!(ProgressState::InProgress.matches(Some(&audio)));

        let ebook = record(0.0, 0.2, false);
        assert!(ProgressState::EbookInProgress.matches(Some(&ebook)));
        assert!(!ProgressState::AudioInProgress.matches(Some(&ebook)));
    }

    #[test]
    fn test_finished_wins_over_fraction() {
        let done = record(0.9, 0.0, true);
        assert!(ProgressState::Finished.matches(Some(&done)));
        assert!(!ProgressState::InProgress.matches(Some(&done)));
        assert!(!ProgressState::AudioInProgress.matches(Some(&done)));
    }

    #[test]
    fn test_parse_wire_names() {
        assert_eq!(
            ProgressState::parse("ebook-in-progress"),
            Some(ProgressState::EbookInProgress)
        );
        assert_eq!(ProgressState::parse("bogus"), None);
    }
}
