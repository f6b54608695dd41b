//! Classification of a raw filter string into a (group, value) pair.

use serde::{Deserialize, Serialize};

use super::token::{self, DecodeError};

/// The closed set of recognized filter groups, plus raw field names.
///
/// A grouped filter arrives as `"<group>.<token>"`; anything without a
/// recognized prefix is kept verbatim as a raw boolean flag name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterGroup {
    Genres,
    Tags,
    Series,
    Authors,
    Progress,
    Narrators,
    Publishers,
    Missing,
    Languages,
    Tracks,
    Ebooks,
    Raw(String),
}

impl FilterGroup {
    /// Known groups in the order prefixes are tried
    const KNOWN: [(&'static str, FilterGroup); 11] = [
        ("genres", FilterGroup::Genres),
        ("tags", FilterGroup::Tags),
        ("series", FilterGroup::Series),
        ("authors", FilterGroup::Authors),
        ("progress", FilterGroup::Progress),
        ("narrators", FilterGroup::Narrators),
        ("publishers", FilterGroup::Publishers),
        ("missing", FilterGroup::Missing),
        ("languages", FilterGroup::Languages),
        ("tracks", FilterGroup::Tracks),
        ("ebooks", FilterGroup::Ebooks),
    ];

    /// Wire name of the group
    pub fn name(&self) -> &str {
        match self {
            FilterGroup::Genres => "genres",
            FilterGroup::Tags => "tags",
            FilterGroup::Series => "series",
            FilterGroup::Authors => "authors",
            FilterGroup::Progress => "progress",
            FilterGroup::Narrators => "narrators",
            FilterGroup::Publishers => "publishers",
            FilterGroup::Missing => "missing",
            FilterGroup::Languages => "languages",
            FilterGroup::Tracks => "tracks",
            FilterGroup::Ebooks => "ebooks",
            FilterGroup::Raw(name) => name,
        }
    }
}

/// A resolved filter: which group, and the decoded value when the
/// filter string carried a `"<group>.<token>"` form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub group: FilterGroup,
    pub value: Option<String>,
}

impl FilterSpec {
    /// Classify a raw filter string.
    ///
    /// `None` or empty input means no filtering. Group prefixes match
    /// only on the full `"<group>."` form, so `"genresque"` falls
    /// through to a raw flag name rather than matching `genres`.
    pub fn parse(filter_by: Option<&str>) -> Result<Option<Self>, DecodeError> {
        let raw = match filter_by {
            Some(s) if !s.is_empty() => s,
            _ => return Ok(None),
        };

        for (name, group) in FilterGroup::KNOWN {
            if let Some(rest) = raw.strip_prefix(name) {
                if let Some(tok) = rest.strip_prefix('.') {
                    return Ok(Some(Self {
                        group,
                        value: Some(token::decode(tok)?),
                    }));
                }
            }
        }

        Ok(Some(Self {
            group: FilterGroup::Raw(raw.to_string()),
            value: None,
        }))
    }
}
