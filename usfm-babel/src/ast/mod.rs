//! Document model shared by every format
//!
//! A [`Document`] is what the USFM parser produces and what every serializer
//! consumes:
//!
//! ```text
//! Document
//! ├── headers: [VerseObject]              everything before the first \c
//! ├── chapters: { "1": { "front": VerseContent,
//! │                      "1":     VerseContent,
//! │                      "3-5":   VerseContent, ... }, ... }
//! └── verses?:  { "1": VerseContent, ... }  fragment (chunk) mode only
//! ```
//!
//! Chapter and verse maps are keyed by [`Ordinal`], which orders ids the way a
//! reader expects (`front` first, then numerically, spans after their start).

mod attributes;
mod nodes;

pub use attributes::{Attribute, AttributeValue, Attributes};
pub use nodes::{Marker, MarkerKind, Milestone, VerseObject, Word};

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

/// Verse id → content for one chapter (or for a fragment).
pub type Chapter = BTreeMap<Ordinal, VerseContent>;

/// A parsed scripture document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub headers: Vec<VerseObject>,
    #[serde(default)]
    pub chapters: BTreeMap<Ordinal, Chapter>,
    /// Flat verse map, present only when parsed in fragment mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verses: Option<Chapter>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chapter(&self, id: &str) -> Option<&Chapter> {
        self.chapters.get(&Ordinal::from(id))
    }

    pub fn verse(&self, chapter: &str, verse: &str) -> Option<&VerseContent> {
        self.chapter(chapter)?.get(&Ordinal::from(verse))
    }

    /// Verse content from the fragment map.
    pub fn fragment_verse(&self, verse: &str) -> Option<&VerseContent> {
        self.verses.as_ref()?.get(&Ordinal::from(verse))
    }

    /// Maps each header tag to its trimmed value. The first occurrence of a
    /// tag wins; text headers are skipped.
    pub fn header_lookup(&self) -> BTreeMap<String, String> {
        let mut lookup = BTreeMap::new();
        for object in &self.headers {
            if let VerseObject::Marker(marker) = object {
                let value = marker.payload().unwrap_or_default().trim().to_string();
                lookup.entry(marker.tag.clone()).or_insert(value);
            }
        }
        lookup
    }
}

/// The objects making up one verse (or the `front` matter of a chapter).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerseContent {
    pub verse_objects: Vec<VerseObject>,
    /// Separator written after the `\v N` or `\c N` that opened this
    /// content, when it is not the usual one. A verse number is normally
    /// followed by a space; a chapter number ends its line, so a `front`
    /// with a delimiter continues on the chapter line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delimiter: Option<char>,
}

impl VerseContent {
    pub fn new(verse_objects: Vec<VerseObject>) -> Self {
        Self {
            verse_objects,
            delimiter: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.verse_objects.is_empty()
    }
}

/// A chapter or verse identifier as written in the source, after leading
/// zeros are stripped. Spans keep their hyphen (`"3-5"`); chapter front
/// matter uses [`Ordinal::FRONT`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ordinal(String);

impl Ordinal {
    pub const FRONT: &'static str = "front";

    pub fn new(id: impl Into<String>) -> Self {
        Ordinal(id.into())
    }

    pub fn front() -> Self {
        Ordinal(Self::FRONT.to_string())
    }

    /// Builds an ordinal from a raw number, stripping leading zeros from
    /// every hyphen-separated part (`"03-05"` → `"3-5"`).
    pub fn normalized(raw: &str) -> Self {
        let parts: Vec<&str> = raw
            .split('-')
            .map(|part| {
                let trimmed = part.trim_start_matches('0');
                if trimmed.is_empty() && !part.is_empty() {
                    "0"
                } else {
                    trimmed
                }
            })
            .collect();
        Ordinal(parts.join("-"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_front(&self) -> bool {
        self.0 == Self::FRONT
    }

    fn leading_number(&self) -> Option<u64> {
        let digits: String = self.0.chars().take_while(|c| c.is_ascii_digit()).collect();
        digits.parse().ok()
    }
}

impl Ord for Ordinal {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.leading_number(), other.leading_number()) {
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(a), Some(b)) => a.cmp(&b).then_with(|| self.0.cmp(&other.0)),
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for Ordinal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<&str> for Ordinal {
    fn from(id: &str) -> Self {
        Ordinal(id.to_string())
    }
}

impl fmt::Display for Ordinal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
