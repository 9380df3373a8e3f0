use super::attributes::Attributes;
use serde::{Deserialize, Serialize};

/// One element of a verse (or of the header list).
///
/// The union is closed: serializers match on it exhaustively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum VerseObject {
    Text { text: String },
    Word(Word),
    Milestone(Milestone),
    Marker(Marker),
}

impl VerseObject {
    pub fn text(text: impl Into<String>) -> Self {
        VerseObject::Text { text: text.into() }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            VerseObject::Text { text } => Some(text),
            _ => None,
        }
    }

    /// Short name used by visualizers and logs.
    pub fn node_type(&self) -> &'static str {
        match self {
            VerseObject::Text { .. } => "Text",
            VerseObject::Word(_) => "Word",
            VerseObject::Milestone(_) => "Milestone",
            VerseObject::Marker(_) => "Marker",
        }
    }
}

/// `\w text|key="value"\w*`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Word {
    pub text: String,
    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    pub attributes: Attributes,
    /// A `|` was written with nothing after it
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub bare_pipe: bool,
}

impl Word {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            attributes: Attributes::new(),
            bare_pipe: false,
        }
    }
}

/// A `\tag-s … \tag-e\*` span. `children` is empty only when the span had no
/// content; `end_tag` is absent when the span was closed implicitly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub tag: String,
    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    pub attributes: Attributes,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<VerseObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_tag: Option<String>,
    /// A `|` was written with nothing after it
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub bare_pipe: bool,
}

impl Milestone {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Attributes::new(),
            children: Vec::new(),
            end_tag: None,
            bare_pipe: false,
        }
    }
}

/// Coarse structural label of a marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerKind {
    Paragraph,
    Quote,
    Section,
    Footnote,
}

/// Any marker that is not a chapter, verse, word or milestone.
///
/// Display-text tags (paragraphs, poetry, headings, character styles) keep
/// their payload in `text`; structural tags keep it in `content`. Exactly one
/// of the two is set when the marker has a payload.
///
/// A display-text span left open on its line (`\wj \w Jesus\w* said\wj*`)
/// keeps its leading text in `text` and everything up to its end tag in
/// `children`. Structural spans such as footnotes never have children: their
/// inner markup stays in `content`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    pub tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<MarkerKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Separator before the payload when it is not a space
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delimiter: Option<char>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<VerseObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_char: Option<char>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_tag: Option<String>,
}

impl Marker {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            kind: None,
            number: None,
            text: None,
            content: None,
            delimiter: None,
            children: Vec::new(),
            next_char: None,
            end_tag: None,
        }
    }

    pub fn payload(&self) -> Option<&str> {
        self.text.as_deref().or(self.content.as_deref())
    }
}
