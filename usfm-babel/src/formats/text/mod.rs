//! Plain-text output
//!
//! Strips markup down to the words a reader sees. [`flatten_to_plain_text`]
//! works on a USFM fragment; [`TextFormat`] writes one `chapter:verse text`
//! line per verse of a parsed document.

use crate::ast::{Document, VerseObject};
use crate::error::FormatError;
use crate::format::Format;
use crate::formats::usfm::{parse, ParseOptions};

/// Flattens a USFM fragment to its reading text.
///
/// The fragment is parsed in chunk mode. Text, word text, milestone
/// children and display-marker text are kept; structural markers
/// (footnotes, cross references, headers such as `\id`) are dropped.
/// Empty input is returned unchanged.
pub fn flatten_to_plain_text(fragment: &str) -> String {
    if fragment.is_empty() {
        return String::new();
    }
    let doc = parse(fragment, &ParseOptions::chunk());

    let mut output = String::new();
    collect_text(&doc.headers, &mut output);
    if let Some(verses) = &doc.verses {
        for content in verses.values() {
            collect_text(&content.verse_objects, &mut output);
        }
    }
    output
}

/// Appends the reading text of `objects` to `output`.
pub fn collect_text(objects: &[VerseObject], output: &mut String) {
    for object in objects {
        match object {
            VerseObject::Text { text } => output.push_str(text),
            VerseObject::Word(word) => output.push_str(&word.text),
            VerseObject::Milestone(milestone) => collect_text(&milestone.children, output),
            VerseObject::Marker(marker) => {
                if let Some(text) = &marker.text {
                    output.push_str(text);
                }
                collect_text(&marker.children, output);
                if let Some(c) = marker.next_char {
                    output.push(c);
                }
            }
        }
    }
}

fn verse_text(objects: &[VerseObject]) -> String {
    let mut text = String::new();
    collect_text(objects, &mut text);
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub struct TextFormat;

impl Format for TextFormat {
    fn name(&self) -> &str {
        "text"
    }

    fn description(&self) -> &str {
        "Plain reading text, one verse per line"
    }

    fn file_extensions(&self) -> &[&str] {
        &["txt"]
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        let mut output = String::new();
        for (chapter, verses) in &doc.chapters {
            for (verse, content) in verses.iter().filter(|(id, _)| !id.is_front()) {
                output.push_str(&format!(
                    "{chapter}:{verse} {}\n",
                    verse_text(&content.verse_objects)
                ));
            }
        }
        if let Some(verses) = &doc.verses {
            for (verse, content) in verses {
                output.push_str(&format!("{verse} {}\n", verse_text(&content.verse_objects)));
            }
        }
        Ok(output)
    }
}
