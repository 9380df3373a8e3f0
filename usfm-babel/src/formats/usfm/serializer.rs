//! Document → USFM
//!
//! The inverse of the parser. Every newline and every payload-internal space
//! is stored in the tree, so the serializer only re-derives the whitespace
//! the tokenizer consumed:
//!
//! - the single delimiter after a tag or number, unless the tree recorded a
//!   different one
//! - the newline after `\c N`, unless the chapter's `front` carries the
//!   delimiter of a chapter line that continues
//! - one space between two verses that shared a line
//!
//! With `forced_new_lines` verses, words and milestones are moved onto their
//! own lines instead.

use super::markers::MarkerTaxonomy;
use super::options::SerializeOptions;
use crate::ast::{Attribute, Document, Marker, Milestone, Ordinal, VerseContent, VerseObject, Word};
use std::collections::BTreeMap;

const WORD_IGNORE: &[&str] = &["text", "tag", "type"];
const MILESTONE_IGNORE: &[&str] = &["children", "tag", "type", "endTag"];

/// Serializes a document with the given options.
pub fn serialize(doc: &Document, options: &SerializeOptions) -> String {
    UsfmSerializer::new(options).serialize(doc)
}

pub struct UsfmSerializer<'a> {
    options: &'a SerializeOptions,
    taxonomy: &'static MarkerTaxonomy,
    output: String,
}

impl<'a> UsfmSerializer<'a> {
    pub fn new(options: &'a SerializeOptions) -> Self {
        Self {
            options,
            taxonomy: MarkerTaxonomy::standard(),
            output: String::new(),
        }
    }

    pub fn serialize(mut self, doc: &Document) -> String {
        self.write_objects(&doc.headers);

        if !self.options.chunk {
            for (id, chapter) in &doc.chapters {
                self.write_chapter(id, chapter);
            }
        }

        if let Some(verses) = &doc.verses {
            for (id, content) in verses {
                self.write_verse(id, content);
            }
        }

        self.output
    }

    fn write_chapter(&mut self, id: &Ordinal, verses: &BTreeMap<Ordinal, VerseContent>) {
        if !self.output.is_empty() && !self.output.ends_with('\n') {
            self.output.push('\n');
        }
        self.output.push_str("\\c ");
        self.output.push_str(id.as_str());
        let delimiter = verses
            .get(&Ordinal::front())
            .and_then(|front| front.delimiter);
        self.output.push(delimiter.unwrap_or('\n'));

        for (verse_id, content) in verses {
            if verse_id.is_front() {
                self.write_objects(&content.verse_objects);
            } else {
                self.write_verse(verse_id, content);
            }
        }
    }

    fn write_verse(&mut self, id: &Ordinal, content: &VerseContent) {
        self.verse_boundary();
        self.output.push_str("\\v ");
        self.output.push_str(id.as_str());

        if let Some(c) = content.delimiter {
            self.output.push(c);
            self.write_objects(&content.verse_objects);
            return;
        }
        match content.verse_objects.first() {
            None => {}
            Some(VerseObject::Text { text }) if text.starts_with('\n') => {}
            Some(_) => self.output.push(' '),
        }
        self.write_objects(&content.verse_objects);
    }

    fn verse_boundary(&mut self) {
        if self.output.is_empty() || self.output.ends_with('\n') {
            return;
        }
        if self.options.forced_new_lines && !self.on_quote_line() {
            self.output.push('\n');
        } else if !self.output.ends_with(' ') {
            self.output.push(' ');
        }
    }

    fn write_objects(&mut self, objects: &[VerseObject]) {
        for (index, object) in objects.iter().enumerate() {
            match object {
                VerseObject::Text { text } => self.output.push_str(text),
                VerseObject::Word(word) => {
                    self.break_before_phrase();
                    self.write_word(word);
                }
                VerseObject::Milestone(milestone) => {
                    self.break_before_phrase();
                    self.write_milestone(milestone, objects.get(index + 1));
                }
                VerseObject::Marker(marker) => self.write_marker(marker),
            }
        }
    }

    fn write_word(&mut self, word: &Word) {
        self.output.push_str("\\w ");
        self.output.push_str(&word.text);

        let attributes = render_attributes(
            word.attributes.iter(),
            WORD_IGNORE,
            &self.options.ignore,
            &self.options.map,
        );
        if !attributes.is_empty() || word.bare_pipe {
            self.output.push('|');
            self.output.push_str(&attributes);
        }
        self.output.push_str("\\w*");
    }

    fn write_milestone(&mut self, milestone: &Milestone, next: Option<&VerseObject>) {
        self.output.push('\\');
        self.output.push_str(&milestone.tag);
        self.output.push_str("-s");

        let attributes = render_attributes(
            milestone.attributes.iter(),
            MILESTONE_IGNORE,
            &self.options.milestone_ignore,
            &self.options.milestone_map,
        );
        if !attributes.is_empty() || milestone.bare_pipe {
            self.output.push_str(" |");
            self.output.push_str(&attributes);
        }
        self.output.push_str("\\*");

        self.write_objects(&milestone.children);

        if let Some(end_tag) = &milestone.end_tag {
            self.output.push('\\');
            self.output.push_str(end_tag);
        }

        if self.options.forced_new_lines
            && matches!(next, Some(VerseObject::Milestone(_)))
            && !self.output.ends_with('\n')
        {
            self.output.push('\n');
        }
    }

    fn write_marker(&mut self, marker: &Marker) {
        self.output.push('\\');
        self.output.push_str(&marker.tag);

        if let Some(number) = &marker.number {
            self.output.push(' ');
            self.output.push_str(number);
        }
        let payload = marker.payload().filter(|p| !p.is_empty());
        if payload.is_some() || !marker.children.is_empty() {
            if !payload.is_some_and(|p| p.starts_with('\n')) {
                self.output.push(marker.delimiter.unwrap_or(' '));
            }
            self.output.push_str(payload.unwrap_or_default());
        }
        self.write_objects(&marker.children);
        if let Some(end_tag) = &marker.end_tag {
            self.output.push('\\');
            self.output.push_str(end_tag);
        }
        if let Some(c) = marker.next_char {
            self.output.push(c);
        }
    }

    /// With forced new lines a word or milestone starts its own line unless
    /// it directly follows a display marker such as `\q1 `.
    fn break_before_phrase(&mut self) {
        if self.options.forced_new_lines && self.output.ends_with(' ') && !self.on_display_line() {
            self.output.pop();
            self.output.push('\n');
        }
    }

    fn current_line(&self) -> &str {
        match self.output.rfind('\n') {
            Some(pos) => &self.output[pos + 1..],
            None => &self.output,
        }
    }

    fn on_quote_line(&self) -> bool {
        line_tags(self.current_line()).any(|tag| self.taxonomy.is_quote(tag))
    }

    /// Whether the line so far is just `...\tag ` for a display-text tag.
    fn on_display_line(&self) -> bool {
        let line = self.current_line();
        let Some(pos) = line.rfind('\\') else {
            return false;
        };
        let rest = &line[pos + 1..];
        let tag = rest.trim_end();
        tag.len() < rest.len()
            && !tag.is_empty()
            && !tag.contains(char::is_whitespace)
            && self.taxonomy.content_is_display_text(tag)
    }
}

/// Tags of the markers written on `line`.
fn line_tags(line: &str) -> impl Iterator<Item = &str> {
    line.split('\\').skip(1).filter_map(|segment| {
        let end = segment
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '+' || c == '-'))
            .unwrap_or(segment.len());
        Some(&segment[..end]).filter(|tag| !tag.is_empty())
    })
}

fn render_attributes<'x>(
    attributes: impl Iterator<Item = &'x Attribute>,
    always_ignored: &[&str],
    ignore: &[String],
    map: &BTreeMap<String, String>,
) -> String {
    attributes
        .filter(|a| !always_ignored.contains(&a.key.as_str()) && !ignore.contains(&a.key))
        .map(|a| {
            let key = map.get(&a.key).unwrap_or(&a.key);
            let prefix = if a.extended { "x-" } else { "" };
            format!("{prefix}{key}=\"{}\"", a.value)
        })
        .collect::<Vec<_>>()
        .join(" ")
}
