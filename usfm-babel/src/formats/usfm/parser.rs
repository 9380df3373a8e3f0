//! USFM → Document
//!
//! A single pass over the token stream. The parser keeps three pieces of
//! position state:
//!
//! - the cursor: which slot receives new objects (headers, a verse, a
//!   fragment verse, or a discard bin for suppressed content)
//! - the scope stack: open `\tag-s` milestones and open display-text spans
//!   (`\wj`, `\add`, `\nd`…); objects go into the top one
//! - the span stack: open structural markers that need termination (`\f`,
//!   `\x`); while it is non-empty every token is appended verbatim to the
//!   outermost marker's payload
//!
//! Verse and chapter tokens close both stacks implicitly. Nothing here can
//! fail: unknown tags become neutral markers, unmatched closers and numberless
//! `\c`/`\v` become literal text, and duplicate verses are dropped.

use super::arena::{Node, NodeId, NodeStore};
use super::markers::{self, MarkerTaxonomy};
use super::options::ParseOptions;
use super::tokenizer::{self, MarkerToken, Token};
use crate::ast::{
    Attribute, AttributeValue, Attributes, Document, Marker, Milestone, Ordinal, VerseContent,
    VerseObject, Word,
};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use tracing::debug;

static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(x-)?([\w-]+)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap()
});

/// Parses a complete document (or a fragment when `options.chunk` is set).
pub fn parse(source: &str, options: &ParseOptions) -> Document {
    let taxonomy = MarkerTaxonomy::standard();
    let mut parser = Parser::new(options, taxonomy);
    for token in tokenizer::tokenize_with(source, taxonomy) {
        parser.feed(token);
    }
    parser.finish()
}

#[derive(Debug, Clone)]
enum Cursor {
    Headers,
    Verse { chapter: Ordinal, verse: Ordinal },
    Fragment(Ordinal),
    Discard,
}

/// Content of one verse (or `front`) while it is being collected.
#[derive(Debug, Default)]
struct Slot {
    nodes: Vec<NodeId>,
    delimiter: Option<char>,
}

/// A chapter or verse number with what follows it on the token.
#[derive(Debug, PartialEq)]
struct Numbered {
    number: String,
    delimiter: Option<char>,
    rest: String,
}

struct Parser<'a> {
    options: &'a ParseOptions,
    taxonomy: &'static MarkerTaxonomy,
    store: NodeStore,
    headers: Vec<NodeId>,
    chapters: BTreeMap<Ordinal, BTreeMap<Ordinal, Slot>>,
    fragment: BTreeMap<Ordinal, Slot>,
    discard: Vec<NodeId>,
    cursor: Cursor,
    current_chapter: Option<Ordinal>,
    /// Set by a duplicate verse; suppresses the rest of the chapter
    duplicate: bool,
    /// Open milestones and display-text spans, innermost last
    scopes: Vec<NodeId>,
    /// Tags of the open structural spans, outermost first
    spans: Vec<String>,
    span_root: Option<NodeId>,
}

impl<'a> Parser<'a> {
    fn new(options: &'a ParseOptions, taxonomy: &'static MarkerTaxonomy) -> Self {
        Self {
            options,
            taxonomy,
            store: NodeStore::new(),
            headers: Vec::new(),
            chapters: BTreeMap::new(),
            fragment: BTreeMap::new(),
            discard: Vec::new(),
            cursor: Cursor::Headers,
            current_chapter: None,
            duplicate: false,
            scopes: Vec::new(),
            spans: Vec::new(),
            span_root: None,
        }
    }

    fn feed(&mut self, token: Token) {
        match token {
            Token::Text { text } => self.insert_text(&text),
            Token::Marker(marker) => self.feed_marker(unglue(marker)),
        }
    }

    fn feed_marker(&mut self, token: MarkerToken) {
        if token.tag == "c" && !self.options.chunk {
            self.chapter(token);
        } else if token.tag == "v" {
            self.verse(token);
        } else if !self.spans.is_empty() {
            self.continue_span(token);
        } else if token.tag == "w" && token.close.is_some() {
            self.word(token);
        } else if markers::milestone_start(&token.tag).is_some() {
            self.milestone_start(token);
        } else if token.is_closing() {
            self.close(token);
        } else {
            self.marker(token);
        }
    }

    fn chapter(&mut self, token: MarkerToken) {
        let Some(Numbered {
            number,
            delimiter,
            rest,
        }) = resolve_number(&token)
        else {
            debug!(raw = %token.raw.trim_end(), "chapter marker without a number kept as text");
            self.insert_text(&token.raw);
            return;
        };
        self.close_spans();
        self.close_scopes();

        let id = Ordinal::normalized(&number);
        self.current_chapter = Some(id.clone());
        self.duplicate = false;

        if self.chapters.contains_key(&id) {
            debug!(chapter = %id, "chapter reopened; front matter dropped");
            self.cursor = Cursor::Discard;
        } else {
            self.chapters.insert(id.clone(), BTreeMap::new());
            self.cursor = Cursor::Verse {
                chapter: id,
                verse: Ordinal::front(),
            };
        }

        let body = with_newline(rest, token.trailing);
        match delimiter {
            // The chapter line goes on: `\c 1 \p`
            Some(c) => {
                self.set_delimiter(c);
                if !body.is_empty() {
                    self.insert_text(&body);
                }
            }
            None if !body.is_empty() && !body.starts_with('\n') => self.insert_text(&body),
            None => {}
        }
    }

    fn verse(&mut self, token: MarkerToken) {
        let Some(numbered) = resolve_number(&token) else {
            debug!(raw = %token.raw.trim_end(), "verse marker without a number kept as text");
            self.insert_text(&token.raw);
            return;
        };
        self.close_spans();
        self.close_scopes();

        let Numbered {
            number,
            delimiter,
            rest,
        } = split_verse_span(numbered);
        let id = Ordinal::normalized(&number);
        self.cursor = self.open_verse(id);
        if let Some(c) = delimiter.filter(|c| *c != ' ') {
            self.set_delimiter(c);
        }

        let body = with_newline(rest, token.trailing);
        if !body.is_empty() {
            self.insert_text(&body);
        }
    }

    fn open_verse(&mut self, id: Ordinal) -> Cursor {
        if self.options.chunk {
            if self.fragment.contains_key(&id) {
                debug!(verse = %id, "duplicate fragment verse suppressed");
                return Cursor::Discard;
            }
            self.fragment.insert(id.clone(), Slot::default());
            return Cursor::Fragment(id);
        }

        let Some(chapter) = self.current_chapter.clone() else {
            debug!(verse = %id, "verse before the first chapter dropped");
            return Cursor::Discard;
        };
        if self.duplicate {
            debug!(chapter = %chapter, verse = %id, "verse suppressed after duplicate");
            return Cursor::Discard;
        }
        let verses = self.chapters.entry(chapter.clone()).or_default();
        if verses.contains_key(&id) {
            debug!(chapter = %chapter, verse = %id, "duplicate verse; rest of chapter suppressed");
            self.duplicate = true;
            return Cursor::Discard;
        }
        verses.insert(id.clone(), Slot::default());
        Cursor::Verse { chapter, verse: id }
    }

    fn word(&mut self, token: MarkerToken) {
        let (text, attributes) = match token.content.split_once('|') {
            Some((text, attributes)) => (text, Some(attributes)),
            None => (token.content.as_str(), None),
        };

        let mut word = Word::new(text.trim());
        if let Some(source) = &self.options.content_source {
            word.attributes
                .push(Attribute::new("content-source", source.as_str()));
        }
        if let Some(raw) = attributes {
            word.bare_pipe = raw.trim().is_empty();
            self.parse_attributes(raw, &mut word.attributes);
        }

        self.insert_object(VerseObject::Word(word));
        if let Some(c) = token.trailing {
            self.insert_text(&c.to_string());
        }
    }

    fn milestone_start(&mut self, token: MarkerToken) {
        let tag = markers::milestone_start(&token.tag).unwrap_or(&token.tag);
        let mut milestone = Milestone::new(tag);
        if let Some((_, raw)) = token.content.split_once('|') {
            milestone.bare_pipe = raw.trim().is_empty();
            self.parse_attributes(raw, &mut milestone.attributes);
        }

        let id = self.insert_object(VerseObject::Milestone(milestone));
        self.scopes.push(id);
        if let Some(c) = token.trailing {
            self.insert_text(&c.to_string());
        }
    }

    /// Closes the innermost open milestone or display-text span that
    /// `token` ends.
    fn close(&mut self, token: MarkerToken) {
        let matched = self.scopes.iter().rposition(|id| match self.store.get(*id) {
            Node::Milestone { milestone, .. } => markers::closes(&token.tag, &milestone.tag),
            Node::Marker { marker, .. } => markers::closes(&token.tag, &marker.tag),
            Node::Leaf(_) => false,
        });

        let Some(index) = matched else {
            debug!(tag = %token.tag, "unmatched end marker kept as text");
            self.insert_text(&token.raw);
            return;
        };

        // Anything opened after the match closes implicitly.
        let inner: Vec<NodeId> = self.scopes.drain(index + 1..).collect();
        for id in inner {
            self.seal(id, None);
        }
        let Some(id) = self.scopes.pop() else {
            return;
        };
        let is_milestone = matches!(self.store.get(id), Node::Milestone { .. });
        self.seal(id, Some(&token));
        if is_milestone {
            if let Some(c) = token.trailing {
                self.insert_text(&c.to_string());
            }
        }
    }

    fn marker(&mut self, token: MarkerToken) {
        let mut marker = Marker::new(token.tag.clone());
        marker.kind = self.taxonomy.type_of(&token.tag);
        marker.number = token.number.clone();

        let opens_span = self.taxonomy.needs_termination(&token.tag) && token.close.is_none();
        let payload = if opens_span {
            Some(token.body())
        } else if token.close.is_some() {
            marker.end_tag = token.close.clone();
            marker.next_char = token.trailing;
            Some(token.content.clone()).filter(|c| !c.is_empty())
        } else if token.content.is_empty() {
            marker.next_char = token.trailing;
            None
        } else {
            Some(token.body())
        };
        if opens_span || payload.is_some() {
            marker.delimiter = token.delimiter.filter(|c| *c != ' ');
        }

        let display = self.taxonomy.content_is_display_text(&token.tag);
        if display {
            marker.text = payload;
        } else {
            marker.content = payload;
        }

        let id = self.insert_object(VerseObject::Marker(marker));
        if opens_span && display {
            self.scopes.push(id);
        } else if opens_span {
            self.spans.push(token.tag);
            self.span_root = Some(id);
        }
    }

    /// Handles a token while a structural span is open.
    fn continue_span(&mut self, token: MarkerToken) {
        if token.is_closing() {
            if let Some(index) = self.spans.iter().rposition(|open| markers::closes(&token.tag, open)) {
                self.spans.truncate(index);
                if !self.spans.is_empty() {
                    self.append_to_span(&token.raw);
                } else if let Some(root) = self.span_root.take() {
                    self.seal(root, Some(&token));
                }
                return;
            }
        } else if self.taxonomy.needs_termination(&token.tag) && token.close.is_none() {
            self.spans.push(token.tag.clone());
        }
        self.append_to_span(&token.raw);
    }

    fn append_to_span(&mut self, text: &str) {
        let Some(root) = self.span_root else {
            return;
        };
        if let Node::Marker { marker, .. } = self.store.get_mut(root) {
            let payload = if marker.text.is_some() {
                &mut marker.text
            } else {
                &mut marker.content
            };
            payload.get_or_insert_with(String::new).push_str(text);
        }
    }

    /// Finishes an open milestone or marker. Without a closer it was closed
    /// implicitly and keeps no end tag.
    fn seal(&mut self, id: NodeId, closer: Option<&MarkerToken>) {
        match self.store.get_mut(id) {
            Node::Milestone { milestone, .. } => {
                if let Some(closer) = closer {
                    milestone.end_tag = Some(end_tag(closer));
                }
            }
            Node::Marker { marker, .. } => {
                if marker.text.as_deref() == Some("") {
                    marker.text = None;
                }
                if marker.content.as_deref() == Some("") {
                    marker.content = None;
                }
                if let Some(closer) = closer {
                    marker.end_tag = Some(end_tag(closer));
                    marker.next_char = closer.trailing;
                }
            }
            Node::Leaf(_) => {}
        }
    }

    fn close_spans(&mut self) {
        if !self.spans.is_empty() {
            debug!(open = ?self.spans, "open spans closed implicitly");
        }
        self.spans.clear();
        if let Some(root) = self.span_root.take() {
            self.seal(root, None);
        }
    }

    fn close_scopes(&mut self) {
        if !self.scopes.is_empty() {
            debug!(open = self.scopes.len(), "open milestones and spans closed implicitly");
        }
        for id in std::mem::take(&mut self.scopes) {
            self.seal(id, None);
        }
    }

    fn parse_attributes(&self, raw: &str, attributes: &mut Attributes) {
        let raw = raw.trim();
        if raw.is_empty() {
            return;
        }
        if !raw.contains('=') {
            attributes.push(Attribute::new("lemma", raw));
            return;
        }

        for captures in ATTRIBUTE.captures_iter(raw) {
            let extended = captures.get(1).is_some();
            let mut key = captures[2].to_string();
            let value = captures
                .get(3)
                .or_else(|| captures.get(4))
                .map_or("", |m| m.as_str());

            if key == "strongs" {
                key = "strong".to_string();
            }
            if let Some(renamed) = self.options.map.get(&key) {
                key = renamed.clone();
            }

            let value = if self.options.convert_to_int.contains(&key) {
                value
                    .parse::<i64>()
                    .map(AttributeValue::Integer)
                    .unwrap_or_else(|_| value.into())
            } else {
                value.into()
            };

            attributes.push(Attribute {
                key,
                value,
                extended,
            });
        }
    }

    /// Appends an object to the innermost open scope.
    fn insert_object(&mut self, object: VerseObject) -> NodeId {
        let id = self.store.alloc(object);
        if let Some(&top) = self.scopes.last() {
            if let Some(children) = self.store.children_mut(top) {
                children.push(id);
                return id;
            }
        }
        self.scope().push(id);
        id
    }

    fn insert_text(&mut self, text: &str) {
        if self.span_root.is_some() {
            self.append_to_span(text);
            return;
        }
        if let Some(&top) = self.scopes.last() {
            if let Some(children) = self.store.children_mut(top) {
                let mut scope = std::mem::take(children);
                self.store.push_text(&mut scope, text);
                if let Some(children) = self.store.children_mut(top) {
                    *children = scope;
                }
                return;
            }
        }
        let mut scope = std::mem::take(self.scope());
        self.store.push_text(&mut scope, text);
        *self.scope() = scope;
    }

    fn slot(&mut self) -> Option<&mut Slot> {
        match &self.cursor {
            Cursor::Verse { chapter, verse } => Some(
                self.chapters
                    .entry(chapter.clone())
                    .or_default()
                    .entry(verse.clone())
                    .or_default(),
            ),
            Cursor::Fragment(verse) => Some(self.fragment.entry(verse.clone()).or_default()),
            Cursor::Headers | Cursor::Discard => None,
        }
    }

    fn set_delimiter(&mut self, c: char) {
        if let Some(slot) = self.slot() {
            slot.delimiter = Some(c);
        }
    }

    fn scope(&mut self) -> &mut Vec<NodeId> {
        match &self.cursor {
            Cursor::Headers => &mut self.headers,
            Cursor::Verse { chapter, verse } => {
                &mut self
                    .chapters
                    .entry(chapter.clone())
                    .or_default()
                    .entry(verse.clone())
                    .or_default()
                    .nodes
            }
            Cursor::Fragment(verse) => &mut self.fragment.entry(verse.clone()).or_default().nodes,
            Cursor::Discard => &mut self.discard,
        }
    }

    fn finish(mut self) -> Document {
        self.close_spans();
        self.close_scopes();

        let headers = self.store.take_all(&self.headers);
        let chapters = std::mem::take(&mut self.chapters)
            .into_iter()
            .map(|(id, verses)| (id, self.materialize(verses)))
            .collect();
        let verses = if self.options.chunk {
            let fragment = std::mem::take(&mut self.fragment);
            Some(self.materialize(fragment))
        } else {
            None
        };

        Document {
            headers,
            chapters,
            verses,
        }
    }

    fn materialize(&mut self, verses: BTreeMap<Ordinal, Slot>) -> BTreeMap<Ordinal, VerseContent> {
        verses
            .into_iter()
            .map(|(id, slot)| {
                let content = VerseContent {
                    verse_objects: self.store.take_all(&slot.nodes),
                    delimiter: slot.delimiter,
                };
                (id, content)
            })
            .collect()
    }
}

/// Splits `\v12` into tag `v` and number `12`.
fn unglue(mut token: MarkerToken) -> MarkerToken {
    if token.number.is_none() {
        if let Some((tag, digits)) = markers::split_glued_number(&token.tag) {
            token.number = Some(digits.to_string());
            token.tag = tag.to_string();
        }
    }
    token
}

/// `zaln-e` + `*` → `zaln-e\*`; `wj*` stays `wj*`
fn end_tag(closer: &MarkerToken) -> String {
    let mut end_tag = closer.tag.clone();
    if let Some(close) = &closer.close {
        end_tag.push('\\');
        end_tag.push_str(close);
    }
    end_tag
}

/// Number and remaining content of a chapter or verse token. When the
/// tokenizer did not capture a number, a leading word that starts with a
/// digit (`1a`) is used instead.
fn resolve_number(token: &MarkerToken) -> Option<Numbered> {
    if let Some(number) = &token.number {
        return Some(Numbered {
            number: number.clone(),
            delimiter: token.delimiter,
            rest: token.content.clone(),
        });
    }
    let content = token.content.as_str();
    if !content.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }
    let end = content.find(char::is_whitespace).unwrap_or(content.len());
    let (delimiter, rest) = split_delimiter(&content[end..]);
    Some(Numbered {
        number: content[..end].to_string(),
        delimiter,
        rest: rest.to_string(),
    })
}

/// `1` + `-3 text` → `1-3` + `text`
fn split_verse_span(numbered: Numbered) -> Numbered {
    let Some(tail) = numbered.rest.strip_prefix('-') else {
        return numbered;
    };
    let digits = tail.len() - tail.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    let after = &tail[digits..];
    if digits == 0 || !(after.is_empty() || after.starts_with(char::is_whitespace)) {
        return numbered;
    }
    let (delimiter, rest) = split_delimiter(after);
    Numbered {
        number: format!("{}-{}", numbered.number, &tail[..digits]),
        delimiter,
        rest: rest.to_string(),
    }
}

fn split_delimiter(text: &str) -> (Option<char>, &str) {
    match text.chars().next() {
        Some(c @ (' ' | '\t')) => (Some(c), &text[1..]),
        _ => (None, text),
    }
}

fn with_newline(mut text: String, trailing: Option<char>) -> String {
    if trailing == Some('\n') {
        text.push('\n');
    }
    text
}
