//! Treeviz formatter for parsed documents
//!
//! A visual rendering of the [`Document`] tree, one node per line:
//!
//! ```text
//! ⧉ Document (1 headers, 1 chapters)
//! ├─ ☰ Headers
//! │ └─ ¶ \id TIT EN_ULT
//! └─ § Chapter 1
//!   ├─ ⊤ front
//!   │ └─ ¶ \p
//!   └─ ℣ Verse 1
//!     ├─ ◦ Paul, a servant of God
//!     └─ ⊕ \zaln
//!       └─ 𝑤 Jesus
//! ```
//!
//! Each line is `<prefix><connector> <icon> <label>`; labels are truncated
//! to 30 characters. Icons come from [`get_icon`].

use super::icons::get_icon;
use crate::ast::{Attributes, Chapter, Document, MarkerKind, Ordinal, VerseContent, VerseObject};
use crate::error::FormatError;
use crate::format::{bool_param, Format};
use std::collections::HashMap;

const LABEL_WIDTH: usize = 30;

enum Entry<'a> {
    Headers(&'a [VerseObject]),
    Chapter(&'a Ordinal, &'a Chapter),
    Verse(&'a Ordinal, &'a VerseContent),
}

struct Treeviz {
    show_attributes: bool,
    output: String,
}

impl Treeviz {
    fn line(&mut self, prefix: &str, is_last: bool, icon: &str, label: &str) {
        let connector = if is_last { "└─" } else { "├─" };
        self.output
            .push_str(&format!("{prefix}{connector} {icon} {label}\n"));
    }

    fn entries(&mut self, entries: &[Entry<'_>], prefix: &str) {
        for (i, entry) in entries.iter().enumerate() {
            let is_last = i == entries.len() - 1;
            let child_prefix = child_prefix(prefix, is_last);
            match entry {
                Entry::Headers(objects) => {
                    self.line(prefix, is_last, get_icon("Headers"), "Headers");
                    self.objects(objects, &child_prefix);
                }
                Entry::Chapter(id, verses) => {
                    self.line(prefix, is_last, get_icon("Chapter"), &format!("Chapter {id}"));
                    let verses: Vec<Entry<'_>> = verses
                        .iter()
                        .map(|(id, content)| Entry::Verse(id, content))
                        .collect();
                    self.entries(&verses, &child_prefix);
                }
                Entry::Verse(id, content) => {
                    if id.is_front() {
                        self.line(prefix, is_last, get_icon("Front"), Ordinal::FRONT);
                    } else {
                        self.line(prefix, is_last, get_icon("Verse"), &format!("Verse {id}"));
                    }
                    self.objects(&content.verse_objects, &child_prefix);
                }
            }
        }
    }

    fn objects(&mut self, objects: &[VerseObject], prefix: &str) {
        for (i, object) in objects.iter().enumerate() {
            self.object(object, prefix, i == objects.len() - 1);
        }
    }

    fn object(&mut self, object: &VerseObject, prefix: &str, is_last: bool) {
        let child_prefix = child_prefix(prefix, is_last);
        match object {
            VerseObject::Text { text } => {
                self.line(prefix, is_last, get_icon("Text"), &display_label(text));
            }
            VerseObject::Word(word) => {
                self.line(prefix, is_last, get_icon("Word"), &display_label(&word.text));
                self.attributes(&word.attributes, &child_prefix, true);
            }
            VerseObject::Milestone(milestone) => {
                let label = format!("\\{}", milestone.tag);
                self.line(prefix, is_last, get_icon("Milestone"), &label);
                self.attributes(&milestone.attributes, &child_prefix, milestone.children.is_empty());
                self.objects(&milestone.children, &child_prefix);
            }
            VerseObject::Marker(marker) => {
                let icon = if marker.kind == Some(MarkerKind::Footnote) {
                    get_icon("Footnote")
                } else {
                    get_icon("Marker")
                };
                let mut label = format!("\\{}", marker.tag);
                if let Some(number) = &marker.number {
                    label.push(' ');
                    label.push_str(number);
                }
                if let Some(payload) = marker.payload().map(str::trim).filter(|p| !p.is_empty()) {
                    label.push(' ');
                    label.push_str(payload);
                }
                self.line(prefix, is_last, icon, &display_label(&label));
                self.objects(&marker.children, &child_prefix);
            }
        }
    }

    fn attributes(&mut self, attributes: &Attributes, prefix: &str, closes_node: bool) {
        if !self.show_attributes {
            return;
        }
        for (i, attribute) in attributes.iter().enumerate() {
            let is_last = closes_node && i == attributes.len() - 1;
            let key = if attribute.extended {
                format!("x-{}", attribute.key)
            } else {
                attribute.key.clone()
            };
            let label = format!("{key}={}", attribute.value);
            self.line(prefix, is_last, get_icon("Attribute"), &label);
        }
    }
}

fn child_prefix(prefix: &str, is_last: bool) -> String {
    format!("{}{}", prefix, if is_last { "  " } else { "│ " })
}

/// Single-line label: whitespace collapsed, truncated with an ellipsis.
fn display_label(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return "⏎".to_string();
    }
    if collapsed.chars().count() > LABEL_WIDTH {
        let truncated: String = collapsed.chars().take(LABEL_WIDTH - 1).collect();
        format!("{truncated}…")
    } else {
        collapsed
    }
}

pub fn to_treeviz_str(doc: &Document) -> String {
    render(doc, false)
}

/// Convert a document to a treeviz string with optional parameters
///
/// # Parameters
///
/// - `"show-attributes"`: when `"true"`, word and milestone attributes are
///   listed as `=` children
pub fn to_treeviz_str_with_params(
    doc: &Document,
    params: &HashMap<String, String>,
) -> Result<String, FormatError> {
    Ok(render(doc, bool_param(params, "show-attributes")?))
}

fn render(doc: &Document, show_attributes: bool) -> String {
    let mut viz = Treeviz {
        show_attributes,
        output: format!(
            "{} Document ({} headers, {} chapters)\n",
            get_icon("Document"),
            doc.headers.len(),
            doc.chapters.len()
        ),
    };

    let mut entries = Vec::new();
    if !doc.headers.is_empty() {
        entries.push(Entry::Headers(&doc.headers));
    }
    entries.extend(doc.chapters.iter().map(|(id, verses)| Entry::Chapter(id, verses)));
    if let Some(verses) = &doc.verses {
        entries.extend(verses.iter().map(|(id, content)| Entry::Verse(id, content)));
    }

    viz.entries(&entries, "");
    viz.output
}

/// Format implementation for treeviz format
pub struct TreevizFormat;

impl Format for TreevizFormat {
    fn name(&self) -> &str {
        "treeviz"
    }

    fn description(&self) -> &str {
        "Visual tree representation with indentation and Unicode icons"
    }

    fn file_extensions(&self) -> &[&str] {
        &["tree", "treeviz"]
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        Ok(to_treeviz_str(doc))
    }

    fn serialize_with_options(
        &self,
        doc: &Document,
        options: &HashMap<String, String>,
    ) -> Result<String, FormatError> {
        to_treeviz_str_with_params(doc, options)
    }
}
