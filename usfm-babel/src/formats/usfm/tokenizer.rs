//! Line tokenizer
//!
//! Splits USFM source into lines, then each line into [`Token`]s. Every byte
//! of the input ends up in exactly one token, so the parser can always fall
//! back to a token's raw text without losing anything:
//!
//! ```text
//! \v 1 Paul, \w servant|x-occurrence="1"\w* of God\n
//! └─┬─┘└─┬─┘ └──────────────┬─────────────┘└───┬────┘
//!   v    "Paul, "       w + close w*       Text " of God\n"
//! ```
//!
//! Whitespace rules:
//!
//! - exactly one space (or tab) after a tag or its number is the delimiter;
//!   it is consumed and recorded on the token, and anything beyond it belongs
//!   to the content
//! - content runs to the next marker or the end of the line
//! - the line's newline is attached to the last token on the line: appended
//!   to trailing text, or recorded as the marker's `trailing` char
//! - a single space after a close (`\f* `) is recorded as `trailing`, so the
//!   text that follows does not start with it
//! - a marker with no content keeps its delimiter as `trailing`

use super::markers::MarkerTaxonomy;
use serde::Serialize;

/// One lexical unit of a line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Token {
    Text { text: String },
    Marker(MarkerToken),
}

/// A backslash marker with everything it owns on its line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerToken {
    /// Tag as written, without the backslash (`v`, `+nd`, `zaln-s`, `f*`, `*`)
    pub tag: String,
    pub number: Option<String>,
    /// The consumed space or tab after the tag or number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delimiter: Option<char>,
    /// Text up to the next marker or the end of the line, delimiter excluded
    pub content: String,
    /// Inline close captured right after the content (`w*`, `*`)
    pub close: Option<String>,
    /// Single space or newline following the token
    pub trailing: Option<char>,
    /// Exact source text of the token, trailing char included
    pub raw: String,
}

impl MarkerToken {
    /// Whether this marker only closes something (`\f*`, `\zaln-e`, `\*`).
    pub fn is_closing(&self) -> bool {
        is_closing_tag(&self.tag)
    }

    /// Content with the line's newline re-attached, or just the newline when
    /// the marker had no content. A trailing delimiter space is dropped.
    pub fn body(&self) -> String {
        let mut body = self.content.clone();
        if let Some(c) = self.trailing {
            if c == '\n' || (!body.is_empty() && self.close.is_none()) {
                body.push(c);
            }
        }
        body
    }
}

fn is_closing_tag(tag: &str) -> bool {
    tag.ends_with('*') || tag.ends_with("-e")
}

/// Tokenizes a whole document.
pub fn tokenize(source: &str) -> Vec<Token> {
    tokenize_with(source, MarkerTaxonomy::standard())
}

pub fn tokenize_with(source: &str, taxonomy: &MarkerTaxonomy) -> Vec<Token> {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    let lines: Vec<&str> = source
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();
    let last = lines.len().saturating_sub(1);

    let tokens: Vec<Token> = lines
        .iter()
        .enumerate()
        .flat_map(|(index, line)| tokenize_line(line, index == last, taxonomy))
        .collect();
    tracing::trace!(lines = lines.len(), tokens = tokens.len(), "tokenized");
    tokens
}

/// Tokenizes one line. `is_final` marks the last line of the input, which
/// gets no newline.
pub fn tokenize_line(line: &str, is_final: bool, taxonomy: &MarkerTaxonomy) -> Vec<Token> {
    if line.trim().is_empty() {
        return if is_final {
            Vec::new()
        } else {
            vec![Token::Text {
                text: format!("{line}\n"),
            }]
        };
    }

    let mut scanner = LineScanner {
        line,
        bytes: line.as_bytes(),
        pos: 0,
        is_final,
        taxonomy,
    };
    let mut tokens = Vec::new();

    while scanner.pos < line.len() {
        match scanner.find_marker(scanner.pos) {
            Some(start) => {
                if start > scanner.pos {
                    tokens.push(Token::Text {
                        text: line[scanner.pos..start].to_string(),
                    });
                }
                tokens.push(Token::Marker(scanner.scan_marker(start)));
            }
            None => {
                let mut text = line[scanner.pos..].to_string();
                if !is_final {
                    text.push('\n');
                }
                tokens.push(Token::Text { text });
                scanner.pos = line.len();
            }
        }
    }

    tokens
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

struct LineScanner<'a> {
    line: &'a str,
    bytes: &'a [u8],
    pos: usize,
    is_final: bool,
    taxonomy: &'a MarkerTaxonomy,
}

impl LineScanner<'_> {
    /// Byte offset of the next backslash that starts a marker.
    fn find_marker(&self, from: usize) -> Option<usize> {
        let mut i = from;
        while i < self.bytes.len() {
            if self.bytes[i] == b'\\' && self.starts_marker(i) {
                return Some(i);
            }
            i += 1;
        }
        None
    }

    fn starts_marker(&self, backslash: usize) -> bool {
        match self.bytes.get(backslash + 1) {
            Some(b'*') => true,
            Some(b'+') => self
                .bytes
                .get(backslash + 2)
                .is_some_and(|b| is_word_byte(*b)),
            Some(b) => is_word_byte(*b),
            None => false,
        }
    }

    fn newline(&self) -> Option<char> {
        if self.is_final {
            None
        } else {
            Some('\n')
        }
    }

    fn scan_tag(&self, start: usize) -> usize {
        let len = self.bytes.len();
        let mut i = start + 1;
        if self.bytes[i] == b'*' {
            return i + 1;
        }
        if self.bytes[i] == b'+' {
            i += 1;
        }
        while i < len && is_word_byte(self.bytes[i]) {
            i += 1;
        }
        if i + 1 < len
            && self.bytes[i] == b'-'
            && matches!(self.bytes[i + 1], b's' | b'e')
            && (i + 2 == len || !is_word_byte(self.bytes[i + 2]))
        {
            i += 2;
        }
        if i < len && self.bytes[i] == b'*' {
            i += 1;
        }
        i
    }

    /// Digits after the tag, if the tag takes a number. Returns the number
    /// and the offset past it.
    fn take_number(&self, tag: &str, from: usize) -> Option<(String, usize)> {
        if !self.taxonomy.supports_numeric_argument(tag) {
            return None;
        }
        let len = self.bytes.len();
        let mut i = from;
        while i < len && matches!(self.bytes[i], b' ' | b'\t') {
            i += 1;
        }
        let digits_start = i;
        while i < len && self.bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == digits_start || (i < len && is_word_byte(self.bytes[i])) {
            return None;
        }
        Some((self.line[digits_start..i].to_string(), i))
    }

    fn scan_marker(&mut self, start: usize) -> MarkerToken {
        let len = self.bytes.len();
        let tag_end = self.scan_tag(start);
        let tag = self.line[start + 1..tag_end].to_string();
        let mut i = tag_end;

        let mut token = MarkerToken {
            tag,
            number: None,
            delimiter: None,
            content: String::new(),
            close: None,
            trailing: None,
            raw: String::new(),
        };

        if token.is_closing() || token.tag == "*" {
            if self.line[i..].starts_with("\\*") {
                token.close = Some("*".to_string());
                i += 2;
            }
            token.trailing = self.after_close(&mut i);
            return self.finish(token, start, i);
        }

        if let Some((number, after)) = self.take_number(&token.tag, i) {
            token.number = Some(number);
            i = after;
        }

        if i < len && matches!(self.bytes[i], b' ' | b'\t') {
            token.delimiter = Some(self.bytes[i] as char);
            i += 1;
        }

        let content_end = self.find_marker(i).unwrap_or(len);
        token.content = self.line[i..content_end].to_string();
        i = content_end;

        let inline_close = format!("\\{}*", token.tag);
        if self.line[i..].starts_with("\\*") {
            token.close = Some("*".to_string());
            i += 2;
        } else if self.line[i..].starts_with(&inline_close) {
            token.close = Some(format!("{}*", token.tag));
            i += inline_close.len();
        }

        token.trailing = if token.close.is_some() {
            self.after_close(&mut i)
        } else if i == len {
            self.newline()
        } else if token.content.is_empty() {
            token.delimiter
        } else {
            None
        };

        self.finish(token, start, i)
    }

    fn after_close(&self, i: &mut usize) -> Option<char> {
        if *i == self.bytes.len() {
            self.newline()
        } else if self.bytes[*i] == b' ' {
            *i += 1;
            Some(' ')
        } else {
            None
        }
    }

    fn finish(&mut self, mut token: MarkerToken, start: usize, end: usize) -> MarkerToken {
        token.raw = self.line[start..end].to_string();
        if end == self.bytes.len() && token.trailing == Some('\n') {
            token.raw.push('\n');
        }
        self.pos = end;
        token
    }
}
