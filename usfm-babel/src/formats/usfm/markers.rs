//! Marker taxonomy
//!
//! Static classification of USFM tags along four axes:
//!
//! - termination: the span runs until an explicit `\tag*` (footnotes, cross
//!   references, character styles)
//! - display text: the payload is shown inline (paragraphs, poetry, headings,
//!   character styles) and is stored as `text` rather than `content`
//! - numeric argument: a number after the tag is the marker's `number`
//!   (chapter, verse and their alternates)
//! - kind: paragraph | quote | section | footnote
//!
//! The tables are built once and never mutated. Unknown tags have no special
//! behavior on any axis. A nested-style `+` prefix is ignored for lookups.

use crate::ast::MarkerKind;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

const PARAGRAPHS: &[&str] = &[
    "p", "m", "mi", "pi", "pi1", "pi2", "pi3", "pm", "pmo", "pmc", "pmr", "pc", "pr", "ph",
    "ph1", "ph2", "ph3", "nb", "cls", "li", "li1", "li2", "li3", "li4", "lh", "lf", "lim",
    "lim1", "lim2", "lim3", "po", "b",
];

const QUOTES: &[&str] = &[
    "q", "q1", "q2", "q3", "q4", "qr", "qc", "qa", "qm", "qm1", "qm2", "qm3", "qd",
];

const SECTIONS: &[&str] = &[
    "s", "s1", "s2", "s3", "s4", "s5", "ms", "ms1", "ms2", "ms3", "mr", "sr", "r", "sp", "sd",
    "sd1", "sd2", "sd3", "sd4", "d",
];

const FOOTNOTES: &[&str] = &["f", "fe", "ef"];

const CHARACTER_STYLES: &[&str] = &[
    "add", "bd", "bdit", "bk", "dc", "em", "it", "k", "lit", "nd", "no", "ord", "pn", "qs",
    "qt", "sc", "sig", "sls", "sup", "tl", "wj",
];

const NEEDS_TERMINATION: &[&str] = &[
    "add", "bd", "bdit", "bk", "ca", "cat", "dc", "ef", "em", "ex", "f", "fa", "fdc", "fe",
    "fig", "fm", "fqa", "fv", "ior", "iqt", "it", "jmp", "k", "lik", "litl", "liv", "liv1",
    "liv2", "liv3", "nd", "ndx", "no", "ord", "pn", "png", "pro", "qac", "qs", "qt", "rb",
    "rq", "rt", "sc", "sig", "sis", "sup", "tl", "va", "vp", "w", "wa", "wg", "wh", "wj", "x",
    "xdc", "xnt", "xop", "xot", "xta",
];

const NUMERIC: &[&str] = &["c", "v", "ca", "va", "cp", "vp"];

static STANDARD: LazyLock<MarkerTaxonomy> = LazyLock::new(MarkerTaxonomy::build);

/// Immutable lookup tables for tag classification.
#[derive(Debug)]
pub struct MarkerTaxonomy {
    termination: HashSet<&'static str>,
    display: HashSet<&'static str>,
    numeric: HashSet<&'static str>,
    kinds: HashMap<&'static str, MarkerKind>,
}

impl MarkerTaxonomy {
    /// The shared taxonomy, built on first use.
    pub fn standard() -> &'static MarkerTaxonomy {
        &STANDARD
    }

    fn build() -> Self {
        let mut kinds = HashMap::new();
        for (tags, kind) in [
            (PARAGRAPHS, MarkerKind::Paragraph),
            (QUOTES, MarkerKind::Quote),
            (SECTIONS, MarkerKind::Section),
            (FOOTNOTES, MarkerKind::Footnote),
        ] {
            for tag in tags {
                kinds.insert(*tag, kind);
            }
        }

        let display = PARAGRAPHS
            .iter()
            .chain(QUOTES)
            .chain(SECTIONS)
            .chain(CHARACTER_STYLES)
            .copied()
            .collect();

        Self {
            termination: NEEDS_TERMINATION.iter().copied().collect(),
            display,
            numeric: NUMERIC.iter().copied().collect(),
            kinds,
        }
    }

    pub fn needs_termination(&self, tag: &str) -> bool {
        self.termination.contains(base_tag(tag))
    }

    pub fn content_is_display_text(&self, tag: &str) -> bool {
        self.display.contains(base_tag(tag))
    }

    pub fn supports_numeric_argument(&self, tag: &str) -> bool {
        self.numeric.contains(base_tag(tag))
    }

    pub fn type_of(&self, tag: &str) -> Option<MarkerKind> {
        self.kinds.get(base_tag(tag)).copied()
    }

    /// Whether the tag is one of the poetic quote styles (`q`, `q1`, …).
    pub fn is_quote(&self, tag: &str) -> bool {
        self.type_of(tag) == Some(MarkerKind::Quote)
    }
}

/// Strips the nested-style `+` prefix.
pub fn base_tag(tag: &str) -> &str {
    tag.strip_prefix('+').unwrap_or(tag)
}

/// `zaln-s` → `Some("zaln")`
pub fn milestone_start(tag: &str) -> Option<&str> {
    tag.strip_suffix("-s").filter(|base| !base.is_empty())
}

/// `zaln-e` → `Some("zaln")`
pub fn milestone_end(tag: &str) -> Option<&str> {
    tag.strip_suffix("-e").filter(|base| !base.is_empty())
}

/// `f*` → `Some("f")`, `+nd*` → `Some("+nd")`
pub fn closing_tag(tag: &str) -> Option<&str> {
    tag.strip_suffix('*').filter(|base| !base.is_empty())
}

/// Whether `end` closes a span opened by `open`.
///
/// Accepted forms for an opener `X` (or milestone `X-s`): `X*`, `X-e`, and
/// the nested alias `+X*`.
pub fn closes(end: &str, open: &str) -> bool {
    let open = base_tag(milestone_start(open).unwrap_or(open));
    let end = closing_tag(end)
        .or_else(|| milestone_end(end))
        .map(base_tag);
    end == Some(open)
}

/// Splits a tag fused with its number (`v12` → `("v", "12")`). Only chapter
/// and verse tags are split.
pub fn split_glued_number(tag: &str) -> Option<(&str, &str)> {
    let (head, digits) = tag.split_at(tag.len().min(1));
    if (head == "c" || head == "v")
        && !digits.is_empty()
        && digits.chars().all(|c| c.is_ascii_digit())
    {
        Some((head, digits))
    } else {
        None
    }
}
