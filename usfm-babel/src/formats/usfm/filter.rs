//! Marker stripping on raw USFM strings

use regex::{Captures, Regex};
use std::sync::LazyLock;

static MARKER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\\(\w*)\**\s*|\+\s").unwrap());

/// Removes markers from a USFM string without parsing it.
///
/// With `tag`, only markers whose name starts with it go (`f` also removes
/// `\ft` and `\fqa*`); with `None`, every marker does. A marker takes its
/// `*` and the whitespace after it along. A `+ ` caller is always removed.
/// Text between markers, verse numbers included, is kept.
pub fn remove_marker(text: &str, tag: Option<&str>) -> String {
    MARKER
        .replace_all(text, |captures: &Captures| {
            let remove = match (captures.get(1), tag) {
                (Some(name), Some(tag)) => name.as_str().starts_with(tag),
                _ => true,
            };
            if remove {
                String::new()
            } else {
                captures[0].to_string()
            }
        })
        .into_owned()
}
