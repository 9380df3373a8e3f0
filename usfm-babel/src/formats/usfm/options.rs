//! Parse and serialize options
//!
//! Both structs deserialize from the `[parse]`/`[serialize]` config sections
//! and can be overridden from string key/value pairs (`--extra-<key>` on the
//! command line). Lists are comma separated; rename tables are
//! `from=to,from2=to2`.

use crate::error::FormatError;
use crate::format::bool_param;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Options for USFM → tree conversion
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Input is a fragment without chapter context; verses go to the flat
    /// `verses` map and `\c` is kept as literal text
    pub chunk: bool,

    /// Stamped on every word as a leading `content-source` attribute
    pub content_source: Option<String>,

    /// Attribute keys whose values become integers when they parse as one
    pub convert_to_int: Vec<String>,

    /// Attribute rename table applied while parsing
    pub map: BTreeMap<String, String>,
}

impl ParseOptions {
    pub fn chunk() -> Self {
        Self {
            chunk: true,
            ..Self::default()
        }
    }

    pub fn from_params(params: &HashMap<String, String>) -> Result<Self, FormatError> {
        let mut options = Self::default();
        options.apply_params(params)?;
        Ok(options)
    }

    /// Overrides only the keys present in `params`.
    pub fn apply_params(&mut self, params: &HashMap<String, String>) -> Result<(), FormatError> {
        if params.contains_key("chunk") {
            self.chunk = bool_param(params, "chunk")?;
        }
        if let Some(source) = params.get("content-source") {
            self.content_source = Some(source.clone()).filter(|s| !s.is_empty());
        }
        if let Some(keys) = params.get("convert-to-int") {
            self.convert_to_int = parse_list(keys);
        }
        if let Some(table) = params.get("map") {
            self.map = parse_table("map", table)?;
        }
        Ok(())
    }
}

/// Options for tree → USFM conversion
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerializeOptions {
    /// Skip chapter scaffolding; emit headers and the flat verse map only
    pub chunk: bool,

    /// Word attribute keys to drop
    pub ignore: Vec<String>,

    /// Word attribute rename table
    pub map: BTreeMap<String, String>,

    /// Milestone attribute keys to drop
    pub milestone_ignore: Vec<String>,

    /// Milestone attribute rename table
    pub milestone_map: BTreeMap<String, String>,

    /// Put verses, words and milestones on their own lines
    pub forced_new_lines: bool,
}

impl SerializeOptions {
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self, FormatError> {
        let mut options = Self::default();
        options.apply_params(params)?;
        Ok(options)
    }

    pub fn apply_params(&mut self, params: &HashMap<String, String>) -> Result<(), FormatError> {
        if params.contains_key("chunk") {
            self.chunk = bool_param(params, "chunk")?;
        }
        if params.contains_key("forced-new-lines") {
            self.forced_new_lines = bool_param(params, "forced-new-lines")?;
        }
        if let Some(keys) = params.get("ignore") {
            self.ignore = parse_list(keys);
        }
        if let Some(keys) = params.get("milestone-ignore") {
            self.milestone_ignore = parse_list(keys);
        }
        if let Some(table) = params.get("map") {
            self.map = parse_table("map", table)?;
        }
        if let Some(table) = params.get("milestone-map") {
            self.milestone_map = parse_table("milestone-map", table)?;
        }
        Ok(())
    }
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}

fn parse_table(key: &str, raw: &str) -> Result<BTreeMap<String, String>, FormatError> {
    let mut table = BTreeMap::new();
    for entry in parse_list(raw) {
        let (from, to) = entry.split_once('=').ok_or_else(|| {
            FormatError::invalid_option(key, format!("expected from=to, got '{entry}'"))
        })?;
        table.insert(from.trim().to_string(), to.trim().to_string());
    }
    Ok(table)
}
