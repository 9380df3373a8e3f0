//! JSON format
//!
//! A direct serde rendering of [`Document`]: `headers`, `chapters` keyed by
//! chapter then verse id, and `verses` for fragments. Output is pretty
//! printed unless the `compact` parameter is set.

use crate::ast::Document;
use crate::error::FormatError;
use crate::format::{bool_param, Format};
use std::collections::HashMap;

#[derive(Default)]
pub struct JsonFormat;

impl JsonFormat {
    fn render(doc: &Document, compact: bool) -> Result<String, FormatError> {
        let mut json = if compact {
            serde_json::to_string(doc)?
        } else {
            serde_json::to_string_pretty(doc)?
        };
        json.push('\n');
        Ok(json)
    }
}

impl Format for JsonFormat {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "Document tree as JSON"
    }

    fn file_extensions(&self) -> &[&str] {
        &["json"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<Document, FormatError> {
        serde_json::from_str(source).map_err(|e| FormatError::ParseError(e.to_string()))
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        Self::render(doc, false)
    }

    fn serialize_with_options(
        &self,
        doc: &Document,
        options: &HashMap<String, String>,
    ) -> Result<String, FormatError> {
        Self::render(doc, bool_param(options, "compact")?)
    }
}
