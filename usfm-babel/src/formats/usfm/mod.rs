//! USFM format implementation
//!
//! The core converter. Parsing runs tokenizer → parser over the shared
//! [`MarkerTaxonomy`](markers::MarkerTaxonomy); serialization walks the tree
//! back to markup. Both directions are infallible; the `Result`s returned
//! through [`Format`] only carry option errors.
//!
//! Extra parameters are split by direction: `chunk`, `content-source`,
//! `convert-to-int` and `map` apply to parsing; `chunk`, `ignore`, `map`,
//! `milestone-ignore`, `milestone-map` and `forced-new-lines` apply to
//! serialization. Keys meant for the other direction are ignored.

use crate::ast::Document;
use crate::error::FormatError;
use crate::format::Format;
use std::collections::HashMap;

pub(crate) mod arena;
pub mod filter;
pub mod markers;
pub mod options;
pub mod parser;
pub mod serializer;
pub mod tokenizer;

pub use filter::remove_marker;
pub use options::{ParseOptions, SerializeOptions};
pub use parser::parse;
pub use serializer::serialize;

/// USFM reader and writer with configurable default options.
#[derive(Default)]
pub struct UsfmFormat {
    parse_options: ParseOptions,
    serialize_options: SerializeOptions,
}

impl UsfmFormat {
    pub fn new(parse_options: ParseOptions, serialize_options: SerializeOptions) -> Self {
        Self {
            parse_options,
            serialize_options,
        }
    }
}

impl Format for UsfmFormat {
    fn name(&self) -> &str {
        "usfm"
    }

    fn description(&self) -> &str {
        "Unified Standard Format Markers"
    }

    fn file_extensions(&self) -> &[&str] {
        &["usfm", "sfm"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<Document, FormatError> {
        Ok(parse(source, &self.parse_options))
    }

    fn parse_with_options(
        &self,
        source: &str,
        options: &HashMap<String, String>,
    ) -> Result<Document, FormatError> {
        let mut parse_options = self.parse_options.clone();
        parse_options.apply_params(options)?;
        Ok(parse(source, &parse_options))
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        Ok(serialize(doc, &self.serialize_options))
    }

    fn serialize_with_options(
        &self,
        doc: &Document,
        options: &HashMap<String, String>,
    ) -> Result<String, FormatError> {
        let mut serialize_options = self.serialize_options.clone();
        serialize_options.apply_params(options)?;
        Ok(serialize(doc, &serialize_options))
    }
}
