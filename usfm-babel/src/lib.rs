//! USFM ↔ structured tree conversion
//!
//!     This crate converts USFM scripture markup into a [`Document`] tree and back, with the
//!     guarantee that `serialize(parse(x)) == x` for well-formed input. Translation and checking
//!     tools can then edit text structurally (words, alignments, footnotes) and write the markup
//!     back without disturbing anything they did not touch.
//!
//!     This is a pure lib: it powers usfm-cli but makes no assumptions about a shell. No printing,
//!     no env vars, no filesystem.
//!
//! Architecture
//!
//!     .
//!     ├── ast                     # Document, VerseObject, attributes, ordinals
//!     ├── error.rs
//!     ├── format.rs               # Format trait definition
//!     ├── registry.rs             # FormatRegistry for discovery and selection
//!     └── formats
//!         ├── usfm
//!         │   ├── markers.rs      # Static marker taxonomy
//!         │   ├── tokenizer.rs    # Line → tokens
//!         │   ├── arena.rs        # Flat node store used while parsing
//!         │   ├── parser.rs       # Tokens → Document
//!         │   ├── serializer.rs   # Document → USFM
//!         │   ├── filter.rs       # remove_marker on raw strings
//!         │   └── options.rs
//!         ├── json                # serde rendering of the tree
//!         ├── treeviz             # Unicode tree for inspection
//!         └── text                # Plain reading text
//!
//! Core Algorithms
//!
//!     The round trip hinges on whitespace bookkeeping. The tokenizer attaches every newline to
//!     exactly one token and consumes exactly one delimiter after a tag; the parser stores the
//!     newline in a text payload or in a marker's `next_char`, and the serializer re-derives only
//!     the delimiter (a tab, or a chapter line that goes on, is recorded in the tree). Structural
//!     spans that must be closed explicitly (footnotes, cross references) keep their inner markup
//!     verbatim in the opening marker's payload. Character styles left open on their line
//!     (`\wj`, `\add`) become scopes instead: words and alignments inside them stay structured
//!     as the marker's children.
//!
//!     Malformed input never fails. Unknown tags become neutral markers, unmatched closers and
//!     numberless `\c`/`\v` stay literal text, and a repeated verse keeps its first occurrence.
//!     Each of those recoveries is logged at `debug` through `tracing`.
//!
//! Testing
//!
//!     tests/usfm
//!     ├── scenarios.rs            # Parsing behavior on small inputs
//!     ├── round_trip.rs           # Fixture files through parse → serialize
//!     ├── properties.rs           # proptest round trips over generated documents
//!     ├── treeviz.rs              # insta snapshots of the tree view
//!     └── fixtures

pub mod ast;
pub mod error;
pub mod format;
pub mod formats;
pub mod registry;

pub use ast::Document;
pub use error::FormatError;
pub use format::Format;
pub use formats::text::flatten_to_plain_text;
pub use formats::usfm::{parse, remove_marker, serialize, ParseOptions, SerializeOptions};
pub use registry::FormatRegistry;
