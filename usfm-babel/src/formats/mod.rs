//! Format implementations
//!
//! This module contains all format implementations that convert between
//! the [`Document`](crate::ast::Document) tree and text representations.

pub mod icons;
pub mod json;
pub mod text;
pub mod treeviz;
pub mod usfm;

pub use json::JsonFormat;
pub use text::TextFormat;
pub use treeviz::TreevizFormat;
pub use usfm::UsfmFormat;
