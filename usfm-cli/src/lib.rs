//! Library half of the `usfm` binary
//!
//! Holds the inspect transforms so they can be unit tested without spawning
//! the binary.

pub mod transforms;
