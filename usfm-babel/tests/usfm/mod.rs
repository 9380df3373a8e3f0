//! USFM format tests
//!
//! Parsing behavior, fixture round trips, generated round trips and the
//! tree view.

mod properties;
mod round_trip;
mod scenarios;
mod treeviz;
