//! Domain types used throughout the crate.
//!
//! This module defines:
//!
//! - catalog records (`Product`, `Summary`)
//! - history records (`SeriesIndexEntry`, `Observation`)
//! - view-selection enums (`Trend`, `SortKey`)

pub mod types;

pub use types::*;
