//! `cnp-precios` library crate.
//!
//! The binary (`precios`) is a thin wrapper around this library so that:
//!
//! - controllers are testable without spawning processes or a terminal
//! - the TUI, the text printers and the HTML export share one state model

pub mod app;
pub mod catalog;
pub mod cli;
pub mod data;
pub mod detail;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod nav;
pub mod plot;
pub mod report;
pub mod tui;
