//! Output writers.
//!
//! - HTML fragments for the catalog grid and header stats (`html`)
//! - file export of those fragments (`export`)

pub mod export;
pub mod html;

pub use export::*;
pub use html::*;
