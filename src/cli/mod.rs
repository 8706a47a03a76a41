//! Command-line parsing for the price catalog browser.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the catalog/detail controllers.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::catalog::FilterCriteria;
use crate::domain::{SortKey, Trend};

pub mod picker;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "precios", version, about = "Browse product prices and their history")]
pub struct Cli {
    /// Data directory or base URL (defaults to $PRECIOS_DATA, then ./data).
    #[arg(short = 'd', long, global = true, value_name = "DIR|URL")]
    pub data: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive TUI (the default).
    Tui(TuiArgs),
    /// Print the filtered, sorted catalog.
    List(ListArgs),
    /// Print one product with its price history.
    Show(ShowArgs),
    /// Show a random product.
    Random(PlotArgs),
    /// Write the filtered catalog as an HTML page.
    Export(ExportArgs),
}

#[derive(Debug, Args, Clone, Default)]
pub struct TuiArgs {
    /// Open directly on this product.
    #[arg(short = 'p', long, conflicts_with = "link")]
    pub product: Option<String>,

    /// Open a detail link, e.g. `producto.html?producto=Arroz%201kg`.
    #[arg(long)]
    pub link: Option<String>,
}

/// Search/filter/sort options shared by `list` and `export`.
#[derive(Debug, Args, Clone, Default)]
pub struct FilterArgs {
    /// Case-insensitive substring of the product name.
    #[arg(short = 's', long, default_value = "")]
    pub search: String,

    /// Only products with this trend.
    #[arg(short = 't', long, value_enum)]
    pub trend: Option<Trend>,

    /// Sort order.
    #[arg(long, value_enum, default_value_t = SortKey::Name)]
    pub sort: SortKey,
}

impl FilterArgs {
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            search: self.search.clone(),
            trend: self.trend,
            sort: self.sort,
        }
    }
}

#[derive(Debug, Args, Clone)]
pub struct ListArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Print header statistics before the table.
    #[arg(long)]
    pub stats: bool,
}

/// Plot size for commands that print a price chart.
#[derive(Debug, Args, Clone)]
pub struct PlotArgs {
    /// Plot width (columns).
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 16)]
    pub height: usize,
}

#[derive(Debug, Args, Clone)]
pub struct ShowArgs {
    /// Exact product name (case-sensitive).
    pub name: String,

    #[command(flatten)]
    pub plot: PlotArgs,
}

#[derive(Debug, Args, Clone)]
pub struct ExportArgs {
    /// Output HTML file.
    #[arg(long, value_name = "FILE")]
    pub html: PathBuf,

    #[command(flatten)]
    pub filter: FilterArgs,
}
