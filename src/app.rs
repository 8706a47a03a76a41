//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - sets up logging
//! - resolves where the data lives
//! - dispatches to the catalog/detail controllers and their printers

use clap::Parser;

use crate::catalog::CatalogState;
use crate::cli::{Command, ExportArgs, ListArgs, PlotArgs, ShowArgs, TuiArgs};
use crate::data::{DataSource, resolve_location};
use crate::detail::{CHART_ERROR_MESSAGE, ChartState, DetailOutcome, load_detail};
use crate::error::AppError;
use crate::logging::{LogTarget, LoggingConfig, init_logging};
use crate::nav::Route;

/// Entry point for the `precios` binary.
pub fn run() -> Result<(), AppError> {
    // `precios` and `precios -p NAME` behave like `precios tui ...`. Clap
    // requires a subcommand name, so argv is rewritten before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    let target = match cli.command {
        Command::Tui(_) => LogTarget::FileOnly,
        _ => LogTarget::Stderr,
    };
    init_logging(&LoggingConfig::from_env(), target)?;

    let source = resolve_location(cli.data.as_deref())?.open()?;
    tracing::info!(source = %source.describe(), "using data source");

    match cli.command {
        Command::Tui(args) => handle_tui(source.as_ref(), args),
        Command::List(args) => handle_list(source.as_ref(), args),
        Command::Show(args) => handle_show(source.as_ref(), args),
        Command::Random(args) => handle_random(source.as_ref(), args),
        Command::Export(args) => handle_export(source.as_ref(), args),
    }
}

fn handle_tui(source: &dyn DataSource, args: TuiArgs) -> Result<(), AppError> {
    crate::tui::run(source, initial_route(&args))
}

/// `--product` wins over `--link`; neither opens the catalog.
pub fn initial_route(args: &TuiArgs) -> Route {
    if let Some(name) = args.product.as_deref().filter(|s| !s.is_empty()) {
        return Route::Product(name.to_string());
    }
    args.link
        .as_deref()
        .map(Route::parse)
        .unwrap_or(Route::Catalog)
}

fn handle_list(source: &dyn DataSource, args: ListArgs) -> Result<(), AppError> {
    let state = load_catalog_state(source, &args.filter.criteria())?;

    if args.stats {
        println!(
            "{}",
            crate::report::format_stats(state.summary(), &state.quick_stats())
        );
    }
    print!("{}", crate::report::format_grid(&state));
    Ok(())
}

fn handle_show(source: &dyn DataSource, args: ShowArgs) -> Result<(), AppError> {
    show_product(source, &args.name, &args.plot)
}

fn handle_random(source: &dyn DataSource, args: PlotArgs) -> Result<(), AppError> {
    let state = load_catalog_state(source, &Default::default())?;
    let mut rng = rand::thread_rng();
    let Some(product) = state.random_product(&mut rng) else {
        return Err(AppError::resolution("The catalog has no products."));
    };
    let name = product.name.clone();
    tracing::debug!(product = %name, "picked random product");
    show_product(source, &name, &args)
}

fn handle_export(source: &dyn DataSource, args: ExportArgs) -> Result<(), AppError> {
    let state = load_catalog_state(source, &args.filter.criteria())?;
    crate::io::export::write_catalog_html(&args.html, &state)?;
    println!("Wrote {} product(s) to {}", state.filtered().len(), args.html.display());
    Ok(())
}

/// Print one product; an unknown name prints the catalog instead and exits
/// with the resolution status.
fn show_product(source: &dyn DataSource, name: &str, plot: &PlotArgs) -> Result<(), AppError> {
    match load_detail(source, name)? {
        DetailOutcome::Redirect(route) => {
            tracing::info!(product = %name, href = %route.href(), "product not found");
            let state = load_catalog_state(source, &Default::default())?;
            print!("{}", crate::report::format_grid(&state));
            Err(AppError::resolution(format!("Product not found: {name}")))
        }
        DetailOutcome::Resolved { product, chart } => {
            let view = crate::detail::DetailView::from_product(&product);
            print!("{}", crate::report::format_detail(&view));
            println!();
            match chart {
                ChartState::Ready(series) => {
                    print!(
                        "{}",
                        crate::plot::render_series_plot(&series, plot.width, plot.height)
                    );
                }
                ChartState::Error => println!("{CHART_ERROR_MESSAGE}"),
            }
            Ok(())
        }
    }
}

/// Load the catalog for a one-shot command; a load failure is fatal here.
fn load_catalog_state(
    source: &dyn DataSource,
    criteria: &crate::catalog::FilterCriteria,
) -> Result<CatalogState, AppError> {
    let data = crate::catalog::load_catalog(source)?;
    let mut state = CatalogState::new(data);
    state.set_criteria(criteria.clone());
    Ok(state)
}

/// Rewrite argv so `precios` defaults to `precios tui`.
///
/// Rules:
/// - `precios`                        -> `precios tui`
/// - `precios -p NAME ...`            -> `precios tui -p NAME ...`
/// - `precios --help/--version/-h`    -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(
        arg1.as_str(),
        "tui" | "list" | "show" | "random" | "export"
    );
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_runs_tui() {
        assert_eq!(rewrite_args(argv(&["precios"])), argv(&["precios", "tui"]));
        assert_eq!(
            rewrite_args(argv(&["precios", "--data", "docs/data"])),
            argv(&["precios", "tui", "--data", "docs/data"])
        );
    }

    #[test]
    fn subcommands_and_help_are_untouched() {
        for args in [
            argv(&["precios", "list", "--stats"]),
            argv(&["precios", "--help"]),
            argv(&["precios", "show", "Arroz"]),
        ] {
            assert_eq!(rewrite_args(args.clone()), args);
        }
    }

    #[test]
    fn initial_route_prefers_product() {
        let args = TuiArgs {
            product: Some("Sal".to_string()),
            link: None,
        };
        assert_eq!(initial_route(&args), Route::Product("Sal".to_string()));

        let args = TuiArgs {
            product: None,
            link: Some("producto.html?producto=Arroz%201kg".to_string()),
        };
        assert_eq!(initial_route(&args), Route::Product("Arroz 1kg".to_string()));

        assert_eq!(initial_route(&TuiArgs::default()), Route::Catalog);
    }
}
