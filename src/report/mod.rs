//! Plain-text output for the scriptable subcommands.
//!
//! Formatting lives in one place so the controllers stay free of presentation
//! and output changes stay localized.

use crate::catalog::{CatalogState, GridView, QuickStats};
use crate::detail::{DetailView, TrendIcon};
use crate::domain::Summary;

pub mod format;

use format::{format_date, format_price, truncate};

const NAME_WIDTH: usize = 36;

/// Header counters plus quick stats.
pub fn format_stats(summary: &Summary, stats: &QuickStats) -> String {
    let mut out = String::new();
    out.push_str("=== precios - product catalog ===\n");
    out.push_str(&format!("Products: {}\n", summary.total_products));
    out.push_str(&format!(
        "Last update: {}\n",
        format_date(summary.last_updated.as_deref())
    ));
    out.push_str(&format!(
        "Rising: {} | Falling: {} | Stable: {}\n",
        stats.rising, stats.falling, stats.stable
    ));
    out.push_str(&format!("Average price: {}\n", format_price(Some(stats.mean_price))));
    out
}

/// The grid as a fixed-width table, or the empty-state line.
pub fn format_grid(state: &CatalogState) -> String {
    let mut out = String::new();
    out.push_str(&state.results_line());
    out.push('\n');

    let cards = match crate::catalog::render_grid(state) {
        GridView::Empty => {
            out.push_str("No products match the current search.\n");
            return out;
        }
        GridView::Cards(cards) => cards,
    };

    out.push_str(
        format!(
            "{:<NAME_WIDTH$} {:>14} {:>13} {:>8} {:<8}\n",
            "name", "price", "updated", "trend", "kind"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!(
            "{:-<NAME_WIDTH$} {:-<14} {:-<13} {:-<8} {:-<8}\n",
            "", "", "", "", ""
        )
        .trim_end(),
    );
    out.push('\n');

    for card in &cards {
        out.push_str(
            format!(
                "{:<NAME_WIDTH$} {:>14} {:>13} {:>8} {:<8}\n",
                truncate(&card.name, NAME_WIDTH),
                card.price,
                card.date,
                card.trend,
                card.trend_kind.display_name(),
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

/// Product information block for `precios show`.
pub fn format_detail(view: &DetailView) -> String {
    let icon = match view.trend_icon {
        TrendIcon::UpRed => "▲",
        TrendIcon::DownGreen => "▼",
        TrendIcon::Neutral => "■",
    };

    let mut out = String::new();
    out.push_str(&format!("{}\n", view.breadcrumb));
    out.push_str(&format!("=== {} ===\n", view.name));
    out.push_str(&format!("Current price: {}\n", view.current_price));
    out.push_str(&format!("Trend: {icon} {}\n", view.trend_value));
    out.push_str(&format!("Range (min / max): {}\n", view.price_range));
    out.push_str(&format!("Average: {}\n", view.avg_price));
    out.push_str(&format!("Records: {}\n", view.record_count));
    out.push_str(&format!("{}\n", view.last_update));
    out
}
