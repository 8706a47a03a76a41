//! Static HTML rendering of the catalog view.
//!
//! Element ids follow the page contract the site's stylesheet and scripts
//! expect (`products-grid`, `no-results`, `filter-trend`, ...). Every piece of
//! product text goes through `escape_html`.

use crate::catalog::{CatalogState, FilterCriteria, GridView, ProductCard, QuickStats, render_grid};
use crate::domain::{SortKey, Summary, Trend};
use crate::report::format::{escape_html, format_date, format_price};

/// Render a complete standalone catalog page.
pub fn render_catalog_document(state: &CatalogState) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="es">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Precios - {total} productos</title>
</head>
<body>
    <div class="container">
        {stats}
        {controls}
        {grid}
    </div>
</body>
</html>
"#,
        total = state.products().len(),
        stats = render_stats_html(state.summary(), &state.quick_stats()),
        controls = render_controls_html(state.criteria()),
        grid = render_grid_html(state),
    )
}

/// Header counters and quick stats.
pub fn render_stats_html(summary: &Summary, stats: &QuickStats) -> String {
    let items = [
        ("total-productos", summary.total_products.to_string()),
        ("ultima-actualizacion", format_date(summary.last_updated.as_deref())),
        ("productos-subida", stats.rising.to_string()),
        ("productos-bajada", stats.falling.to_string()),
        ("productos-estable", stats.stable.to_string()),
        ("precio-promedio", format_price(Some(stats.mean_price))),
    ];

    let mut out = String::from(r#"<div class="stats">"#);
    for (id, value) in items {
        out.push_str(&format!(
            r#"<span class="stat" id="{id}">{}</span>"#,
            escape_html(&value)
        ));
    }
    out.push_str("</div>");
    out
}

/// Search box and selectors, pre-set to `criteria`.
pub fn render_controls_html(criteria: &FilterCriteria) -> String {
    let clear_display = if criteria.search.is_empty() { "none" } else { "block" };

    let mut trend_options = option_html("", "Todas", criteria.trend.is_none());
    for t in Trend::ALL {
        trend_options.push_str(&option_html(t.label(), t.label(), criteria.trend == Some(t)));
    }

    let mut sort_options = String::new();
    for (value, key) in [
        ("nombre", SortKey::Name),
        ("precio", SortKey::Price),
        ("tendencia", SortKey::Trend),
    ] {
        sort_options.push_str(&option_html(value, value, criteria.sort == key));
    }

    format!(
        r#"<div class="controls"><input type="text" id="search-input" value="{search}"><button id="clear-search" style="display: {clear_display}">&times;</button><select id="filter-trend">{trend_options}</select><select id="sort-by">{sort_options}</select></div>"#,
        search = escape_html(&criteria.search),
    )
}

/// Results counter, product grid and empty-state panel.
pub fn render_grid_html(state: &CatalogState) -> String {
    let (cards_html, grid_display, empty_display) = match render_grid(state) {
        GridView::Empty => (String::new(), "none", "block"),
        GridView::Cards(cards) => (
            cards.iter().map(render_card_html).collect::<String>(),
            "grid",
            "none",
        ),
    };

    format!(
        r#"<div id="results-count">{count}</div><div id="products-grid" style="display: {grid_display}">{cards_html}</div><div id="no-results" style="display: {empty_display}">No se encontraron productos</div>"#,
        count = escape_html(&state.results_line()),
    )
}

pub fn render_card_html(card: &ProductCard) -> String {
    format!(
        r#"<a class="product-card" href="{href}"><div class="product-header"><div class="product-name">{name}</div><div class="product-price">{price}</div></div><div class="product-footer"><span class="product-date">{date}</span><span class="product-trend {class}">{trend}</span></div></a>"#,
        href = escape_html(&card.href),
        name = escape_html(&card.name),
        price = escape_html(&card.price),
        date = escape_html(&card.date),
        class = card.trend_class,
        trend = escape_html(&card.trend),
    )
}

fn option_html(value: &str, label: &str, selected: bool) -> String {
    let selected = if selected { " selected" } else { "" };
    format!(r#"<option value="{value}"{selected}>{label}</option>"#)
}
