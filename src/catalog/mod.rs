//! Catalog controller: load the product list, hold search/filter/sort state,
//! and derive the grid view.
//!
//! All transformation lives in pure functions (`filter_and_sort`,
//! `compute_quick_stats`, `render_grid`). Front-ends read user input into a
//! `FilterCriteria`, call `apply_filters`, and draw whatever `render_grid`
//! returns.

use rand::Rng;

use crate::data::{DataSource, fetch_json, source};
use crate::domain::{Product, SortKey, Summary, Trend};
use crate::error::AppError;
use crate::nav::Route;
use crate::report::format::{format_date, format_price, format_trend};

pub mod filter;
pub mod stats;

pub use filter::{FilterCriteria, collate, filter_and_sort};
pub use stats::{QuickStats, compute_quick_stats};

/// Generic message shown when the catalog cannot be loaded.
pub const LOAD_ERROR_MESSAGE: &str = "Error loading data. Try reloading.";

/// Everything the catalog loads up front.
#[derive(Debug, Clone, Default)]
pub struct CatalogData {
    pub summary: Summary,
    pub products: Vec<Product>,
}

/// Fetch the summary, then the product list. Either failing fails the load.
pub fn load_catalog(source: &dyn DataSource) -> Result<CatalogData, AppError> {
    let summary: Summary = fetch_json(source, source::SUMMARY_FILE)?;
    let products: Vec<Product> = fetch_json(source, source::PRODUCTS_FILE)?;

    tracing::info!(
        products = products.len(),
        total = summary.total_products,
        source = %source.describe(),
        "catalog loaded"
    );

    Ok(CatalogData { summary, products })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Ready,
    Failed(String),
}

/// Catalog view state. The base list is never mutated after construction.
#[derive(Debug, Clone)]
pub struct CatalogState {
    summary: Summary,
    products: Vec<Product>,
    criteria: FilterCriteria,
    filtered: Vec<Product>,
    status: LoadStatus,
}

impl CatalogState {
    pub fn new(data: CatalogData) -> Self {
        let mut state = Self {
            summary: data.summary,
            products: data.products,
            criteria: FilterCriteria::default(),
            filtered: Vec::new(),
            status: LoadStatus::Ready,
        };
        state.apply_filters(None);
        state
    }

    /// Load from `source`; on failure log it and keep an empty view.
    pub fn load(source: &dyn DataSource) -> Self {
        match load_catalog(source) {
            Ok(data) => Self::new(data),
            Err(err) => {
                tracing::error!(error = %err, "failed to load catalog");
                Self::failed(LOAD_ERROR_MESSAGE)
            }
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            summary: Summary::default(),
            products: Vec::new(),
            criteria: FilterCriteria::default(),
            filtered: Vec::new(),
            status: LoadStatus::Failed(message.into()),
        }
    }

    pub fn summary(&self) -> &Summary {
        &self.summary
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn filtered(&self) -> &[Product] {
        &self.filtered
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    /// Re-derive the visible list.
    ///
    /// `Some(term)` replaces the search input; `None` reuses the current one.
    pub fn apply_filters(&mut self, search: Option<&str>) {
        if let Some(term) = search {
            self.criteria.search = term.to_string();
        }
        self.filtered = filter_and_sort(&self.products, &self.criteria);
        tracing::debug!(
            search = %self.criteria.search,
            trend = ?self.criteria.trend,
            sort = ?self.criteria.sort,
            visible = self.filtered.len(),
            "filters applied"
        );
    }

    /// Replace the whole criteria and re-derive.
    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
        self.apply_filters(None);
    }

    pub fn set_trend(&mut self, trend: Option<Trend>) {
        self.criteria.trend = trend;
        self.apply_filters(None);
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        self.criteria.sort = sort;
        self.apply_filters(None);
    }

    pub fn clear_search(&mut self) {
        self.apply_filters(Some(""));
    }

    pub fn quick_stats(&self) -> QuickStats {
        compute_quick_stats(&self.products)
    }

    /// "Showing X of Y products".
    pub fn results_line(&self) -> String {
        format!(
            "Showing {} of {} products",
            self.filtered.len(),
            self.products.len()
        )
    }

    /// Uniform pick over the full, unfiltered list.
    pub fn random_product<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Product> {
        if self.products.is_empty() {
            return None;
        }
        let idx = rng.gen_range(0..self.products.len());
        self.products.get(idx)
    }
}

/// One rendered grid card. `name` is raw text; HTML output escapes it.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductCard {
    pub name: String,
    pub price: String,
    pub date: String,
    pub trend: String,
    pub trend_kind: Trend,
    pub trend_class: String,
    pub href: String,
}

impl ProductCard {
    pub fn from_product(p: &Product) -> Self {
        Self {
            name: p.name.clone(),
            price: format_price(p.current_price),
            date: format_date(p.last_date.as_deref()),
            trend: format_trend(p.trend_pct),
            trend_kind: p.trend,
            trend_class: p.trend.css_class(),
            href: Route::Product(p.name.clone()).href(),
        }
    }
}

/// What the grid area should show.
#[derive(Debug, Clone, PartialEq)]
pub enum GridView {
    /// Hide the grid, show the empty-state placeholder.
    Empty,
    Cards(Vec<ProductCard>),
}

pub fn render_grid(state: &CatalogState) -> GridView {
    if state.filtered.is_empty() {
        return GridView::Empty;
    }
    GridView::Cards(state.filtered.iter().map(ProductCard::from_product).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn product(name: &str, price: f64, trend: Trend) -> Product {
        Product {
            name: name.to_string(),
            current_price: Some(price),
            min_price: None,
            max_price: None,
            avg_price: None,
            record_count: 3,
            last_date: Some("2025-02-01".to_string()),
            trend,
            trend_pct: Some(1.25),
        }
    }

    fn state() -> CatalogState {
        CatalogState::new(CatalogData {
            summary: Summary {
                total_products: 3,
                last_updated: Some("2025-02-01T06:00:00".to_string()),
            },
            products: vec![
                product("Queso", 2500.0, Trend::Rising),
                product("Pan", 700.0, Trend::Stable),
                product("Huevos", 1900.0, Trend::Falling),
            ],
        })
    }

    #[test]
    fn new_state_shows_everything_sorted() {
        let s = state();
        let names: Vec<_> = s.filtered().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Huevos", "Pan", "Queso"]);
        assert_eq!(s.results_line(), "Showing 3 of 3 products");
        assert_eq!(s.status(), &LoadStatus::Ready);
    }

    #[test]
    fn apply_filters_without_term_reuses_input() {
        let mut s = state();
        s.apply_filters(Some("pan"));
        assert_eq!(s.filtered().len(), 1);

        s.set_sort(SortKey::Price);
        assert_eq!(s.filtered().len(), 1);
        assert_eq!(s.criteria().search, "pan");

        s.clear_search();
        assert_eq!(s.filtered().len(), 3);
        assert_eq!(s.filtered()[0].name, "Pan");
        assert_eq!(s.products()[0].name, "Queso");
    }

    #[test]
    fn grid_is_empty_when_nothing_matches() {
        let mut s = state();
        s.apply_filters(Some("leche"));
        assert_eq!(render_grid(&s), GridView::Empty);
        assert_eq!(s.results_line(), "Showing 0 of 3 products");
    }

    #[test]
    fn cards_carry_formatted_fields() {
        let mut s = state();
        s.set_trend(Some(Trend::Rising));
        let GridView::Cards(cards) = render_grid(&s) else {
            panic!("expected cards");
        };
        assert_eq!(cards.len(), 1);
        let card = &cards[0];
        assert_eq!(card.name, "Queso");
        assert_eq!(card.price, "₡ 2 500");
        assert_eq!(card.date, "1 feb 2025");
        assert_eq!(card.trend, "+1.2%");
        assert_eq!(card.trend_class, "trend-subida");
        assert_eq!(card.href, "producto.html?producto=Queso");
    }

    #[test]
    fn random_product_comes_from_full_list() {
        let mut s = state();
        s.apply_filters(Some("queso"));
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let p = s.random_product(&mut rng).unwrap();
            assert!(s.products().contains(p));
        }
        let empty = CatalogState::failed(LOAD_ERROR_MESSAGE);
        assert!(empty.random_product(&mut rng).is_none());
    }

    #[test]
    fn failed_state_is_empty() {
        let s = CatalogState::failed(LOAD_ERROR_MESSAGE);
        assert_eq!(render_grid(&s), GridView::Empty);
        assert!(matches!(s.status(), LoadStatus::Failed(m) if m == LOAD_ERROR_MESSAGE));
        assert!(s.quick_stats().mean_price.is_nan());
    }
}
