//! Detail controller: resolve one product by name, locate its history file,
//! and turn the observations into a chart series.
//!
//! Lookups are explicit two-step finds (`find` then a not-found branch); a
//! missing product redirects to the catalog while a missing or short series
//! only disables the chart.

use crate::data::{DataSource, fetch_json, series_path, source};
use crate::domain::{Observation, Product, SeriesIndexEntry, Trend};
use crate::error::AppError;
use crate::nav::Route;
use crate::report::format::{format_amount, format_date, format_price, format_short_date, format_trend};

/// Shown in place of the product name when the product list fails to load.
pub const LOAD_ERROR_MESSAGE: &str = "Error loading product";

/// Shown in the chart area when there is nothing to plot.
pub const CHART_ERROR_MESSAGE: &str = "Price history is not available for this product.";

/// Per-view lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailPhase {
    Loading,
    ProductResolved,
    ChartReady,
    /// Terminal: the view redirects to the catalog.
    ProductNotFound,
    /// Terminal: product info shown, chart replaced by an error panel.
    ChartError,
    /// Terminal: the product list itself could not be loaded.
    LoadFailed,
}

/// Parallel label/value sequences for a single line series.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl ChartSeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Cursor text for point `idx`: `5 ene: ₡ 1 250`.
    pub fn tooltip(&self, idx: usize) -> Option<String> {
        let label = self.labels.get(idx)?;
        let value = self.values.get(idx)?;
        Some(format!("{label}: {}", format_amount(*value)))
    }

    /// Min/max of the values (`None` if no finite value).
    pub fn value_range(&self) -> Option<(f64, f64)> {
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for &v in self.values.iter().filter(|v| v.is_finite()) {
            lo = lo.min(v);
            hi = hi.max(v);
        }
        (lo <= hi).then_some((lo, hi))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartState {
    Ready(ChartSeries),
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DetailOutcome {
    Redirect(Route),
    Resolved { product: Product, chart: ChartState },
}

impl DetailOutcome {
    pub fn phase(&self) -> DetailPhase {
        match self {
            DetailOutcome::Redirect(_) => DetailPhase::ProductNotFound,
            DetailOutcome::Resolved { chart: ChartState::Ready(_), .. } => DetailPhase::ChartReady,
            DetailOutcome::Resolved { chart: ChartState::Error, .. } => DetailPhase::ChartError,
        }
    }
}

/// First product whose name equals `name` exactly (case-sensitive).
pub fn resolve_product<'a>(products: &'a [Product], name: &str) -> Option<&'a Product> {
    products.iter().find(|p| p.name == name)
}

pub fn resolve_series_file<'a>(index: &'a [SeriesIndexEntry], name: &str) -> Option<&'a SeriesIndexEntry> {
    index.iter().find(|e| e.product == name)
}

/// Fewer than two observations cannot draw a trend line.
pub fn chart_series(observations: &[Observation]) -> Option<ChartSeries> {
    if observations.len() < 2 {
        return None;
    }
    Some(ChartSeries {
        labels: observations.iter().map(|o| format_short_date(&o.date)).collect(),
        values: observations.iter().map(|o| o.price).collect(),
    })
}

/// Locate and load the series for `name`. Every failure ends in `ChartState::Error`.
pub fn load_chart(source: &dyn DataSource, name: &str) -> ChartState {
    let index: Vec<SeriesIndexEntry> = match fetch_json(source, source::SERIES_INDEX_FILE) {
        Ok(index) => index,
        Err(err) => {
            tracing::error!(error = %err, product = name, "failed to load series index");
            return ChartState::Error;
        }
    };

    let Some(entry) = resolve_series_file(&index, name) else {
        tracing::warn!(product = name, "no series file for product");
        return ChartState::Error;
    };

    let observations: Vec<Observation> = match fetch_json(source, &series_path(&entry.file)) {
        Ok(obs) => obs,
        Err(err) => {
            tracing::error!(error = %err, product = name, file = %entry.file, "failed to load series");
            return ChartState::Error;
        }
    };

    match chart_series(&observations) {
        Some(series) => ChartState::Ready(series),
        None => {
            tracing::warn!(product = name, points = observations.len(), "series too short to chart");
            ChartState::Error
        }
    }
}

/// Step one: fetch the product list and find `name` in it.
///
/// `Ok(None)` means the product does not exist; only a failed fetch is an `Err`.
pub fn find_product(source: &dyn DataSource, name: &str) -> Result<Option<Product>, AppError> {
    let products: Vec<Product> = fetch_json(source, source::PRODUCTS_FILE)?;
    Ok(resolve_product(&products, name).cloned())
}

/// Both steps back to back, for one-shot callers.
pub fn load_detail(source: &dyn DataSource, name: &str) -> Result<DetailOutcome, AppError> {
    let Some(product) = find_product(source, name)? else {
        tracing::info!(product = name, "product not found, redirecting to catalog");
        return Ok(DetailOutcome::Redirect(Route::Catalog));
    };

    let chart = load_chart(source, name);
    Ok(DetailOutcome::Resolved { product, chart })
}

/// Trend icon on the detail view. Rising prices are bad news, hence red.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendIcon {
    UpRed,
    DownGreen,
    Neutral,
}

impl From<Trend> for TrendIcon {
    fn from(trend: Trend) -> Self {
        match trend {
            Trend::Rising => TrendIcon::UpRed,
            Trend::Falling => TrendIcon::DownGreen,
            Trend::Stable => TrendIcon::Neutral,
        }
    }
}

/// Formatted fields of the detail view.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    pub name: String,
    pub breadcrumb: String,
    pub current_price: String,
    pub trend_value: String,
    pub trend_icon: TrendIcon,
    pub price_range: String,
    pub min_price: String,
    pub max_price: String,
    pub avg_price: String,
    pub record_count: String,
    pub last_update: String,
}

impl DetailView {
    pub fn from_product(p: &Product) -> Self {
        let min_price = format_price(p.min_price);
        let max_price = format_price(p.max_price);
        Self {
            name: p.name.clone(),
            breadcrumb: format!("Catalog / {}", p.name),
            current_price: format_price(p.current_price),
            trend_value: format_trend(p.trend_pct),
            trend_icon: p.trend.into(),
            price_range: format!("{min_price} / {max_price}"),
            min_price,
            max_price,
            avg_price: format_price(p.avg_price),
            record_count: p.record_count.to_string(),
            last_update: format!("Last update: {}", format_date(p.last_date.as_deref())),
        }
    }
}

/// Detail view state, as held by an interactive front-end.
#[derive(Debug, Clone)]
pub struct DetailState {
    pub name: String,
    pub phase: DetailPhase,
    pub view: Option<DetailView>,
    pub chart: Option<ChartSeries>,
    pub error: Option<String>,
}

impl DetailState {
    pub fn loading(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phase: DetailPhase::Loading,
            view: None,
            chart: None,
            error: None,
        }
    }

    /// Step one of [`load_detail`], recorded as a phase.
    pub fn resolve(&mut self, source: &dyn DataSource) {
        match find_product(source, &self.name) {
            Ok(Some(product)) => {
                self.view = Some(DetailView::from_product(&product));
                self.phase = DetailPhase::ProductResolved;
            }
            Ok(None) => {
                tracing::info!(product = %self.name, "product not found, redirecting to catalog");
                self.phase = DetailPhase::ProductNotFound;
            }
            Err(err) => {
                tracing::error!(error = %err, product = %self.name, "failed to load product");
                self.phase = DetailPhase::LoadFailed;
                self.error = Some(LOAD_ERROR_MESSAGE.to_string());
            }
        }
    }

    /// Step two: only meaningful once the product is resolved.
    pub fn load_chart(&mut self, source: &dyn DataSource) {
        if self.phase != DetailPhase::ProductResolved {
            return;
        }
        match load_chart(source, &self.name) {
            ChartState::Ready(series) => {
                self.chart = Some(series);
                self.phase = DetailPhase::ChartReady;
            }
            ChartState::Error => {
                self.error = Some(CHART_ERROR_MESSAGE.to_string());
                self.phase = DetailPhase::ChartError;
            }
        }
    }

    pub fn is_redirect(&self) -> bool {
        self.phase == DetailPhase::ProductNotFound
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(name: &str) -> Product {
        Product {
            name: name.to_string(),
            current_price: Some(1250.0),
            min_price: Some(1100.0),
            max_price: Some(1300.0),
            avg_price: Some(1204.6),
            record_count: 12,
            last_date: Some("2025-03-14".to_string()),
            trend: Trend::Rising,
            trend_pct: Some(3.2),
        }
    }

    fn obs(date: &str, price: f64) -> Observation {
        Observation {
            date: date.to_string(),
            price,
        }
    }

    #[test]
    fn product_lookup_is_exact_and_case_sensitive() {
        let products = vec![product("Arroz"), product("arroz"), product("Arroz")];
        let found = resolve_product(&products, "arroz").unwrap();
        assert_eq!(found.name, "arroz");
        assert!(resolve_product(&products, "ARROZ").is_none());
        assert!(resolve_product(&products, "Arr").is_none());
    }

    #[test]
    fn series_lookup_by_product_name() {
        let index = vec![
            SeriesIndexEntry {
                product: "Arroz".to_string(),
                file: "arroz.json".to_string(),
            },
            SeriesIndexEntry {
                product: "Sal".to_string(),
                file: "sal.json".to_string(),
            },
        ];
        assert_eq!(resolve_series_file(&index, "Sal").unwrap().file, "sal.json");
        assert!(resolve_series_file(&index, "Azúcar").is_none());
    }

    #[test]
    fn single_observation_is_not_a_chart() {
        assert!(chart_series(&[]).is_none());
        assert!(chart_series(&[obs("2025-01-05", 100.0)]).is_none());
    }

    #[test]
    fn chart_series_has_short_labels_and_raw_values() {
        let series = chart_series(&[obs("2025-01-05", 1200.0), obs("2025-01-12", 1234.5)]).unwrap();
        assert_eq!(series.labels, vec!["5 ene", "12 ene"]);
        assert_eq!(series.values, vec![1200.0, 1234.5]);
        assert_eq!(series.tooltip(1).unwrap(), "12 ene: ₡ 1 234,5");
        assert!(series.tooltip(2).is_none());
        assert_eq!(series.value_range(), Some((1200.0, 1234.5)));
    }

    #[test]
    fn detail_view_formats_fields() {
        let view = DetailView::from_product(&product("Arroz"));
        assert_eq!(view.current_price, "₡ 1 250");
        assert_eq!(view.trend_value, "+3.2%");
        assert_eq!(view.trend_icon, TrendIcon::UpRed);
        assert_eq!(view.price_range, "₡ 1 100 / ₡ 1 300");
        assert_eq!(view.avg_price, "₡ 1 205");
        assert_eq!(view.record_count, "12");
        assert_eq!(view.last_update, "Last update: 14 mar 2025");
    }

    #[test]
    fn outcome_phases() {
        assert_eq!(
            DetailOutcome::Redirect(Route::Catalog).phase(),
            DetailPhase::ProductNotFound
        );
        let resolved = DetailOutcome::Resolved {
            product: product("Sal"),
            chart: ChartState::Error,
        };
        assert_eq!(resolved.phase(), DetailPhase::ChartError);

        let state = DetailState::loading("Sal");
        assert_eq!(state.phase, DetailPhase::Loading);
        assert!(!state.is_redirect());
    }
}
