//! Shared domain types.
//!
//! These mirror the JSON files produced by the upstream price scraper. Field
//! names on disk are Spanish (`nombre`, `precio_actual`, ...); the Rust side
//! uses English names and `serde(rename)` to bridge the two.
//!
//! Everything here is read-only once loaded: controllers derive views from
//! these values but never mutate them.

use clap::ValueEnum;
use serde::{Deserialize, Deserializer};

/// Trend classification attached to each product by the data generator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, ValueEnum)]
#[serde(from = "Option<String>")]
pub enum Trend {
    Rising,
    Falling,
    #[default]
    Stable,
}

impl Trend {
    pub const ALL: [Trend; 3] = [Trend::Rising, Trend::Falling, Trend::Stable];

    /// Label used in the upstream JSON files.
    pub fn label(self) -> &'static str {
        match self {
            Trend::Rising => "subida",
            Trend::Falling => "bajada",
            Trend::Stable => "estable",
        }
    }

    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            Trend::Rising => "rising",
            Trend::Falling => "falling",
            Trend::Stable => "stable",
        }
    }

    /// Style class keyed by trend type (`trend-subida`, ...).
    pub fn css_class(self) -> String {
        format!("trend-{}", self.label())
    }

    /// Cycle through "no filter" and each trend, in that order.
    pub fn next_filter(current: Option<Trend>) -> Option<Trend> {
        match current {
            None => Some(Trend::Rising),
            Some(Trend::Rising) => Some(Trend::Falling),
            Some(Trend::Falling) => Some(Trend::Stable),
            Some(Trend::Stable) => None,
        }
    }
}

// Missing, null and unknown labels count as stable, the same bucket the quick
// stats use for them.
impl From<Option<String>> for Trend {
    fn from(value: Option<String>) -> Self {
        match value.as_deref() {
            Some("subida") => Trend::Rising,
            Some("bajada") => Trend::Falling,
            _ => Trend::Stable,
        }
    }
}

/// A number, or `None` for null, strings and anything else non-numeric.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.as_f64()).filter(|v| v.is_finite()))
}

/// A non-negative count; null or non-numeric values read as zero.
fn lenient_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.as_u64()).unwrap_or_default())
}

/// Sort order applied after filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SortKey {
    /// Name, ascending, locale-like collation.
    #[default]
    Name,
    /// Current price, ascending.
    Price,
    /// Trend percentage, descending.
    Trend,
}

impl SortKey {
    pub fn display_name(self) -> &'static str {
        match self {
            SortKey::Name => "name",
            SortKey::Price => "price",
            SortKey::Trend => "trend",
        }
    }

    pub fn next(self) -> Self {
        match self {
            SortKey::Name => SortKey::Price,
            SortKey::Price => SortKey::Trend,
            SortKey::Trend => SortKey::Name,
        }
    }
}

/// One catalog item (`productos.json`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Product {
    #[serde(rename = "nombre")]
    pub name: String,
    /// `None` when the file holds null or a non-number; shown as `₡ -`.
    #[serde(rename = "precio_actual", default, deserialize_with = "lenient_number")]
    pub current_price: Option<f64>,
    #[serde(rename = "precio_minimo", default, deserialize_with = "lenient_number")]
    pub min_price: Option<f64>,
    #[serde(rename = "precio_maximo", default, deserialize_with = "lenient_number")]
    pub max_price: Option<f64>,
    #[serde(rename = "precio_promedio", default, deserialize_with = "lenient_number")]
    pub avg_price: Option<f64>,
    #[serde(rename = "total_registros", default, deserialize_with = "lenient_count")]
    pub record_count: u64,
    #[serde(rename = "ultima_fecha", default)]
    pub last_date: Option<String>,
    #[serde(rename = "tendencia_tipo", default)]
    pub trend: Trend,
    /// Signed percentage change backing `trend`.
    #[serde(rename = "tendencia_porcentaje", default, deserialize_with = "lenient_number")]
    pub trend_pct: Option<f64>,
}

/// Aggregate counters (`resumen.json`).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Summary {
    #[serde(rename = "total_productos", default, deserialize_with = "lenient_count")]
    pub total_products: u64,
    #[serde(rename = "ultima_actualizacion", default)]
    pub last_updated: Option<String>,
}

/// Maps a product name to the file holding its history (`historicos_index.json`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SeriesIndexEntry {
    #[serde(rename = "producto")]
    pub product: String,
    #[serde(rename = "archivo")]
    pub file: String,
}

/// A single `(date, price)` observation; files are chronological.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Observation {
    #[serde(rename = "fecha")]
    pub date: String,
    #[serde(rename = "precio")]
    pub price: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_deserializes_from_upstream_names() {
        let raw = r#"{
            "nombre": "Arroz 1kg",
            "precio_actual": 1250,
            "precio_minimo": 1100,
            "precio_maximo": 1300,
            "precio_promedio": 1205.5,
            "total_registros": 42,
            "ultima_fecha": "2025-03-14",
            "tendencia_tipo": "subida",
            "tendencia_porcentaje": 3.2
        }"#;
        let p: Product = serde_json::from_str(raw).unwrap();
        assert_eq!(p.name, "Arroz 1kg");
        assert_eq!(p.current_price, Some(1250.0));
        assert_eq!(p.max_price, Some(1300.0));
        assert_eq!(p.record_count, 42);
        assert_eq!(p.trend, Trend::Rising);
        assert!((p.trend_pct.unwrap() - 3.2).abs() < 1e-12);
    }

    #[test]
    fn optional_fields_default() {
        let raw = r#"{"nombre": "Sal", "precio_actual": 300, "tendencia_tipo": "bajada"}"#;
        let p: Product = serde_json::from_str(raw).unwrap();
        assert_eq!(p.min_price, None);
        assert_eq!(p.last_date, None);
        assert_eq!(p.record_count, 0);
        assert_eq!(p.trend_pct, None);
        assert_eq!(p.trend, Trend::Falling);
    }

    #[test]
    fn null_and_non_numeric_fields_do_not_fail_the_row() {
        let raw = r#"{
            "nombre": "Sal",
            "precio_actual": null,
            "precio_promedio": "n/d",
            "total_registros": null,
            "tendencia_tipo": null,
            "tendencia_porcentaje": null
        }"#;
        let p: Product = serde_json::from_str(raw).unwrap();
        assert_eq!(p.current_price, None);
        assert_eq!(p.avg_price, None);
        assert_eq!(p.record_count, 0);
        assert_eq!(p.trend, Trend::Stable);
        assert_eq!(p.trend_pct, None);

        let p: Product = serde_json::from_str(r#"{"nombre": "Pan", "precio_actual": 800}"#).unwrap();
        assert_eq!(p.trend, Trend::Stable);
    }

    #[test]
    fn summary_tolerates_null_total() {
        let s: Summary = serde_json::from_str(r#"{"total_productos": null}"#).unwrap();
        assert_eq!(s.total_products, 0);
        assert_eq!(s.last_updated, None);
    }

    #[test]
    fn unknown_trend_label_is_stable() {
        let t: Trend = serde_json::from_str("\"sin datos\"").unwrap();
        assert_eq!(t, Trend::Stable);
    }

    #[test]
    fn trend_filter_cycles_back_to_none() {
        let mut cur = None;
        let mut seen = Vec::new();
        for _ in 0..4 {
            cur = Trend::next_filter(cur);
            seen.push(cur);
        }
        assert_eq!(
            seen,
            vec![Some(Trend::Rising), Some(Trend::Falling), Some(Trend::Stable), None]
        );
    }

    #[test]
    fn index_and_observation_names() {
        let e: SeriesIndexEntry =
            serde_json::from_str(r#"{"producto": "Sal", "archivo": "sal.json"}"#).unwrap();
        assert_eq!(e.file, "sal.json");
        let o: Observation = serde_json::from_str(r#"{"fecha": "2025-01-05", "precio": 310}"#).unwrap();
        assert_eq!(o.price, 310.0);
    }
}
