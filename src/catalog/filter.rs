//! Pure search/filter/sort over the product list.

use std::cmp::Ordering;

use crate::domain::{Product, SortKey, Trend};

/// Everything the catalog view lets the user pick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Raw search input; normalized (trimmed, lowercased) when applied.
    pub search: String,
    pub trend: Option<Trend>,
    pub sort: SortKey,
}

impl FilterCriteria {
    pub fn normalized_search(&self) -> String {
        normalize_search(&self.search)
    }
}

pub fn normalize_search(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Derive the visible list from `products` without touching the input.
///
/// Sorting is stable, so equal keys keep their input order.
pub fn filter_and_sort(products: &[Product], criteria: &FilterCriteria) -> Vec<Product> {
    let term = criteria.normalized_search();

    let mut out: Vec<Product> = products
        .iter()
        .filter(|p| term.is_empty() || p.name.to_lowercase().contains(&term))
        .filter(|p| criteria.trend.is_none_or(|t| p.trend == t))
        .cloned()
        .collect();

    match criteria.sort {
        SortKey::Name => out.sort_by(|a, b| collate(&a.name, &b.name)),
        SortKey::Price => out.sort_by(|a, b| missing_last(a.current_price, b.current_price, false)),
        SortKey::Trend => out.sort_by(|a, b| missing_last(a.trend_pct, b.trend_pct, true)),
    }

    out
}

/// Compare optional numbers, keeping `None` after every value in either direction.
fn missing_last(a: Option<f64>, b: Option<f64>, descending: bool) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => {
            let ord = x.partial_cmp(&y).unwrap_or(Ordering::Equal);
            if descending { ord.reverse() } else { ord }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Spanish-aware name ordering.
///
/// Accented vowels sort with their base letter, `ñ` sorts after `n`, case is
/// ignored at first and lowercase wins ties.
pub fn collate(a: &str, b: &str) -> Ordering {
    primary_key(a)
        .cmp(&primary_key(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| case_key(a).cmp(&case_key(b)))
        .then_with(|| a.cmp(b))
}

fn primary_key(s: &str) -> Vec<(char, u8)> {
    let mut out = Vec::with_capacity(s.len());
    for ch in s.chars().flat_map(char::to_lowercase) {
        let folded = match ch {
            'á' | 'à' | 'ä' | 'â' => ('a', 0),
            'é' | 'è' | 'ë' | 'ê' => ('e', 0),
            'í' | 'ì' | 'ï' | 'î' => ('i', 0),
            'ó' | 'ò' | 'ö' | 'ô' => ('o', 0),
            'ú' | 'ù' | 'ü' | 'û' => ('u', 0),
            'ñ' => ('n', 1),
            other => (other, 0),
        };
        out.push(folded);
    }
    out
}

// Lowercase before uppercase.
fn case_key(s: &str) -> Vec<bool> {
    s.chars().map(char::is_uppercase).collect()
}
