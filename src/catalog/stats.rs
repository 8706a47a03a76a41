//! Header statistics for the catalog view.

use crate::domain::{Product, Trend};

/// Counts per trend plus the mean current price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuickStats {
    pub rising: usize,
    pub falling: usize,
    pub stable: usize,
    /// Mean over products that have a price; NaN when none do.
    pub mean_price: f64,
}

/// Single pass over the full product list.
pub fn compute_quick_stats(products: &[Product]) -> QuickStats {
    let mut stats = QuickStats {
        rising: 0,
        falling: 0,
        stable: 0,
        mean_price: 0.0,
    };
    let mut sum = 0.0;
    let mut priced = 0usize;

    for p in products {
        match p.trend {
            Trend::Rising => stats.rising += 1,
            Trend::Falling => stats.falling += 1,
            Trend::Stable => stats.stable += 1,
        }
        if let Some(price) = p.current_price {
            sum += price;
            priced += 1;
        }
    }

    stats.mean_price = sum / priced as f64;
    stats
}
