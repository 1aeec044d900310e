//! Synthetic adoption trends per method.
//!
//! The dataset carries no time series, so the trend chart is fed from a
//! seeded generator: the same seed always produces the same series.

use crate::catalog::MethodCatalog;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::collections::BTreeSet;
use std::ops::RangeInclusive;

pub const TREND_YEARS: RangeInclusive<i32> = 2015..=2025;
const BASE_YEAR: i32 = 2014;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub year: i32,
    pub method: String,
    pub display_name: String,
    pub category: String,
    pub points: f64,
}

/// One point per catalog method per year in [`TREND_YEARS`].
pub fn generate_trends(catalog: &MethodCatalog, seed: u64) -> Vec<TrendPoint> {
    let mut rng = StdRng::seed_from_u64(seed);
    let years = (TREND_YEARS.end() - TREND_YEARS.start() + 1) as usize;
    let mut series = Vec::with_capacity(catalog.methods().len() * years);

    for info in catalog.methods() {
        for year in TREND_YEARS {
            let base: f64 = rng.gen_range(0.1..1.0);
            let jitter: f64 = rng.gen_range(0.5..1.5);
            series.push(TrendPoint {
                year,
                method: info.method.clone(),
                display_name: info.display_name.clone(),
                category: info.category.clone(),
                points: base * f64::from(year - BASE_YEAR) * jitter,
            });
        }
    }

    tracing::info!(seed, points = series.len(), "generated trend series");
    series
}

/// Points whose category is visible and, when `selected` is non-empty, whose
/// method is selected.
pub fn filter_trends<'a>(
    series: &'a [TrendPoint],
    categories: &BTreeSet<String>,
    selected: &[String],
) -> Vec<&'a TrendPoint> {
    series
        .iter()
        .filter(|p| categories.contains(&p.category))
        .filter(|p| selected.is_empty() || selected.contains(&p.method))
        .collect()
}
