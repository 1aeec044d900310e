//! Per-method metadata: display names, categories, totals and variants.

use crate::dataset::Overlays;
use crate::incidence::MethodTotals;
use crate::normalize::normalize_method_name;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Bucket for methods the category overlay does not mention.
pub const UNKNOWN_CATEGORY: &str = "Unknown";

/// Qualitative palette (ColorBrewer Set2), assigned by sorted category index.
pub const CATEGORY_PALETTE: &[&str] = &[
    "#66c2a5", "#fc8d62", "#8da0cb", "#e78ac3", "#a6d854", "#ffd92f", "#e5c494", "#b3b3b3",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodInfo {
    pub method: String,
    pub display_name: String,
    pub category: String,
    pub total: usize,
    pub variants: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MethodCatalog {
    methods: Vec<MethodInfo>,
    index: HashMap<String, usize>,
    categories: Vec<String>,
}

impl MethodCatalog {
    /// Join matrix methods with their totals and the overlay mappings.
    /// Overlay keys are normalized before lookup so that the JSON files can
    /// use any capitalisation or hyphenation.
    pub fn build(methods: &[String], totals: &MethodTotals, overlays: &Overlays) -> Self {
        let categories_by_key = by_normalized_key(&overlays.categories);
        let shortnames_by_key = by_normalized_key(&overlays.shortnames);
        let variants_by_key = by_normalized_key(&overlays.variants);

        let infos: Vec<MethodInfo> = methods
            .iter()
            .map(|m| MethodInfo {
                method: m.clone(),
                display_name: shortnames_by_key
                    .get(m)
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| m.clone()),
                category: categories_by_key
                    .get(m)
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| UNKNOWN_CATEGORY.to_string()),
                total: totals.get(m).copied().unwrap_or(0),
                variants: variants_by_key.get(m).map(|v| v.to_vec()).unwrap_or_default(),
            })
            .collect();

        let mut categories: BTreeSet<String> = overlays.categories.values().cloned().collect();
        if infos.iter().any(|i| i.category == UNKNOWN_CATEGORY) {
            categories.insert(UNKNOWN_CATEGORY.to_string());
        }

        let index = infos
            .iter()
            .enumerate()
            .map(|(i, info)| (info.method.clone(), i))
            .collect();

        Self {
            methods: infos,
            index,
            categories: categories.into_iter().collect(),
        }
    }

    pub fn methods(&self) -> &[MethodInfo] {
        &self.methods
    }

    pub fn get(&self, method: &str) -> Option<&MethodInfo> {
        self.index.get(method).map(|&i| &self.methods[i])
    }

    pub fn contains(&self, method: &str) -> bool {
        self.index.contains_key(method)
    }

    /// All categories, sorted.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn category(&self, method: &str) -> &str {
        self.get(method).map_or(UNKNOWN_CATEGORY, |i| i.category.as_str())
    }

    pub fn total(&self, method: &str) -> usize {
        self.get(method).map_or(0, |i| i.total)
    }

    pub fn display_name<'a>(&'a self, method: &'a str) -> &'a str {
        self.get(method).map_or(method, |i| i.display_name.as_str())
    }

    pub fn color(&self, category: &str) -> &'static str {
        match self.categories.iter().position(|c| c == category) {
            Some(i) => CATEGORY_PALETTE[i % CATEGORY_PALETTE.len()],
            None => "gray",
        }
    }

    /// The `n` most used methods whose category is in `categories`, by total
    /// descending and method key ascending on ties.
    pub fn top_n(&self, n: usize, categories: &BTreeSet<String>) -> Vec<String> {
        let mut eligible: Vec<&MethodInfo> = self
            .methods
            .iter()
            .filter(|i| categories.contains(&i.category))
            .collect();
        eligible.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.method.cmp(&b.method)));
        eligible.into_iter().take(n).map(|i| i.method.clone()).collect()
    }
}

/// Re-key an overlay by normalized method. When several raw keys collapse to
/// one method, a key already in canonical form wins, then the smallest raw key.
fn by_normalized_key<V>(overlay: &BTreeMap<String, V>) -> HashMap<String, &V> {
    let mut out = HashMap::new();
    for (raw, value) in overlay {
        let key = normalize_method_name(raw);
        if *raw == key {
            out.insert(key, value);
        } else if out.contains_key(&key) {
            tracing::debug!(raw = %raw, method = %key, "overlay key shadowed by another spelling");
        } else {
            out.insert(key, value);
        }
    }
    out
}
