//! Fuzzy method search for the dashboard search box.

use crate::catalog::MethodCatalog;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use serde::Serialize;

/// Queries shorter than this return nothing.
pub const MIN_QUERY_CHARS: usize = 2;
pub const DEFAULT_SEARCH_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub method: String,
    pub display_name: String,
    pub category: String,
    pub score: i64,
}

/// Match `query` against every method's key, display name and variants,
/// keeping the best score per method.
pub fn search_methods(catalog: &MethodCatalog, query: &str, limit: usize) -> Vec<SearchHit> {
    let query = query.trim();
    if query.chars().count() < MIN_QUERY_CHARS {
        return Vec::new();
    }

    let matcher = SkimMatcherV2::default().ignore_case();
    let mut hits: Vec<SearchHit> = catalog
        .methods()
        .iter()
        .filter_map(|info| {
            let best = std::iter::once(info.method.as_str())
                .chain(std::iter::once(info.display_name.as_str()))
                .chain(info.variants.iter().map(String::as_str))
                .filter_map(|candidate| matcher.fuzzy_match(candidate, query))
                .max()?;
            Some(SearchHit {
                method: info.method.clone(),
                display_name: info.display_name.clone(),
                category: info.category.clone(),
                score: best,
            })
        })
        .collect();

    hits.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.method.cmp(&b.method)));
    hits.truncate(limit);
    tracing::debug!(query, hits = hits.len(), "method search");
    hits
}
