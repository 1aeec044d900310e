//! Network assembly: which nodes and edges are drawn, and which of them are
//! emphasized for the current highlight.

use crate::catalog::MethodCatalog;
use crate::cooccurrence::CooccurrenceMatrix;
use crate::models::{LegendEntry, MethodPair, NetworkEdge, NetworkNode, NetworkView, NodeHighlight};
use crate::selection::SelectionState;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::f64::consts::PI;

/// Labels longer than this are cut to `LABEL_KEEP` characters plus "...".
const LABEL_MAX: usize = 18;
const LABEL_KEEP: usize = 15;

pub const EMPTY_NETWORK_MESSAGE: &str = "No methods to display. Adjust filters.";
pub const NO_DATA_MESSAGE: &str = "No papers match the configured filters.";

// ============================================================================
// Edge Selection
// ============================================================================

/// Choose the edges to draw among `nodes`.
///
/// Each node proposes its neighbours with `cooc >= min_cooc`, strongest first, and keeps at most `max_per_node` of them. The
/// sort is stable, so equal weights keep the order of `nodes`. Proposals are
/// merged by unordered pair keeping the larger weight.
pub fn select_edges(
    cooc: &CooccurrenceMatrix,
    nodes: &[String],
    min_cooc: u32,
    max_per_node: usize,
) -> BTreeMap<MethodPair, u32> {
    let mut edges: BTreeMap<MethodPair, u32> = BTreeMap::new();

    for a in nodes {
        let mut candidates: Vec<(&String, u32)> = nodes
            .iter()
            .filter(|b| *b != a)
            .filter_map(|b| cooc.get(a, b).map(|w| (b, w)))
            .filter(|&(_, w)| w >= min_cooc)
            .collect();
        candidates.sort_by(|x, y| y.1.cmp(&x.1));
        candidates.truncate(max_per_node);

        for (b, weight) in candidates {
            let Some(pair) = MethodPair::new(a.as_str(), b.as_str()) else {
                continue;
            };
            let entry = edges.entry(pair).or_insert(weight);
            if weight > *entry {
                *entry = weight;
            }
        }
    }

    edges
}

// ============================================================================
// View Assembly
// ============================================================================

/// Per-session display options.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewParams {
    pub categories: BTreeSet<String>,
    pub min_cooc: u32,
    pub max_edges: usize,
}

/// Methods to plot: the explicit selection if any, otherwise every matrix
/// method, restricted to the visible categories in both cases.
pub fn methods_to_plot(
    cooc: &CooccurrenceMatrix,
    catalog: &MethodCatalog,
    state: &SelectionState,
    categories: &BTreeSet<String>,
) -> Vec<String> {
    let in_categories = |m: &&String| categories.contains(catalog.category(m));
    if state.selected_methods.is_empty() {
        cooc.methods().iter().filter(in_categories).cloned().collect()
    } else {
        state
            .selected_methods
            .iter()
            .filter(|m| cooc.contains(m))
            .filter(in_categories)
            .cloned()
            .collect()
    }
}

fn short_label(name: &str) -> String {
    if name.chars().count() > LABEL_MAX {
        let cut: String = name.chars().take(LABEL_KEEP).collect();
        format!("{}...", cut)
    } else {
        name.to_string()
    }
}

/// Build the render-ready node/edge list for one session state.
pub fn build_view(
    cooc: &CooccurrenceMatrix,
    catalog: &MethodCatalog,
    state: &SelectionState,
    params: &ViewParams,
) -> NetworkView {
    let methods = methods_to_plot(cooc, catalog, state, &params.categories);
    if methods.is_empty() {
        return NetworkView::placeholder(EMPTY_NETWORK_MESSAGE);
    }

    let edges = select_edges(cooc, &methods, params.min_cooc, params.max_edges);
    let focus = state.highlighted_method.as_deref();

    let mut highlighted: HashSet<&MethodPair> = HashSet::new();
    let mut neighbors: HashSet<&str> = HashSet::new();
    if let Some(focus) = focus {
        for pair in edges.keys().filter(|p| p.contains(focus)) {
            highlighted.insert(pair);
            neighbors.insert(pair.first());
            neighbors.insert(pair.second());
        }
    }
    if let Some(ref pair) = state.highlighted_edge {
        highlighted.insert(pair);
    }

    let n = methods.len();
    let nodes = methods
        .iter()
        .enumerate()
        .map(|(i, method)| {
            let angle = 2.0 * PI * i as f64 / n as f64;
            let category = catalog.category(method).to_string();
            let highlight = match focus {
                Some(f) if f == method.as_str() => NodeHighlight::Focus,
                Some(_) if neighbors.contains(method.as_str()) => NodeHighlight::Neighbor,
                Some(_) => NodeHighlight::Dimmed,
                None => NodeHighlight::Normal,
            };
            let display_name = catalog.display_name(method).to_string();
            NetworkNode {
                method: method.clone(),
                angle,
                x: angle.cos(),
                y: angle.sin(),
                label: short_label(&display_name),
                display_name,
                color: catalog.color(&category).to_string(),
                category,
                total: catalog.total(method),
                highlight,
            }
        })
        .collect();

    let max_w = edges.values().copied().max().unwrap_or(0);
    let min_w = edges.values().copied().min().unwrap_or(0);
    let edges = edges
        .iter()
        .map(|(pair, &weight)| NetworkEdge {
            method_a: pair.first().to_string(),
            method_b: pair.second().to_string(),
            weight,
            norm_weight: if max_w > min_w {
                (weight - min_w) as f64 / (max_w - min_w) as f64
            } else {
                0.5
            },
            highlighted: highlighted.contains(pair),
        })
        .collect();

    let legend = params
        .categories
        .iter()
        .filter_map(|cat| {
            let count = methods.iter().filter(|m| catalog.category(m) == cat).count();
            (count > 0).then(|| LegendEntry {
                category: cat.clone(),
                color: catalog.color(cat).to_string(),
                count,
            })
        })
        .collect();

    NetworkView {
        nodes,
        edges,
        legend,
        placeholder: None,
    }
}
