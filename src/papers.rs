//! Paper lookup for a method pair.

use crate::incidence::IncidenceMatrix;
use crate::models::{Paper, PaperSummary};
use std::collections::HashMap;

/// Default number of papers shown for a highlighted edge.
pub const DEFAULT_PAPERS_PER_PAIR: usize = 5;

/// Papers using both `method_a` and `method_b`, best `ranking_score` first,
/// at most `top_n`. Unknown methods or no shared papers give an empty list.
pub fn papers_for_pair<'a>(
    incidence: &IncidenceMatrix,
    papers: &'a HashMap<String, Paper>,
    method_a: &str,
    method_b: &str,
    top_n: usize,
) -> Vec<&'a Paper> {
    let ids = incidence.papers_with_all(&[method_a, method_b]);
    tracing::debug!(method_a, method_b, found = ids.len(), "papers for method pair");

    let mut matching: Vec<&Paper> = ids.iter().filter_map(|id| papers.get(*id)).collect();
    matching.sort_by(|x, y| y.ranking_score().total_cmp(&x.ranking_score()));
    matching.truncate(top_n);
    matching
}

/// Card data for `paper`, listing the methods the incidence matrix kept for it.
pub fn summarize(incidence: &IncidenceMatrix, paper: &Paper) -> PaperSummary {
    let methods = incidence.methods_of(&paper.paper_id).into_iter().map(str::to_string).collect();
    PaperSummary::new(paper, methods)
}
