//! Data models for the method network.
//!
//! This module contains the core data structures used throughout the
//! application: papers and their method mentions, unordered method pairs,
//! and the render-ready network view handed to the browser.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum number of ranked method mentions per paper (`Method_1..Method_10`).
pub const MAX_METHOD_MENTIONS: usize = 10;

// ============================================================================
// Papers
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MethodMention {
    /// Raw method text as it appears in the dataset. `None` for blank cells.
    pub raw: Option<String>,
    /// Optional relevance score from `Method_{i}_score`.
    pub score: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Paper {
    pub paper_id: String,
    pub title: String,
    pub year: i32,
    pub citation_count: u32,
    pub authors: String,
    pub doi: String,
    pub primary_topic: Option<i64>,
    pub secondary_topic: Option<i64>,
    /// Rank-ordered mentions; may contain blanks and duplicates.
    pub mentions: Vec<MethodMention>,
}

impl Paper {
    /// Ranking score used when surfacing papers for a method pair. Recency
    /// dominates; citations separate papers from the same year.
    pub fn ranking_score(&self) -> f64 {
        self.year as f64 * 100.0 + self.citation_count as f64 / 10.0
    }
}

/// A paper as returned to the browser's paper panel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaperSummary {
    pub paper_id: String,
    pub title: String,
    pub year: i32,
    pub citation_count: u32,
    pub authors: String,
    pub doi: String,
    pub score: f64,
    /// Normalized methods the paper contributes to the network.
    pub methods: Vec<String>,
}

impl PaperSummary {
    pub fn new(paper: &Paper, methods: Vec<String>) -> Self {
        Self {
            paper_id: paper.paper_id.clone(),
            title: paper.title.clone(),
            year: paper.year,
            citation_count: paper.citation_count,
            authors: paper.authors.clone(),
            doi: paper.doi.clone(),
            score: paper.ranking_score(),
            methods,
        }
    }
}

// ============================================================================
// Method Pairs
// ============================================================================

/// Unordered pair of distinct methods, stored with the smaller key first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "(String, String)", into = "(String, String)")]
pub struct MethodPair {
    a: String,
    b: String,
}

impl MethodPair {
    /// Returns `None` when both sides name the same method.
    pub fn new(x: impl Into<String>, y: impl Into<String>) -> Option<Self> {
        let (x, y) = (x.into(), y.into());
        if x == y {
            return None;
        }
        if x < y {
            Some(Self { a: x, b: y })
        } else {
            Some(Self { a: y, b: x })
        }
    }

    pub fn first(&self) -> &str {
        &self.a
    }

    pub fn second(&self) -> &str {
        &self.b
    }

    pub fn contains(&self, method: &str) -> bool {
        self.a == method || self.b == method
    }
}

impl TryFrom<(String, String)> for MethodPair {
    type Error = String;

    fn try_from((x, y): (String, String)) -> Result<Self, Self::Error> {
        MethodPair::new(x, y).ok_or_else(|| "a method pair needs two distinct methods".to_string())
    }
}

impl From<MethodPair> for (String, String) {
    fn from(pair: MethodPair) -> Self {
        (pair.a, pair.b)
    }
}

impl fmt::Display for MethodPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ↔ {}", self.a, self.b)
    }
}

// ============================================================================
// Network View (renderer input)
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeHighlight {
    Normal,
    Focus,
    Neighbor,
    Dimmed,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NetworkNode {
    pub method: String,
    pub angle: f64,
    pub x: f64,
    pub y: f64,
    /// Display name cut down for on-canvas labels.
    pub label: String,
    pub display_name: String,
    pub category: String,
    pub color: String,
    pub total: usize,
    pub highlight: NodeHighlight,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NetworkEdge {
    pub method_a: String,
    pub method_b: String,
    pub weight: u32,
    /// Weight scaled to 0..1 across the rendered edges.
    pub norm_weight: f64,
    pub highlighted: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LegendEntry {
    pub category: String,
    pub color: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NetworkView {
    pub nodes: Vec<NetworkNode>,
    pub edges: Vec<NetworkEdge>,
    pub legend: Vec<LegendEntry>,
    /// Set when there is nothing to draw; the renderer shows it instead.
    pub placeholder: Option<String>,
}

impl NetworkView {
    pub fn placeholder(message: impl Into<String>) -> Self {
        Self {
            placeholder: Some(message.into()),
            ..Self::default()
        }
    }
}
