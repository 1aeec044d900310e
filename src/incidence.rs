//! Paper × method incidence matrix.
//!
//! Papers are filtered by year, citation count and topic, their method
//! mentions normalized and folded into a binary paper × method relation, and
//! methods with too little support pruned.

use crate::error::{MethodNetError, Result};
use crate::models::Paper;
use crate::normalize::Normalizer;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

/// Per-method paper counts.
pub type MethodTotals = BTreeMap<String, usize>;

// ============================================================================
// Filters
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TopicMode {
    /// Primary or secondary topic in the set.
    #[default]
    Any,
    Primary,
    Secondary,
    /// Both topics in the set.
    Both,
}

impl TopicMode {
    fn matches(self, paper: &Paper, topics: &BTreeSet<i64>) -> bool {
        let in_set = |t: Option<i64>| t.is_some_and(|t| topics.contains(&t));
        match self {
            TopicMode::Any => in_set(paper.primary_topic) || in_set(paper.secondary_topic),
            TopicMode::Primary => in_set(paper.primary_topic),
            TopicMode::Secondary => in_set(paper.secondary_topic),
            TopicMode::Both => in_set(paper.primary_topic) && in_set(paper.secondary_topic),
        }
    }
}

impl FromStr for TopicMode {
    type Err = MethodNetError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "ANY" => Ok(TopicMode::Any),
            "PRIMARY" => Ok(TopicMode::Primary),
            "SECONDARY" => Ok(TopicMode::Secondary),
            "BOTH" => Ok(TopicMode::Both),
            _ => Err(MethodNetError::InvalidFilterMode(s.to_string())),
        }
    }
}

impl fmt::Display for TopicMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TopicMode::Any => "ANY",
            TopicMode::Primary => "PRIMARY",
            TopicMode::Secondary => "SECONDARY",
            TopicMode::Both => "BOTH",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaperFilters {
    pub min_year: Option<i32>,
    /// 0 disables the citation filter.
    pub min_citations: u32,
    /// `None` disables the topic filter.
    pub topics: Option<BTreeSet<i64>>,
    pub topic_mode: TopicMode,
}

/// One filter step and how many papers it kept.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterStep {
    pub name: String,
    pub before: usize,
    pub kept: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterReport {
    pub steps: Vec<FilterStep>,
}

impl FilterReport {
    fn record(&mut self, name: String, before: usize, kept: usize) {
        tracing::info!(filter = %name, kept, before, "filter applied");
        self.steps.push(FilterStep { name, before, kept });
    }
}

/// Apply the configured filters in order, reporting survivors per step.
pub fn filter_papers<'a>(papers: &'a [Paper], filters: &PaperFilters) -> (Vec<&'a Paper>, FilterReport) {
    let mut report = FilterReport::default();
    let mut kept: Vec<&Paper> = papers.iter().collect();

    if let Some(min_year) = filters.min_year {
        let before = kept.len();
        kept.retain(|p| p.year >= min_year);
        report.record(format!("year >= {}", min_year), before, kept.len());
    }

    if filters.min_citations > 0 {
        let before = kept.len();
        kept.retain(|p| p.citation_count >= filters.min_citations);
        report.record(format!("citations >= {}", filters.min_citations), before, kept.len());
    }

    if let Some(ref topics) = filters.topics {
        let before = kept.len();
        kept.retain(|p| filters.topic_mode.matches(p, topics));
        report.record(format!("topic ({})", filters.topic_mode), before, kept.len());
    }

    (kept, report)
}

// ============================================================================
// Incidence Matrix
// ============================================================================

/// Binary paper × method relation.
///
/// Rows are papers (in dataset order) that kept at least one method after
/// pruning; columns are methods in ascending key order. Each row stores the
/// sorted column indices of its methods.
#[derive(Debug, Clone, PartialEq)]
pub struct IncidenceMatrix {
    paper_ids: Vec<String>,
    methods: Vec<String>,
    method_index: HashMap<String, usize>,
    rows: Vec<Vec<usize>>,
}

impl IncidenceMatrix {
    pub fn paper_ids(&self) -> &[String] {
        &self.paper_ids
    }

    pub fn methods(&self) -> &[String] {
        &self.methods
    }

    pub fn method_index(&self, method: &str) -> Option<usize> {
        self.method_index.get(method).copied()
    }

    pub fn paper_count(&self) -> usize {
        self.rows.len()
    }

    pub fn method_count(&self) -> usize {
        self.methods.len()
    }

    /// Sorted method columns set for the paper in `row`.
    pub fn row(&self, row: usize) -> &[usize] {
        &self.rows[row]
    }

    pub fn contains(&self, paper_id: &str, method: &str) -> bool {
        let Some(col) = self.method_index(method) else {
            return false;
        };
        self.paper_ids
            .iter()
            .position(|id| id == paper_id)
            .is_some_and(|row| self.rows[row].binary_search(&col).is_ok())
    }

    /// Methods set for `paper_id`, in column order. Empty for unknown papers.
    pub fn methods_of(&self, paper_id: &str) -> Vec<&str> {
        self.paper_ids
            .iter()
            .position(|id| id == paper_id)
            .map(|row| self.rows[row].iter().map(|&col| self.methods[col].as_str()).collect())
            .unwrap_or_default()
    }

    /// Ids of papers whose row has a 1 in every given method column.
    pub fn papers_with_all(&self, methods: &[&str]) -> Vec<&str> {
        let cols: Option<Vec<usize>> = methods.iter().map(|m| self.method_index(m)).collect();
        let Some(cols) = cols else {
            return Vec::new();
        };
        self.rows
            .iter()
            .zip(&self.paper_ids)
            .filter(|(row, _)| cols.iter().all(|c| row.binary_search(c).is_ok()))
            .map(|(_, id)| id.as_str())
            .collect()
    }

    /// Column sums, i.e. number of papers using each method.
    pub fn column_totals(&self) -> MethodTotals {
        let mut counts = vec![0usize; self.methods.len()];
        for row in &self.rows {
            for &col in row {
                counts[col] += 1;
            }
        }
        self.methods.iter().cloned().zip(counts).collect()
    }
}

/// Result of a successful build.
#[derive(Debug, Clone)]
pub struct Incidence {
    pub matrix: IncidenceMatrix,
    pub totals: MethodTotals,
    pub report: FilterReport,
}

/// Filter papers, normalize their mentions and build the incidence matrix.
///
/// Returns [`MethodNetError::EmptyAfterFilters`] when no paper survives the
/// filters; that is a "no data" signal rather than an empty matrix. Methods
/// supported by fewer than `min_support` distinct papers are dropped.
pub fn build(
    papers: &[Paper],
    filters: &PaperFilters,
    normalizer: &Normalizer,
    min_support: usize,
) -> Result<Incidence> {
    let (kept, report) = filter_papers(papers, filters);
    if kept.is_empty() {
        tracing::warn!("no papers remaining after filters");
        return Err(MethodNetError::EmptyAfterFilters);
    }
    tracing::info!(papers = kept.len(), "working with papers after all filters");

    // (paper, method) observations with set-union semantics per paper.
    let paper_methods: Vec<(&Paper, BTreeSet<String>)> = kept
        .into_iter()
        .map(|paper| {
            let methods = paper
                .mentions
                .iter()
                .filter_map(|m| normalizer.normalize_mention(m.raw.as_deref()))
                .collect();
            (paper, methods)
        })
        .collect();

    let mut support: BTreeMap<&str, usize> = BTreeMap::new();
    for (_, methods) in &paper_methods {
        for m in methods {
            *support.entry(m.as_str()).or_insert(0) += 1;
        }
    }

    let methods: Vec<String> = support
        .iter()
        .filter(|(_, &count)| count >= min_support)
        .map(|(m, _)| m.to_string())
        .collect();
    tracing::info!(
        kept = methods.len(),
        candidates = support.len(),
        min_support,
        "pruned methods by paper support"
    );

    let method_index: HashMap<String, usize> = methods
        .iter()
        .enumerate()
        .map(|(i, m)| (m.clone(), i))
        .collect();

    let mut paper_ids = Vec::new();
    let mut rows = Vec::new();
    for (paper, found) in &paper_methods {
        // BTreeSet iteration is key-ordered and so are the column indices.
        let row: Vec<usize> = found.iter().filter_map(|m| method_index.get(m).copied()).collect();
        if !row.is_empty() {
            paper_ids.push(paper.paper_id.clone());
            rows.push(row);
        }
    }

    let matrix = IncidenceMatrix {
        paper_ids,
        methods,
        method_index,
        rows,
    };
    let totals = matrix.column_totals();

    Ok(Incidence {
        matrix,
        totals,
        report,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::MethodMention;

    pub(crate) fn paper(id: &str, year: i32, citations: u32, methods: &[&str]) -> Paper {
        Paper {
            paper_id: id.to_string(),
            title: format!("Paper {}", id),
            year,
            citation_count: citations,
            authors: "Authors N/A".to_string(),
            doi: id.to_string(),
            primary_topic: Some(2),
            secondary_topic: Some(5),
            mentions: methods
                .iter()
                .map(|m| MethodMention {
                    raw: Some(m.to_string()),
                    score: None,
                })
                .collect(),
        }
    }

    pub(crate) fn scenario_papers() -> Vec<Paper> {
        vec![
            paper("P1", 2019, 40, &["A", "B"]),
            paper("P2", 2021, 10, &["A", "B", "C"]),
            paper("P3", 2020, 5, &["B", "C"]),
        ]
    }

    fn with_topics(mut p: Paper, primary: Option<i64>, secondary: Option<i64>) -> Paper {
        p.primary_topic = primary;
        p.secondary_topic = secondary;
        p
    }

    #[test]
    fn test_scenario_incidence() {
        let inc = build(&scenario_papers(), &PaperFilters::default(), &Normalizer::new(), 1).unwrap();
        assert_eq!(inc.matrix.methods(), &["a", "b", "c"]);
        assert_eq!(inc.matrix.paper_count(), 3);
        assert!(inc.matrix.contains("P1", "a"));
        assert!(!inc.matrix.contains("P1", "c"));
        assert!(!inc.matrix.contains("P9", "a"));
        assert_eq!(inc.totals["a"], 2);
        assert_eq!(inc.totals["b"], 3);
        assert_eq!(inc.totals["c"], 2);
    }

    #[test]
    fn test_duplicate_mentions_count_once() {
        let papers = vec![
            paper("P1", 2020, 0, &["LSTM", "lstm", " Lstm "]),
            paper("P2", 2020, 0, &["ARIMA"]),
        ];
        let inc = build(&papers, &PaperFilters::default(), &Normalizer::new(), 2).unwrap();
        // "lstm" appears three times in P1 but only in one paper.
        assert!(inc.matrix.methods().is_empty());
        assert!(!inc.totals.contains_key("lstm"));
    }

    #[test]
    fn test_min_support_boundary() {
        let papers = vec![
            paper("P1", 2020, 0, &["x", "y"]),
            paper("P2", 2020, 0, &["x", "y"]),
            paper("P3", 2020, 0, &["x", "z"]),
        ];
        for min_support in 0..=4 {
            let inc = build(&papers, &PaperFilters::default(), &Normalizer::new(), min_support).unwrap();
            let expected: Vec<&str> = [("x", 3), ("y", 2), ("z", 1)]
                .iter()
                .filter(|(_, c)| *c >= min_support)
                .map(|(m, _)| *m)
                .collect();
            assert_eq!(inc.matrix.methods(), expected.as_slice(), "min_support={}", min_support);
            for (m, count) in &inc.totals {
                assert!(*count >= min_support);
                assert_eq!(*count, inc.matrix.papers_with_all(&[m.as_str()]).len());
            }
        }
    }

    #[test]
    fn test_papers_without_surviving_methods_have_no_row() {
        let papers = vec![
            paper("P1", 2020, 0, &["x"]),
            paper("P2", 2020, 0, &["x"]),
            paper("P3", 2020, 0, &["rare"]),
        ];
        let inc = build(&papers, &PaperFilters::default(), &Normalizer::new(), 2).unwrap();
        assert_eq!(inc.matrix.paper_ids(), &["P1", "P2"]);
    }

    #[test]
    fn test_year_and_citation_filters() {
        let filters = PaperFilters {
            min_year: Some(2020),
            min_citations: 10,
            ..PaperFilters::default()
        };
        let papers = scenario_papers();
        let (kept, report) = filter_papers(&papers, &filters);
        let ids: Vec<&str> = kept.iter().map(|p| p.paper_id.as_str()).collect();
        assert_eq!(ids, vec!["P2"]);
        assert_eq!(report.steps.len(), 2);
        assert_eq!(report.steps[0].before, 3);
        assert_eq!(report.steps[0].kept, 2);
        assert_eq!(report.steps[1].kept, 1);
    }

    #[test]
    fn test_topic_mode_both_excludes_partial_match() {
        let papers = vec![
            with_topics(paper("P1", 2020, 0, &["a"]), Some(2), Some(9)),
            with_topics(paper("P2", 2020, 0, &["a"]), Some(5), Some(2)),
        ];
        let filters = PaperFilters {
            topics: Some([2, 5].into_iter().collect()),
            topic_mode: TopicMode::Both,
            ..PaperFilters::default()
        };
        let (kept, _) = filter_papers(&papers, &filters);
        let ids: Vec<&str> = kept.iter().map(|p| p.paper_id.as_str()).collect();
        assert_eq!(ids, vec!["P2"]);
    }

    #[test]
    fn test_topic_modes() {
        let papers = vec![
            with_topics(paper("P1", 2020, 0, &["a"]), Some(2), Some(9)),
            with_topics(paper("P2", 2020, 0, &["a"]), Some(9), Some(5)),
            with_topics(paper("P3", 2020, 0, &["a"]), None, None),
        ];
        let topics: BTreeSet<i64> = [2, 5].into_iter().collect();
        let ids = |mode| {
            let filters = PaperFilters {
                topics: Some(topics.clone()),
                topic_mode: mode,
                ..PaperFilters::default()
            };
            filter_papers(&papers, &filters)
                .0
                .iter()
                .map(|p| p.paper_id.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(ids(TopicMode::Any), vec!["P1", "P2"]);
        assert_eq!(ids(TopicMode::Primary), vec!["P1"]);
        assert_eq!(ids(TopicMode::Secondary), vec!["P2"]);
        assert!(ids(TopicMode::Both).is_empty());
    }

    #[test]
    fn test_topic_mode_parsing() {
        assert_eq!("any".parse::<TopicMode>().unwrap(), TopicMode::Any);
        assert_eq!("Both".parse::<TopicMode>().unwrap(), TopicMode::Both);
        let err = "EITHER".parse::<TopicMode>().unwrap_err();
        assert!(matches!(err, MethodNetError::InvalidFilterMode(ref m) if m == "EITHER"));
    }

    #[test]
    fn test_empty_after_filters_is_signalled() {
        let filters = PaperFilters {
            min_year: Some(2100),
            ..PaperFilters::default()
        };
        let result = build(&scenario_papers(), &filters, &Normalizer::new(), 1);
        assert!(matches!(result, Err(MethodNetError::EmptyAfterFilters)));
    }
}
