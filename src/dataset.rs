//! Dataset and overlay loading.
//!
//! The paper table is a delimited file with one row per paper and the ranked
//! methods spread over `Method_1..Method_10`. The three overlays are optional
//! JSON objects; a missing overlay degrades to an empty mapping.

use crate::error::{MethodNetError, Result};
use crate::models::{MethodMention, Paper, MAX_METHOD_MENTIONS};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

pub const CATEGORIES_FILE: &str = "method_categories.json";
pub const SHORTNAMES_FILE: &str = "method_shortnames.json";
pub const VARIANTS_FILE: &str = "method_variants.json";

const DEFAULT_AUTHORS: &str = "Authors N/A";

// ============================================================================
// Delimited Table
// ============================================================================

/// Pick `;` unless the header splits into a single `;`-column that contains
/// commas, in which case the file is comma separated.
pub fn detect_delimiter(header_line: &str) -> u8 {
    let semicolon_columns = header_line.split(';').count();
    if semicolon_columns == 1 && header_line.contains(',') {
        b','
    } else {
        b';'
    }
}

/// Column positions resolved from the header row.
struct Columns {
    paper_id: usize,
    title: usize,
    year: usize,
    citations: usize,
    authors: Option<usize>,
    doi: Option<usize>,
    primary_topic: Option<usize>,
    secondary_topic: Option<usize>,
    methods: Vec<(Option<usize>, Option<usize>)>,
}

impl Columns {
    fn resolve(headers: &csv::StringRecord) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        let require =
            |name: &str| find(name).ok_or_else(|| MethodNetError::MissingColumn(name.to_string()));

        Ok(Self {
            paper_id: require("paperId")?,
            title: require("title")?,
            year: require("year")?,
            citations: require("citationCount")?,
            authors: find("authors"),
            doi: find("doi"),
            primary_topic: find("Primary_Topic_Index"),
            secondary_topic: find("Secondary_Topic_Index"),
            methods: (1..=MAX_METHOD_MENTIONS)
                .map(|i| (find(&format!("Method_{}", i)), find(&format!("Method_{}_score", i))))
                .collect(),
        })
    }
}

fn cell<'r>(record: &'r csv::StringRecord, idx: Option<usize>) -> Option<&'r str> {
    idx.and_then(|i| record.get(i))
        .map(str::trim)
        .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("nan"))
}

/// Integers exported by dataframe tools often look like `2019.0`.
fn parse_number(s: Option<&str>) -> Option<f64> {
    s.and_then(|v| v.parse::<f64>().ok()).filter(|v| v.is_finite())
}

fn parse_record(record: &csv::StringRecord, cols: &Columns) -> Option<Paper> {
    let paper_id = cell(record, Some(cols.paper_id))?.to_string();

    let mentions = cols
        .methods
        .iter()
        .map(|&(method, score)| MethodMention {
            raw: cell(record, method).map(str::to_string),
            score: parse_number(cell(record, score)),
        })
        .collect();

    Some(Paper {
        title: cell(record, Some(cols.title)).unwrap_or_default().to_string(),
        year: parse_number(cell(record, Some(cols.year))).map_or(0, |y| y as i32),
        citation_count: parse_number(cell(record, Some(cols.citations))).map_or(0, |c| c.max(0.0) as u32),
        authors: cell(record, cols.authors).unwrap_or(DEFAULT_AUTHORS).to_string(),
        doi: cell(record, cols.doi).unwrap_or(&paper_id).to_string(),
        primary_topic: parse_number(cell(record, cols.primary_topic)).map(|t| t as i64),
        secondary_topic: parse_number(cell(record, cols.secondary_topic)).map(|t| t as i64),
        mentions,
        paper_id,
    })
}

/// Parse a paper table from text.
pub fn parse_papers(content: &str) -> Result<Vec<Paper>> {
    let header_line = content.lines().next().unwrap_or_default();
    let delimiter = detect_delimiter(header_line);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(content.as_bytes());
    let cols = Columns::resolve(reader.headers()?)?;

    let mut papers = Vec::new();
    let mut skipped = 0usize;
    for record in reader.records() {
        let record = record?;
        match parse_record(&record, &cols) {
            Some(paper) => papers.push(paper),
            None => skipped += 1,
        }
    }
    if skipped > 0 {
        tracing::warn!(skipped, "skipped rows without a paperId");
    }

    Ok(papers)
}

/// Load the paper table from disk.
pub fn load_papers(path: &Path) -> Result<Vec<Paper>> {
    if !path.exists() {
        return Err(MethodNetError::DataNotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    let papers = parse_papers(&content)?;
    tracing::info!(path = %path.display(), papers = papers.len(), "loaded dataset");
    Ok(papers)
}

// ============================================================================
// Overlays
// ============================================================================

/// Category, display-name and variant mappings keyed by method.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overlays {
    pub categories: BTreeMap<String, String>,
    pub shortnames: BTreeMap<String, String>,
    pub variants: BTreeMap<String, Vec<String>>,
}

fn read_overlay<T: DeserializeOwned>(path: &Path, name: &'static str) -> Result<T> {
    if !path.exists() {
        return Err(MethodNetError::MissingOverlay {
            name,
            path: path.to_path_buf(),
        });
    }
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Load one overlay, falling back to an empty mapping on any problem.
fn load_overlay<T: DeserializeOwned + Default>(config_dir: &Path, file: &str, name: &'static str) -> T {
    match read_overlay::<T>(&config_dir.join(file), name) {
        Ok(value) => {
            tracing::info!(overlay = name, "loaded overlay");
            value
        }
        Err(err @ MethodNetError::MissingOverlay { .. }) => {
            tracing::warn!("{}", err);
            T::default()
        }
        Err(err) => {
            tracing::warn!(overlay = name, error = %err, "could not read overlay, using empty mapping");
            T::default()
        }
    }
}

impl Overlays {
    pub fn load(config_dir: &Path) -> Self {
        let overlays = Self {
            categories: load_overlay(config_dir, CATEGORIES_FILE, "method categories"),
            shortnames: load_overlay(config_dir, SHORTNAMES_FILE, "method shortnames"),
            variants: load_overlay(config_dir, VARIANTS_FILE, "method variants"),
        };
        tracing::info!(
            categories = overlays.categories.len(),
            shortnames = overlays.shortnames.len(),
            variants = overlays.variants.len(),
            "overlays ready"
        );
        overlays
    }
}
