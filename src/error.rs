//! Error type shared by the loading pipeline and the analysis core.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MethodNetError {
    /// The dataset file does not exist. Fatal at startup.
    #[error("dataset not found: {}", .0.display())]
    DataNotFound(PathBuf),

    /// Every paper was excluded by the year/citation/topic filters.
    #[error("no papers remain after applying filters")]
    EmptyAfterFilters,

    #[error("topic mode must be 'ANY', 'PRIMARY', 'SECONDARY', or 'BOTH' (got '{0}')")]
    InvalidFilterMode(String),

    /// An optional overlay file is absent. Callers recover with an empty mapping.
    #[error("{name} overlay not found: {}", .path.display())]
    MissingOverlay { name: &'static str, path: PathBuf },

    #[error("dataset is missing required column '{0}'")]
    MissingColumn(String),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MethodNetError>;
