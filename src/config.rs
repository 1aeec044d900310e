//! Runtime configuration.
//!
//! The binary parses [`Cli`] (flags with environment fallbacks) and converts
//! it into an [`AppConfig`]; the library and the tests only ever see
//! `AppConfig`.

use crate::error::Result;
use crate::incidence::{PaperFilters, TopicMode};
use crate::network::ViewParams;
use clap::Parser;
use std::collections::BTreeSet;
use std::path::PathBuf;

pub const DEFAULT_DATA_PATH: &str = "data/papers.csv";
pub const DEFAULT_CONFIG_DIR: &str = "config";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8050;

pub const DEFAULT_MIN_SUPPORT: usize = 4;
pub const DEFAULT_TOP_N: usize = 15;
pub const DEFAULT_MIN_COOC: u32 = 5;
pub const DEFAULT_MAX_EDGES: usize = 5;
pub const DEFAULT_TOPICS: &[i64] = &[2, 5, 6, 7, 8, 13];
pub const DEFAULT_TREND_SEED: u64 = 42;

// ============================================================================
// Command Line
// ============================================================================

#[derive(Debug, Parser)]
#[command(name = "methodnet", version, about = "Method co-occurrence network dashboard")]
pub struct Cli {
    /// Paper table (`;` or `,` separated)
    #[arg(long, env = "METHODNET_DATA", default_value = DEFAULT_DATA_PATH)]
    pub data: PathBuf,

    /// Directory holding the category, shortname and variant overlays
    #[arg(long, env = "METHODNET_CONFIG_DIR", default_value = DEFAULT_CONFIG_DIR)]
    pub config_dir: PathBuf,

    #[arg(long, env = "HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Drop methods used by fewer papers than this
    #[arg(long, env = "METHODNET_MIN_SUPPORT", default_value_t = DEFAULT_MIN_SUPPORT)]
    pub min_support: usize,

    /// Only keep papers published in or after this year
    #[arg(long, env = "METHODNET_MIN_YEAR")]
    pub min_year: Option<i32>,

    /// Only keep papers with at least this many citations (0 disables)
    #[arg(long, env = "METHODNET_MIN_CITATIONS", default_value_t = 0)]
    pub min_citations: u32,

    /// Topic indices to keep; pass `--no-topic-filter` to keep every topic
    #[arg(long, env = "METHODNET_TOPICS", value_delimiter = ',', default_values_t = DEFAULT_TOPICS.to_vec())]
    pub topics: Vec<i64>,

    #[arg(long)]
    pub no_topic_filter: bool,

    /// ANY, PRIMARY, SECONDARY or BOTH
    #[arg(long, env = "METHODNET_TOPIC_MODE", default_value = "ANY")]
    pub topic_mode: String,

    #[arg(long, env = "METHODNET_TOP_N", default_value_t = DEFAULT_TOP_N)]
    pub top_n: usize,

    #[arg(long, env = "METHODNET_MIN_COOC", default_value_t = DEFAULT_MIN_COOC)]
    pub min_cooc: u32,

    #[arg(long, env = "METHODNET_MAX_EDGES", default_value_t = DEFAULT_MAX_EDGES)]
    pub max_edges: usize,

    #[arg(long, env = "METHODNET_TREND_SEED", default_value_t = DEFAULT_TREND_SEED)]
    pub trend_seed: u64,
}

impl Cli {
    /// Validate and convert into the library configuration.
    pub fn into_config(self) -> Result<AppConfig> {
        let topic_mode = self.topic_mode.parse::<TopicMode>()?;
        let topics = (!self.no_topic_filter).then(|| self.topics.into_iter().collect());

        Ok(AppConfig {
            data_path: self.data,
            config_dir: self.config_dir,
            host: self.host,
            port: self.port,
            min_support: self.min_support,
            filters: PaperFilters {
                min_year: self.min_year,
                min_citations: self.min_citations,
                topics,
                topic_mode,
            },
            top_n: self.top_n,
            min_cooc: self.min_cooc,
            max_edges: self.max_edges,
            trend_seed: self.trend_seed,
        })
    }
}

// ============================================================================
// Application Configuration
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub data_path: PathBuf,
    pub config_dir: PathBuf,
    pub host: String,
    pub port: u16,
    pub min_support: usize,
    pub filters: PaperFilters,
    pub top_n: usize,
    pub min_cooc: u32,
    pub max_edges: usize,
    pub trend_seed: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            config_dir: PathBuf::from(DEFAULT_CONFIG_DIR),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            min_support: DEFAULT_MIN_SUPPORT,
            filters: PaperFilters {
                topics: Some(DEFAULT_TOPICS.iter().copied().collect()),
                ..PaperFilters::default()
            },
            top_n: DEFAULT_TOP_N,
            min_cooc: DEFAULT_MIN_COOC,
            max_edges: DEFAULT_MAX_EDGES,
            trend_seed: DEFAULT_TREND_SEED,
        }
    }
}

impl AppConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// View parameters a new session starts with: every category visible.
    pub fn default_view(&self, categories: &[String]) -> ViewParams {
        ViewParams {
            categories: categories.iter().cloned().collect::<BTreeSet<_>>(),
            min_cooc: self.min_cooc,
            max_edges: self.max_edges,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MethodNetError;

    #[test]
    fn test_cli_defaults_match_app_config() {
        let mut config = Cli::parse_from(["methodnet"]).into_config().unwrap();
        // HOST and PORT are commonly present in the environment.
        config.host = DEFAULT_HOST.to_string();
        config.port = DEFAULT_PORT;
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::parse_from([
            "methodnet",
            "--host",
            "0.0.0.0",
            "--port",
            "9000",
            "--topics",
            "2,5",
            "--topic-mode",
            "both",
            "--min-year",
            "2018",
        ]);
        let config = cli.into_config().unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.filters.topic_mode, TopicMode::Both);
        assert_eq!(config.filters.min_year, Some(2018));
        assert_eq!(config.filters.topics, Some([2, 5].into_iter().collect()));
        assert_eq!(config.bind_addr(), "0.0.0.0:9000");
    }

    #[test]
    fn test_no_topic_filter() {
        let config = Cli::parse_from(["methodnet", "--no-topic-filter"]).into_config().unwrap();
        assert_eq!(config.filters.topics, None);
    }

    #[test]
    fn test_invalid_topic_mode() {
        let err = Cli::parse_from(["methodnet", "--topic-mode", "EITHER"])
            .into_config()
            .unwrap_err();
        assert!(matches!(err, MethodNetError::InvalidFilterMode(ref m) if m == "EITHER"));
    }
}
