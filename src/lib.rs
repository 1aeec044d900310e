//! Method co-occurrence network library - re-exports for testing and
//! external use.
//!
//! The analysis core (normalizer, incidence builder, co-occurrence engine,
//! selection state machine, edge selection, paper lookup) is plain
//! synchronous code over owned values. The HTTP layer in `handlers` and
//! `templates` only calls into it.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

pub mod catalog;
pub mod config;
pub mod cooccurrence;
pub mod dataset;
pub mod error;
pub mod handlers;
pub mod incidence;
pub mod models;
pub mod network;
pub mod normalize;
pub mod papers;
pub mod search;
pub mod selection;
pub mod session;
pub mod templates;
pub mod trends;

use catalog::MethodCatalog;
use config::AppConfig;
use cooccurrence::CooccurrenceMatrix;
use dataset::Overlays;
use error::{MethodNetError, Result};
use incidence::{FilterReport, IncidenceMatrix};
use models::Paper;
use network::ViewParams;
use normalize::Normalizer;
use session::SessionStore;
use trends::TrendPoint;

// ============================================================================
// Corpus Model
// ============================================================================

/// Everything derived from the dataset at startup. Read-only afterwards and
/// shared by every session.
#[derive(Debug, Clone)]
pub struct CorpusModel {
    /// Papers that kept at least one method, by id.
    pub papers: HashMap<String, Paper>,
    pub incidence: IncidenceMatrix,
    pub cooccurrence: CooccurrenceMatrix,
    pub catalog: MethodCatalog,
    pub report: FilterReport,
}

impl CorpusModel {
    /// Run the pipeline. `Ok(None)` means the filters left no papers; the
    /// server still starts and shows a placeholder.
    pub fn build(papers: Vec<Paper>, overlays: &Overlays, config: &AppConfig) -> Result<Option<Self>> {
        let normalizer = Normalizer::with_variants(&overlays.variants);
        let incidence = match incidence::build(&papers, &config.filters, &normalizer, config.min_support) {
            Ok(incidence) => incidence,
            Err(MethodNetError::EmptyAfterFilters) => return Ok(None),
            Err(e) => return Err(e),
        };

        let (cooccurrence, totals) = cooccurrence::compute(&incidence.matrix);
        let catalog = MethodCatalog::build(incidence.matrix.methods(), &totals, overlays);
        tracing::info!(
            papers = incidence.matrix.paper_count(),
            methods = cooccurrence.len(),
            categories = catalog.categories().len(),
            "co-occurrence model ready"
        );

        let kept: HashSet<&str> = incidence.matrix.paper_ids().iter().map(String::as_str).collect();
        let papers = papers
            .into_iter()
            .filter(|p| kept.contains(p.paper_id.as_str()))
            .map(|p| (p.paper_id.clone(), p))
            .collect();

        Ok(Some(Self {
            papers,
            incidence: incidence.matrix,
            cooccurrence,
            catalog,
            report: incidence.report,
        }))
    }
}

// ============================================================================
// Application State
// ============================================================================

pub struct AppState {
    pub config: AppConfig,
    /// `None` when the filters left nothing to show.
    pub model: Option<CorpusModel>,
    pub trends: Vec<TrendPoint>,
    pub sessions: SessionStore,
    empty_catalog: MethodCatalog,
}

impl AppState {
    pub fn new(config: AppConfig, model: Option<CorpusModel>) -> Self {
        let trends = model
            .as_ref()
            .map(|m| trends::generate_trends(&m.catalog, config.trend_seed))
            .unwrap_or_default();
        Self {
            config,
            model,
            trends,
            sessions: SessionStore::default(),
            empty_catalog: MethodCatalog::default(),
        }
    }

    /// Load the dataset and overlays named by `config` and build the model.
    pub fn load(config: AppConfig) -> Result<Self> {
        let papers = dataset::load_papers(&config.data_path)?;
        let overlays = Overlays::load(&config.config_dir);
        let model = CorpusModel::build(papers, &overlays, &config)?;
        if model.is_none() {
            tracing::warn!("starting without data: no papers match the configured filters");
        }
        Ok(Self::new(config, model))
    }

    pub fn catalog(&self) -> &MethodCatalog {
        self.model.as_ref().map_or(&self.empty_catalog, |m| &m.catalog)
    }

    /// View a fresh session starts with.
    pub fn default_view(&self) -> ViewParams {
        self.config.default_view(self.catalog().categories())
    }
}

pub type SharedState = Arc<AppState>;

// Re-export commonly used types
pub use error::MethodNetError as Error;
pub use models::{MethodPair, NetworkEdge, NetworkNode, NetworkView, NodeHighlight, PaperSummary};
pub use network::{build_view, select_edges};
pub use normalize::normalize_method_name;
pub use papers::papers_for_pair;
pub use selection::{transition, SelectionEvent, SelectionState};
