//! Process-wide external capability wiring
//!
//! All external clients are constructed once at startup and injected into
//! the orchestrator and tools. A missing credential leaves the capability
//! `None` rather than failing startup; each consumer checks availability
//! and degrades into its normal error contract.

use std::path::Path;
use std::sync::Arc;

use tracing::warn;

use crate::ai::{GeminiClient, GeminiConfig, TextGeneration};
use crate::retrieval::{RecipeIndex, RecipeStore, SqliteRecipeIndex, SqliteRecipeStore};
use crate::search::{TavilyClient, WebSearch};

/// The external capabilities the core depends on. Fields are `None` when
/// the capability could not be initialized (missing API key, no database).
#[derive(Clone, Default)]
pub struct Capabilities {
    pub generation: Option<Arc<dyn TextGeneration>>,
    pub index: Option<Arc<dyn RecipeIndex>>,
    pub store: Option<Arc<dyn RecipeStore>>,
    pub search: Option<Arc<dyn WebSearch>>,
}

impl Capabilities {
    /// Everything unavailable. Tools still return well-formed error
    /// payloads in this state.
    pub fn unavailable() -> Self {
        Self::default()
    }

    /// Build capabilities from the environment and the local recipe
    /// database.
    ///
    /// Reads `GEMINI_API_KEY` (or `GOOGLE_API_KEY`) for generation and
    /// `TAVILY_API_KEY` for web search; `model` overrides the default
    /// generation model when set.
    pub fn from_env(db_path: &Path, model: Option<&str>) -> Self {
        let generation: Option<Arc<dyn TextGeneration>> = match std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("GOOGLE_API_KEY"))
        {
            Ok(key) => {
                let mut config = GeminiConfig::new(key);
                if let Some(model) = model {
                    config = config.with_model(model);
                }
                Some(Arc::new(GeminiClient::new(config)))
            }
            Err(_) => {
                warn!("GEMINI_API_KEY not set; generation capability unavailable");
                None
            }
        };

        let search: Option<Arc<dyn WebSearch>> = match std::env::var("TAVILY_API_KEY") {
            Ok(key) => Some(Arc::new(TavilyClient::new(key))),
            Err(_) => {
                warn!("TAVILY_API_KEY not set; web search capability unavailable");
                None
            }
        };

        let index: Option<Arc<dyn RecipeIndex>> =
            Some(Arc::new(SqliteRecipeIndex::new(db_path.to_path_buf())));
        let store: Option<Arc<dyn RecipeStore>> =
            Some(Arc::new(SqliteRecipeStore::new(db_path.to_path_buf())));

        Self {
            generation,
            index,
            store,
            search,
        }
    }
}
