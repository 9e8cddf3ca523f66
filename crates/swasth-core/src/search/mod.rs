//! Web search capability
//!
//! Used by the recipe detail tool for video links and dish summaries.
//! Production implementation is [`TavilyClient`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod tavily;

pub use tavily::TavilyClient;

/// One ranked web search hit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResult {
    pub url: String,
    #[serde(default)]
    pub content: String,
}

/// Ranked web search over the public internet.
#[async_trait]
pub trait WebSearch: Send + Sync {
    async fn search(&self, query: &str, max_results: usize) -> anyhow::Result<Vec<SearchResult>>;
}
