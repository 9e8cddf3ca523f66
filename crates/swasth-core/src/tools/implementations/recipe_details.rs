//! Recipe detail tool
//!
//! Merges a local store lookup with an always-executed web search. Even
//! items found in the database get a fresh video link, since stored
//! records don't carry one.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;

use crate::tools::registry::{parse_params, Tool, ToolContext, ToolResult};

pub const TOOL_NAME: &str = "get_recipe_details";

const SEARCH_MAX_RESULTS: usize = 3;

const YT_NOT_FOUND: &str = "Not found";
const SEARCH_FAILED: &str = "Search failed";
const SEARCH_FAILED_SUMMARY: &str = "Could not search online for more details.";
const WEB_ONLY_FALLBACK_SUMMARY: &str =
    "I don't have this in my cookbook, but here is some information I found online.";

#[derive(Debug, Deserialize)]
struct Params {
    item_name: String,
}

pub struct GetRecipeDetailsTool;

#[async_trait]
impl Tool for GetRecipeDetailsTool {
    fn name(&self) -> &str {
        TOOL_NAME
    }

    fn description(&self) -> &str {
        "Retrieves all available details for a SINGLE food item. It first checks the local \
         database, then ALWAYS searches the web for a YouTube video link. Use this whenever the \
         user asks for details, instructions, or how to make a specific item like 'dhokla'."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "item_name": {
                    "type": "string",
                    "description": "Name of the single food item to look up"
                }
            },
            "required": ["item_name"]
        })
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> ToolResult {
        let params: Params = match parse_params(params) {
            Ok(p) => p,
            Err(e) => return e,
        };
        let item_name = params.item_name;

        let db_details = match &ctx.capabilities.store {
            Some(store) => match store.find_by_name(&item_name).await {
                Ok(record) => record,
                Err(e) => {
                    warn!("Recipe store lookup failed for '{}': {}", item_name, e);
                    None
                }
            },
            None => None,
        };

        // The web search runs regardless of the store hit.
        let (youtube_link, web_summary) = search_for_video(ctx, &item_name).await;

        let payload = match db_details {
            None => {
                let summary = if web_summary.is_empty() {
                    WEB_ONLY_FALLBACK_SUMMARY.to_string()
                } else {
                    web_summary
                };
                json!({
                    "status": "WEB_ONLY",
                    "item_name": item_name,
                    "summary": summary,
                    "youtube_link": youtube_link
                })
            }
            Some(record) => json!({
                "status": "FOUND_IN_DB",
                "db_data": record,
                "youtube_link": youtube_link
            }),
        };

        ToolResult::success(&payload)
    }
}

/// Run the supplementary web search, returning `(youtube_link, summary)`.
/// Failures (including an unavailable capability) degrade to sentinels.
async fn search_for_video(ctx: &ToolContext, item_name: &str) -> (String, String) {
    let Some(search) = &ctx.capabilities.search else {
        warn!("Web search capability unavailable for '{}'", item_name);
        return (SEARCH_FAILED.to_string(), SEARCH_FAILED_SUMMARY.to_string());
    };

    let query = format!(
        "What is the best YouTube video recipe for {}? Also provide a brief summary of the dish.",
        item_name
    );

    match search.search(&query, SEARCH_MAX_RESULTS).await {
        Ok(results) => {
            let mut youtube_link = YT_NOT_FOUND.to_string();
            let mut summary = String::new();

            for result in &results {
                if youtube_link == YT_NOT_FOUND && result.url.contains("youtube.com") {
                    youtube_link = result.url.clone();
                }
                if summary.is_empty() {
                    summary = result.content.clone();
                }
            }

            (youtube_link, summary)
        }
        Err(e) => {
            warn!("Web search failed for '{}': {}", item_name, e);
            (SEARCH_FAILED.to_string(), SEARCH_FAILED_SUMMARY.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::Capabilities;
    use crate::retrieval::{RecipeRecord, RecipeStore};
    use crate::search::{SearchResult, WebSearch};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct StubStore {
        record: Option<RecipeRecord>,
    }

    #[async_trait]
    impl RecipeStore for StubStore {
        async fn find_by_name(&self, _name: &str) -> anyhow::Result<Option<RecipeRecord>> {
            Ok(self.record.clone())
        }
    }

    struct StubSearch {
        results: anyhow::Result<Vec<SearchResult>>,
        calls: AtomicUsize,
    }

    impl StubSearch {
        fn with_results(results: Vec<SearchResult>) -> Self {
            Self {
                results: Ok(results),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                results: Err(anyhow::anyhow!("network down")),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl WebSearch for StubSearch {
        async fn search(
            &self,
            _query: &str,
            _max_results: usize,
        ) -> anyhow::Result<Vec<SearchResult>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.results {
                Ok(results) => Ok(results.clone()),
                Err(e) => Err(anyhow::anyhow!("{}", e)),
            }
        }
    }

    fn result(url: &str, content: &str) -> SearchResult {
        SearchResult {
            url: url.to_string(),
            content: content.to_string(),
        }
    }

    fn ctx(store: Option<RecipeRecord>, search: Arc<StubSearch>) -> ToolContext {
        ToolContext::new(Capabilities {
            generation: None,
            index: None,
            store: Some(Arc::new(StubStore { record: store })),
            search: Some(search),
        })
    }

    fn dhokla() -> RecipeRecord {
        RecipeRecord {
            item_name: "Dhokla".to_string(),
            item_type: "Snack".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn store_hit_still_searches_the_web() {
        let search = Arc::new(StubSearch::with_results(vec![result(
            "https://www.youtube.com/watch?v=abc",
            "Steamed snack from Gujarat",
        )]));
        let ctx = ctx(Some(dhokla()), search.clone());

        let result = GetRecipeDetailsTool
            .execute(json!({"item_name": "dhokla"}), &ctx)
            .await;
        assert!(!result.is_error);

        let parsed: Value = serde_json::from_str(&result.output).unwrap();
        assert_eq!(parsed["status"], "FOUND_IN_DB");
        assert_eq!(parsed["db_data"]["item_name"], "Dhokla");
        assert_eq!(parsed["youtube_link"], "https://www.youtube.com/watch?v=abc");
        assert_eq!(search.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn web_only_takes_first_youtube_url_and_first_content() {
        let search = Arc::new(StubSearch::with_results(vec![
            result("https://example.com/dhokla", "A fluffy steamed snack."),
            result("https://www.youtube.com/watch?v=xyz", "video description"),
        ]));
        let ctx = ctx(None, search);

        let result = GetRecipeDetailsTool
            .execute(json!({"item_name": "dhokla"}), &ctx)
            .await;
        let parsed: Value = serde_json::from_str(&result.output).unwrap();

        assert_eq!(parsed["status"], "WEB_ONLY");
        assert_eq!(parsed["item_name"], "dhokla");
        assert_eq!(parsed["summary"], "A fluffy steamed snack.");
        assert_eq!(parsed["youtube_link"], "https://www.youtube.com/watch?v=xyz");
    }

    #[tokio::test]
    async fn search_failure_degrades_to_sentinels() {
        let search = Arc::new(StubSearch::failing());
        let ctx = ctx(None, search);

        let result = GetRecipeDetailsTool
            .execute(json!({"item_name": "dhokla"}), &ctx)
            .await;
        assert!(!result.is_error);

        let parsed: Value = serde_json::from_str(&result.output).unwrap();
        assert_eq!(parsed["status"], "WEB_ONLY");
        assert_eq!(parsed["youtube_link"], SEARCH_FAILED);
        assert_eq!(parsed["summary"], SEARCH_FAILED_SUMMARY);
    }

    #[tokio::test]
    async fn empty_search_results_use_fallback_summary() {
        let search = Arc::new(StubSearch::with_results(vec![]));
        let ctx = ctx(None, search);

        let result = GetRecipeDetailsTool
            .execute(json!({"item_name": "dhokla"}), &ctx)
            .await;
        let parsed: Value = serde_json::from_str(&result.output).unwrap();

        assert_eq!(parsed["summary"], WEB_ONLY_FALLBACK_SUMMARY);
        assert_eq!(parsed["youtube_link"], YT_NOT_FOUND);
    }

    #[tokio::test]
    async fn deterministic_search_gives_byte_identical_payloads() {
        let search = Arc::new(StubSearch::with_results(vec![result(
            "https://www.youtube.com/watch?v=abc",
            "summary",
        )]));
        let ctx = ctx(Some(dhokla()), search);

        let first = GetRecipeDetailsTool
            .execute(json!({"item_name": "dhokla"}), &ctx)
            .await;
        let second = GetRecipeDetailsTool
            .execute(json!({"item_name": "dhokla"}), &ctx)
            .await;
        assert_eq!(first.output, second.output);
    }

    #[tokio::test]
    async fn missing_search_capability_uses_sentinels() {
        let ctx = ToolContext::new(Capabilities {
            store: Some(Arc::new(StubStore { record: None })),
            ..Capabilities::unavailable()
        });

        let result = GetRecipeDetailsTool
            .execute(json!({"item_name": "dhokla"}), &ctx)
            .await;
        let parsed: Value = serde_json::from_str(&result.output).unwrap();
        assert_eq!(parsed["youtube_link"], SEARCH_FAILED);
    }
}
