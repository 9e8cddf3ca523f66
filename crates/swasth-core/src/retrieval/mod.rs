//! Recipe retrieval
//!
//! Two capabilities live behind traits here: a ranked similarity index
//! ([`RecipeIndex`]) used by the planner for broad candidate retrieval, and
//! an exact-name store ([`RecipeStore`]) used by the detail tool. Diet
//! filtering is applied deterministically after retrieval - metadata
//! pre-filtering at retrieval time is unreliable, so the index stays broad
//! and [`filter_by_diet`] narrows the candidate set in memory.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod db;
pub mod index;
pub mod store;

pub use db::{insert_recipe, open_recipe_db, RecipeDocument};
pub use index::SqliteRecipeIndex;
pub use store::SqliteRecipeStore;

/// One ingredient entry of a stored recipe.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    #[serde(default)]
    pub quantity: String,
}

/// A recipe record as stored in the recipe database. Passed through to the
/// presentation layer unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeRecord {
    pub item_name: String,
    #[serde(default)]
    pub item_type: String,
    #[serde(default)]
    pub preparation_time: String,
    #[serde(default)]
    pub cooking_time: String,
    #[serde(default)]
    pub cuisine_type: String,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub preparation_steps: Vec<String>,
}

/// Metadata attached to an indexed recipe document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocMetadata {
    pub item_name: String,
    #[serde(default)]
    pub dietary_tags: Vec<String>,
}

/// A retrieved candidate: free-text content plus tagged metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeDoc {
    pub page_content: String,
    pub metadata: DocMetadata,
}

/// Ranked candidate retrieval over the recipe corpus.
#[async_trait]
pub trait RecipeIndex: Send + Sync {
    /// Return up to `k` candidates ranked by relevance to `query`.
    async fn retrieve(&self, query: &str, k: usize) -> anyhow::Result<Vec<RecipeDoc>>;
}

/// Exact recipe lookup by name (case-insensitive).
#[async_trait]
pub trait RecipeStore: Send + Sync {
    async fn find_by_name(&self, name: &str) -> anyhow::Result<Option<RecipeRecord>>;
}

const VEGETARIAN_TAG: &str = "Vegetarian";

/// Deterministic post-filter over retrieved candidates.
///
/// `"Any"` keeps everything; `"Vegetarian"` keeps only candidates carrying
/// the `Vegetarian` tag; `"Non-Vegetarian"` keeps only candidates without
/// it. A candidate with no tags counts as non-vegetarian. Any other
/// preference value matches nothing.
pub fn filter_by_diet(docs: Vec<RecipeDoc>, diet_preference: &str) -> Vec<RecipeDoc> {
    if diet_preference.eq_ignore_ascii_case("any") {
        return docs;
    }

    docs.into_iter()
        .filter(|doc| {
            let is_veg = doc
                .metadata
                .dietary_tags
                .iter()
                .any(|tag| tag == VEGETARIAN_TAG);

            if diet_preference.eq_ignore_ascii_case("vegetarian") {
                is_veg
            } else if diet_preference.eq_ignore_ascii_case("non-vegetarian") {
                !is_veg
            } else {
                false
            }
        })
        .collect()
}
