//! Normalized agent responses
//!
//! The single output contract of the core: every user turn produces
//! exactly one [`NormalizedResponse`], which the presentation layer can
//! render without inspecting tool internals.

use serde::{Deserialize, Serialize};

use crate::retrieval::RecipeRecord;

/// One meal slot in a generated day plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealItem {
    /// Time of day, e.g. "Breakfast", "Lunch", "Dinner".
    pub meal_time: String,
    /// Name of the recommended dish.
    pub meal_name: String,
    /// A brief, friendly reason why this meal was chosen.
    pub justification: String,
}

/// A full-day meal plan produced by the plan generation tool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealPlanPayload {
    pub greeting: String,
    pub plan: Vec<MealItem>,
    pub summary: String,
}

/// Recipe details sourced from the web when the store has no record.
///
/// `youtube_link` is either a URL containing "youtube.com" or one of the
/// search sentinels ("Not found" / "Search failed").
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebRecipePayload {
    pub item_name: String,
    pub summary: String,
    pub youtube_link: String,
}

/// The discriminated response union consumed by the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum NormalizedResponse {
    Plan(MealPlanPayload),
    ItemDetails(RecipeRecord),
    WebRecipe(WebRecipePayload),
    /// Plain conversational text or a user-facing error string.
    Message(String),
}
