//! Meal-plan generation tool
//!
//! Retrieves candidates broadly, filters them deterministically by diet
//! preference, and asks the generation capability for a structured
//! full-day plan grounded in the surviving candidates.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;

use crate::agent::response::MealPlanPayload;
use crate::retrieval::filter_by_diet;
use crate::tools::registry::{parse_params, Tool, ToolContext, ToolResult};

pub const TOOL_NAME: &str = "create_meal_plan";

/// Broad retrieval depth. Filtering happens after retrieval, so this stays
/// wide enough that the post-filter still has candidates to work with.
const RETRIEVAL_K: usize = 30;

const UNAVAILABLE: &str = "Planning tool is not available due to an initialization error.";
const NO_MATCHES: &str =
    "I couldn't find any matching recipes in my cookbook for your request after applying your dietary preference.";
const PLAN_FAILED: &str = "I had trouble creating your plan. Please try asking in a different way.";

const SYSTEM_PROMPT: &str = "You are 'Swa-Swa', a friendly food buddy. Create a personalized, \
full-day meal plan based on the user's profile and the provided meal options.";

const FORMAT_INSTRUCTIONS: &str = r#"Respond with a single JSON object of this exact shape:
{
  "greeting": "a friendly, encouraging opening message",
  "plan": [
    {"meal_time": "Breakfast", "meal_name": "name of the dish", "justification": "a brief, friendly reason this meal was chosen"}
  ],
  "summary": "a concluding summary of the meal plan"
}
The "plan" array must cover the full day and only use dishes from the available meal options."#;

#[derive(Debug, Deserialize)]
struct Params {
    user_request: String,
    #[serde(default)]
    profile_summary: String,
    /// Comma-joined allergy list.
    #[serde(default)]
    allergies: String,
    #[serde(default = "default_diet")]
    diet_preference: String,
}

fn default_diet() -> String {
    "Any".to_string()
}

pub struct CreateMealPlanTool;

#[async_trait]
impl Tool for CreateMealPlanTool {
    fn name(&self) -> &str {
        TOOL_NAME
    }

    fn description(&self) -> &str {
        "Creates a personalized, full-day meal plan. Use this when the user asks for a plan, \
         suggestions, or ideas for what to eat. Pass the user's request, their profile summary, \
         allergies, and diet_preference."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "user_request": {
                    "type": "string",
                    "description": "The user's request, verbatim"
                },
                "profile_summary": {
                    "type": "string",
                    "description": "The user's profile summary from the internal context"
                },
                "allergies": {
                    "type": "string",
                    "description": "Comma-separated allergies from the internal context"
                },
                "diet_preference": {
                    "type": "string",
                    "description": "Vegetarian, Non-Vegetarian, or Any"
                }
            },
            "required": ["user_request"]
        })
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> ToolResult {
        let params: Params = match parse_params(params) {
            Ok(p) => p,
            Err(e) => return e,
        };

        let (Some(generation), Some(index)) =
            (&ctx.capabilities.generation, &ctx.capabilities.index)
        else {
            return ToolResult::error(UNAVAILABLE);
        };

        // Retrieve broadly; the allergy clause steers ranking away from
        // excluded ingredients but the diet filter below is the guarantee.
        let query = format!(
            "{} suitable for a person with this profile: {}. Must not contain: {}",
            params.user_request, params.profile_summary, params.allergies
        );

        let docs = match index.retrieve(&query, RETRIEVAL_K).await {
            Ok(docs) => docs,
            Err(e) => {
                warn!("Recipe retrieval failed: {}", e);
                return ToolResult::error(PLAN_FAILED);
            }
        };

        let filtered = filter_by_diet(docs, &params.diet_preference);
        if filtered.is_empty() {
            return ToolResult::error(NO_MATCHES);
        }

        let meal_options: Vec<String> = filtered
            .iter()
            .map(|doc| format!("- {}: {}", doc.metadata.item_name, doc.page_content))
            .collect();

        let prompt = format!(
            "{}\n\nUSER PROFILE: {}\n\nUSER'S REQUEST: {}\n\nAVAILABLE MEAL OPTIONS:\n{}\n\nYOUR JSON RESPONSE:",
            FORMAT_INSTRUCTIONS,
            params.profile_summary,
            params.user_request,
            meal_options.join("\n")
        );

        let value = match generation.generate_structured(SYSTEM_PROMPT, &prompt).await {
            Ok(value) => value,
            Err(e) => {
                warn!("Plan generation failed: {}", e);
                return ToolResult::error(PLAN_FAILED);
            }
        };

        match serde_json::from_value::<MealPlanPayload>(value) {
            Ok(plan) if !plan.plan.is_empty() => match serde_json::to_value(&plan) {
                Ok(payload) => ToolResult::success(&payload),
                Err(e) => {
                    warn!("Plan serialization failed: {}", e);
                    ToolResult::error(PLAN_FAILED)
                }
            },
            Ok(_) => {
                warn!("Plan generation returned an empty plan");
                ToolResult::error(PLAN_FAILED)
            }
            Err(e) => {
                warn!("Plan output failed schema validation: {}", e);
                ToolResult::error(PLAN_FAILED)
            }
        }
    }
}
