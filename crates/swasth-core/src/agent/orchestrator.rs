//! Agent orchestration
//!
//! One user turn is one routing decision: the generation capability
//! either answers conversationally or requests a single tool call. Tool
//! output is parsed and normalized directly into a [`NormalizedResponse`],
//! never handed back to the model for re-interpretation, so a turn
//! performs at most one tool execution and always terminates.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::ai::{Content, ModelMessage, Role};
use crate::capabilities::Capabilities;
use crate::profile::UserProfile;
use crate::tools::implementations::{meal_plan, recipe_details};
use crate::tools::{register_all_tools, ToolContext, ToolRegistry, ToolResult};

use super::response::{MealPlanPayload, NormalizedResponse, WebRecipePayload};
use crate::retrieval::RecipeRecord;

/// Returned whenever a tool produces output the normalizer cannot make
/// sense of.
pub const UNEXPECTED_RESPONSE: &str = "I received an unexpected response. Please try again.";

const GENERATION_UNAVAILABLE: &str =
    "The assistant is not available right now due to an initialization error.";
const DECISION_FAILED: &str =
    "I'm having trouble responding right now. Please try again in a moment.";

const SYSTEM_PROMPT: &str = "You are 'Swa-Swa', a friendly AI nutritionist. Your goal is to help the user.\n\
Based on the user's message, decide which tool is most appropriate.\n\
- If the user asks for a MEAL PLAN, ideas, or suggestions for what to eat, use the `create_meal_plan` tool. You must pass the user's request, their profile summary, allergies, and their diet_preference to this tool.\n\
- If the user asks about a SINGLE, SPECIFIC food item, how to make it, or for its details (e.g., 'tell me about dhokla'), use the `get_recipe_details` tool.\n\
- If it's just a greeting, respond conversationally without using a tool.";

/// Routes user turns between conversation and tools.
pub struct Orchestrator {
    capabilities: Capabilities,
    registry: Arc<ToolRegistry>,
}

impl Orchestrator {
    pub async fn new(capabilities: Capabilities) -> Self {
        let registry = Arc::new(ToolRegistry::new());
        register_all_tools(&registry).await;
        Self {
            capabilities,
            registry,
        }
    }

    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    /// Process one user turn.
    ///
    /// Appends the user message (plus any assistant and tool messages the
    /// turn produces) to the conversation and returns it alongside the
    /// normalized response. Faults surface as `Message` responses; this
    /// never fails outright.
    pub async fn route(
        &self,
        prior_messages: Vec<ModelMessage>,
        user_message: &str,
        profile: &UserProfile,
    ) -> (Vec<ModelMessage>, NormalizedResponse) {
        let mut conversation = prior_messages;
        conversation.push(ModelMessage::text(Role::User, user_message));

        let Some(generation) = &self.capabilities.generation else {
            warn!("Generation capability unavailable; cannot route turn");
            return (
                conversation,
                NormalizedResponse::Message(GENERATION_UNAVAILABLE.to_string()),
            );
        };

        // Grounding context for the routing decision. Appended to a copy of
        // the conversation only; it is not part of the durable history.
        let grounding = format!(
            "INTERNAL CONTEXT:\n- user_request: '{}'\n- profile_summary: '{}'\n- allergies: '{}'\n- diet_preference: '{}'",
            user_message,
            profile.summary(),
            profile.allergies_csv(),
            profile.diet_preference_label(),
        );
        let mut contextual = conversation.clone();
        contextual.push(ModelMessage::text(Role::User, grounding));

        let tools = self.registry.get_ai_tools().await;
        let reply = match generation.decide(SYSTEM_PROMPT, &contextual, &tools).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!("Routing decision failed: {}", e);
                return (
                    conversation,
                    NormalizedResponse::Message(DECISION_FAILED.to_string()),
                );
            }
        };

        if reply.tool_calls.is_empty() {
            conversation.push(ModelMessage::text(Role::Assistant, reply.text.clone()));
            return (conversation, NormalizedResponse::Message(reply.text));
        }

        if reply.tool_calls.len() > 1 {
            warn!(
                requested = reply.tool_calls.len(),
                "Model requested multiple tool calls; executing the first only"
            );
        }
        let call = &reply.tool_calls[0];
        debug!(tool = call.name.as_str(), "routing to tool");

        let mut assistant_content = Vec::new();
        if !reply.text.is_empty() {
            assistant_content.push(Content::Text {
                text: reply.text.clone(),
            });
        }
        assistant_content.push(Content::ToolUse {
            id: call.id.clone(),
            name: call.name.clone(),
            input: call.arguments.clone(),
        });
        conversation.push(ModelMessage {
            role: Role::Assistant,
            content: assistant_content,
        });

        let ctx = ToolContext::new(self.capabilities.clone());
        let result = self
            .registry
            .execute(&call.name, call.arguments.clone(), &ctx)
            .await
            .unwrap_or_else(|| {
                warn!(tool = call.name.as_str(), "Model requested an unknown tool");
                ToolResult::error(UNEXPECTED_RESPONSE)
            });

        let (output, response) = match serde_json::from_str::<Value>(&result.output) {
            Ok(payload) => {
                let response = normalize_tool_output(&call.name, &payload);
                (payload, response)
            }
            Err(e) => {
                warn!(tool = call.name.as_str(), "Tool returned non-JSON output: {}", e);
                (
                    Value::String(result.output.clone()),
                    NormalizedResponse::Message(UNEXPECTED_RESPONSE.to_string()),
                )
            }
        };

        conversation.push(ModelMessage {
            role: Role::Tool,
            content: vec![Content::ToolResult {
                tool_use_id: call.id.clone(),
                name: call.name.clone(),
                output,
                is_error: result.is_error.then_some(true),
            }],
        });

        (conversation, response)
    }
}

/// Map one parsed tool payload to the response union.
///
/// An `error` key wins over everything else. The `get_recipe_details`
/// database hit deliberately forwards only `db_data`; the freshly fetched
/// video link does not apply to stored records.
pub(crate) fn normalize_tool_output(tool_name: &str, payload: &Value) -> NormalizedResponse {
    if let Some(error) = payload.get("error") {
        let message = error
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| UNEXPECTED_RESPONSE.to_string());
        return NormalizedResponse::Message(message);
    }

    match tool_name {
        meal_plan::TOOL_NAME => {
            match serde_json::from_value::<MealPlanPayload>(payload.clone()) {
                Ok(plan) => NormalizedResponse::Plan(plan),
                Err(e) => {
                    warn!("Meal-plan payload failed to normalize: {}", e);
                    NormalizedResponse::Message(UNEXPECTED_RESPONSE.to_string())
                }
            }
        }
        recipe_details::TOOL_NAME => {
            if payload.get("status").and_then(Value::as_str) == Some("WEB_ONLY") {
                match serde_json::from_value::<WebRecipePayload>(payload.clone()) {
                    Ok(recipe) => NormalizedResponse::WebRecipe(recipe),
                    Err(e) => {
                        warn!("Web-recipe payload failed to normalize: {}", e);
                        NormalizedResponse::Message(UNEXPECTED_RESPONSE.to_string())
                    }
                }
            } else {
                let db_data = payload.get("db_data").cloned().unwrap_or_default();
                match serde_json::from_value::<RecipeRecord>(db_data) {
                    Ok(record) => NormalizedResponse::ItemDetails(record),
                    Err(e) => {
                        warn!("Recipe record failed to normalize: {}", e);
                        NormalizedResponse::Message(UNEXPECTED_RESPONSE.to_string())
                    }
                }
            }
        }
        other => {
            warn!(tool = other, "No normalization rule for tool output");
            NormalizedResponse::Message(UNEXPECTED_RESPONSE.to_string())
        }
    }
}
