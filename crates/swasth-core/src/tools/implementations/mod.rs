//! Built-in tool implementations

use std::sync::Arc;

use super::registry::ToolRegistry;

pub mod meal_plan;
pub mod recipe_details;

pub use meal_plan::CreateMealPlanTool;
pub use recipe_details::GetRecipeDetailsTool;

/// Register the agent's tool set.
pub async fn register_all_tools(registry: &ToolRegistry) {
    registry.register(Arc::new(CreateMealPlanTool)).await;
    registry.register(Arc::new(GetRecipeDetailsTool)).await;
}
