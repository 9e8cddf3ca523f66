//! Agent routing and response normalization

pub mod orchestrator;
pub mod response;

pub use orchestrator::{Orchestrator, UNEXPECTED_RESPONSE};
pub use response::{MealItem, MealPlanPayload, NormalizedResponse, WebRecipePayload};
