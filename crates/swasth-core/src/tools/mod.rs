//! Tool implementations for Swasth
//!
//! Provides the tool registry and the two built-in tools the agent can
//! route to: meal-plan generation and recipe detail lookup.

pub mod implementations;
pub mod registry;

pub use implementations::register_all_tools;
pub use registry::{parse_params, Tool, ToolContext, ToolRegistry, ToolResult};
