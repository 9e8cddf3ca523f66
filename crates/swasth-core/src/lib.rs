//! Swasth core library
//!
//! Agent routing, meal-planning tools, recipe retrieval/storage, and the
//! external capability clients (generation, web search). The CLI is a thin
//! presentation layer over [`agent::Orchestrator`].

pub mod agent;
pub mod ai;
pub mod capabilities;
pub mod profile;
pub mod retrieval;
pub mod search;
pub mod tools;
pub mod translate;

pub use agent::{NormalizedResponse, Orchestrator};
pub use capabilities::Capabilities;
