//! Text generation capability
//!
//! [`TextGeneration`] is the seam between the core and whichever model
//! provider backs it. The production implementation is [`GeminiClient`];
//! tests substitute deterministic stubs.

use async_trait::async_trait;
use serde_json::Value;

pub mod gemini;
pub mod types;

pub use gemini::{GeminiClient, GeminiConfig};
pub use types::{AgentReply, AiTool, AiToolCall, Content, ModelMessage, Role};

/// Errors from a text-generation call.
#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("API request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("model returned an empty response")]
    EmptyResponse,

    #[error("model output is not valid for the expected schema: {0}")]
    MalformedOutput(String),
}

/// A model provider the orchestrator and tools can generate with.
///
/// All methods are single synchronous calls from the caller's point of
/// view; implementations must impose their own bounded timeout.
#[async_trait]
pub trait TextGeneration: Send + Sync {
    /// One tool-calling decision step over a conversation. The model may
    /// answer in free text, request tool calls, or both.
    async fn decide(
        &self,
        system: &str,
        messages: &[ModelMessage],
        tools: &[AiTool],
    ) -> Result<AgentReply, AiError>;

    /// Plain text generation for a single prompt.
    async fn generate(&self, system: &str, prompt: &str) -> Result<String, AiError>;

    /// Generation constrained to emit a parseable JSON object.
    async fn generate_structured(&self, system: &str, prompt: &str) -> Result<Value, AiError>;
}
