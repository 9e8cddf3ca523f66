//! Tool registry for managing available tools
//!
//! Every tool returns well-formed JSON, failure included: the agent layer
//! relies on never receiving an unhandled fault from a tool body, only a
//! payload that may carry an `error` key.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::RwLock;

use crate::ai::AiTool;
use crate::capabilities::Capabilities;

/// Default tool execution timeout
const DEFAULT_TOOL_TIMEOUT: Duration = Duration::from_secs(120);

/// Tool execution result
#[derive(Debug, Clone)]
pub struct ToolResult {
    /// Always a well-formed JSON document.
    pub output: String,
    pub is_error: bool,
}

impl ToolResult {
    /// Create a success result from a payload value.
    pub fn success(payload: &Value) -> Self {
        Self {
            output: payload.to_string(),
            is_error: false,
        }
    }

    /// Create an `{"error": ...}` payload. The message is user-facing.
    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            output: json!({"error": msg.into()}).to_string(),
            is_error: true,
        }
    }
}

/// Parse tool parameters, returning a ToolResult error on failure
pub fn parse_params<T: serde::de::DeserializeOwned>(params: Value) -> Result<T, ToolResult> {
    serde_json::from_value(params).map_err(|e| {
        tracing::warn!("Invalid tool parameters: {}", e);
        ToolResult::error("I couldn't make sense of that request. Please try rephrasing it.")
    })
}

/// Context for tool execution
#[derive(Clone, Default)]
pub struct ToolContext {
    /// External capability handles. Tools check availability before use.
    pub capabilities: Capabilities,
    /// Optional per-call timeout override
    pub timeout: Option<Duration>,
}

impl ToolContext {
    pub fn new(capabilities: Capabilities) -> Self {
        Self {
            capabilities,
            timeout: None,
        }
    }
}

/// Trait for tool implementations
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name (id)
    fn name(&self) -> &str;

    /// Tool description for AI
    fn description(&self) -> &str;

    /// JSON schema for parameters
    fn parameters_schema(&self) -> Value;

    /// Execute the tool
    async fn execute(&self, params: Value, ctx: &ToolContext) -> ToolResult;
}

/// Registry for managing tools
pub struct ToolRegistry {
    tools: Arc<RwLock<HashMap<String, Arc<dyn Tool>>>>,
    default_timeout: Duration,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: Arc::new(RwLock::new(HashMap::new())),
            default_timeout: DEFAULT_TOOL_TIMEOUT,
        }
    }

    /// Register a tool
    pub async fn register(&self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();
        let mut tools = self.tools.write().await;
        tools.insert(name, tool);
    }

    /// Get a tool by name
    pub async fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        let tools = self.tools.read().await;
        tools.get(name).cloned()
    }

    /// Get all tools as AI tool definitions, sorted by name for a stable
    /// request shape.
    pub async fn get_ai_tools(&self) -> Vec<AiTool> {
        let tools = self.tools.read().await;
        let mut ai_tools: Vec<AiTool> = tools
            .values()
            .map(|t| AiTool {
                name: t.name().to_string(),
                description: t.description().to_string(),
                input_schema: t.parameters_schema(),
            })
            .collect();
        ai_tools.sort_by(|a, b| a.name.cmp(&b.name));
        ai_tools
    }

    /// Execute a tool by name with a bounded timeout. A timed-out call is
    /// the same failure class as a tool error: a user-facing error payload.
    pub async fn execute(&self, name: &str, params: Value, ctx: &ToolContext) -> Option<ToolResult> {
        let tool = self.get(name).await?;
        let timeout = ctx.timeout.unwrap_or(self.default_timeout);
        let start = Instant::now();
        tracing::debug!(tool = name, "executing tool");

        let result = match tokio::time::timeout(timeout, tool.execute(params, ctx)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    tool = name,
                    timeout_secs = timeout.as_secs(),
                    "Tool execution timed out"
                );
                ToolResult::error("That took too long to answer. Please try again.")
            }
        };

        tracing::debug!(
            tool = name,
            elapsed_ms = start.elapsed().as_millis() as u64,
            is_error = result.is_error,
            "tool finished"
        );
        Some(result)
    }
}
