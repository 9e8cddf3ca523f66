//! AI SDK types for provider communication
//!
//! These are NOT domain types - they're specific to AI provider APIs

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// AI SDK Tool definition (for provider communication only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiTool {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

/// AI SDK Tool call (for provider communication only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiToolCall {
    pub id: String,
    pub name: String,
    pub arguments: Value,
}

/// Message role in a conversation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

/// Content types that can be in a message
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Content {
    #[serde(rename = "text")]
    Text { text: String },

    #[serde(rename = "tool_use")]
    ToolUse {
        id: String,
        name: String,
        input: Value,
    },

    #[serde(rename = "tool_result")]
    ToolResult {
        tool_use_id: String,
        /// Name of the tool that produced this result. The orchestrator
        /// dispatches response normalization on it.
        name: String,
        output: Value,
        #[serde(skip_serializing_if = "Option::is_none")]
        is_error: Option<bool>,
    },
}

/// Unified message format for provider communication
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMessage {
    pub role: Role,
    pub content: Vec<Content>,
}

impl ModelMessage {
    /// Build a plain-text message with the given role.
    pub fn text(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            content: vec![Content::Text { text: text.into() }],
        }
    }

    /// First text block, if any.
    pub fn first_text(&self) -> Option<&str> {
        self.content.iter().find_map(|c| match c {
            Content::Text { text } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// One generation-step reply: free text and zero or more requested tool calls.
#[derive(Debug, Clone, Default)]
pub struct AgentReply {
    pub text: String,
    pub tool_calls: Vec<AiToolCall>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tool_result_content_round_trips_with_tool_name() {
        let content = Content::ToolResult {
            tool_use_id: "call-1".to_string(),
            name: "create_meal_plan".to_string(),
            output: json!({"greeting": "Hi"}),
            is_error: None,
        };

        let encoded = serde_json::to_value(&content).unwrap();
        assert_eq!(encoded["type"], "tool_result");
        assert_eq!(encoded["name"], "create_meal_plan");
        assert!(encoded.get("is_error").is_none());

        let decoded: Content = serde_json::from_value(encoded).unwrap();
        match decoded {
            Content::ToolResult { name, .. } => assert_eq!(name, "create_meal_plan"),
            other => panic!("unexpected content: {:?}", other),
        }
    }

    #[test]
    fn first_text_skips_tool_blocks() {
        let msg = ModelMessage {
            role: Role::Assistant,
            content: vec![
                Content::ToolUse {
                    id: "c1".to_string(),
                    name: "get_recipe_details".to_string(),
                    input: json!({"item_name": "dhokla"}),
                },
                Content::Text {
                    text: "Looking that up".to_string(),
                },
            ],
        };

        assert_eq!(msg.first_text(), Some("Looking that up"));
    }
}
