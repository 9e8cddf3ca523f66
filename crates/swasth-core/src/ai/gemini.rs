//! Gemini (Google generateContent) client
//!
//! Non-streaming calls only; the agent runs one decision step per user
//! turn, so streaming is overkill here.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use super::types::{AgentReply, AiTool, AiToolCall, Content, ModelMessage, Role};
use super::{AiError, TextGeneration};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-1.5-flash-latest";
const DEFAULT_MAX_OUTPUT_TOKENS: usize = 4096;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for the Gemini client
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    /// Model ID to use for API calls
    pub model: String,
    /// Optional base URL override (defaults to the public endpoint)
    pub base_url: Option<String>,
    /// Maximum output tokens
    pub max_output_tokens: usize,
    /// Sampling temperature
    pub temperature: f32,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: None,
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            temperature: 0.2,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn api_url(&self) -> String {
        let base = self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        format!("{}/models/{}:generateContent", base, self.model)
    }
}

/// HTTP client for the Google generateContent API.
pub struct GeminiClient {
    config: GeminiConfig,
    client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self { config, client }
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    async fn call(&self, body: Value) -> Result<Value, AiError> {
        let start = Instant::now();
        debug!(model = %self.config.model, "Gemini call starting");

        let response = self
            .client
            .post(self.config.api_url())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!(status = %status, "Gemini API returned an error");
            return Err(AiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let json: Value = response.json().await?;
        info!(
            model = %self.config.model,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Gemini call complete"
        );
        Ok(json)
    }

    fn base_body(&self, system: &str) -> Value {
        json!({
            "systemInstruction": {
                "parts": [{"text": system}]
            },
            "generationConfig": {
                "maxOutputTokens": self.config.max_output_tokens,
                "temperature": self.config.temperature
            }
        })
    }
}

#[async_trait]
impl TextGeneration for GeminiClient {
    async fn decide(
        &self,
        system: &str,
        messages: &[ModelMessage],
        tools: &[AiTool],
    ) -> Result<AgentReply, AiError> {
        let mut body = self.base_body(system);
        body["contents"] = Value::Array(convert_messages(messages));

        if !tools.is_empty() {
            // Sort declarations deterministically: tool order is part of
            // the request identity and should not depend on map iteration.
            let mut declarations: Vec<Value> = tools
                .iter()
                .map(|t| {
                    json!({
                        "name": t.name,
                        "description": t.description,
                        "parameters": t.input_schema
                    })
                })
                .collect();
            declarations.sort_by(|a, b| {
                let name_a = a.get("name").and_then(|n| n.as_str()).unwrap_or("");
                let name_b = b.get("name").and_then(|n| n.as_str()).unwrap_or("");
                name_a.cmp(name_b)
            });
            body["tools"] = json!([{"functionDeclarations": declarations}]);
        }

        let json = self.call(body).await?;
        parse_reply(&json)
    }

    async fn generate(&self, system: &str, prompt: &str) -> Result<String, AiError> {
        let mut body = self.base_body(system);
        body["contents"] = json!([{
            "role": "user",
            "parts": [{"text": prompt}]
        }]);

        let json = self.call(body).await?;
        let reply = parse_reply(&json)?;
        if reply.text.is_empty() {
            return Err(AiError::EmptyResponse);
        }
        Ok(reply.text)
    }

    async fn generate_structured(&self, system: &str, prompt: &str) -> Result<Value, AiError> {
        let mut body = self.base_body(system);
        body["contents"] = json!([{
            "role": "user",
            "parts": [{"text": prompt}]
        }]);
        body["generationConfig"]["responseMimeType"] = json!("application/json");

        let json = self.call(body).await?;
        let reply = parse_reply(&json)?;
        serde_json::from_str(reply.text.trim())
            .map_err(|e| AiError::MalformedOutput(e.to_string()))
    }
}

/// Convert unified messages into Gemini `contents` entries.
///
/// Assistant tool requests become `functionCall` parts on a `model` turn;
/// tool results become `functionResponse` parts on a `user` turn. System
/// messages are carried separately via `systemInstruction` and skipped here.
fn convert_messages(messages: &[ModelMessage]) -> Vec<Value> {
    let mut contents = Vec::with_capacity(messages.len());

    for msg in messages {
        let role = match msg.role {
            Role::System => continue,
            Role::Assistant => "model",
            Role::User | Role::Tool => "user",
        };

        let mut parts = Vec::new();
        for item in &msg.content {
            match item {
                Content::Text { text } => parts.push(json!({"text": text})),
                Content::ToolUse { name, input, .. } => {
                    parts.push(json!({
                        "functionCall": {"name": name, "args": input}
                    }));
                }
                Content::ToolResult { name, output, .. } => {
                    parts.push(json!({
                        "functionResponse": {
                            "name": name,
                            "response": {"content": output}
                        }
                    }));
                }
            }
        }

        if !parts.is_empty() {
            contents.push(json!({"role": role, "parts": parts}));
        }
    }

    contents
}

/// Extract text and tool calls from a generateContent response.
fn parse_reply(json: &Value) -> Result<AgentReply, AiError> {
    let parts = json
        .get("candidates")
        .and_then(|c| c.as_array())
        .and_then(|arr| arr.first())
        .and_then(|candidate| candidate.get("content"))
        .and_then(|content| content.get("parts"))
        .and_then(|parts| parts.as_array())
        .ok_or(AiError::EmptyResponse)?;

    let mut reply = AgentReply::default();
    for part in parts {
        if let Some(text) = part.get("text").and_then(|t| t.as_str()) {
            reply.text.push_str(text);
        }
        if let Some(call) = part.get("functionCall") {
            let name = call
                .get("name")
                .and_then(|n| n.as_str())
                .unwrap_or_default()
                .to_string();
            let arguments = call.get("args").cloned().unwrap_or(json!({}));
            reply.tool_calls.push(AiToolCall {
                id: format!("call-{}", uuid::Uuid::new_v4()),
                name,
                arguments,
            });
        }
    }

    reply.text = reply.text.trim().to_string();
    Ok(reply)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_reply_extracts_text_and_function_call() {
        let response = json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [
                        {"text": "On it."},
                        {"functionCall": {
                            "name": "get_recipe_details",
                            "args": {"item_name": "dhokla"}
                        }}
                    ]
                }
            }]
        });

        let reply = parse_reply(&response).unwrap();
        assert_eq!(reply.text, "On it.");
        assert_eq!(reply.tool_calls.len(), 1);
        assert_eq!(reply.tool_calls[0].name, "get_recipe_details");
        assert_eq!(reply.tool_calls[0].arguments["item_name"], "dhokla");
    }

    #[test]
    fn parse_reply_without_candidates_is_empty_response() {
        let response = json!({"candidates": []});
        assert!(matches!(
            parse_reply(&response),
            Err(AiError::EmptyResponse)
        ));
    }

    #[test]
    fn convert_messages_maps_roles_and_tool_results() {
        let messages = vec![
            ModelMessage::text(Role::User, "plan my meals"),
            ModelMessage {
                role: Role::Assistant,
                content: vec![Content::ToolUse {
                    id: "c1".to_string(),
                    name: "create_meal_plan".to_string(),
                    input: json!({"user_request": "plan my meals"}),
                }],
            },
            ModelMessage {
                role: Role::Tool,
                content: vec![Content::ToolResult {
                    tool_use_id: "c1".to_string(),
                    name: "create_meal_plan".to_string(),
                    output: json!({"greeting": "Hi"}),
                    is_error: None,
                }],
            },
        ];

        let contents = convert_messages(&messages);
        assert_eq!(contents.len(), 3);
        assert_eq!(contents[0]["role"], "user");
        assert_eq!(contents[1]["role"], "model");
        assert_eq!(
            contents[1]["parts"][0]["functionCall"]["name"],
            "create_meal_plan"
        );
        assert_eq!(contents[2]["role"], "user");
        assert_eq!(
            contents[2]["parts"][0]["functionResponse"]["response"]["content"]["greeting"],
            "Hi"
        );
    }

    #[test]
    fn api_url_uses_base_override() {
        let mut config = GeminiConfig::new("key");
        config.base_url = Some("http://localhost:9999/v1beta".to_string());
        assert_eq!(
            config.api_url(),
            "http://localhost:9999/v1beta/models/gemini-1.5-flash-latest:generateContent"
        );
    }
}
