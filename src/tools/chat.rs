//! `chat` tool - conversational completions
//!
//! Builds an ordered message list (an optional single leading system
//! message, then exactly one user message) and forwards the caller's
//! sampling parameters unchanged. Returns the assistant text plus token
//! accounting and the finish reason.

use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{GrokMcpError, Result};
use crate::tools::{parse_input, ToolDescriptor};
use crate::xai::types::{ChatCompletionRequest, ChatMessage};
use crate::xai::XaiApi;

pub const NAME: &str = "chat";

pub fn descriptor() -> ToolDescriptor {
    ToolDescriptor {
        name: NAME,
        description: "Chat with a Grok model. Supports an optional system prompt and \
                      standard sampling parameters.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "message": {
                    "type": "string",
                    "description": "User message to send"
                },
                "system_prompt": {
                    "type": "string",
                    "description": "Optional system instruction placed before the user message"
                },
                "model": {
                    "type": "string",
                    "description": "Model to use (defaults to the server's configured model)"
                },
                "temperature": {
                    "type": "number",
                    "minimum": 0,
                    "maximum": 2
                },
                "max_tokens": {
                    "type": "integer",
                    "minimum": 1
                },
                "top_p": {
                    "type": "number",
                    "exclusiveMinimum": 0,
                    "maximum": 1
                },
                "frequency_penalty": {
                    "type": "number",
                    "minimum": -2,
                    "maximum": 2
                },
                "presence_penalty": {
                    "type": "number",
                    "minimum": -2,
                    "maximum": 2
                }
            },
            "required": ["message"]
        }),
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatInput {
    pub message: String,
    #[serde(default)]
    pub system_prompt: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
    #[serde(default)]
    pub top_p: Option<f64>,
    #[serde(default)]
    pub frequency_penalty: Option<f64>,
    #[serde(default)]
    pub presence_penalty: Option<f64>,
}

impl ChatInput {
    /// Pure range validation; runs before any network call
    pub fn validate(&self) -> Result<()> {
        if self.message.trim().is_empty() {
            return Err(GrokMcpError::invalid_input("message must not be empty"));
        }
        if let Some(temperature) = self.temperature {
            if !(0.0..=2.0).contains(&temperature) {
                return Err(GrokMcpError::invalid_input(format!(
                    "temperature must be between 0 and 2, got {}",
                    temperature
                )));
            }
        }
        if let Some(max_tokens) = self.max_tokens {
            if max_tokens == 0 {
                return Err(GrokMcpError::invalid_input("max_tokens must be at least 1"));
            }
        }
        if let Some(top_p) = self.top_p {
            if !(top_p > 0.0 && top_p <= 1.0) {
                return Err(GrokMcpError::invalid_input(format!(
                    "top_p must be in (0, 1], got {}",
                    top_p
                )));
            }
        }
        for (name, value) in [
            ("frequency_penalty", self.frequency_penalty),
            ("presence_penalty", self.presence_penalty),
        ] {
            if let Some(penalty) = value {
                if !(-2.0..=2.0).contains(&penalty) {
                    return Err(GrokMcpError::invalid_input(format!(
                        "{} must be between -2 and 2, got {}",
                        name, penalty
                    )));
                }
            }
        }
        Ok(())
    }
}

pub async fn run(args: Value, api: &dyn XaiApi, default_model: &str) -> Result<Value> {
    let input: ChatInput = parse_input(NAME, args)?;
    input.validate()?;

    let mut messages = Vec::with_capacity(2);
    if let Some(system_prompt) = &input.system_prompt {
        messages.push(ChatMessage::system(system_prompt.clone()));
    }
    messages.push(ChatMessage::user(input.message.clone()));

    let request = ChatCompletionRequest {
        model: input
            .model
            .clone()
            .unwrap_or_else(|| default_model.to_string()),
        messages,
        temperature: input.temperature,
        max_tokens: input.max_tokens,
        top_p: input.top_p,
        frequency_penalty: input.frequency_penalty,
        presence_penalty: input.presence_penalty,
    };

    let response = api.chat_completion(&request).await?;
    let text = response.first_text().unwrap_or_default().to_string();

    Ok(json!({
        "response": text,
        "model": response.model,
        "finish_reason": response.finish_reason(),
        "usage": response.usage,
    }))
}
