//! `analyze_image` tool - vision analysis
//!
//! Wraps a single chat completion against the vision model. The user
//! message carries two parts: the instruction text and an image reference
//! with a detail hint.

use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{GrokMcpError, Result};
use crate::tools::{parse_input, ToolDescriptor};
use crate::xai::types::{ChatCompletionRequest, ChatMessage, ContentPart, ImageUrlPart};
use crate::xai::XaiApi;

pub const NAME: &str = "analyze_image";

/// Model used for vision requests
pub const VISION_MODEL: &str = "grok-2-vision-1212";

/// Instruction used when the caller supplies none
const DEFAULT_PROMPT: &str = "Describe this image in detail.";

const DETAIL_LEVELS: [&str; 3] = ["low", "high", "auto"];

pub fn descriptor() -> ToolDescriptor {
    ToolDescriptor {
        name: NAME,
        description: "Analyze an image with the Grok vision model. Accepts an HTTP(S) \
                      URL or a data: URI.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "image_url": {
                    "type": "string",
                    "description": "URL or data: URI of the image to analyze"
                },
                "prompt": {
                    "type": "string",
                    "description": "Instruction for the analysis (defaults to a general description)"
                },
                "detail": {
                    "type": "string",
                    "enum": DETAIL_LEVELS,
                    "description": "Image detail hint"
                }
            },
            "required": ["image_url"]
        }),
    }
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeImageInput {
    pub image_url: String,
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}

impl AnalyzeImageInput {
    pub fn validate(&self) -> Result<()> {
        let url = self.image_url.trim();
        if url.is_empty() {
            return Err(GrokMcpError::invalid_input("image_url must not be empty"));
        }
        if !(url.starts_with("http://")
            || url.starts_with("https://")
            || url.starts_with("data:image/"))
        {
            return Err(GrokMcpError::invalid_input(
                "image_url must be an http(s) URL or a data:image/ URI",
            ));
        }
        if let Some(detail) = &self.detail {
            if !DETAIL_LEVELS.contains(&detail.as_str()) {
                return Err(GrokMcpError::invalid_input(format!(
                    "detail must be one of {:?}, got {:?}",
                    DETAIL_LEVELS, detail
                )));
            }
        }
        Ok(())
    }
}

pub async fn run(args: Value, api: &dyn XaiApi) -> Result<Value> {
    let input: AnalyzeImageInput = parse_input(NAME, args)?;
    input.validate()?;

    let instruction = input
        .prompt
        .clone()
        .unwrap_or_else(|| DEFAULT_PROMPT.to_string());

    let request = ChatCompletionRequest {
        model: VISION_MODEL.to_string(),
        messages: vec![ChatMessage::user_parts(vec![
            ContentPart::Text { text: instruction },
            ContentPart::ImageUrl {
                image_url: ImageUrlPart {
                    url: input.image_url.clone(),
                    detail: input.detail.clone(),
                },
            },
        ])],
        temperature: None,
        max_tokens: None,
        top_p: None,
        frequency_penalty: None,
        presence_penalty: None,
    };

    let response = api.chat_completion(&request).await?;

    Ok(json!({
        "analysis": response.first_text().unwrap_or_default(),
        "model": response.model,
        "usage": response.usage,
    }))
}
