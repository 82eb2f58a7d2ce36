//! `generate_image` tool - text-to-image generation
//!
//! Forwards the prompt, image count, aspect ratio, and response format to
//! the upstream image endpoint. Inline base64 payloads are truncated for
//! display and flagged as elided - a full payload would swamp the host's
//! context window, so callers wanting the raw bytes should request URLs.

use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{GrokMcpError, Result};
use crate::tools::{parse_input, ToolDescriptor};
use crate::xai::types::ImageGenerationRequest;
use crate::xai::XaiApi;

pub const NAME: &str = "generate_image";

/// Model used for image generation
pub const IMAGE_MODEL: &str = "grok-2-image-1212";

/// Accepted aspect ratios
pub const ASPECT_RATIOS: [&str; 5] = ["1:1", "16:9", "9:16", "4:3", "3:4"];

/// Characters of a base64 payload kept for display
const B64_PREVIEW_CHARS: usize = 200;

pub fn descriptor() -> ToolDescriptor {
    ToolDescriptor {
        name: NAME,
        description: "Generate images from a text prompt. Returns image URLs, or \
                      truncated base64 previews when response_format is b64_json.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "prompt": {
                    "type": "string",
                    "description": "Text description of the desired image"
                },
                "n": {
                    "type": "integer",
                    "minimum": 1,
                    "maximum": 10,
                    "description": "Number of images to generate"
                },
                "aspect_ratio": {
                    "type": "string",
                    "enum": ASPECT_RATIOS
                },
                "response_format": {
                    "type": "string",
                    "enum": ["url", "b64_json"],
                    "description": "Return URLs (default) or inline base64 payloads"
                }
            },
            "required": ["prompt"]
        }),
    }
}

#[derive(Debug, Deserialize)]
pub struct GenerateImageInput {
    pub prompt: String,
    #[serde(default)]
    pub n: Option<u32>,
    #[serde(default)]
    pub aspect_ratio: Option<String>,
    #[serde(default)]
    pub response_format: Option<String>,
}

impl GenerateImageInput {
    pub fn validate(&self) -> Result<()> {
        if self.prompt.trim().is_empty() {
            return Err(GrokMcpError::invalid_input("prompt must not be empty"));
        }
        if let Some(n) = self.n {
            if !(1..=10).contains(&n) {
                return Err(GrokMcpError::invalid_input(format!(
                    "n must be between 1 and 10, got {}",
                    n
                )));
            }
        }
        if let Some(ratio) = &self.aspect_ratio {
            if !ASPECT_RATIOS.contains(&ratio.as_str()) {
                return Err(GrokMcpError::invalid_input(format!(
                    "aspect_ratio must be one of {:?}, got {:?}",
                    ASPECT_RATIOS, ratio
                )));
            }
        }
        if let Some(format) = &self.response_format {
            if format != "url" && format != "b64_json" {
                return Err(GrokMcpError::invalid_input(format!(
                    "response_format must be \"url\" or \"b64_json\", got {:?}",
                    format
                )));
            }
        }
        Ok(())
    }
}

/// Cut a payload to the preview length without splitting a character.
/// Well-formed base64 is ASCII, but the payload is upstream-controlled and
/// a fixed byte index into arbitrary UTF-8 would panic mid-character.
fn truncate_preview(b64: &str) -> &str {
    let mut cut = B64_PREVIEW_CHARS.min(b64.len());
    while !b64.is_char_boundary(cut) {
        cut -= 1;
    }
    &b64[..cut]
}

pub async fn run(args: Value, api: &dyn XaiApi) -> Result<Value> {
    let input: GenerateImageInput = parse_input(NAME, args)?;
    input.validate()?;

    let request = ImageGenerationRequest {
        model: IMAGE_MODEL.to_string(),
        prompt: input.prompt.clone(),
        n: input.n,
        aspect_ratio: input.aspect_ratio.clone(),
        response_format: input.response_format.clone(),
    };

    let response = api.generate_image(&request).await?;

    let images: Vec<Value> = response
        .data
        .iter()
        .map(|image| {
            let mut entry = serde_json::Map::new();
            if let Some(url) = &image.url {
                entry.insert("url".to_string(), json!(url));
            }
            if let Some(b64) = &image.b64_json {
                if b64.len() > B64_PREVIEW_CHARS {
                    entry.insert(
                        "b64_json".to_string(),
                        json!(format!("{}...", truncate_preview(b64))),
                    );
                    entry.insert("truncated".to_string(), json!(true));
                    entry.insert(
                        "note".to_string(),
                        json!("base64 payload truncated for display; request url format for the full image"),
                    );
                } else {
                    entry.insert("b64_json".to_string(), json!(b64));
                }
            }
            if let Some(revised) = &image.revised_prompt {
                entry.insert("revised_prompt".to_string(), json!(revised));
            }
            Value::Object(entry)
        })
        .collect();

    Ok(json!({
        "images": images,
        "count": response.data.len(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xai::mock::MockXaiApi;
    use crate::xai::types::GeneratedImage;

    #[tokio::test]
    async fn test_count_out_of_range_never_reaches_network() {
        let api = MockXaiApi::new();
        let err = run(json!({ "prompt": "a cat", "n": 11 }), &api)
            .await
            .unwrap_err();

        assert!(matches!(err, GrokMcpError::InvalidInput { .. }));
        assert_eq!(api.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_bad_aspect_ratio_rejected() {
        let api = MockXaiApi::new();
        let err = run(json!({ "prompt": "a cat", "aspect_ratio": "2:1" }), &api)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("aspect_ratio"));
        assert_eq!(api.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_url_format_passes_through() {
        let api = MockXaiApi::new();
        api.set_image_response(vec![GeneratedImage {
            url: Some("https://example.test/cat.png".to_string()),
            revised_prompt: Some("a fluffy cat".to_string()),
            ..Default::default()
        }]);

        let content = run(json!({ "prompt": "a cat", "n": 2 }), &api).await.unwrap();

        assert_eq!(content["count"], 1);
        assert_eq!(content["images"][0]["url"], "https://example.test/cat.png");
        assert_eq!(content["images"][0]["revised_prompt"], "a fluffy cat");

        let request = api.last_image_request.lock().unwrap().clone().unwrap();
        assert_eq!(request.n, Some(2));
        assert_eq!(request.model, IMAGE_MODEL);
    }

    #[tokio::test]
    async fn test_long_base64_payload_is_truncated_and_flagged() {
        let api = MockXaiApi::new();
        let payload = "A".repeat(5000);
        api.set_image_response(vec![GeneratedImage {
            b64_json: Some(payload),
            ..Default::default()
        }]);

        let content = run(
            json!({ "prompt": "a cat", "response_format": "b64_json" }),
            &api,
        )
        .await
        .unwrap();

        let image = &content["images"][0];
        assert_eq!(image["truncated"], true);
        let preview = image["b64_json"].as_str().unwrap();
        assert!(preview.len() < 300);
        assert!(preview.ends_with("..."));
    }

    #[tokio::test]
    async fn test_truncation_respects_char_boundaries() {
        let api = MockXaiApi::new();
        // Multi-byte character straddling the preview cut point; a byte
        // slice at the fixed index would panic.
        let payload = format!("{}€€€€", "a".repeat(B64_PREVIEW_CHARS - 1));
        api.set_image_response(vec![GeneratedImage {
            b64_json: Some(payload),
            ..Default::default()
        }]);

        let content = run(
            json!({ "prompt": "a cat", "response_format": "b64_json" }),
            &api,
        )
        .await
        .unwrap();

        let image = &content["images"][0];
        assert_eq!(image["truncated"], true);
        let preview = image["b64_json"].as_str().unwrap();
        assert!(preview.ends_with("..."));
        assert!(preview.trim_end_matches("...").ends_with('a'));
    }

    #[tokio::test]
    async fn test_short_base64_payload_kept_whole() {
        let api = MockXaiApi::new();
        api.set_image_response(vec![GeneratedImage {
            b64_json: Some("dGlueQ==".to_string()),
            ..Default::default()
        }]);

        let content = run(
            json!({ "prompt": "a cat", "response_format": "b64_json" }),
            &api,
        )
        .await
        .unwrap();

        let image = &content["images"][0];
        assert_eq!(image["b64_json"], "dGlueQ==");
        assert!(image.get("truncated").is_none());
    }
}
