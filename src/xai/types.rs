//! Wire types for the xAI HTTP API
//!
//! Request and response shapes for every upstream endpoint the adapter
//! consumes: model listing, chat completions (plain and vision), image
//! generation, video generation/edit/status, and tool-augmented responses
//! (live search). All types are transient per-call data carriers; nothing
//! here is persisted or shared across calls.

use serde::{Deserialize, Serialize};

/// One entry in an ordered chat message list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Message role: `system`, `user`, or `assistant`
    pub role: String,
    /// Plain text or multi-part content (text + image reference)
    pub content: MessageContent,
}

impl ChatMessage {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: MessageContent::Text(text.into()),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: MessageContent::Text(text.into()),
        }
    }

    pub fn user_parts(parts: Vec<ContentPart>) -> Self {
        Self {
            role: "user".to_string(),
            content: MessageContent::Parts(parts),
        }
    }
}

/// Chat message content - a bare string or a list of typed parts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

/// One part of a multi-part user message (vision requests)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ContentPart {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrlPart },
}

/// Image reference inside a vision message part
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageUrlPart {
    /// HTTP(S) URL or `data:` URI of the image
    pub url: String,
    /// Detail hint: `low`, `high`, or `auto`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Request body for `POST /v1/chat/completions`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f64>,
}

/// Response body for `POST /v1/chat/completions`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

impl ChatCompletionResponse {
    /// Text of the first assistant choice, if any
    pub fn first_text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
    }

    /// Finish reason of the first choice, if any
    pub fn finish_reason(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.finish_reason.as_deref())
    }
}

/// One completion choice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatChoice {
    pub message: AssistantMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Assistant message inside a completion choice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantMessage {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

/// Token accounting attached to completions and responses
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
}

/// Response body for `GET /v1/models`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelList {
    #[serde(default)]
    pub data: Vec<ModelInfo>,
}

/// One available model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
}

/// Request body for `POST /v1/images/generations`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageGenerationRequest {
    pub model: String,
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<String>,
}

/// Response body for `POST /v1/images/generations`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageGenerationResponse {
    #[serde(default)]
    pub data: Vec<GeneratedImage>,
}

/// One generated image - a URL or an inline base64 payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneratedImage {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub b64_json: Option<String>,
    #[serde(default)]
    pub revised_prompt: Option<String>,
}

/// Request body for `POST /v1/videos/generations`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoGenerationRequest {
    pub model: String,
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<String>,
}

/// Request body for `POST /v1/videos/edits`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoEditRequest {
    pub model: String,
    pub prompt: String,
    /// Existing video to edit
    pub video_url: String,
}

/// Video job descriptor returned by generation, edit, and status calls.
///
/// The upstream is inconsistent about the `status` field near completion:
/// a response may carry a result `url` before `status` settles on
/// `completed`. A present URL is therefore treated as implicit completion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoJob {
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
    /// Result URL; present once the video is ready
    #[serde(default)]
    pub url: Option<String>,
    /// Upstream failure detail when `status` is `failed`
    #[serde(default)]
    pub error: Option<String>,
}

impl VideoJob {
    /// Whether this job has reached a terminal state (explicit or implicit)
    pub fn is_terminal(&self) -> bool {
        self.url.is_some()
            || matches!(self.status.as_deref(), Some("completed") | Some("failed"))
    }

    /// Whether the job explicitly failed
    pub fn is_failed(&self) -> bool {
        self.status.as_deref() == Some("failed")
    }
}

/// Request body for `POST /v1/responses` (tool-augmented generation)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponsesRequest {
    pub model: String,
    /// The query to answer with search augmentation
    pub input: String,
    /// Server-side search tools the model may invoke
    pub tools: Vec<SearchTool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_search_results: Option<u32>,
}

/// Server-side search tool selector with per-source filters.
///
/// Allow and deny lists are mutually exclusive per source; the adapter
/// rejects inputs carrying both before a request is ever built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SearchTool {
    #[serde(rename = "web_search")]
    Web {
        #[serde(skip_serializing_if = "Option::is_none")]
        allowed_domains: Option<Vec<String>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        excluded_domains: Option<Vec<String>>,
        /// ISO 3166 country hint
        #[serde(skip_serializing_if = "Option::is_none")]
        country: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        from_date: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        to_date: Option<String>,
    },
    #[serde(rename = "x_search")]
    X {
        #[serde(skip_serializing_if = "Option::is_none")]
        allowed_x_handles: Option<Vec<String>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        excluded_x_handles: Option<Vec<String>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        from_date: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        to_date: Option<String>,
    },
}

/// Response body for `POST /v1/responses`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponsesResponse {
    #[serde(default)]
    pub output: Vec<OutputItem>,
    /// URLs cited by the generated answer
    #[serde(default)]
    pub citations: Vec<String>,
    #[serde(default)]
    pub usage: Option<ResponsesUsage>,
}

impl ResponsesResponse {
    /// Concatenated text of all message output items
    pub fn output_text(&self) -> String {
        self.output
            .iter()
            .filter(|item| item.kind == "message")
            .flat_map(|item| item.content.iter())
            .filter(|part| part.kind == "output_text")
            .map(|part| part.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// One item of the response output list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputItem {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub content: Vec<OutputContent>,
}

/// One content part of an output message
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputContent {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub text: String,
}

/// Usage accounting for tool-augmented responses, including how many times
/// each server-side search source was invoked
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponsesUsage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
    #[serde(default)]
    pub web_search_calls: u32,
    #[serde(default)]
    pub x_search_calls: u32,
}
