//! Tool handlers and dispatch
//!
//! Five capabilities are exposed as MCP tools, one module each:
//!
//! - [`chat`] - chat completions with sampling parameters
//! - [`generate_image`] - image generation (URL or inline base64)
//! - [`analyze_image`] - vision analysis of a single image
//! - [`live_search`] - web/X search via tool-augmented generation
//! - [`generate_video`] - asynchronous video generation or edit
//!
//! Every handler follows the same shape: deserialize the raw arguments into
//! the tool's typed input struct, run its pure `validate()`, then execute
//! against the injected [`XaiApi`]. Invalid input fails before any network
//! call. Dispatch is a match over [`ToolKind`] - the five tool kinds are a
//! closed set, so there is no dynamic schema interpretation at runtime; the
//! JSON schemas in the descriptors exist for client discovery only.
//!
//! Every invocation produces exactly one [`ToolResult`], success or failure.
//! The registry converts handler errors into `success: false` envelopes
//! rather than propagating them, so a bad call can never crash the process.

pub mod analyze_image;
pub mod chat;
pub mod generate_image;
pub mod generate_video;
pub mod live_search;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;

use crate::error::{GrokMcpError, Result};
use crate::xai::{PollConfig, XaiApi};

/// Result from executing a tool - the one stable contract every handler
/// must honor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    /// Whether the tool execution was successful
    pub success: bool,
    /// Capability-specific result fields
    pub content: Value,
    /// Error message if execution failed
    pub error: Option<String>,
}

impl ToolResult {
    /// Create a successful tool result
    pub fn success(content: Value) -> Self {
        Self {
            success: true,
            content,
            error: None,
        }
    }

    /// Create an error tool result
    pub fn error<S: Into<String>>(message: S) -> Self {
        Self {
            success: false,
            content: Value::Null,
            error: Some(message.into()),
        }
    }

    /// Flatten into the JSON envelope surfaced to the MCP host:
    /// `{"success": true, ...fields}` or `{"success": false, "error": msg}`.
    pub fn into_envelope(self) -> Value {
        if self.success {
            match self.content {
                Value::Object(mut fields) => {
                    fields.insert("success".to_string(), json!(true));
                    Value::Object(fields)
                }
                other => json!({ "success": true, "result": other }),
            }
        } else {
            json!({
                "success": false,
                "error": self.error.unwrap_or_else(|| "unknown error".to_string()),
            })
        }
    }
}

/// Tool metadata advertised to MCP clients during discovery
#[derive(Debug, Clone)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    /// JSON schema for the tool's input parameters
    pub input_schema: Value,
}

/// The closed set of tool kinds this server exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    Chat,
    GenerateImage,
    AnalyzeImage,
    LiveSearch,
    GenerateVideo,
}

impl ToolKind {
    pub const ALL: [ToolKind; 5] = [
        ToolKind::Chat,
        ToolKind::GenerateImage,
        ToolKind::AnalyzeImage,
        ToolKind::LiveSearch,
        ToolKind::GenerateVideo,
    ];

    /// Resolve a caller-supplied tool name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            chat::NAME => Some(ToolKind::Chat),
            generate_image::NAME => Some(ToolKind::GenerateImage),
            analyze_image::NAME => Some(ToolKind::AnalyzeImage),
            live_search::NAME => Some(ToolKind::LiveSearch),
            generate_video::NAME => Some(ToolKind::GenerateVideo),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::Chat => chat::NAME,
            ToolKind::GenerateImage => generate_image::NAME,
            ToolKind::AnalyzeImage => analyze_image::NAME,
            ToolKind::LiveSearch => live_search::NAME,
            ToolKind::GenerateVideo => generate_video::NAME,
        }
    }

    pub fn descriptor(&self) -> ToolDescriptor {
        match self {
            ToolKind::Chat => chat::descriptor(),
            ToolKind::GenerateImage => generate_image::descriptor(),
            ToolKind::AnalyzeImage => analyze_image::descriptor(),
            ToolKind::LiveSearch => live_search::descriptor(),
            ToolKind::GenerateVideo => generate_video::descriptor(),
        }
    }
}

/// Deserialize raw tool arguments into a typed input struct.
///
/// serde failures (missing required fields, wrong types) surface as
/// `InvalidInput` before any network activity.
pub(crate) fn parse_input<T: DeserializeOwned>(tool: &str, args: Value) -> Result<T> {
    serde_json::from_value(args)
        .map_err(|e| GrokMcpError::invalid_input(format!("{}: {}", tool, e)))
}

/// Process-wide tool registry: a static descriptor list plus a routing
/// function from tool name to handler.
///
/// Constructed once at startup with the injected upstream client; read-only
/// afterwards, so concurrent invocations need no locking.
pub struct ToolRegistry {
    api: Arc<dyn XaiApi>,
    default_model: String,
    poll: PollConfig,
    cancel: CancellationToken,
}

impl ToolRegistry {
    pub fn new(api: Arc<dyn XaiApi>, default_model: impl Into<String>) -> Self {
        Self {
            api,
            default_model: default_model.into(),
            poll: PollConfig::default(),
            cancel: CancellationToken::new(),
        }
    }

    /// Override the video polling parameters
    pub fn with_poll_config(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    /// Token that aborts in-flight video polls when cancelled (process
    /// shutdown, host disconnect)
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Descriptors for all registered tools
    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        ToolKind::ALL.iter().map(|kind| kind.descriptor()).collect()
    }

    /// Route a (tool name, arguments) pair to its handler.
    ///
    /// Always produces exactly one `ToolResult`; unknown names and handler
    /// failures come back as `success: false` results.
    pub async fn invoke(&self, name: &str, args: Value) -> ToolResult {
        let Some(kind) = ToolKind::from_name(name) else {
            tracing::warn!(tool = name, "unknown tool requested");
            return ToolResult::error(GrokMcpError::unknown_tool(name).to_string());
        };

        tracing::debug!(tool = name, "dispatching tool call");
        let outcome = match kind {
            ToolKind::Chat => chat::run(args, self.api.as_ref(), &self.default_model).await,
            ToolKind::GenerateImage => generate_image::run(args, self.api.as_ref()).await,
            ToolKind::AnalyzeImage => analyze_image::run(args, self.api.as_ref()).await,
            ToolKind::LiveSearch => {
                live_search::run(args, self.api.as_ref(), &self.default_model).await
            }
            ToolKind::GenerateVideo => {
                generate_video::run(args, self.api.as_ref(), &self.poll, &self.cancel).await
            }
        };

        match outcome {
            Ok(content) => ToolResult::success(content),
            Err(err) => {
                tracing::warn!(tool = name, error = %err, "tool call failed");
                ToolResult::error(err.to_string())
            }
        }
    }
}
