//! MCP server request handling
//!
//! Maps the four supported methods onto the tool registry. The server is
//! deliberately stateless between requests: `initialize` advertises
//! capabilities but nothing is gated on the handshake having happened, so
//! hosts that skip straight to `tools/call` still work.
//!
//! Tool failures are not JSON-RPC errors. A handler failure becomes a
//! `tools/call` result with `isError: true` and the failure envelope as
//! text content, which lets the host's model read the message and correct
//! its arguments. JSON-RPC errors are reserved for protocol-level problems:
//! malformed params, unknown methods.

use serde_json::json;

use crate::mcp::types::{
    methods, CallToolParams, CallToolResult, Content, InitializeParams, InitializeResult,
    ListToolsResult, McpError, McpNotification, McpRequest, McpResponse, ServerCapabilities,
    ToolInfo, ToolsCapability, PROTOCOL_VERSION,
};
use crate::tools::ToolRegistry;

/// Identity advertised in the `initialize` handshake
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub name: String,
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "grok-mcp".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// MCP server wired to a tool registry
pub struct GrokMcpServer {
    config: ServerConfig,
    registry: ToolRegistry,
}

impl GrokMcpServer {
    pub fn new(registry: ToolRegistry) -> Self {
        Self {
            config: ServerConfig::default(),
            registry,
        }
    }

    pub fn with_config(mut self, config: ServerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Handle one request and produce its response. Never panics and never
    /// returns an Err - every outcome is expressible as a JSON-RPC response.
    pub async fn handle_request(&self, request: McpRequest) -> McpResponse {
        tracing::debug!(method = %request.method, "handling request");
        match request.method.as_str() {
            methods::INITIALIZE => self.handle_initialize(request),
            methods::PING => McpResponse::success(request.id, json!({})),
            methods::LIST_TOOLS => self.handle_list_tools(request),
            methods::CALL_TOOL => self.handle_call_tool(request).await,
            other => {
                tracing::warn!(method = other, "method not found");
                McpResponse::error(request.id, McpError::method_not_found(other))
            }
        }
    }

    /// Notifications expect no response; log and move on.
    pub fn handle_notification(&self, notification: McpNotification) {
        match notification.method.as_str() {
            methods::INITIALIZED => {
                tracing::info!("client initialized");
            }
            other => {
                tracing::debug!(method = other, "ignoring notification");
            }
        }
    }

    fn handle_initialize(&self, request: McpRequest) -> McpResponse {
        let params: InitializeParams = match request.params {
            Some(params) => match serde_json::from_value(params) {
                Ok(params) => params,
                Err(e) => {
                    return McpResponse::error(
                        request.id,
                        McpError::invalid_params(format!("invalid initialize params: {}", e)),
                    )
                }
            },
            None => InitializeParams {
                protocol_version: None,
                capabilities: None,
                client_info: None,
            },
        };

        if let Some(requested) = &params.protocol_version {
            if requested != PROTOCOL_VERSION {
                tracing::warn!(
                    requested = %requested,
                    supported = PROTOCOL_VERSION,
                    "client requested a different protocol revision; answering with ours"
                );
            }
        }

        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: Some(false),
                }),
            },
            server_info: json!({
                "name": self.config.name,
                "version": self.config.version,
            }),
            instructions: None,
        };

        match serde_json::to_value(result) {
            Ok(value) => McpResponse::success(request.id, value),
            Err(e) => McpResponse::error(request.id, McpError::internal_error(e.to_string())),
        }
    }

    fn handle_list_tools(&self, request: McpRequest) -> McpResponse {
        let tools: Vec<ToolInfo> = self
            .registry
            .descriptors()
            .into_iter()
            .map(|descriptor| ToolInfo {
                name: descriptor.name.to_string(),
                description: descriptor.description.to_string(),
                input_schema: descriptor.input_schema,
            })
            .collect();

        match serde_json::to_value(ListToolsResult { tools }) {
            Ok(value) => McpResponse::success(request.id, value),
            Err(e) => McpResponse::error(request.id, McpError::internal_error(e.to_string())),
        }
    }

    async fn handle_call_tool(&self, request: McpRequest) -> McpResponse {
        let params: CallToolParams = match request.params {
            Some(params) => match serde_json::from_value(params) {
                Ok(params) => params,
                Err(e) => {
                    return McpResponse::error(
                        request.id,
                        McpError::invalid_params(format!("invalid tools/call params: {}", e)),
                    )
                }
            },
            None => {
                return McpResponse::error(
                    request.id,
                    McpError::invalid_params("tools/call requires params"),
                )
            }
        };

        let arguments = params.arguments.unwrap_or_else(|| json!({}));
        let tool_result = self.registry.invoke(&params.name, arguments).await;
        let is_error = !tool_result.success;

        let envelope = tool_result.into_envelope();
        let text = serde_json::to_string_pretty(&envelope)
            .unwrap_or_else(|_| envelope.to_string());

        let result = CallToolResult {
            content: vec![Content::Text { text }],
            is_error: Some(is_error),
        };

        match serde_json::to_value(result) {
            Ok(value) => McpResponse::success(request.id, value),
            Err(e) => McpResponse::error(request.id, McpError::internal_error(e.to_string())),
        }
    }
}
