//! MCP protocol message types
//!
//! JSON-RPC 2.0 message shapes for the subset of the Model Context Protocol
//! this server speaks: session initialization, tool listing, and tool
//! calls. Tool results are returned as text content blocks carrying the
//! JSON envelope, with an `isError` flag set out-of-band.

use serde::{Deserialize, Serialize};

/// JSON-RPC 2.0 version identifier
pub const JSONRPC_VERSION: &str = "2.0";

/// MCP protocol revision this server implements
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Unique identifier for JSON-RPC requests
pub type RequestId = serde_json::Value;

/// Request message initiating an operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct McpRequest {
    pub jsonrpc: String,
    pub id: RequestId,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<serde_json::Value>,
}

impl McpRequest {
    pub fn new(id: RequestId, method: impl Into<String>, params: Option<serde_json::Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            method: method.into(),
            params,
        }
    }
}

/// Response message correlated to a request via its id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct McpResponse {
    pub jsonrpc: String,
    pub id: RequestId,
    #[serde(flatten)]
    pub payload: McpResponsePayload,
}

/// Either successful result data or error details, never both
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum McpResponsePayload {
    Success { result: serde_json::Value },
    Error { error: McpError },
}

impl McpResponse {
    pub fn success(id: RequestId, result: serde_json::Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            payload: McpResponsePayload::Success { result },
        }
    }

    pub fn error(id: RequestId, error: McpError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            payload: McpResponsePayload::Error { error },
        }
    }
}

/// Notification message - a request without an id that expects no response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct McpNotification {
    pub jsonrpc: String,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 error object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct McpError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl McpError {
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;

    pub fn parse_error(message: impl Into<String>) -> Self {
        Self {
            code: Self::PARSE_ERROR,
            message: message.into(),
            data: None,
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            code: Self::INVALID_REQUEST,
            message: message.into(),
            data: None,
        }
    }

    pub fn method_not_found(method: impl Into<String>) -> Self {
        Self {
            code: Self::METHOD_NOT_FOUND,
            message: format!("Method not found: {}", method.into()),
            data: None,
        }
    }

    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self {
            code: Self::INVALID_PARAMS,
            message: message.into(),
            data: None,
        }
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self {
            code: Self::INTERNAL_ERROR,
            message: message.into(),
            data: None,
        }
    }
}

/// Server feature support advertised during the handshake.
///
/// This server exposes tools only; no resources or prompts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerCapabilities {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<ToolsCapability>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolsCapability {
    #[serde(skip_serializing_if = "Option::is_none", rename = "listChanged")]
    pub list_changed: Option<bool>,
}

/// Text content block carried in tool results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Content {
    #[serde(rename = "text")]
    Text { text: String },
}

/// Tool metadata advertised during discovery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: serde_json::Value,
}

/// `initialize` request parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitializeParams {
    #[serde(rename = "protocolVersion", default)]
    pub protocol_version: Option<String>,
    #[serde(default)]
    pub capabilities: Option<serde_json::Value>,
    #[serde(rename = "clientInfo", default)]
    pub client_info: Option<serde_json::Value>,
}

/// `initialize` response result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitializeResult {
    #[serde(rename = "protocolVersion")]
    pub protocol_version: String,
    pub capabilities: ServerCapabilities,
    #[serde(rename = "serverInfo")]
    pub server_info: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

/// `tools/list` response result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListToolsResult {
    pub tools: Vec<ToolInfo>,
}

/// `tools/call` request parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallToolParams {
    pub name: String,
    #[serde(default)]
    pub arguments: Option<serde_json::Value>,
}

/// `tools/call` response result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallToolResult {
    pub content: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none", rename = "isError")]
    pub is_error: Option<bool>,
}

/// MCP method names handled by this server
pub mod methods {
    pub const INITIALIZE: &str = "initialize";
    pub const PING: &str = "ping";
    pub const LIST_TOOLS: &str = "tools/list";
    pub const CALL_TOOL: &str = "tools/call";
    pub const INITIALIZED: &str = "notifications/initialized";
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_round_trip() {
        let request = McpRequest::new(json!(1), "tools/list", Some(json!({})));
        let serialized = serde_json::to_string(&request).unwrap();
        let deserialized: McpRequest = serde_json::from_str(&serialized).unwrap();
        assert_eq!(request, deserialized);
        assert_eq!(deserialized.jsonrpc, JSONRPC_VERSION);
    }

    #[test]
    fn test_response_payload_exclusivity() {
        let ok = McpResponse::success(json!(1), json!({"tools": []}));
        let serialized = serde_json::to_value(&ok).unwrap();
        assert!(serialized.get("result").is_some());
        assert!(serialized.get("error").is_none());

        let err = McpResponse::error(json!(2), McpError::method_not_found("bogus"));
        let serialized = serde_json::to_value(&err).unwrap();
        assert!(serialized.get("result").is_none());
        assert_eq!(serialized["error"]["code"], json!(McpError::METHOD_NOT_FOUND));
    }

    #[test]
    fn test_call_tool_result_serde_names() {
        let result = CallToolResult {
            content: vec![Content::Text {
                text: "{\"success\":true}".to_string(),
            }],
            is_error: Some(false),
        };
        let serialized = serde_json::to_value(&result).unwrap();
        assert_eq!(serialized["content"][0]["type"], "text");
        assert_eq!(serialized["isError"], false);
    }

    #[test]
    fn test_tool_info_schema_field_name() {
        let info = ToolInfo {
            name: "chat".to_string(),
            description: "d".to_string(),
            input_schema: json!({"type": "object"}),
        };
        let serialized = serde_json::to_value(&info).unwrap();
        assert!(serialized.get("inputSchema").is_some());
    }
}
