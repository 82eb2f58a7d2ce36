//! Newline-delimited JSON-RPC transport
//!
//! One JSON message per line; requests carry an `id`, notifications do not.
//! Responses are written as a single line followed by a flush, so the host
//! never sees a partial message. Unparseable lines get a parse-error
//! response with a null id. EOF on the input ends the session cleanly.
//!
//! stdout carries protocol traffic only - all logging goes to stderr.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::error::{GrokMcpError, Result};
use crate::mcp::server::GrokMcpServer;
use crate::mcp::types::{McpError, McpNotification, McpRequest, McpResponse};

/// Drive a server over a generic line-delimited byte stream. Generic so
/// tests can run the whole loop against in-memory buffers.
pub async fn serve<R, W>(server: &GrokMcpServer, reader: R, mut writer: W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();

    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| GrokMcpError::network(format!("transport read failed: {}", e)))?
    {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match classify(line) {
            Message::Request(request) => {
                let response = server.handle_request(request).await;
                write_response(&mut writer, &response).await?;
            }
            Message::Notification(notification) => {
                server.handle_notification(notification);
            }
            Message::Invalid(detail) => {
                tracing::warn!(error = %detail, "discarding unparseable message");
                let response = McpResponse::error(
                    serde_json::Value::Null,
                    McpError::parse_error(detail),
                );
                write_response(&mut writer, &response).await?;
            }
        }
    }

    tracing::info!("transport closed, shutting down");
    Ok(())
}

/// Serve over the process's stdio streams.
pub async fn serve_stdio(server: &GrokMcpServer) -> Result<()> {
    let stdin = BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();
    serve(server, stdin, stdout).await
}

enum Message {
    Request(McpRequest),
    Notification(McpNotification),
    Invalid(String),
}

/// A message with an `id` is a request; without one it is a notification.
fn classify(line: &str) -> Message {
    let value: serde_json::Value = match serde_json::from_str(line) {
        Ok(value) => value,
        Err(e) => return Message::Invalid(format!("invalid JSON: {}", e)),
    };

    if value.get("id").is_some() {
        match serde_json::from_value(value) {
            Ok(request) => Message::Request(request),
            Err(e) => Message::Invalid(format!("malformed request: {}", e)),
        }
    } else {
        match serde_json::from_value(value) {
            Ok(notification) => Message::Notification(notification),
            Err(e) => Message::Invalid(format!("malformed notification: {}", e)),
        }
    }
}

async fn write_response<W: AsyncWrite + Unpin>(
    writer: &mut W,
    response: &McpResponse,
) -> Result<()> {
    let mut payload = serde_json::to_vec(response)?;
    payload.push(b'\n');
    writer
        .write_all(&payload)
        .await
        .map_err(|e| GrokMcpError::network(format!("transport write failed: {}", e)))?;
    writer
        .flush()
        .await
        .map_err(|e| GrokMcpError::network(format!("transport flush failed: {}", e)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::ToolRegistry;
    use crate::xai::mock::MockXaiApi;
    use std::sync::Arc;

    fn test_server() -> GrokMcpServer {
        let api = Arc::new(MockXaiApi::new());
        GrokMcpServer::new(ToolRegistry::new(api, "grok-3"))
    }

    async fn run_session(input: &str) -> Vec<serde_json::Value> {
        let server = test_server();
        let reader = BufReader::new(input.as_bytes());
        let mut output = Vec::new();
        serve(&server, reader, &mut output).await.unwrap();

        String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_one_response_line_per_request() {
        let input = "{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"ping\"}\n\
                     {\"jsonrpc\":\"2.0\",\"id\":2,\"method\":\"tools/list\"}\n";
        let responses = run_session(input).await;

        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0]["id"], 1);
        assert_eq!(responses[1]["id"], 2);
        assert!(responses[1]["result"]["tools"].is_array());
    }

    #[tokio::test]
    async fn test_notifications_get_no_response() {
        let input = "{\"jsonrpc\":\"2.0\",\"method\":\"notifications/initialized\"}\n\
                     {\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"ping\"}\n";
        let responses = run_session(input).await;

        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0]["id"], 1);
    }

    #[tokio::test]
    async fn test_garbage_line_yields_parse_error_with_null_id() {
        let input = "this is not json\n\
                     {\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"ping\"}\n";
        let responses = run_session(input).await;

        assert_eq!(responses.len(), 2);
        assert!(responses[0]["id"].is_null());
        assert_eq!(responses[0]["error"]["code"], -32700);
        assert_eq!(responses[1]["id"], 1);
    }

    #[tokio::test]
    async fn test_blank_lines_are_skipped() {
        let input = "\n\n{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"ping\"}\n\n";
        let responses = run_session(input).await;
        assert_eq!(responses.len(), 1);
    }

    #[tokio::test]
    async fn test_string_ids_are_preserved() {
        let input = "{\"jsonrpc\":\"2.0\",\"id\":\"req-abc\",\"method\":\"ping\"}\n";
        let responses = run_session(input).await;
        assert_eq!(responses[0]["id"], "req-abc");
    }

    #[tokio::test]
    async fn test_eof_ends_session_cleanly() {
        let responses = run_session("").await;
        assert!(responses.is_empty());
    }
}
