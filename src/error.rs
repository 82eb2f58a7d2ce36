//! Unified error handling for the grok-mcp adapter
//!
//! Every failure in the adapter funnels into [`GrokMcpError`]. The taxonomy
//! mirrors where things can go wrong on a tool call's path:
//!
//! - **InvalidInput** - caller arguments violated a tool's constraints; the
//!   call never reached the network
//! - **Upstream** - the xAI API answered with a non-2xx status
//! - **Network** / **Serialization** - the HTTP exchange itself failed
//! - **Timeout** - the video polling budget was exhausted
//! - **UnknownTool** - dispatch miss on the tool name
//! - **Configuration** - missing credential; the only error allowed to
//!   terminate the process, and only at startup
//!
//! All variants except `Configuration` are caught at the dispatch boundary
//! and converted into a `success: false` tool result, so a single bad call
//! can never take the server down.

use thiserror::Error;

/// Main error type for the grok-mcp adapter
#[derive(Error, Debug, Clone)]
pub enum GrokMcpError {
    /// Caller input failed validation before any network call
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// Startup configuration errors (missing credential, bad base URL)
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// The upstream API returned a non-success HTTP status
    #[error("Upstream error ({status}): {body}")]
    Upstream { status: u16, body: String },

    /// The HTTP request could not be completed
    #[error("Network error: {message}")]
    Network { message: String },

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Video job polling exhausted its attempt budget
    #[error("Timeout: video job {job_id} still pending after {attempts} polls")]
    Timeout { job_id: String, attempts: u32 },

    /// A tool name that is not in the registry
    #[error("Unknown tool: {name}")]
    UnknownTool { name: String },

    /// The upstream reported a video job as failed
    #[error("Video job {job_id} failed: {message}")]
    VideoFailed { job_id: String, message: String },

    /// An in-flight poll was cancelled by the caller
    #[error("Cancelled: {message}")]
    Cancelled { message: String },
}

impl GrokMcpError {
    /// Create an InvalidInput error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a Configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an Upstream error from a status code and response body
    pub fn upstream(status: u16, body: impl Into<String>) -> Self {
        Self::Upstream {
            status,
            body: body.into(),
        }
    }

    /// Create a Network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create a Serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Create a Timeout error
    pub fn timeout(job_id: impl Into<String>, attempts: u32) -> Self {
        Self::Timeout {
            job_id: job_id.into(),
            attempts,
        }
    }

    /// Create an UnknownTool error
    pub fn unknown_tool(name: impl Into<String>) -> Self {
        Self::UnknownTool { name: name.into() }
    }

    /// Create a VideoFailed error
    pub fn video_failed(job_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::VideoFailed {
            job_id: job_id.into(),
            message: message.into(),
        }
    }

    /// Create a Cancelled error
    pub fn cancelled(message: impl Into<String>) -> Self {
        Self::Cancelled {
            message: message.into(),
        }
    }

    /// Check if this error is due to caller input rather than the upstream
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            GrokMcpError::InvalidInput { .. } | GrokMcpError::UnknownTool { .. }
        )
    }

    /// Check if this error is fatal for the process (startup only)
    pub fn is_fatal(&self) -> bool {
        matches!(self, GrokMcpError::Configuration { .. })
    }
}

impl From<serde_json::Error> for GrokMcpError {
    fn from(err: serde_json::Error) -> Self {
        GrokMcpError::serialization(err.to_string())
    }
}

impl From<reqwest::Error> for GrokMcpError {
    fn from(err: reqwest::Error) -> Self {
        GrokMcpError::network(err.to_string())
    }
}

/// Result type alias using GrokMcpError
pub type Result<T> = std::result::Result<T, GrokMcpError>;
