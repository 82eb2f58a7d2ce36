//! `live_search` tool - web and X search via tool-augmented generation
//!
//! Translates a source selection (web and/or X) plus optional per-source
//! filters into server-side search tools on the upstream responses
//! endpoint. Allow and deny lists are mutually exclusive per source and are
//! rejected before any network call. Returns the generated answer, the
//! citation list, and per-source invocation counters.

use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{GrokMcpError, Result};
use crate::tools::{parse_input, ToolDescriptor};
use crate::xai::types::{ResponsesRequest, SearchTool};
use crate::xai::XaiApi;

pub const NAME: &str = "live_search";

const SOURCES: [&str; 2] = ["web", "x"];

pub fn descriptor() -> ToolDescriptor {
    ToolDescriptor {
        name: NAME,
        description: "Search the live web and/or X posts and answer a query with \
                      citations. Per-source allow and deny lists are mutually exclusive.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The question to answer with live search"
                },
                "sources": {
                    "type": "array",
                    "items": { "type": "string", "enum": SOURCES },
                    "description": "Sources to search (defaults to both)"
                },
                "max_results": {
                    "type": "integer",
                    "minimum": 1,
                    "maximum": 20
                },
                "allowed_domains": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Restrict web search to these domains"
                },
                "excluded_domains": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Exclude these domains from web search"
                },
                "allowed_x_handles": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Restrict X search to these handles"
                },
                "excluded_x_handles": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Exclude these handles from X search"
                },
                "country": {
                    "type": "string",
                    "description": "ISO 3166 country hint for web search"
                },
                "from_date": {
                    "type": "string",
                    "description": "Earliest publication date (YYYY-MM-DD)"
                },
                "to_date": {
                    "type": "string",
                    "description": "Latest publication date (YYYY-MM-DD)"
                }
            },
            "required": ["query"]
        }),
    }
}

#[derive(Debug, Deserialize)]
pub struct LiveSearchInput {
    pub query: String,
    #[serde(default)]
    pub sources: Option<Vec<String>>,
    #[serde(default)]
    pub max_results: Option<u32>,
    #[serde(default)]
    pub allowed_domains: Option<Vec<String>>,
    #[serde(default)]
    pub excluded_domains: Option<Vec<String>>,
    #[serde(default)]
    pub allowed_x_handles: Option<Vec<String>>,
    #[serde(default)]
    pub excluded_x_handles: Option<Vec<String>>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub from_date: Option<String>,
    #[serde(default)]
    pub to_date: Option<String>,
}

impl LiveSearchInput {
    fn selected_sources(&self) -> Vec<String> {
        self.sources
            .clone()
            .unwrap_or_else(|| SOURCES.iter().map(|s| s.to_string()).collect())
    }

    pub fn validate(&self) -> Result<()> {
        if self.query.trim().is_empty() {
            return Err(GrokMcpError::invalid_input("query must not be empty"));
        }
        let sources = self.selected_sources();
        if sources.is_empty() {
            return Err(GrokMcpError::invalid_input(
                "sources must not be empty when supplied",
            ));
        }
        for source in &sources {
            if !SOURCES.contains(&source.as_str()) {
                return Err(GrokMcpError::invalid_input(format!(
                    "unknown source {:?}, expected one of {:?}",
                    source, SOURCES
                )));
            }
        }
        if let Some(max_results) = self.max_results {
            if !(1..=20).contains(&max_results) {
                return Err(GrokMcpError::invalid_input(format!(
                    "max_results must be between 1 and 20, got {}",
                    max_results
                )));
            }
        }
        // Allow and deny lists are mutually exclusive per source.
        if self.allowed_domains.is_some() && self.excluded_domains.is_some() {
            return Err(GrokMcpError::invalid_input(
                "allowed_domains and excluded_domains are mutually exclusive",
            ));
        }
        if self.allowed_x_handles.is_some() && self.excluded_x_handles.is_some() {
            return Err(GrokMcpError::invalid_input(
                "allowed_x_handles and excluded_x_handles are mutually exclusive",
            ));
        }
        Ok(())
    }
}

pub async fn run(args: Value, api: &dyn XaiApi, model: &str) -> Result<Value> {
    let input: LiveSearchInput = parse_input(NAME, args)?;
    input.validate()?;

    let mut tools = Vec::new();
    for source in input.selected_sources() {
        match source.as_str() {
            "web" => tools.push(SearchTool::Web {
                allowed_domains: input.allowed_domains.clone(),
                excluded_domains: input.excluded_domains.clone(),
                country: input.country.clone(),
                from_date: input.from_date.clone(),
                to_date: input.to_date.clone(),
            }),
            "x" => tools.push(SearchTool::X {
                allowed_x_handles: input.allowed_x_handles.clone(),
                excluded_x_handles: input.excluded_x_handles.clone(),
                from_date: input.from_date.clone(),
                to_date: input.to_date.clone(),
            }),
            // Unreachable after validation.
            _ => {}
        }
    }

    let request = ResponsesRequest {
        model: model.to_string(),
        input: input.query.clone(),
        tools,
        max_search_results: input.max_results,
    };

    let response = api.create_response(&request).await?;
    let usage = response.usage.clone().unwrap_or_default();

    Ok(json!({
        "text": response.output_text(),
        "citations": response.citations,
        "sources_used": {
            "web_search_calls": usage.web_search_calls,
            "x_search_calls": usage.x_search_calls,
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xai::mock::MockXaiApi;
    use crate::xai::types::{OutputContent, OutputItem, ResponsesResponse, ResponsesUsage};

    #[tokio::test]
    async fn test_exclusive_domain_lists_rejected_before_any_call() {
        let api = MockXaiApi::new();
        let err = run(
            json!({
                "query": "rust news",
                "allowed_domains": ["rust-lang.org"],
                "excluded_domains": ["example.com"]
            }),
            &api,
            "grok-3",
        )
        .await
        .unwrap_err();

        assert!(err.to_string().contains("mutually exclusive"));
        assert_eq!(api.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_exclusive_handle_lists_rejected_before_any_call() {
        let api = MockXaiApi::new();
        let err = run(
            json!({
                "query": "rust news",
                "sources": ["x"],
                "allowed_x_handles": ["rustlang"],
                "excluded_x_handles": ["spam"]
            }),
            &api,
            "grok-3",
        )
        .await
        .unwrap_err();

        assert!(matches!(err, GrokMcpError::InvalidInput { .. }));
        assert_eq!(api.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_max_results_range_enforced() {
        let api = MockXaiApi::new();
        let err = run(json!({ "query": "q", "max_results": 21 }), &api, "grok-3")
            .await
            .unwrap_err();

        assert!(err.to_string().contains("max_results"));
        assert_eq!(api.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_unknown_source_rejected() {
        let api = MockXaiApi::new();
        let err = run(
            json!({ "query": "q", "sources": ["reddit"] }),
            &api,
            "grok-3",
        )
        .await
        .unwrap_err();

        assert!(err.to_string().contains("reddit"));
        assert_eq!(api.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_source_selection_builds_matching_tools() {
        let api = MockXaiApi::new();
        run(
            json!({
                "query": "rust releases",
                "sources": ["web"],
                "allowed_domains": ["rust-lang.org"],
                "max_results": 5
            }),
            &api,
            "grok-3",
        )
        .await
        .unwrap();

        let request = api.last_responses_request.lock().unwrap().clone().unwrap();
        assert_eq!(request.tools.len(), 1);
        assert!(matches!(
            &request.tools[0],
            SearchTool::Web { allowed_domains: Some(domains), .. } if domains == &vec!["rust-lang.org".to_string()]
        ));
        assert_eq!(request.max_search_results, Some(5));
    }

    #[tokio::test]
    async fn test_result_carries_text_citations_and_counters() {
        let api = MockXaiApi::new();
        api.set_responses_response(ResponsesResponse {
            output: vec![OutputItem {
                kind: "message".to_string(),
                content: vec![OutputContent {
                    kind: "output_text".to_string(),
                    text: "Rust 1.80 is out.".to_string(),
                }],
            }],
            citations: vec!["https://blog.rust-lang.org/".to_string()],
            usage: Some(ResponsesUsage {
                web_search_calls: 2,
                x_search_calls: 1,
                ..Default::default()
            }),
        });

        let content = run(json!({ "query": "rust releases" }), &api, "grok-3")
            .await
            .unwrap();

        assert_eq!(content["text"], "Rust 1.80 is out.");
        assert_eq!(content["citations"][0], "https://blog.rust-lang.org/");
        assert_eq!(content["sources_used"]["web_search_calls"], 2);
        assert_eq!(content["sources_used"]["x_search_calls"], 1);
    }
}
