//! Web search tool — stub that returns mock search results.
//!
//! In production this would call a real search API (Brave, Google, etc.).
//! The stub returns plausible results so the full host/worker pipeline can
//! be exercised end-to-end without network access.

use agentwire_core::error::ToolError;
use agentwire_core::tool::{Tool, ToolOutcome};
use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

pub struct WebSearchTool;

#[async_trait]
impl Tool for WebSearchTool {
    fn name(&self) -> &str {
        "web_search"
    }

    fn description(&self) -> &str {
        "Search the web for information. Returns a list of relevant results with titles, URLs, and snippets."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query"
                },
                "num_results": {
                    "type": "integer",
                    "description": "Number of results to return (default 3)",
                    "default": 3
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolOutcome, ToolError> {
        let query = arguments["query"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'query' argument".into()))?;

        let num_results = arguments["num_results"].as_u64().unwrap_or(3).min(5) as usize;
        debug!(query, num_results, "Mock web search");

        let results = mock_results(query, num_results);
        let output = serde_json::to_string_pretty(&results).unwrap_or_default();

        Ok(ToolOutcome::text(output))
    }
}

#[derive(Serialize, Clone)]
struct SearchResult {
    title: String,
    url: String,
    snippet: String,
}

fn mock_results(query: &str, count: usize) -> Vec<SearchResult> {
    let q = query.to_lowercase();

    // Context-aware mock results for common topics.
    let templates: Vec<(&str, Vec<SearchResult>)> = vec![
        (
            "rust",
            vec![
                SearchResult {
                    title: "The Rust Programming Language".into(),
                    url: "https://doc.rust-lang.org/book/".into(),
                    snippet: "Rust is a systems programming language focused on safety, speed, and concurrency.".into(),
                },
                SearchResult {
                    title: "crates.io: Rust Package Registry".into(),
                    url: "https://crates.io/".into(),
                    snippet: "The Rust community's crate registry for sharing and discovering libraries.".into(),
                },
            ],
        ),
        (
            "imaging",
            vec![
                SearchResult {
                    title: "Medical Imaging Basics".into(),
                    url: "https://example.org/imaging-basics".into(),
                    snippet: "An overview of volumetric imaging modalities and common file formats.".into(),
                },
            ],
        ),
    ];

    for (keyword, results) in &templates {
        if q.contains(keyword) {
            return results.iter().take(count).cloned().collect();
        }
    }

    // Generic fallback.
    (0..count)
        .map(|i| SearchResult {
            title: format!("Result {} for: {}", i + 1, query),
            url: format!(
                "https://example.com/search?q={}&p={}",
                query.replace(' ', "+"),
                i + 1
            ),
            snippet: format!(
                "This is a mock search result for the query '{query}'. In production, this would contain real content."
            ),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn search_returns_results() {
        let tool = WebSearchTool;
        let outcome = tool
            .execute(serde_json::json!({"query": "rust programming"}))
            .await
            .unwrap();
        assert!(outcome.output.contains("Rust"));
        assert!(!outcome.terminal);
    }

    #[tokio::test]
    async fn search_respects_num_results() {
        let tool = WebSearchTool;
        let outcome = tool
            .execute(serde_json::json!({"query": "anything else", "num_results": 2}))
            .await
            .unwrap();
        let data: Vec<serde_json::Value> = serde_json::from_str(&outcome.output).unwrap();
        assert_eq!(data.len(), 2);
    }

    #[tokio::test]
    async fn missing_query_returns_error() {
        let tool = WebSearchTool;
        assert!(tool.execute(serde_json::json!({})).await.is_err());
    }
}
