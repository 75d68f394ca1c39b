//! Tool trait — the abstraction over agent capabilities.
//!
//! Tools are what give the agent the ability to act: search the web, stream
//! a response to the user, end the run. The runner treats every tool
//! identically through this trait regardless of what it does.

use crate::error::ToolError;
use crate::provider::ToolDefinition;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The result of executing a tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolOutcome {
    /// The textual observation fed back to the model
    pub output: String,

    /// Optional base64-encoded image payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Whether executing this tool ends the current run
    #[serde(default)]
    pub terminal: bool,
}

impl ToolOutcome {
    /// A plain, non-terminal observation.
    pub fn text(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            image: None,
            terminal: false,
        }
    }

    /// An observation that ends the current run.
    pub fn terminal(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            image: None,
            terminal: true,
        }
    }
}

/// The core Tool trait.
///
/// Each tool (respond, terminate, web_search, ...) implements this trait.
/// Tools are registered in the [`ToolRouter`] and made available to the
/// agent runner.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique name of this tool (e.g., "respond", "terminate").
    fn name(&self) -> &str;

    /// A description of what this tool does (sent to the model).
    fn description(&self) -> &str;

    /// JSON Schema describing this tool's parameters.
    fn parameters_schema(&self) -> serde_json::Value;

    /// Execute the tool with the given arguments.
    async fn execute(&self, arguments: serde_json::Value)
        -> std::result::Result<ToolOutcome, ToolError>;

    /// Convert this tool into a ToolDefinition for sending to the model.
    fn to_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema(),
        }
    }
}

/// A registry of available tools with namespaced lookup.
///
/// The runner uses this to:
/// 1. Get tool definitions to send to the model
/// 2. Look up and execute tools when the model requests them
///
/// Lookup is two-level: exact name first, else strip the configured
/// namespace prefix (`{namespace}_`) and retry. Federated tool collections
/// advertise their tools under prefixed names; the prefix strip routes
/// those calls to the underlying tool without a second registry.
pub struct ToolRouter {
    tools: HashMap<String, Box<dyn Tool>>,
    namespace: Option<String>,
}

impl ToolRouter {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
            namespace: None,
        }
    }

    /// Set the namespace prefix recognized during fallback lookup.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Register a tool. Replaces any existing tool with the same name.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        let name = tool.name().to_string();
        self.tools.insert(name, tool);
    }

    /// Resolve a tool by name: exact match first, then namespace-stripped.
    pub fn resolve(&self, name: &str) -> Option<&dyn Tool> {
        if let Some(tool) = self.tools.get(name) {
            return Some(tool.as_ref());
        }
        let prefix = format!("{}_", self.namespace.as_deref()?);
        let stripped = name.strip_prefix(&prefix)?;
        self.tools.get(stripped).map(|t| t.as_ref())
    }

    /// Get all tool definitions (for sending to the model).
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|t| t.to_definition()).collect()
    }

    /// Execute the named tool with already-parsed arguments.
    pub async fn execute(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> std::result::Result<ToolOutcome, ToolError> {
        let tool = self
            .resolve(name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;
        tool.execute(arguments).await
    }

    /// List all registered tool names.
    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(|s| s.as_str()).collect()
    }

    /// Whether the named tool resolves to a registered tool.
    pub fn contains(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }
}

impl Default for ToolRouter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A simple test tool for unit tests.
    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }
        fn description(&self) -> &str {
            "Echoes back the input"
        }
        fn parameters_schema(&self) -> serde_json::Value {
            serde_json::json!({
                "type": "object",
                "properties": {
                    "text": { "type": "string" }
                },
                "required": ["text"]
            })
        }
        async fn execute(
            &self,
            arguments: serde_json::Value,
        ) -> std::result::Result<ToolOutcome, ToolError> {
            let text = arguments["text"].as_str().unwrap_or("").to_string();
            Ok(ToolOutcome::text(text))
        }
    }

    #[test]
    fn router_register_and_resolve() {
        let mut router = ToolRouter::new();
        router.register(Box::new(EchoTool));
        assert!(router.resolve("echo").is_some());
        assert!(router.resolve("nonexistent").is_none());
    }

    #[test]
    fn router_resolves_namespaced_names() {
        let mut router = ToolRouter::new().with_namespace("remote");
        router.register(Box::new(EchoTool));

        assert!(router.resolve("remote_echo").is_some());
        assert!(router.resolve("other_echo").is_none());
        // Exact match always wins over prefix stripping
        assert!(router.contains("echo"));
    }

    #[test]
    fn router_without_namespace_skips_prefix_lookup() {
        let mut router = ToolRouter::new();
        router.register(Box::new(EchoTool));
        assert!(router.resolve("remote_echo").is_none());
    }

    #[test]
    fn router_definitions() {
        let mut router = ToolRouter::new();
        router.register(Box::new(EchoTool));
        let defs = router.definitions();
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].name, "echo");
    }

    #[tokio::test]
    async fn router_execute_tool() {
        let mut router = ToolRouter::new();
        router.register(Box::new(EchoTool));

        let outcome = router
            .execute("echo", serde_json::json!({"text": "hello world"}))
            .await
            .unwrap();
        assert_eq!(outcome.output, "hello world");
        assert!(!outcome.terminal);
    }

    #[tokio::test]
    async fn router_execute_missing_tool() {
        let router = ToolRouter::new();
        let err = router
            .execute("nonexistent", serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::NotFound(_)));
    }
}
