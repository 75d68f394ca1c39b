//! Terminate tool — ends the current run.
//!
//! The model calls this when the request is fully handled (or cannot be).
//! Its outcome is marked terminal, which is what transitions the runner to
//! `Finished` after the observation is recorded.

use agentwire_core::error::ToolError;
use agentwire_core::tool::{Tool, ToolOutcome};
use async_trait::async_trait;

pub struct TerminateTool;

#[async_trait]
impl Tool for TerminateTool {
    fn name(&self) -> &str {
        "terminate"
    }

    fn description(&self) -> &str {
        "End the current interaction. Call this when the user's request is fully \
         handled, or when you cannot make further progress."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "status": {
                    "type": "string",
                    "description": "The finish status of the interaction",
                    "enum": ["success", "failure"]
                }
            },
            "required": ["status"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolOutcome, ToolError> {
        let status = arguments["status"].as_str().unwrap_or("success");
        Ok(ToolOutcome::terminal(format!(
            "The interaction has been completed with status: {status}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn outcome_is_terminal() {
        let tool = TerminateTool;
        let outcome = tool
            .execute(serde_json::json!({"status": "success"}))
            .await
            .unwrap();
        assert!(outcome.terminal);
        assert!(outcome.output.contains("success"));
    }

    #[tokio::test]
    async fn missing_status_defaults_to_success() {
        let tool = TerminateTool;
        let outcome = tool.execute(serde_json::json!({})).await.unwrap();
        assert!(outcome.terminal);
        assert!(outcome.output.contains("success"));
    }
}
