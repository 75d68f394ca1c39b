//! Respond tool — the agent's voice.
//!
//! The model talks to the user by calling this tool with a `response`
//! argument. The argument stream is what the host extracts live: each
//! fragment of the `response` string reaches the screen before the call is
//! even complete, so executing the tool only has to echo the final text
//! back as the observation.

use agentwire_core::error::ToolError;
use agentwire_core::tool::{Tool, ToolOutcome};
use async_trait::async_trait;

pub struct RespondTool;

#[async_trait]
impl Tool for RespondTool {
    fn name(&self) -> &str {
        "respond"
    }

    fn description(&self) -> &str {
        "Send a response to the user. Use this whenever you want to say something; \
         the text streams to the user's screen as you produce it."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "response": {
                    "type": "string",
                    "description": "The text to show the user"
                }
            },
            "required": ["response"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolOutcome, ToolError> {
        let response = arguments["response"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'response' argument".into()))?;

        Ok(ToolOutcome::text(response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn echoes_response_as_observation() {
        let tool = RespondTool;
        let outcome = tool
            .execute(serde_json::json!({"response": "Hello there"}))
            .await
            .unwrap();
        assert_eq!(outcome.output, "Hello there");
        assert!(!outcome.terminal);
    }

    #[tokio::test]
    async fn missing_response_is_invalid() {
        let tool = RespondTool;
        let err = tool.execute(serde_json::json!({})).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }

    #[test]
    fn definition_names_response_key() {
        let def = RespondTool.to_definition();
        assert_eq!(def.name, "respond");
        assert!(def.parameters["properties"]["response"].is_object());
    }
}
