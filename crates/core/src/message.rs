//! Message and tool-call delta domain types.
//!
//! These are the value objects that flow through the entire system:
//! the host sends user text → the worker's runner appends it to memory →
//! the model backend produces assistant messages and incremental tool-call
//! deltas → tool observations flow back as `tool`-role messages.

use serde::{Deserialize, Serialize};

/// The role of a message sender in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System instructions (identity, rules)
    System,
    /// The end user
    User,
    /// The model
    Assistant,
    /// Tool execution result
    Tool,
}

/// A single message in the conversation transcript.
///
/// Invariants: a `Tool` message always carries `tool_call_id` and `name`;
/// an `Assistant` message carrying tool calls may have no `content`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Who sent this message
    pub role: Role,

    /// The text content, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// Tool calls requested by the assistant (if any)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCallDelta>,

    /// Tool identity, when `role` is `Tool`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// If this is a tool result, which tool call it responds to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,

    /// Optional base64-encoded image payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Message {
    /// Create a new system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: Some(content.into()),
            tool_calls: Vec::new(),
            name: None,
            tool_call_id: None,
            image: None,
        }
    }

    /// Create a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: Some(content.into()),
            tool_calls: Vec::new(),
            name: None,
            tool_call_id: None,
            image: None,
        }
    }

    /// Create a new assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: Some(content.into()),
            tool_calls: Vec::new(),
            name: None,
            tool_call_id: None,
            image: None,
        }
    }

    /// Create an assistant message that carries tool calls.
    pub fn assistant_with_tool_calls(
        content: Option<String>,
        tool_calls: Vec<ToolCallDelta>,
    ) -> Self {
        Self {
            role: Role::Assistant,
            content,
            tool_calls,
            name: None,
            tool_call_id: None,
            image: None,
        }
    }

    /// Create a tool observation message.
    pub fn tool_observation(
        name: impl Into<String>,
        tool_call_id: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            role: Role::Tool,
            content: Some(content.into()),
            tool_calls: Vec::new(),
            name: Some(name.into()),
            tool_call_id: Some(tool_call_id.into()),
            image: None,
        }
    }

    /// Attach a base64 image payload.
    pub fn with_image(mut self, image: Option<String>) -> Self {
        self.image = image;
        self
    }
}

/// The `function` half of an incremental tool call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FunctionDelta {
    /// Name of the function being called (present in the first delta)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// A fragment (or the whole) of the JSON-encoded argument object
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<String>,
}

/// A tool invocation request, built incrementally from streamed deltas.
///
/// Successive deltas with the same `index` are merged: `arguments` fragments
/// are concatenated, `name`/`id` are overwritten only when newly present and
/// never cleared once set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallDelta {
    /// Position of this call within the assistant message
    pub index: usize,

    /// Unique call ID assigned by the model backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Always `"function"` in the current protocol
    #[serde(rename = "type", default = "default_call_type")]
    pub call_type: String,

    /// The function name and argument fragment
    #[serde(default)]
    pub function: FunctionDelta,
}

fn default_call_type() -> String {
    "function".into()
}

impl ToolCallDelta {
    /// Create a delta carrying a complete call (name + full arguments).
    pub fn complete(
        index: usize,
        id: impl Into<String>,
        name: impl Into<String>,
        arguments: impl Into<String>,
    ) -> Self {
        Self {
            index,
            id: Some(id.into()),
            call_type: default_call_type(),
            function: FunctionDelta {
                name: Some(name.into()),
                arguments: Some(arguments.into()),
            },
        }
    }

    /// Create a delta carrying only an argument fragment for `index`.
    pub fn fragment(index: usize, arguments: impl Into<String>) -> Self {
        Self {
            index,
            id: None,
            call_type: default_call_type(),
            function: FunctionDelta {
                name: None,
                arguments: Some(arguments.into()),
            },
        }
    }

    /// The function name, if known yet.
    pub fn function_name(&self) -> Option<&str> {
        self.function.name.as_deref()
    }

    /// The accumulated argument text, or `""` if none arrived yet.
    pub fn arguments(&self) -> &str {
        self.function.arguments.as_deref().unwrap_or("")
    }

    /// Merge a later delta for the same `index` into this one.
    ///
    /// Argument fragments concatenate; `id`, `name`, and `call_type` are
    /// overwritten only when the delta carries a new value.
    pub fn merge(&mut self, delta: &ToolCallDelta) {
        if let Some(id) = &delta.id {
            self.id = Some(id.clone());
        }
        if !delta.call_type.is_empty() {
            self.call_type = delta.call_type.clone();
        }
        if let Some(name) = &delta.function.name {
            self.function.name = Some(name.clone());
        }
        if let Some(args) = &delta.function.arguments {
            match &mut self.function.arguments {
                Some(existing) => existing.push_str(args),
                None => self.function.arguments = Some(args.clone()),
            }
        }
    }
}

/// Fold a stream of deltas into an ordered list of tool calls.
///
/// Deltas are keyed by `index`; unseen indices create new entries. The
/// result is sorted ascending by index, which is the order the `act` phase
/// executes in.
pub fn merge_tool_call_deltas(accumulated: &mut Vec<ToolCallDelta>, delta: &ToolCallDelta) {
    match accumulated.iter_mut().find(|tc| tc.index == delta.index) {
        Some(existing) => existing.merge(delta),
        None => {
            accumulated.push(delta.clone());
            accumulated.sort_by_key(|tc| tc.index);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_user_message() {
        let msg = Message::user("Hello, agent!");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.content.as_deref(), Some("Hello, agent!"));
        assert!(msg.tool_calls.is_empty());
    }

    #[test]
    fn tool_observation_carries_identity() {
        let msg = Message::tool_observation("web_search", "call_1", "3 results");
        assert_eq!(msg.role, Role::Tool);
        assert_eq!(msg.name.as_deref(), Some("web_search"));
        assert_eq!(msg.tool_call_id.as_deref(), Some("call_1"));
    }

    #[test]
    fn message_serialization_roundtrip() {
        let msg = Message::assistant_with_tool_calls(
            None,
            vec![ToolCallDelta::complete(0, "call_1", "respond", "{}")],
        );
        let json = serde_json::to_string(&msg).unwrap();
        // No content field when absent
        assert!(!json.contains("\"content\""));
        let back: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(back, msg);
    }

    #[test]
    fn merge_concatenates_arguments() {
        let mut acc = Vec::new();
        merge_tool_call_deltas(
            &mut acc,
            &ToolCallDelta::complete(0, "call_1", "respond", "{\"resp"),
        );
        merge_tool_call_deltas(&mut acc, &ToolCallDelta::fragment(0, "onse\": \"hi\"}"));

        assert_eq!(acc.len(), 1);
        assert_eq!(acc[0].arguments(), "{\"response\": \"hi\"}");
        assert_eq!(acc[0].function_name(), Some("respond"));
        assert_eq!(acc[0].id.as_deref(), Some("call_1"));
    }

    #[test]
    fn merge_never_clears_name_or_id() {
        let mut acc = vec![ToolCallDelta::complete(0, "call_1", "respond", "")];
        merge_tool_call_deltas(&mut acc, &ToolCallDelta::fragment(0, "{}"));

        assert_eq!(acc[0].id.as_deref(), Some("call_1"));
        assert_eq!(acc[0].function_name(), Some("respond"));
    }

    #[test]
    fn merge_is_associative_over_argument_text() {
        let d1 = ToolCallDelta::complete(0, "call_1", "respond", "{\"a\"");
        let d2 = ToolCallDelta::fragment(0, ": 1");
        let d3 = ToolCallDelta::fragment(0, "}");

        // (d1 + d2) + d3
        let mut left = Vec::new();
        merge_tool_call_deltas(&mut left, &d1);
        merge_tool_call_deltas(&mut left, &d2);
        merge_tool_call_deltas(&mut left, &d3);

        // d1 + (d2 ++ d3)
        let mut combined = d2.clone();
        combined.merge(&d3);
        let mut right = Vec::new();
        merge_tool_call_deltas(&mut right, &d1);
        merge_tool_call_deltas(&mut right, &combined);

        assert_eq!(left, right);
        assert_eq!(left[0].arguments(), "{\"a\": 1}");
    }

    #[test]
    fn merge_keeps_indices_ordered() {
        let mut acc = Vec::new();
        merge_tool_call_deltas(&mut acc, &ToolCallDelta::complete(1, "b", "terminate", "{}"));
        merge_tool_call_deltas(&mut acc, &ToolCallDelta::complete(0, "a", "respond", "{}"));

        assert_eq!(acc[0].index, 0);
        assert_eq!(acc[1].index, 1);
    }

    #[test]
    fn delta_deserializes_with_wire_type_field() {
        let json = r#"{"index":0,"id":"call_1","type":"function","function":{"name":"respond","arguments":"{"}}"#;
        let delta: ToolCallDelta = serde_json::from_str(json).unwrap();
        assert_eq!(delta.call_type, "function");
        assert_eq!(delta.arguments(), "{");
    }
}
