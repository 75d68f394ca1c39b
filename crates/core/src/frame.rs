//! The wire unit exchanged between host and worker.
//!
//! A `Frame` is one self-contained JSON object. Frames are the *only*
//! structure that ever crosses the process boundary; everything the worker
//! reports — assistant text, tool-call argument fragments, errors, status
//! lines — travels as one frame per fragment.

use serde::{Deserialize, Serialize};

/// The declared type of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameType {
    /// Plain user-visible text (host→worker: a user turn)
    Message,
    /// A tool-call argument fragment, tagged with the tool name
    ToolCall,
    /// An error report
    Error,
    /// Status information
    Info,
    /// An out-of-band control command (host→worker only)
    Command,
}

/// One self-contained JSON object on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// The frame type discriminator
    #[serde(rename = "type")]
    pub frame_type: FrameType,

    /// The payload text (meaning depends on `frame_type`)
    pub content: String,

    /// Tool name, present on `toolcall` frames
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Frame {
    /// A plain text frame.
    pub fn message(content: impl Into<String>) -> Self {
        Self {
            frame_type: FrameType::Message,
            content: content.into(),
            name: None,
        }
    }

    /// A tool-call argument fragment for the named tool.
    pub fn toolcall(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            frame_type: FrameType::ToolCall,
            content: content.into(),
            name: Some(name.into()),
        }
    }

    /// An error report frame.
    pub fn error(content: impl Into<String>) -> Self {
        Self {
            frame_type: FrameType::Error,
            content: content.into(),
            name: None,
        }
    }

    /// A status information frame.
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            frame_type: FrameType::Info,
            content: content.into(),
            name: None,
        }
    }

    /// An out-of-band command frame (`"clear"`, `"exit"`).
    pub fn command(content: impl Into<String>) -> Self {
        Self {
            frame_type: FrameType::Command,
            content: content.into(),
            name: None,
        }
    }

    /// The (type, name-or-empty) signature used for boundary detection.
    pub fn signature(&self) -> (FrameType, String) {
        (self.frame_type, self.name.clone().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_type_serializes_lowercase() {
        let json = serde_json::to_string(&FrameType::ToolCall).unwrap();
        assert_eq!(json, "\"toolcall\"");
    }

    #[test]
    fn message_frame_omits_name() {
        let json = serde_json::to_string(&Frame::message("hi")).unwrap();
        assert_eq!(json, r#"{"type":"message","content":"hi"}"#);
    }

    #[test]
    fn toolcall_frame_carries_name() {
        let frame = Frame::toolcall("respond", "{\"resp");
        let json = serde_json::to_string(&frame).unwrap();
        assert!(json.contains(r#""name":"respond""#));
        let back: Frame = serde_json::from_str(&json).unwrap();
        assert_eq!(back, frame);
    }

    #[test]
    fn signature_uses_empty_string_for_missing_name() {
        assert_eq!(
            Frame::message("x").signature(),
            (FrameType::Message, String::new())
        );
        assert_eq!(
            Frame::toolcall("respond", "x").signature(),
            (FrameType::ToolCall, "respond".into())
        );
    }

    #[test]
    fn inbound_frame_parses_without_name() {
        let frame: Frame =
            serde_json::from_str(r#"{"type":"command","content":"clear"}"#).unwrap();
        assert_eq!(frame.frame_type, FrameType::Command);
        assert_eq!(frame.content, "clear");
        assert!(frame.name.is_none());
    }
}
