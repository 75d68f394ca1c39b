//! Stream demultiplexer.
//!
//! Tool-call arguments arrive as an undifferentiated sequence of raw-text
//! deltas with no explicit "this call is done" marker — the only boundary
//! signal is the next frame naming a different tool (or the stream ending).
//! The demultiplexer manufactures that missing signal: it tracks the
//! signature `(type, name)` of the last frame and synthesizes tool
//! start/finish events on every transition, before routing content.
//!
//! Each demultiplexer owns its boundary state and its extractors; multiple
//! independent instances never interfere.

use crate::event::StreamEvent;
use crate::extract::FieldExtractor;
use agentwire_core::{Frame, FrameType};
use std::collections::HashMap;
use tracing::trace;

/// Routing configuration for one stream.
#[derive(Debug, Clone)]
pub struct DemuxConfig {
    /// Tools whose argument stream carries user-visible text
    pub text_tools: Vec<String>,

    /// The argument key extracted from text-producing tools
    pub extract_key: String,

    /// The tool whose invocation marks the end of a run
    pub terminal_tool: String,
}

impl Default for DemuxConfig {
    fn default() -> Self {
        Self {
            text_tools: vec!["respond".into()],
            extract_key: "response".into(),
            terminal_tool: "terminate".into(),
        }
    }
}

/// Classifies decoded frames and routes their payloads, in arrival order.
pub struct Demultiplexer {
    config: DemuxConfig,
    extractors: HashMap<String, FieldExtractor>,
    last_signature: Option<(FrameType, String)>,
    run_finish_pending: bool,
}

impl Demultiplexer {
    pub fn new(config: DemuxConfig) -> Self {
        let extractors = config
            .text_tools
            .iter()
            .map(|name| (name.clone(), FieldExtractor::new(&config.extract_key)))
            .collect();
        Self {
            config,
            extractors,
            last_signature: None,
            run_finish_pending: true,
        }
    }

    /// Process one decoded frame, returning the events it produces in order.
    pub fn feed(&mut self, frame: &Frame) -> Vec<StreamEvent> {
        let mut events = Vec::new();
        let signature = frame.signature();

        // Close the previous tool-call run on any signature change.
        if let Some(last) = &self.last_signature
            && last.0 == FrameType::ToolCall
            && *last != signature
        {
            events.push(StreamEvent::ToolFinished {
                name: last.1.clone(),
            });
        }

        // Open a new tool-call run before routing its content, so observers
        // can switch display modes at the exact boundary.
        if signature.0 == FrameType::ToolCall && self.last_signature.as_ref() != Some(&signature) {
            events.push(StreamEvent::ToolStarted {
                name: signature.1.clone(),
            });
            if let Some(extractor) = self.extractors.get_mut(&signature.1) {
                extractor.reset();
            }
            self.run_finish_pending = true;
        }

        match frame.frame_type {
            FrameType::Message => events.push(StreamEvent::Text {
                content: frame.content.clone(),
            }),
            FrameType::Error => events.push(StreamEvent::Error {
                message: frame.content.clone(),
            }),
            FrameType::Info => events.push(StreamEvent::Status {
                message: frame.content.clone(),
            }),
            FrameType::ToolCall => {
                let name = &signature.1;
                if let Some(extractor) = self.extractors.get_mut(name) {
                    let emitted = extractor.feed(&frame.content);
                    if !emitted.is_empty() {
                        events.push(StreamEvent::Text { content: emitted });
                    }
                } else {
                    // Not a text-producing tool: arguments stay opaque.
                    trace!(tool = %name, "Discarding argument fragment");
                }

                if *name == self.config.terminal_tool && self.run_finish_pending {
                    events.push(StreamEvent::RunFinished);
                    self.run_finish_pending = false;
                }
            }
            // Commands are host→worker only; nothing to route.
            FrameType::Command => {}
        }

        self.last_signature = Some(signature);
        events
    }

    /// Close any open tool-call run at end of stream.
    pub fn finish(&mut self) -> Vec<StreamEvent> {
        let mut events = Vec::new();
        if let Some(last) = self.last_signature.take()
            && last.0 == FrameType::ToolCall
        {
            events.push(StreamEvent::ToolFinished { name: last.1 });
        }
        events
    }
}
