//! # AgentWire Protocol
//!
//! The streaming IPC layer between host and worker:
//!
//! - [`codec`] — incremental decoding of newline-delimited JSON frames from
//!   a byte stream with no guaranteed chunk boundaries
//! - [`extract`] — a character-level automaton that pulls one named string
//!   field out of chunk-delivered tool-call arguments
//! - [`demux`] — classifies decoded frames, synthesizes tool start/finish
//!   boundary events, and routes content to the right sink
//! - [`event`] — the ordered event type consumed by the presentation layer

pub mod codec;
pub mod demux;
pub mod event;
pub mod extract;

pub use codec::{encode, FrameDecoder};
pub use demux::{Demultiplexer, DemuxConfig};
pub use event::StreamEvent;
pub use extract::FieldExtractor;
