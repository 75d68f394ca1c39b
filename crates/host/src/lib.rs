//! # AgentWire Host
//!
//! The host half of the runtime: spawns the worker process with a sanitized
//! environment, feeds its stdout through the frame decoder and stream
//! demultiplexer, and delivers ordered [`StreamEvent`]s to the presentation
//! layer.
//!
//! [`StreamEvent`]: agentwire_protocol::StreamEvent

pub mod transport;

pub use transport::{SessionId, WorkerHandle};
