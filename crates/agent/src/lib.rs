//! # AgentWire Agent
//!
//! The worker half of the runtime: a bounded think/act runner that drives a
//! model backend and a tool router, a stdio loop that speaks the frame
//! protocol with the host, and the writer task that serializes progress
//! frames onto stdout.

pub mod emit;
pub mod runner;
pub mod worker;

pub use emit::pump_frames;
pub use runner::AgentRunner;
pub use worker::Worker;
