//! Bounded conversation memory.
//!
//! An ordered, append-only sequence of messages capped at the most recent
//! `max_messages`. Owned exclusively by one agent runner; cleared only by an
//! explicit command, never implicitly during a run.

use crate::message::Message;
use serde::{Deserialize, Serialize};

fn default_max_messages() -> usize {
    100
}

/// The conversation transcript, bounded to the most recent N messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Memory {
    messages: Vec<Message>,

    #[serde(default = "default_max_messages")]
    max_messages: usize,
}

impl Memory {
    /// Create an empty memory bounded to `max_messages`.
    pub fn new(max_messages: usize) -> Self {
        Self {
            messages: Vec::new(),
            max_messages,
        }
    }

    /// Append one message, dropping the oldest if the bound is exceeded.
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
        self.enforce_bound();
    }

    /// Append several messages, then enforce the bound once.
    pub fn extend(&mut self, messages: impl IntoIterator<Item = Message>) {
        self.messages.extend(messages);
        self.enforce_bound();
    }

    fn enforce_bound(&mut self) {
        if self.messages.len() > self.max_messages {
            let excess = self.messages.len() - self.max_messages;
            self.messages.drain(..excess);
        }
    }

    /// Drop all messages. Only ever called from an explicit `clear` command.
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// The n most recent messages, oldest first.
    pub fn recent(&self, n: usize) -> &[Message] {
        let start = self.messages.len().saturating_sub(n);
        &self.messages[start..]
    }

    /// All retained messages, oldest first.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new(default_max_messages())
    }
}
