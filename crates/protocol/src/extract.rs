//! Tool-call field extractor.
//!
//! A tool call's arguments arrive as raw fragments of one JSON object,
//! spread across many frames. For text-producing tools the host wants the
//! value of one named string field (default `"response"`) surfaced
//! character-by-character, the instant each character is decoded — without
//! waiting for the object to close.
//!
//! The extractor is a five-state automaton over a character stream:
//!
//! ```text
//! seeking_key ──'"'──▶ collecting_key ──'"',match──▶ seeking_colon
//!      ▲                     │ '"',no match               │ ':'
//!      │◀────────────────────┘                            ▼
//!      │                                          waiting_for_value
//!      │ unescaped '"'                                    │ '"'
//!      └───────────────── collecting_value ◀──────────────┘
//! ```
//!
//! State persists across `feed` calls so a field spanning many frames is
//! reconstructed correctly.
//!
//! Known limitations, carried over deliberately: non-string values for the
//! matched key are not supported and are skipped; a literal unescaped `"`
//! inside the target value ends extraction prematurely. The correct fix for
//! the latter depends on protocol changes outside this layer.

/// Automaton phase. See the module diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    SeekingKey,
    CollectingKey,
    SeekingColon,
    WaitingForValue,
    CollectingValue,
}

/// Streams the value of one named string field out of chunk-delivered JSON
/// text. One instance per text-producing tool; instances are independent,
/// so interleaved calls to different tools cannot corrupt each other's
/// partial parse.
#[derive(Debug)]
pub struct FieldExtractor {
    key: String,
    phase: Phase,
    pending_key: String,
    value: String,
    escape_pending: bool,
}

impl FieldExtractor {
    /// Create an extractor for the given argument key.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            phase: Phase::SeekingKey,
            pending_key: String::new(),
            value: String::new(),
            escape_pending: false,
        }
    }

    /// Feed a raw argument fragment; returns the characters decoded and
    /// emitted by this call. Emitted characters are also appended to the
    /// internal accumulator (see [`value`](Self::value)).
    pub fn feed(&mut self, chunk: &str) -> String {
        let mut emitted = String::new();
        for ch in chunk.chars() {
            self.step(ch, &mut emitted);
        }
        emitted
    }

    fn step(&mut self, ch: char, out: &mut String) {
        match self.phase {
            Phase::SeekingKey => {
                if ch == '"' {
                    self.pending_key.clear();
                    self.phase = Phase::CollectingKey;
                }
            }
            Phase::CollectingKey => {
                if ch == '"' {
                    self.phase = if self.pending_key == self.key {
                        Phase::SeekingColon
                    } else {
                        Phase::SeekingKey
                    };
                    self.pending_key.clear();
                } else {
                    self.pending_key.push(ch);
                }
            }
            Phase::SeekingColon => {
                if ch == ':' {
                    self.phase = Phase::WaitingForValue;
                }
            }
            Phase::WaitingForValue => {
                // Only string values are supported; anything before the
                // opening quote is skipped.
                if ch == '"' {
                    self.escape_pending = false;
                    self.phase = Phase::CollectingValue;
                }
            }
            Phase::CollectingValue => {
                if self.escape_pending {
                    // Decode the common JSON escapes; everything else
                    // (including `\"` and `\\`) passes through literally.
                    let decoded = match ch {
                        'n' => '\n',
                        't' => '\t',
                        'r' => '\r',
                        other => other,
                    };
                    self.emit(decoded, out);
                    self.escape_pending = false;
                } else if ch == '\\' {
                    self.escape_pending = true;
                } else if ch == '"' {
                    // Unescaped quote ends the value.
                    self.phase = Phase::SeekingKey;
                } else {
                    self.emit(ch, out);
                }
            }
        }
    }

    fn emit(&mut self, ch: char, out: &mut String) {
        self.value.push(ch);
        out.push(ch);
    }

    /// Everything emitted since construction or the last reset.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Whether the automaton is mid-value (useful for diagnostics).
    pub fn collecting(&self) -> bool {
        self.phase == Phase::CollectingValue
    }

    /// Reset all run state. Called when a new tool-call run begins so stale
    /// state from an earlier run cannot leak into the next parse.
    pub fn reset(&mut self) {
        self.phase = Phase::SeekingKey;
        self.pending_key.clear();
        self.value.clear();
        self.escape_pending = false;
    }
}
