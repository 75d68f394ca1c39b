//! Run lifecycle types.

use serde::{Deserialize, Serialize};

/// The lifecycle state of an agent run.
///
/// `Running` is re-entered on each new user turn while memory persists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RunState {
    #[default]
    Idle,
    Running,
    Finished,
    Error,
}

/// How one run ended, reported back to the caller of `run()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// The state the runner ended in
    pub state: RunState,

    /// Think/act steps consumed by this run
    pub steps: u32,

    /// Whether the run was cut off by the step budget rather than a clean
    /// terminal-tool finish
    pub budget_exhausted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_state_defaults_to_idle() {
        assert_eq!(RunState::default(), RunState::Idle);
    }

    #[test]
    fn run_state_serializes_uppercase() {
        assert_eq!(
            serde_json::to_string(&RunState::Finished).unwrap(),
            "\"FINISHED\""
        );
    }
}
