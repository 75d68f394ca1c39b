//! The bounded think/act runner.
//!
//! One runner owns one conversation: memory, the model backend, the tool
//! router, and the step budget. A run is one user turn — think/act steps
//! repeat until the model invokes a terminal tool, the budget runs out, or
//! an unrecoverable error occurs.
//!
//! Every piece of progress leaves through the frame channel: assistant text
//! as `message` frames, tool-call argument fragments as `toolcall` frames,
//! step markers as `info` frames. Tool failures never abort a run — they
//! become observations the model can see and recover from.

use agentwire_config::AgentConfig;
use agentwire_core::error::{AgentError, ProviderError};
use agentwire_core::message::{merge_tool_call_deltas, Message, ToolCallDelta};
use agentwire_core::provider::{Provider, ProviderRequest};
use agentwire_core::tool::ToolRouter;
use agentwire_core::{Frame, Memory, Result, RunState, RunSummary};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// The agent execution loop.
pub struct AgentRunner {
    /// The model backend
    provider: Arc<dyn Provider>,

    /// The model to use
    model: String,

    /// Temperature setting
    temperature: f32,

    /// Default max tokens per response
    max_tokens: Option<u32>,

    /// Tool router
    tools: ToolRouter,

    /// Runner behavior (step budget, prompts, streaming)
    config: AgentConfig,

    /// Conversation memory, bounded to the configured message count
    memory: Memory,

    /// Current lifecycle state
    state: RunState,

    /// Think/act steps consumed by the current run
    current_step: u32,

    /// Tools whose execution ends the run, in addition to any outcome
    /// flagged terminal by the tool itself
    special_tools: Vec<String>,

    /// Tool calls proposed by the last think step, pending execution
    pending: Vec<ToolCallDelta>,

    /// Outbound progress frames
    progress: mpsc::Sender<Frame>,
}

impl AgentRunner {
    /// Create a new runner.
    pub fn new(
        provider: Arc<dyn Provider>,
        model: impl Into<String>,
        tools: ToolRouter,
        config: AgentConfig,
        progress: mpsc::Sender<Frame>,
    ) -> Self {
        let memory = Memory::new(config.max_messages);
        Self {
            provider,
            model: model.into(),
            temperature: 0.7,
            max_tokens: None,
            tools,
            config,
            memory,
            state: RunState::Idle,
            current_step: 0,
            special_tools: vec!["terminate".into()],
            pending: Vec::new(),
            progress,
        }
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the default max tokens per response.
    pub fn with_max_tokens(mut self, max: Option<u32>) -> Self {
        self.max_tokens = max;
        self
    }

    /// Replace the set of terminal tool names.
    pub fn with_special_tools(mut self, names: Vec<String>) -> Self {
        self.special_tools = names;
        self
    }

    /// The current lifecycle state.
    pub fn state(&self) -> RunState {
        self.state
    }

    /// The conversation memory.
    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    /// Reset memory and the step counter. Only called for an explicit
    /// `clear` command, never during a run.
    pub fn clear(&mut self) {
        self.memory.clear();
        self.current_step = 0;
        self.state = RunState::Idle;
        info!("Memory cleared");
    }

    /// Process one user turn: append the user message, then repeat
    /// think/act steps until termination or budget exhaustion.
    pub async fn run(&mut self, user_text: &str) -> Result<RunSummary> {
        self.state = RunState::Running;
        self.current_step = 0;
        self.memory.push(Message::user(user_text));
        let mut budget_exhausted = false;

        while self.state == RunState::Running {
            if self.current_step >= self.config.max_steps {
                budget_exhausted = true;
                let notice = AgentError::StepBudgetExceeded {
                    max_steps: self.config.max_steps,
                }
                .to_string();
                warn!(max_steps = self.config.max_steps, "Run truncated");
                self.memory
                    .push(Message::assistant(format!("Run truncated: {notice}")));
                self.emit(Frame::info(notice)).await;
                self.state = RunState::Finished;
                break;
            }

            self.current_step += 1;
            debug!(step = self.current_step, "Beginning think/act step");
            self.emit(Frame::info(format!(
                "Step {}/{}",
                self.current_step, self.config.max_steps
            )))
            .await;

            let proposed = match self.think().await {
                Ok(proposed) => proposed,
                Err(e) => {
                    self.state = RunState::Error;
                    return Err(e);
                }
            };

            if proposed {
                self.act().await;
            }
        }

        let summary = RunSummary {
            state: self.state,
            steps: self.current_step,
            budget_exhausted,
        };
        info!(steps = summary.steps, budget_exhausted, "Run complete");
        Ok(summary)
    }

    /// One think phase: ask the model for the next message, stream its
    /// progress out as frames, append it to memory. Returns whether any
    /// tool call was proposed.
    async fn think(&mut self) -> Result<bool> {
        let mut messages = vec![Message::system(&self.config.system_prompt)];
        messages.extend(self.memory.messages().iter().cloned());
        if !self.config.next_step_prompt.is_empty() {
            messages.push(Message::user(&self.config.next_step_prompt));
        }

        let request = ProviderRequest {
            model: self.model.clone(),
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            tools: self.tools.definitions(),
            stream: self.config.streaming_output,
        };

        let assistant = match self.config.step_timeout_secs {
            Some(secs) => {
                tokio::time::timeout(
                    std::time::Duration::from_secs(secs),
                    self.obtain_assistant(request),
                )
                .await
                .map_err(|_| ProviderError::Unavailable(format!("Think step timed out after {secs}s")))??
            }
            None => self.obtain_assistant(request).await?,
        };

        if assistant.content.is_none() && assistant.tool_calls.is_empty() {
            warn!("Model returned neither content nor tool calls");
        }

        self.pending = assistant.tool_calls.clone();
        self.memory.push(assistant);
        Ok(!self.pending.is_empty())
    }

    /// Get the next assistant message, emitting frames as progress arrives.
    async fn obtain_assistant(
        &self,
        request: ProviderRequest,
    ) -> std::result::Result<Message, ProviderError> {
        if request.stream {
            self.stream_assistant(request).await
        } else {
            self.complete_assistant(request).await
        }
    }

    /// Atomic completion: one frame per piece of the finished message.
    async fn complete_assistant(
        &self,
        request: ProviderRequest,
    ) -> std::result::Result<Message, ProviderError> {
        let message = self.provider.complete(request).await?;

        if let Some(content) = &message.content
            && !content.is_empty()
        {
            self.emit(Frame::message(content)).await;
        }
        for tc in &message.tool_calls {
            if let Some(name) = tc.function_name()
                && !tc.arguments().is_empty()
            {
                self.emit(Frame::toolcall(name, tc.arguments())).await;
            }
        }

        Ok(message)
    }

    /// Streaming completion: every content delta and every tool-call
    /// argument fragment is forwarded the moment it arrives.
    async fn stream_assistant(
        &self,
        request: ProviderRequest,
    ) -> std::result::Result<Message, ProviderError> {
        let mut rx = self.provider.stream(request).await?;
        let mut content = String::new();
        let mut calls: Vec<ToolCallDelta> = Vec::new();

        while let Some(chunk) = rx.recv().await {
            let chunk = chunk?;

            if let Some(text) = &chunk.content
                && !text.is_empty()
            {
                content.push_str(text);
                self.emit(Frame::message(text)).await;
            }

            for delta in &chunk.tool_calls {
                merge_tool_call_deltas(&mut calls, delta);

                // The fragment frame needs the tool name; later deltas omit
                // it, so resolve through the merged state.
                let fragment = delta.arguments();
                if fragment.is_empty() {
                    continue;
                }
                let name = calls
                    .iter()
                    .find(|c| c.index == delta.index)
                    .and_then(|c| c.function_name())
                    .map(str::to_string);
                if let Some(name) = name {
                    self.emit(Frame::toolcall(name, fragment)).await;
                }
            }

            if chunk.done {
                break;
            }
        }

        let content = if content.is_empty() {
            None
        } else {
            Some(content)
        };
        Ok(Message::assistant_with_tool_calls(content, calls))
    }

    /// One act phase: execute every proposed call in ascending index order,
    /// recording each observation. A terminal tool finishes the run after
    /// its observation is recorded; calls already proposed in this step
    /// still execute.
    async fn act(&mut self) {
        let calls = std::mem::take(&mut self.pending);
        for tc in &calls {
            let (observation, image, terminal) = self.execute_call(tc).await;

            let name = tc.function_name().unwrap_or("unknown");
            let call_id = tc.id.clone().unwrap_or_default();
            let observation = truncate_observation(observation, self.config.max_observe);
            self.memory
                .push(Message::tool_observation(name, call_id, observation).with_image(image));

            if terminal {
                info!(tool = name, "Terminal tool invoked, finishing run");
                self.state = RunState::Finished;
            }
        }
    }

    /// Execute one call. Argument and execution failures come back as
    /// error observations, never as run-fatal errors.
    async fn execute_call(&self, tc: &ToolCallDelta) -> (String, Option<String>, bool) {
        let Some(name) = tc.function_name() else {
            return ("Error: Invalid tool call format".into(), None, false);
        };

        let args_text = tc.arguments();
        let arguments: serde_json::Value = if args_text.trim().is_empty() {
            serde_json::json!({})
        } else {
            match serde_json::from_str(args_text) {
                Ok(value) => value,
                Err(e) => {
                    warn!(tool = name, error = %e, "Tool arguments failed to parse");
                    return (
                        format!("Error parsing arguments for {name}: invalid JSON ({e})"),
                        None,
                        false,
                    );
                }
            }
        };

        debug!(tool = name, "Executing tool");
        match self.tools.execute(name, arguments).await {
            Ok(outcome) => {
                let terminal =
                    outcome.terminal || self.special_tools.iter().any(|s| s == name);
                (outcome.output, outcome.image, terminal)
            }
            Err(e) => {
                warn!(tool = name, error = %e, "Tool execution failed");
                (format!("Error: {e}"), None, false)
            }
        }
    }

    async fn emit(&self, frame: Frame) {
        // A closed channel means the writer is gone; the run still finishes.
        let _ = self.progress.send(frame).await;
    }
}

/// Bound an observation to the configured length, char-safe.
fn truncate_observation(text: String, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text;
    }
    let mut out: String = text.chars().take(limit).collect();
    out.push_str("\n[output truncated]");
    out
}
