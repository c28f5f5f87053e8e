//! Owns the transcript and UI state and drives one assistant turn at a time.
//!
//! A turn can be run inline with [`TurnController::send_message`], or from an
//! event loop with [`TurnController::submit`] followed by repeated
//! [`TurnController::poll`] calls. Both paths share the same bookkeeping.

use std::sync::Arc;

use anyhow::Result;
use futures_util::FutureExt;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{error, info, trace, warn};

use crate::backend::{AssistantBackend, AssistantReply, AssistantRequest};
use crate::context::UiContextSnapshot;
use crate::document::{Document, ElementAction};
use crate::executor::{activate, BatchRun, Step, ToolExecutor};
use crate::state::{ChatMessage, ChatRole, Tab, TurnStatus, UiState};
use crate::tools::{decode_batch, ToolCall};

/// Shown when the assistant acted on the page but said nothing
pub const COMPLETION_REPLY: &str =
    "Done! I've updated the page to show you what you were looking for.";

/// Shown when the assistant neither answered nor acted
pub const NO_ANSWER_REPLY: &str =
    "Sorry, I don't have an answer for that. Try asking about the projects, grades or contact form.";

/// Shown when the backend request fails
pub const APOLOGY_REPLY: &str =
    "I'm having a bit of trouble answering right now. Try asking again about your projects or grades!";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
    #[error("Message is empty")]
    EmptyMessage,
    #[error("The assistant is still working on the previous message")]
    TurnInProgress,
}

enum InFlight {
    Waiting(JoinHandle<Result<AssistantReply>>),
    Acting { run: BatchRun, answer: String },
}

pub struct TurnController {
    backend: Arc<dyn AssistantBackend>,
    executor: ToolExecutor,
    ui: UiState,
    transcript: Vec<ChatMessage>,
    status: TurnStatus,
    last_message_id: i64,
    in_flight: Option<InFlight>,
}

impl TurnController {
    pub fn new(backend: Arc<dyn AssistantBackend>) -> Self {
        Self {
            backend,
            executor: ToolExecutor::default(),
            ui: UiState::default(),
            transcript: Vec::new(),
            status: TurnStatus::Idle,
            last_message_id: 0,
            in_flight: None,
        }
    }

    pub fn set_backend(&mut self, backend: Arc<dyn AssistantBackend>) {
        info!(backend = %backend.describe(), "Switching assistant backend");
        self.backend = backend;
    }

    pub fn backend_description(&self) -> String {
        self.backend.describe()
    }

    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn status(&self) -> TurnStatus {
        self.status
    }

    /// A turn is waiting on the backend or still applying its tool calls
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn snapshot(&self) -> UiContextSnapshot {
        UiContextSnapshot::capture(&self.ui)
    }

    // Direct user actions

    pub fn select_tab(&mut self, tab: Tab) {
        self.ui.navigate(tab.id());
    }

    pub fn edit_form_field(&mut self, field: &str, value: impl Into<String>) {
        self.ui.set_form_field(field, value);
    }

    pub fn submit_form(&mut self) {
        self.ui.submit_form();
    }

    pub fn start_new_form(&mut self) {
        self.ui.reset_form();
    }

    /// Activate a mounted element by id. Returns false if nothing happened.
    pub fn click(&mut self, element_id: &str) -> bool {
        let action = Document::mount(&self.ui)
            .get(element_id)
            .and_then(|el| el.action);
        match action {
            Some(action) => {
                self.perform(action);
                true
            }
            None => false,
        }
    }

    /// Run an element's action directly, for controls that carry no id
    pub fn perform(&mut self, action: ElementAction) {
        activate(&mut self.ui, action);
    }

    pub fn take_scroll_request(&mut self) -> Option<String> {
        self.ui.take_scroll_request()
    }

    // Turns

    /// Run a whole turn inline: ask the backend, apply its tool calls, record
    /// the answer. Backend failures end up in the transcript, not here.
    pub async fn send_message(&mut self, text: &str) -> Result<(), SubmitError> {
        let request = self.begin_turn(text)?;
        let result = self.backend.respond(&request).await;
        if let Some((calls, answer)) = self.accept_reply(result) {
            self.executor.execute(calls, &mut self.ui).await;
            self.complete_turn(answer);
        }
        Ok(())
    }

    /// Start a turn in the background; drive it with [`TurnController::poll`]
    pub fn submit(&mut self, text: &str) -> Result<(), SubmitError> {
        let request = self.begin_turn(text)?;
        let backend = Arc::clone(&self.backend);
        self.in_flight = Some(InFlight::Waiting(tokio::spawn(async move {
            backend.respond(&request).await
        })));
        Ok(())
    }

    /// Collect a finished backend reply, advance the running batch and revert
    /// elapsed highlights. Returns the next instant that needs a poll, if any.
    pub fn poll(&mut self, now: Instant) -> Option<Instant> {
        for id in self.ui.highlights_mut().expire(now) {
            trace!(element = %id, "Highlight reverted");
        }

        let joined = match self.in_flight.as_mut() {
            Some(InFlight::Waiting(handle)) => handle.now_or_never(),
            _ => None,
        };
        if let Some(joined) = joined {
            self.in_flight = None;
            let result = joined.map_err(anyhow::Error::from).and_then(|reply| reply);
            if let Some((calls, answer)) = self.accept_reply(result) {
                self.in_flight = Some(InFlight::Acting {
                    run: self.executor.start(calls),
                    answer,
                });
            }
        }

        if let Some(InFlight::Acting { run, .. }) = self.in_flight.as_mut() {
            if run.advance(&mut self.ui, now) == Step::Finished {
                if let Some(InFlight::Acting { answer, .. }) = self.in_flight.take() {
                    self.complete_turn(answer);
                }
            }
        }

        self.next_wakeup()
    }

    fn next_wakeup(&self) -> Option<Instant> {
        let resume = match &self.in_flight {
            Some(InFlight::Acting { run, .. }) => run.resume_at(),
            _ => None,
        };
        [resume, self.ui.highlights().next_deadline()]
            .into_iter()
            .flatten()
            .min()
    }

    fn begin_turn(&mut self, text: &str) -> Result<AssistantRequest, SubmitError> {
        if text.trim().is_empty() {
            return Err(SubmitError::EmptyMessage);
        }
        if self.is_busy() {
            return Err(SubmitError::TurnInProgress);
        }

        self.push_message(ChatRole::User, text.to_string());
        self.status = TurnStatus::Loading;
        info!(backend = %self.backend.describe(), "Turn started");

        let context_snapshot = self.snapshot().to_json().unwrap_or_else(|e| {
            warn!(error = %e, "Could not serialize page context");
            "{}".to_string()
        });
        Ok(AssistantRequest {
            user_text: text.to_string(),
            context_snapshot,
        })
    }

    /// Decode the reply and pick the answer text. On failure the turn ends here.
    fn accept_reply(&mut self, result: Result<AssistantReply>) -> Option<(Vec<ToolCall>, String)> {
        match result {
            Ok(reply) => {
                let calls = decode_batch(&reply.tool_calls);
                info!(
                    tool_calls = calls.len(),
                    has_text = !reply.text.trim().is_empty(),
                    "Assistant replied"
                );
                let answer = answer_text(&reply.text, !calls.is_empty());
                Some((calls, answer))
            }
            Err(e) => {
                self.fail_turn(&e);
                None
            }
        }
    }

    fn complete_turn(&mut self, answer: String) {
        self.push_message(ChatRole::Assistant, answer);
        self.status = TurnStatus::Success;
    }

    fn fail_turn(&mut self, err: &anyhow::Error) {
        error!(error = %err, "Assistant request failed");
        self.status = TurnStatus::Error;
        self.push_message(ChatRole::Assistant, APOLOGY_REPLY.to_string());
    }

    fn push_message(&mut self, role: ChatRole, content: String) {
        let timestamp = chrono::Utc::now().timestamp_millis();
        // Millisecond timestamps collide within a turn; keep ids strictly increasing
        let id = timestamp.max(self.last_message_id + 1);
        self.last_message_id = id;
        self.transcript.push(ChatMessage {
            id: id.to_string(),
            role,
            content,
            timestamp,
        });
    }
}

fn answer_text(text: &str, acted: bool) -> String {
    let text = text.trim();
    if !text.is_empty() {
        text.to_string()
    } else if acted {
        COMPLETION_REPLY.to_string()
    } else {
        NO_ANSWER_REPLY.to_string()
    }
}
