//! Applies a batch of tool calls to the UI state, in order.
//!
//! View-changing calls suspend the rest of the batch for a settle delay so
//! that later calls see the newly mounted view. `BatchRun` is the stepping
//! core: it applies calls until one needs to settle and reports when to
//! resume. `ToolExecutor::execute` drives a run to completion with tokio
//! timers; an event loop can instead call `BatchRun::advance` on each wakeup.

use std::collections::VecDeque;
use std::time::Duration;

use tokio::time::{sleep_until, Instant};
use tracing::debug;

use crate::document::{Document, ElementAction};
use crate::highlight::HIGHLIGHT_DURATION;
use crate::state::{Tab, UiState};
use crate::tools::{order_batch, ToolCall};

/// Pause after a view switch before the next call runs
pub const SETTLE_DELAY: Duration = Duration::from_millis(500);

/// Whether a call needs the batch to wait before continuing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Done,
    Settle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Suspended { until: Instant },
    Finished,
}

#[derive(Debug, Clone, Copy)]
pub struct ToolExecutor {
    settle_delay: Duration,
    highlight_duration: Duration,
}

impl Default for ToolExecutor {
    fn default() -> Self {
        Self {
            settle_delay: SETTLE_DELAY,
            highlight_duration: HIGHLIGHT_DURATION,
        }
    }
}

impl ToolExecutor {
    /// Apply one call. Selector misses are no-ops.
    pub fn apply(&self, call: &ToolCall, ui: &mut UiState, now: Instant) -> Effect {
        debug!(tool = call.name().as_str(), ?call, "Applying tool call");
        match call {
            ToolCall::Navigate { section_id } => {
                ui.navigate(section_id);
                Effect::Settle
            }
            ToolCall::ScrollToElement { selector } => {
                if let Some(id) = resolve_id(ui, selector) {
                    ui.request_scroll(&id);
                }
                Effect::Done
            }
            ToolCall::HighlightElement { selector } => {
                if let Some(id) = resolve_id(ui, selector) {
                    ui.highlights_mut().emphasize(&id, now + self.highlight_duration);
                }
                Effect::Done
            }
            ToolCall::FillForm { field, value } => {
                let switched = ui.current_tab() != Some(Tab::Contact);
                if switched {
                    ui.navigate(Tab::Contact.id());
                }
                ui.set_form_field(field, value.as_str());
                if switched {
                    Effect::Settle
                } else {
                    Effect::Done
                }
            }
            ToolCall::ClickElement { selector } => {
                let action = Document::mount(ui)
                    .resolve(selector)
                    .and_then(|el| el.action);
                if let Some(action) = action {
                    activate(ui, action);
                }
                Effect::Done
            }
        }
    }

    /// Order `calls` and wrap them in a run
    pub fn start(&self, calls: Vec<ToolCall>) -> BatchRun {
        BatchRun {
            executor: *self,
            queue: order_batch(calls).into(),
            resume_at: None,
        }
    }

    /// Apply a whole batch, sleeping through each settle delay
    pub async fn execute(&self, calls: Vec<ToolCall>, ui: &mut UiState) {
        let mut run = self.start(calls);
        while let Step::Suspended { until } = run.advance(ui, Instant::now()) {
            sleep_until(until).await;
        }
    }
}

fn resolve_id(ui: &UiState, selector: &str) -> Option<String> {
    Document::mount(ui)
        .resolve(selector)
        .and_then(|el| el.id.clone())
}

/// Perform an element's primary action
pub fn activate(ui: &mut UiState, action: ElementAction) {
    match action {
        ElementAction::ScrollTo(target) => ui.request_scroll(target),
        ElementAction::Navigate(tab) => ui.navigate(tab.id()),
        ElementAction::SubmitForm => ui.submit_form(),
        ElementAction::ResetForm => ui.reset_form(),
    }
}

/// A batch in progress
#[derive(Debug)]
pub struct BatchRun {
    executor: ToolExecutor,
    queue: VecDeque<ToolCall>,
    resume_at: Option<Instant>,
}

impl BatchRun {
    /// Apply calls until the batch finishes or has to wait for a view to settle
    pub fn advance(&mut self, ui: &mut UiState, now: Instant) -> Step {
        loop {
            if let Some(until) = self.resume_at {
                if now < until {
                    return Step::Suspended { until };
                }
                self.resume_at = None;
            }
            let Some(call) = self.queue.pop_front() else {
                return Step::Finished;
            };
            if self.executor.apply(&call, ui, now) == Effect::Settle {
                self.resume_at = Some(now + self.executor.settle_delay);
            }
        }
    }

    pub fn resume_at(&self) -> Option<Instant> {
        self.resume_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::FormState;

    fn nav(id: &str) -> ToolCall {
        ToolCall::Navigate {
            section_id: id.to_string(),
        }
    }

    fn highlight(sel: &str) -> ToolCall {
        ToolCall::HighlightElement {
            selector: sel.to_string(),
        }
    }

    #[test]
    fn test_navigation_runs_before_dependent_highlight() {
        // The card only exists on the education view, so the highlight can
        // only land if the navigate call was moved ahead of it.
        let executor = ToolExecutor::default();
        let mut ui = UiState::default();
        let start = Instant::now();
        let mut run = executor.start(vec![highlight("#edu-10th"), nav("education")]);

        assert_eq!(
            run.advance(&mut ui, start),
            Step::Suspended {
                until: start + SETTLE_DELAY
            }
        );
        assert_eq!(ui.active_tab(), "education");
        assert!(!ui.highlights().is_emphasized("edu-10th", start));

        assert_eq!(run.advance(&mut ui, start + SETTLE_DELAY), Step::Finished);
        assert!(ui.highlights().is_emphasized("edu-10th", start + SETTLE_DELAY));
    }

    #[test]
    fn test_advance_waits_out_settle_delay() {
        let executor = ToolExecutor::default();
        let mut ui = UiState::default();
        let start = Instant::now();
        let mut run = executor.start(vec![nav("contact"), highlight("#submit-btn")]);

        run.advance(&mut ui, start);
        let early = start + Duration::from_millis(499);
        assert!(matches!(run.advance(&mut ui, early), Step::Suspended { .. }));
        assert!(ui.highlights().is_empty());
        assert_eq!(run.advance(&mut ui, start + SETTLE_DELAY), Step::Finished);
        assert!(ui.highlights().is_emphasized("submit-btn", start + SETTLE_DELAY));
    }

    #[test]
    fn test_consecutive_navigations_each_settle() {
        let executor = ToolExecutor::default();
        let mut ui = UiState::default();
        let start = Instant::now();
        let mut run = executor.start(vec![nav("education"), nav("contact")]);

        run.advance(&mut ui, start);
        assert_eq!(ui.active_tab(), "education");
        let second = start + SETTLE_DELAY;
        assert_eq!(
            run.advance(&mut ui, second),
            Step::Suspended {
                until: second + SETTLE_DELAY
            }
        );
        assert_eq!(ui.active_tab(), "contact");
        assert_eq!(run.advance(&mut ui, second + SETTLE_DELAY), Step::Finished);
    }

    #[test]
    fn test_fill_form_switches_to_contact_and_settles() {
        let executor = ToolExecutor::default();
        let mut ui = UiState::default();
        let call = ToolCall::FillForm {
            field: "email".into(),
            value: "a@b.com".into(),
        };
        assert_eq!(executor.apply(&call, &mut ui, Instant::now()), Effect::Settle);
        assert_eq!(ui.active_tab(), "contact");
        assert_eq!(ui.form().email, "a@b.com");

        // Already on contact: no second settle
        let call = ToolCall::FillForm {
            field: "name".into(),
            value: "Sam".into(),
        };
        assert_eq!(executor.apply(&call, &mut ui, Instant::now()), Effect::Done);
        assert_eq!(ui.form().name, "Sam");
    }

    #[test]
    fn test_fill_form_keeps_unknown_field() {
        let executor = ToolExecutor::default();
        let mut ui = UiState::default();
        let call = ToolCall::FillForm {
            field: "company".into(),
            value: "Acme".into(),
        };
        executor.apply(&call, &mut ui, Instant::now());
        assert_eq!(ui.form().get("company"), Some("Acme"));
    }

    #[test]
    fn test_highlight_does_not_survive_remount() {
        let executor = ToolExecutor::default();
        let mut ui = UiState::default();
        let start = Instant::now();
        let mut run = executor.start(vec![highlight("#proj-rn-1")]);
        assert_eq!(run.advance(&mut ui, start), Step::Finished);
        assert!(ui.highlights().is_emphasized("proj-rn-1", start));

        let later = start + Duration::from_secs(1);
        let mut run = executor.start(vec![nav("education"), nav("dashboard")]);
        run.advance(&mut ui, later);
        assert_eq!(
            run.advance(&mut ui, later + SETTLE_DELAY),
            Step::Suspended {
                until: later + SETTLE_DELAY * 2
            }
        );
        assert_eq!(ui.active_tab(), "dashboard");
        assert!(!ui.highlights().is_emphasized("proj-rn-1", later + SETTLE_DELAY));
        assert_eq!(ui.highlights().next_deadline(), None);
    }

    #[test]
    fn test_selector_misses_change_nothing() {
        let executor = ToolExecutor::default();
        let mut ui = UiState::default();
        let now = Instant::now();
        let calls = [
            ToolCall::ScrollToElement {
                selector: "#edu-be".into(),
            },
            highlight("#missing"),
            ToolCall::ClickElement {
                selector: "#submit-btn".into(),
            },
            highlight("proj-rn-1"),
        ];
        for call in &calls {
            assert_eq!(executor.apply(call, &mut ui, now), Effect::Done);
        }
        assert_eq!(ui.active_tab(), "dashboard");
        assert_eq!(ui.scroll_request(), None);
        assert!(ui.highlights().is_empty());
        assert!(!ui.is_form_submitted());
        assert_eq!(ui.form(), &FormState::default());
    }

    #[test]
    fn test_click_invokes_element_action() {
        let executor = ToolExecutor::default();
        let mut ui = UiState::default();
        let now = Instant::now();

        let view_projects = ToolCall::ClickElement {
            selector: "#hero-view-projects".into(),
        };
        executor.apply(&view_projects, &mut ui, now);
        assert_eq!(ui.scroll_request(), Some("projects-section"));

        ui.navigate("contact");
        let submit = ToolCall::ClickElement {
            selector: "#submit-btn".into(),
        };
        executor.apply(&submit, &mut ui, now);
        assert!(ui.is_form_submitted());

        // Cards have no primary action
        ui.navigate("education");
        let card = ToolCall::ClickElement {
            selector: "#edu-be".into(),
        };
        executor.apply(&card, &mut ui, now);
        assert_eq!(ui.active_tab(), "education");
    }

    #[test]
    fn test_scroll_targets_resolved_element() {
        let executor = ToolExecutor::default();
        let mut ui = UiState::default();
        let call = ToolCall::ScrollToElement {
            selector: "[id=\"proj-mern-2\"]".into(),
        };
        executor.apply(&call, &mut ui, Instant::now());
        assert_eq!(ui.scroll_request(), Some("proj-mern-2"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_execute_fill_form_from_dashboard() {
        let executor = ToolExecutor::default();
        let mut ui = UiState::default();
        let start = Instant::now();
        executor
            .execute(
                vec![ToolCall::FillForm {
                    field: "email".into(),
                    value: "a@b.com".into(),
                }],
                &mut ui,
            )
            .await;
        assert_eq!(ui.active_tab(), "contact");
        assert_eq!(ui.form().email, "a@b.com");
        assert!(Instant::now() >= start + SETTLE_DELAY);
    }

    #[tokio::test(start_paused = true)]
    async fn test_execute_highlight_reverts_after_duration() {
        let executor = ToolExecutor::default();
        let mut ui = UiState::default();
        executor
            .execute(vec![nav("dashboard"), highlight("#proj-rn-1")], &mut ui)
            .await;
        let highlighted_at = Instant::now();
        assert!(ui.highlights().is_emphasized("proj-rn-1", highlighted_at));

        tokio::time::sleep(HIGHLIGHT_DURATION).await;
        let now = Instant::now();
        assert!(!ui.highlights().is_emphasized("proj-rn-1", now));
        assert_eq!(ui.highlights_mut().expire(now), vec!["proj-rn-1".to_string()]);
        assert!(ui.highlights_mut().expire(now).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_execute_empty_batch_returns_immediately() {
        let executor = ToolExecutor::default();
        let mut ui = UiState::default();
        let start = Instant::now();
        executor.execute(Vec::new(), &mut ui).await;
        assert_eq!(Instant::now(), start);
    }
}
