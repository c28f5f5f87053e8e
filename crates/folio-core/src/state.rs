//! UI-agnostic application state types
//!
//! This module contains the data structures shared by every front-end: the
//! chat transcript entries, the turn status, and the mutable view state the
//! assistant's tool calls act on. None of it depends on a UI framework.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::highlight::Highlights;

/// A chat message in the assistant conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub role: ChatRole,
    pub content: String,
    /// Epoch milliseconds
    pub timestamp: i64,
}

/// The role of a chat message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// Progress of the most recent turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

/// The views the portfolio can show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tab {
    Dashboard,
    Education,
    Contact,
}

impl Tab {
    pub fn id(&self) -> &'static str {
        match self {
            Tab::Dashboard => "dashboard",
            Tab::Education => "education",
            Tab::Contact => "contact",
        }
    }

    pub fn from_id(s: &str) -> Option<Self> {
        match s {
            "dashboard" => Some(Tab::Dashboard),
            "education" => Some(Tab::Education),
            "contact" => Some(Tab::Contact),
            _ => None,
        }
    }

    pub fn all() -> Vec<Tab> {
        vec![Tab::Dashboard, Tab::Education, Tab::Contact]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Tab::Dashboard => "Dashboard",
            Tab::Education => "Education History",
            Tab::Contact => "Contact Me",
        }
    }
}

/// Contact form values.
///
/// Field names outside `name`/`email`/`message` are kept in `extra` rather
/// than rejected, and serialize alongside the known fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormState {
    pub name: String,
    pub email: String,
    pub message: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl FormState {
    pub fn set(&mut self, field: &str, value: impl Into<String>) {
        let value = value.into();
        match field {
            "name" => self.name = value,
            "email" => self.email = value,
            "message" => self.message = value,
            other => {
                self.extra.insert(other.to_string(), value);
            }
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        match field {
            "name" => Some(&self.name),
            "email" => Some(&self.email),
            "message" => Some(&self.message),
            other => self.extra.get(other).map(String::as_str),
        }
    }
}

/// Mutable view state: which view is mounted, the contact form, pending
/// scroll request, and active highlights.
#[derive(Debug, Clone)]
pub struct UiState {
    active_tab: String,
    form: FormState,
    form_submitted: bool,
    scroll_request: Option<String>,
    highlights: Highlights,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            active_tab: Tab::Dashboard.id().to_string(),
            form: FormState::default(),
            form_submitted: false,
            scroll_request: None,
            highlights: Highlights::default(),
        }
    }
}

impl UiState {
    /// Raw id of the active view; may name no known tab
    pub fn active_tab(&self) -> &str {
        &self.active_tab
    }

    pub fn current_tab(&self) -> Option<Tab> {
        Tab::from_id(&self.active_tab)
    }

    /// Switch views. Unknown ids are accepted and mount nothing.
    ///
    /// The old view unmounts, so its pending scroll and highlights go with it.
    pub fn navigate(&mut self, section_id: &str) {
        if self.active_tab != section_id {
            self.active_tab = section_id.to_string();
            self.scroll_request = None;
            self.highlights.clear();
        }
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn set_form_field(&mut self, field: &str, value: impl Into<String>) {
        self.form.set(field, value);
    }

    pub fn is_form_submitted(&self) -> bool {
        self.form_submitted
    }

    pub fn submit_form(&mut self) {
        self.form_submitted = true;
    }

    /// "New Form": clears the submitted flag, keeps the values
    pub fn reset_form(&mut self) {
        self.form_submitted = false;
    }

    pub fn request_scroll(&mut self, element_id: &str) {
        self.scroll_request = Some(element_id.to_string());
    }

    pub fn scroll_request(&self) -> Option<&str> {
        self.scroll_request.as_deref()
    }

    pub fn take_scroll_request(&mut self) -> Option<String> {
        self.scroll_request.take()
    }

    pub fn highlights(&self) -> &Highlights {
        &self.highlights
    }

    pub fn highlights_mut(&mut self) -> &mut Highlights {
        &mut self.highlights
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_view_is_dashboard() {
        let ui = UiState::default();
        assert_eq!(ui.active_tab(), "dashboard");
        assert_eq!(ui.current_tab(), Some(Tab::Dashboard));
    }

    #[test]
    fn test_navigate_accepts_unknown_section() {
        let mut ui = UiState::default();
        ui.navigate("blog");
        assert_eq!(ui.active_tab(), "blog");
        assert_eq!(ui.current_tab(), None);
    }

    #[test]
    fn test_navigate_drops_pending_scroll() {
        let mut ui = UiState::default();
        ui.request_scroll("projects-section");
        ui.navigate("education");
        assert_eq!(ui.scroll_request(), None);
    }

    #[test]
    fn test_navigate_to_same_view_keeps_highlights() {
        let mut ui = UiState::default();
        let now = tokio::time::Instant::now();
        ui.highlights_mut()
            .emphasize("proj-rn-1", now + crate::highlight::HIGHLIGHT_DURATION);
        ui.navigate("dashboard");
        assert!(ui.highlights().is_emphasized("proj-rn-1", now));
    }

    #[test]
    fn test_form_stores_unknown_field() {
        let mut form = FormState::default();
        form.set("email", "a@b.com");
        form.set("phone", "555-0100");
        assert_eq!(form.email, "a@b.com");
        assert_eq!(form.get("phone"), Some("555-0100"));

        let value = serde_json::to_value(&form).unwrap();
        assert_eq!(value["phone"], "555-0100");
        assert_eq!(value["name"], "");
    }

    #[test]
    fn test_reset_form_keeps_values() {
        let mut ui = UiState::default();
        ui.set_form_field("name", "Sam");
        ui.submit_form();
        assert!(ui.is_form_submitted());
        ui.reset_form();
        assert!(!ui.is_form_submitted());
        assert_eq!(ui.form().name, "Sam");
    }

    #[test]
    fn test_tab_ids_round_trip() {
        for tab in Tab::all() {
            assert_eq!(Tab::from_id(tab.id()), Some(tab));
        }
    }

    #[test]
    fn test_chat_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&ChatRole::Assistant).unwrap(), "\"assistant\"");
    }
}
