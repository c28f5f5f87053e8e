//! Point-in-time description of the UI sent to the assistant as grounding.

use serde::Serialize;

use crate::document::{Document, InteractiveElement};
use crate::portfolio::{Education, Project, EDUCATION, PROJECTS};
use crate::state::{FormState, UiState};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UiContextSnapshot {
    pub current_tab: String,
    pub projects_data: &'static [Project],
    pub education_data: &'static [Education],
    pub interactive_elements: Vec<InteractiveElement>,
    pub form_state: FormState,
    pub is_form_submitted: bool,
}

impl UiContextSnapshot {
    /// Capture `ui` as it is right now. Nothing is cached between calls.
    pub fn capture(ui: &UiState) -> Self {
        let document = Document::mount(ui);
        Self {
            current_tab: ui.active_tab().to_string(),
            projects_data: PROJECTS,
            education_data: EDUCATION,
            interactive_elements: document.interactive_elements().collect(),
            form_state: ui.form().clone(),
            is_form_submitted: ui.is_form_submitted(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_snapshot_key_set() {
        let json = UiContextSnapshot::capture(&UiState::default()).to_json().unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();
        let mut keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        assert_eq!(
            keys,
            vec![
                "currentTab",
                "educationData",
                "formState",
                "interactiveElements",
                "isFormSubmitted",
                "projectsData",
            ]
        );
        assert_eq!(value["currentTab"], "dashboard");
        assert_eq!(value["projectsData"].as_array().unwrap().len(), 6);
        assert_eq!(value["interactiveElements"][0]["id"], "hero-view-projects");
        assert_eq!(value["interactiveElements"][0]["text"], "View Projects");
    }

    #[test]
    fn test_snapshot_tracks_latest_state() {
        let mut ui = UiState::default();
        let before = UiContextSnapshot::capture(&ui);

        ui.navigate("contact");
        ui.set_form_field("name", "Sam");
        ui.set_form_field("budget", "5k");
        let after = UiContextSnapshot::capture(&ui);

        assert_eq!(before.current_tab, "dashboard");
        assert_eq!(after.current_tab, "contact");
        assert_eq!(after.form_state.name, "Sam");
        assert!(after
            .interactive_elements
            .iter()
            .any(|el| el.id == "submit-btn"));

        let value = serde_json::to_value(&after).unwrap();
        assert_eq!(value["formState"]["budget"], "5k");
        assert_eq!(value["isFormSubmitted"], false);
    }
}
