//! The addressable elements mounted for the current view.
//!
//! A `Document` is derived from `UiState` on demand, the way a browser's DOM
//! follows the rendered component tree. Tool calls resolve selectors against
//! it, and the context snapshot lists its interactive elements.

use serde::Serialize;

use crate::portfolio::{EDUCATION, PROJECTS};
use crate::selector::Selector;
use crate::state::{Tab, UiState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Section,
    Card,
    Button,
    Link,
    Input,
    TextArea,
}

/// What activating an element does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementAction {
    ScrollTo(&'static str),
    Navigate(Tab),
    SubmitForm,
    ResetForm,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub id: Option<String>,
    pub kind: ElementKind,
    pub label: String,
    pub action: Option<ElementAction>,
}

impl Element {
    fn new(id: Option<&str>, kind: ElementKind, label: &str) -> Self {
        Self {
            id: id.map(str::to_string),
            kind,
            label: label.to_string(),
            action: None,
        }
    }

    fn with_action(mut self, action: ElementAction) -> Self {
        self.action = Some(action);
        self
    }

    /// Controls plus the portfolio cards the assistant may point at
    fn is_interactive(&self) -> bool {
        let addressable = self
            .id
            .as_deref()
            .is_some_and(|id| id.starts_with("proj-") || id.starts_with("edu-"));
        matches!(
            self.kind,
            ElementKind::Button | ElementKind::Link | ElementKind::Input
        ) || addressable
    }
}

/// `{id, text}` entry of the interactive-element inventory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InteractiveElement {
    pub id: String,
    #[serde(rename = "text")]
    pub display_text: String,
}

#[derive(Debug, Clone, Default)]
pub struct Document {
    elements: Vec<Element>,
}

impl Document {
    /// Build the element tree for what `ui` currently shows
    pub fn mount(ui: &UiState) -> Self {
        let elements = match ui.current_tab() {
            Some(Tab::Dashboard) => dashboard_elements(),
            Some(Tab::Education) => EDUCATION
                .iter()
                .map(|edu| Element::new(Some(edu.id), ElementKind::Card, edu.degree))
                .collect(),
            Some(Tab::Contact) => contact_elements(ui.is_form_submitted()),
            None => Vec::new(),
        };
        Self { elements }
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn get(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|el| el.id.as_deref() == Some(id))
    }

    /// First element matching `selector`, if the selector is understood at all
    pub fn resolve(&self, selector: &str) -> Option<&Element> {
        let selector = Selector::parse(selector)?;
        self.get(selector.id())
    }

    /// Interactive elements that carry an id; unidentified ones are skipped
    pub fn interactive_elements(&self) -> impl Iterator<Item = InteractiveElement> + '_ {
        self.elements
            .iter()
            .filter(|el| el.is_interactive())
            .filter_map(|el| {
                let id = el.id.as_deref().filter(|id| !id.is_empty())?;
                let display_text = if el.label.is_empty() {
                    id.to_string()
                } else {
                    el.label.clone()
                };
                Some(InteractiveElement {
                    id: id.to_string(),
                    display_text,
                })
            })
    }
}

fn dashboard_elements() -> Vec<Element> {
    let mut elements = vec![
        Element::new(Some("hero"), ElementKind::Section, "Expert Full-Stack Solutions."),
        Element::new(Some("hero-view-projects"), ElementKind::Button, "View Projects")
            .with_action(ElementAction::ScrollTo("projects-section")),
        Element::new(None, ElementKind::Button, "Education Info")
            .with_action(ElementAction::Navigate(Tab::Education)),
        Element::new(Some("projects-section"), ElementKind::Section, "Project Portfolio"),
    ];
    elements.extend(
        PROJECTS
            .iter()
            .map(|proj| Element::new(Some(proj.id), ElementKind::Card, proj.title)),
    );
    elements
}

fn contact_elements(submitted: bool) -> Vec<Element> {
    if submitted {
        return vec![
            Element::new(None, ElementKind::Button, "New Form").with_action(ElementAction::ResetForm),
        ];
    }
    vec![
        Element::new(Some("form-name"), ElementKind::Input, ""),
        Element::new(Some("form-email"), ElementKind::Input, ""),
        Element::new(Some("form-message"), ElementKind::TextArea, ""),
        Element::new(Some("submit-btn"), ElementKind::Button, "Send Inquiry")
            .with_action(ElementAction::SubmitForm),
    ]
}
