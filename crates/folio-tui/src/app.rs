use std::collections::HashMap;

use folio_core::ai::{build_backend, default_model, GeminiClient, OllamaClient};
use folio_core::portfolio::SUGGESTED_QUESTIONS;
use folio_core::{ChatMessage, Config, Document, Element, Provider, Tab, TurnController};
use ratatui::layout::Rect;
use ratatui::widgets::ListState;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
    FormEditing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusPane {
    Content,
    Chat,
}

/// Contact form fields in tab order: (field, element id, placeholder)
pub const FORM_FIELDS: [(&str, &str, &str); 3] = [
    ("name", "form-name", "Full Name"),
    ("email", "form-email", "Email Address"),
    ("message", "form-message", "Your Message"),
];

pub struct App {
    pub should_quit: bool,
    pub input_mode: InputMode,
    pub focus: FocusPane,
    pub controller: TurnController,

    // Content pane
    pub content_scroll: u16,
    pub content_height: u16,
    pub total_content_lines: u16,
    /// First rendered line of each element id, refreshed on every draw
    pub anchors: HashMap<String, u16>,
    pub rendered_tab: Option<Tab>,
    pub selected_control: Option<usize>,

    // Contact form editing
    pub form_field_idx: usize,
    pub form_cursor: usize,

    // Chat panel
    pub show_chat: bool,
    pub chat_input: String,
    pub chat_cursor: usize, // cursor position in chat_input, in chars
    pub chat_scroll: u16,
    pub chat_height: u16,
    pub chat_width: u16,
    pub suggestion_idx: Option<usize>,
    pub status_message: Option<String>,
    pub animation_frame: u8, // 0-2 for ellipsis animation
    seen_messages: usize,

    // Model picker state
    pub show_model_picker: bool,
    pub available_models: Vec<String>,
    pub model_picker_state: ListState,

    // Provider state
    pub current_provider: Provider,
    pub selected_model: String,
    pub config: Config,

    // Panel areas for mouse hit-testing (updated during render)
    pub content_area: Option<Rect>,
    pub chat_area: Option<Rect>,
}

impl App {
    pub fn new(config: Config) -> Self {
        let current_provider = config.provider();
        let selected_model = config
            .default_model
            .clone()
            .unwrap_or_else(|| default_model(current_provider));
        let backend = build_backend(current_provider, &selected_model, &config);
        info!(backend = %backend.describe(), "Assistant backend ready");

        Self {
            should_quit: false,
            input_mode: InputMode::Normal,
            focus: FocusPane::Content,
            controller: TurnController::new(backend),

            content_scroll: 0,
            content_height: 0,
            total_content_lines: 0,
            anchors: HashMap::new(),
            rendered_tab: None,
            selected_control: None,

            form_field_idx: 0,
            form_cursor: 0,

            show_chat: true,
            chat_input: String::new(),
            chat_cursor: 0,
            chat_scroll: 0,
            chat_height: 0,
            chat_width: 0,
            suggestion_idx: None,
            status_message: None,
            animation_frame: 0,
            seen_messages: 0,

            show_model_picker: false,
            available_models: Vec::new(),
            model_picker_state: ListState::default(),

            current_provider,
            selected_model,
            config,

            content_area: None,
            chat_area: None,
        }
    }

    pub fn active_tab(&self) -> Option<Tab> {
        self.controller.ui().current_tab()
    }

    // Content pane

    pub fn select_tab(&mut self, tab: Tab) {
        self.controller.select_tab(tab);
        if self.input_mode == InputMode::FormEditing && tab != Tab::Contact {
            self.input_mode = InputMode::Normal;
        }
    }

    /// Reset per-view state when the mounted view changed since the last draw
    pub fn sync_view(&mut self) {
        let tab = self.active_tab();
        if tab != self.rendered_tab {
            self.rendered_tab = tab;
            self.content_scroll = 0;
            self.selected_control = None;
            self.anchors.clear();
        }
    }

    fn max_content_scroll(&self) -> u16 {
        self.total_content_lines.saturating_sub(self.content_height)
    }

    pub fn scroll_down(&mut self) {
        self.content_scroll = (self.content_scroll + 1).min(self.max_content_scroll());
    }

    pub fn scroll_up(&mut self) {
        self.content_scroll = self.content_scroll.saturating_sub(1);
    }

    pub fn scroll_half_page_down(&mut self) {
        let half = (self.content_height / 2).max(1);
        self.content_scroll = (self.content_scroll + half).min(self.max_content_scroll());
    }

    pub fn scroll_half_page_up(&mut self) {
        let half = (self.content_height / 2).max(1);
        self.content_scroll = self.content_scroll.saturating_sub(half);
    }

    pub fn scroll_to_top(&mut self) {
        self.content_scroll = 0;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.content_scroll = self.max_content_scroll();
    }

    /// Center a pending scroll target once its anchor is known
    pub fn apply_scroll_request(&mut self) {
        let Some(target) = self.controller.ui().scroll_request().map(str::to_string) else {
            return;
        };
        if let Some(&line) = self.anchors.get(&target) {
            let centered = line.saturating_sub(self.content_height / 2);
            self.content_scroll = centered.min(self.max_content_scroll());
            self.controller.take_scroll_request();
        }
    }

    /// Mounted elements that do something when activated, in document order
    pub fn controls(&self) -> Vec<Element> {
        Document::mount(self.controller.ui())
            .elements()
            .iter()
            .filter(|el| el.action.is_some())
            .cloned()
            .collect()
    }

    pub fn next_control(&mut self) {
        let len = self.controls().len();
        if len > 0 {
            let next = self.selected_control.map_or(0, |i| (i + 1) % len);
            self.selected_control = Some(next);
        }
    }

    pub fn prev_control(&mut self) {
        let len = self.controls().len();
        if len > 0 {
            let prev = self.selected_control.map_or(len - 1, |i| (i + len - 1) % len);
            self.selected_control = Some(prev);
        }
    }

    pub fn activate_selected_control(&mut self) {
        let action = self
            .selected_control
            .and_then(|i| self.controls().get(i).and_then(|el| el.action));
        if let Some(action) = action {
            self.controller.perform(action);
            self.selected_control = None;
        }
    }

    // Contact form

    fn form_is_open(&self) -> bool {
        self.active_tab() == Some(Tab::Contact) && !self.controller.ui().is_form_submitted()
    }

    fn current_form_value(&self) -> String {
        let (field, _, _) = FORM_FIELDS[self.form_field_idx];
        self.controller
            .ui()
            .form()
            .get(field)
            .unwrap_or_default()
            .to_string()
    }

    /// Start editing the next form field, opening the contact tab if needed
    pub fn edit_next_form_field(&mut self) {
        if self.active_tab() != Some(Tab::Contact) {
            self.select_tab(Tab::Contact);
            self.form_field_idx = 0;
        } else if self.input_mode == InputMode::FormEditing {
            self.form_field_idx = (self.form_field_idx + 1) % FORM_FIELDS.len();
        }
        if !self.form_is_open() {
            self.status_message = Some("Press n to start a new form".to_string());
            return;
        }
        self.input_mode = InputMode::FormEditing;
        self.focus = FocusPane::Content;
        self.form_cursor = self.current_form_value().chars().count();
    }

    pub fn form_insert(&mut self, c: char) {
        let mut value = self.current_form_value();
        let byte_pos = char_to_byte_index(&value, self.form_cursor);
        value.insert(byte_pos, c);
        self.form_cursor += 1;
        self.controller.edit_form_field(FORM_FIELDS[self.form_field_idx].0, value);
    }

    pub fn form_backspace(&mut self) {
        if self.form_cursor > 0 {
            let mut value = self.current_form_value();
            self.form_cursor -= 1;
            let byte_pos = char_to_byte_index(&value, self.form_cursor);
            value.remove(byte_pos);
            self.controller.edit_form_field(FORM_FIELDS[self.form_field_idx].0, value);
        }
    }

    pub fn form_cursor_left(&mut self) {
        self.form_cursor = self.form_cursor.saturating_sub(1);
    }

    pub fn form_cursor_right(&mut self) {
        let char_count = self.current_form_value().chars().count();
        self.form_cursor = (self.form_cursor + 1).min(char_count);
    }

    pub fn submit_form(&mut self) {
        if self.form_is_open() {
            self.controller.submit_form();
            self.input_mode = InputMode::Normal;
        }
    }

    pub fn start_new_form(&mut self) {
        if self.active_tab() == Some(Tab::Contact) && self.controller.ui().is_form_submitted() {
            self.controller.start_new_form();
        }
    }

    // Chat panel

    pub fn toggle_chat(&mut self) {
        self.show_chat = !self.show_chat;
        if !self.show_chat {
            self.focus = FocusPane::Content;
            if self.input_mode == InputMode::Editing {
                self.input_mode = InputMode::Normal;
            }
        }
    }

    pub fn start_chat_input(&mut self) {
        self.show_chat = true;
        self.focus = FocusPane::Chat;
        self.input_mode = InputMode::Editing;
    }

    /// Fill an empty input with the next suggested question
    pub fn cycle_suggestion(&mut self) {
        let showing_suggestion = self
            .suggestion_idx
            .is_some_and(|i| SUGGESTED_QUESTIONS.get(i) == Some(&self.chat_input.as_str()));
        if !self.chat_input.is_empty() && !showing_suggestion {
            return;
        }
        let next = self
            .suggestion_idx
            .filter(|_| showing_suggestion)
            .map_or(0, |i| (i + 1) % SUGGESTED_QUESTIONS.len());
        self.suggestion_idx = Some(next);
        self.chat_input = SUGGESTED_QUESTIONS[next].to_string();
        self.chat_cursor = self.chat_input.chars().count();
    }

    pub fn chat_insert(&mut self, c: char) {
        let byte_pos = char_to_byte_index(&self.chat_input, self.chat_cursor);
        self.chat_input.insert(byte_pos, c);
        self.chat_cursor += 1;
    }

    pub fn chat_backspace(&mut self) {
        if self.chat_cursor > 0 {
            self.chat_cursor -= 1;
            let byte_pos = char_to_byte_index(&self.chat_input, self.chat_cursor);
            self.chat_input.remove(byte_pos);
        }
    }

    pub fn chat_delete(&mut self) {
        let char_count = self.chat_input.chars().count();
        if self.chat_cursor < char_count {
            let byte_pos = char_to_byte_index(&self.chat_input, self.chat_cursor);
            self.chat_input.remove(byte_pos);
        }
    }

    pub fn send_chat(&mut self) {
        match self.controller.submit(&self.chat_input) {
            Ok(()) => {
                self.chat_input.clear();
                self.chat_cursor = 0;
                self.suggestion_idx = None;
                self.status_message = None;
                self.scroll_chat_to_bottom();
            }
            Err(e) => self.status_message = Some(e.to_string()),
        }
    }

    pub fn tick_animation(&mut self) {
        if self.controller.is_busy() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    /// Keep the newest message in view when the transcript grows
    pub fn follow_transcript(&mut self) {
        let count = self.controller.transcript().len();
        if count != self.seen_messages {
            self.seen_messages = count;
            self.scroll_chat_to_bottom();
        }
    }

    pub fn scroll_chat_to_bottom(&mut self) {
        // Use actual chat width for wrap calculation, default to 40 if not set
        let wrap_width = if self.chat_width > 0 {
            self.chat_width as usize
        } else {
            40
        };

        let total_lines = chat_line_count(
            self.controller.transcript(),
            self.controller.is_busy(),
            wrap_width,
        );

        let visible_height = if self.chat_height > 0 {
            self.chat_height
        } else {
            20
        };
        self.chat_scroll = total_lines.saturating_sub(visible_height);
    }

    // Provider and model selection

    pub async fn open_model_picker(&mut self) {
        let models = match self.current_provider {
            Provider::Gemini => GeminiClient::list_models(),
            Provider::Ollama => {
                let client = OllamaClient::new(self.config.ollama_url(), &self.selected_model);
                match client.list_models().await {
                    Ok(models) if !models.is_empty() => models,
                    Ok(_) => vec![self.selected_model.clone()],
                    Err(e) => {
                        warn!(error = %e, "Could not list Ollama models");
                        self.status_message = Some("Ollama is not reachable".to_string());
                        vec![self.selected_model.clone()]
                    }
                }
            }
        };

        let current_idx = models
            .iter()
            .position(|m| m == &self.selected_model)
            .unwrap_or(0);
        self.available_models = models;
        self.model_picker_state.select(Some(current_idx));
        self.show_model_picker = true;
    }

    pub fn model_picker_nav_down(&mut self) {
        let len = self.available_models.len();
        if len > 0 {
            let i = self.model_picker_state.selected().unwrap_or(0);
            self.model_picker_state.select(Some((i + 1).min(len - 1)));
        }
    }

    pub fn model_picker_nav_up(&mut self) {
        let i = self.model_picker_state.selected().unwrap_or(0);
        self.model_picker_state.select(Some(i.saturating_sub(1)));
    }

    pub fn select_model(&mut self) {
        let model = self
            .model_picker_state
            .selected()
            .and_then(|i| self.available_models.get(i))
            .cloned();
        if let Some(model) = model {
            self.selected_model = model;
            self.show_model_picker = false;
            self.rebuild_backend();
            if let Err(e) = Config::save_default_model(&self.selected_model) {
                warn!(error = %e, "Could not save default model");
            }
        }
    }

    pub fn cycle_provider(&mut self) {
        self.current_provider = self.current_provider.next();
        self.selected_model = default_model(self.current_provider);
        self.rebuild_backend();
        if let Err(e) = Config::save_provider(self.current_provider) {
            warn!(error = %e, "Could not save provider");
        }
    }

    fn rebuild_backend(&mut self) {
        let backend = build_backend(self.current_provider, &self.selected_model, &self.config);
        self.controller.set_backend(backend);
    }
}

/// Convert a character index to a byte index for UTF-8 safe string operations
pub fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// Wrapped line count of the chat panel, saturating at `u16::MAX`
fn chat_line_count(transcript: &[ChatMessage], busy: bool, wrap_width: usize) -> u16 {
    let wrap_width = wrap_width.max(1);
    let mut total_lines: u16 = 0;
    for msg in transcript {
        total_lines = total_lines.saturating_add(1); // Role line ("You:" or "Assistant:")
        for line in msg.content.lines() {
            let wrapped = line.chars().count() / wrap_width + 1;
            total_lines = total_lines.saturating_add(u16::try_from(wrapped).unwrap_or(u16::MAX));
        }
        total_lines = total_lines.saturating_add(1); // Blank line after message
    }
    if busy {
        total_lines = total_lines.saturating_add(2); // "Assistant:" + "Thinking..."
    }
    total_lines
}
