use std::collections::HashMap;

use folio_core::portfolio::{EDUCATION, OWNER_NAME, PROJECTS, SUGGESTED_QUESTIONS};
use folio_core::{ChatRole, Element, Tab, TurnStatus};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{
        Block, Borders, Clear, List, ListItem, Paragraph, Scrollbar, ScrollbarOrientation,
        ScrollbarState, Wrap,
    },
    Frame,
};
use tokio::time::Instant;

use crate::app::{App, FocusPane, InputMode, FORM_FIELDS};

/// Parse a line of text and convert **bold** markdown to styled spans
fn parse_markdown_line(text: &str) -> Line<'static> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut chars = text.chars().peekable();
    let mut current_text = String::new();

    while let Some(c) = chars.next() {
        if c == '*' && chars.peek() == Some(&'*') {
            chars.next();

            // Find closing **
            let mut bold_text = String::new();
            let mut found_close = false;
            while let Some(c) = chars.next() {
                if c == '*' && chars.peek() == Some(&'*') {
                    chars.next();
                    found_close = true;
                    break;
                }
                bold_text.push(c);
            }

            if found_close && !bold_text.is_empty() {
                if !current_text.is_empty() {
                    spans.push(Span::raw(std::mem::take(&mut current_text)));
                }
                spans.push(Span::styled(
                    bold_text,
                    Style::default().add_modifier(Modifier::BOLD),
                ));
            } else {
                // No closing **, treat as literal
                current_text.push_str("**");
                current_text.push_str(&bold_text);
            }
        } else {
            current_text.push(c);
        }
    }

    if !current_text.is_empty() {
        spans.push(Span::raw(current_text));
    }

    if spans.is_empty() {
        Line::default()
    } else {
        Line::from(spans)
    }
}

/// Greedy word wrap; words longer than `width` are split
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word = word.to_string();
        while word.chars().count() > width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let split = word.char_indices().nth(width).map_or(word.len(), |(i, _)| i);
            let rest = word.split_off(split);
            lines.push(word);
            word = rest;
        }
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Rendered content lines plus the line each element id starts on
#[derive(Default)]
struct Page {
    lines: Vec<Line<'static>>,
    anchors: HashMap<String, u16>,
    width: usize,
}

impl Page {
    fn new(width: usize) -> Self {
        Self {
            width,
            ..Self::default()
        }
    }

    fn anchor(&mut self, id: &str) {
        self.anchors.insert(id.to_string(), self.lines.len() as u16);
    }

    fn push(&mut self, line: impl Into<Line<'static>>) {
        self.lines.push(line.into());
    }

    fn blank(&mut self) {
        self.lines.push(Line::default());
    }

    fn heading(&mut self, text: &str) {
        self.push(Span::styled(
            text.to_string(),
            Style::default().fg(Color::White).bold().underlined(),
        ));
    }

    fn paragraph(&mut self, text: &str, style: Style) {
        for line in wrap_text(text, self.width) {
            self.push(Span::styled(line, style));
        }
    }

    /// A card with a left rule; emphasized cards get a bright rule and title
    fn card(&mut self, id: &str, emphasized: bool, title: &str, body: &[String]) {
        let (rule, rule_style, title_style) = if emphasized {
            (
                "┃ ",
                Style::default().fg(Color::Yellow).bold(),
                Style::default().fg(Color::Black).bg(Color::Yellow).bold(),
            )
        } else {
            (
                "│ ",
                Style::default().fg(Color::DarkGray),
                Style::default().fg(Color::White).bold(),
            )
        };
        let inner = self.width.saturating_sub(2);

        self.anchor(id);
        self.push(Line::from(vec![
            Span::styled(rule, rule_style),
            Span::styled(title.to_string(), title_style),
        ]));

        for text in body {
            for line in wrap_text(text, inner) {
                self.push(Line::from(vec![
                    Span::styled(rule, rule_style),
                    Span::styled(line, Style::default().fg(Color::Gray)),
                ]));
            }
        }
        self.blank();
    }
}

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, body, footer
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);

    if app.show_chat {
        let [content_area, chat_area] = Layout::horizontal([
            Constraint::Percentage(60),
            Constraint::Percentage(40),
        ])
        .areas(body_area);
        render_content(app, frame, content_area);
        render_chat(app, frame, chat_area);
    } else {
        app.chat_area = None;
        render_content(app, frame, body_area);
    }

    render_footer(app, frame, footer_area);

    if app.show_model_picker {
        render_model_picker(app, frame, area);
    }
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let active = app.active_tab();

    let mut spans = vec![Span::styled(
        format!(" {}'s Portfolio ", OWNER_NAME),
        Style::default().fg(Color::Cyan).bold(),
    )];
    for (i, tab) in Tab::all().into_iter().enumerate() {
        let style = if Some(tab) == active {
            Style::default().fg(Color::Black).bg(Color::Cyan).bold()
        } else {
            Style::default().fg(Color::White)
        };
        spans.push(Span::raw(" "));
        spans.push(Span::styled(format!(" {} {} ", i + 1, tab.display_name()), style));
    }
    spans.push(Span::raw(" "));
    spans.push(Span::styled(
        format!("v{}", env!("CARGO_PKG_VERSION")),
        Style::default().fg(Color::DarkGray),
    ));

    let header = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn control_span(app: &App, controls: &[Element], label: &str) -> Span<'static> {
    let idx = controls.iter().position(|el| el.label == label);
    let style = if idx.is_some() && idx == app.selected_control {
        Style::default().fg(Color::Black).bg(Color::Cyan).bold()
    } else {
        Style::default().fg(Color::Cyan)
    };
    Span::styled(format!("[ {} ]", label), style)
}

fn render_content(app: &mut App, frame: &mut Frame, area: Rect) {
    app.sync_view();
    app.content_area = Some(area);
    app.content_height = area.height.saturating_sub(2);

    let now = Instant::now();
    let inner_width = area.width.saturating_sub(4) as usize;
    let mut page = Page::new(inner_width);

    match app.active_tab() {
        Some(Tab::Dashboard) => build_dashboard(app, &mut page, now),
        Some(Tab::Education) => build_education(app, &mut page, now),
        Some(Tab::Contact) => build_contact(app, &mut page, now),
        None => page.paragraph(
            &format!("Nothing to show for '{}'.", app.controller.ui().active_tab()),
            Style::default().fg(Color::DarkGray),
        ),
    }

    app.total_content_lines = page.lines.len() as u16;
    app.anchors = page.anchors;
    app.apply_scroll_request();
    app.content_scroll = app
        .content_scroll
        .min(app.total_content_lines.saturating_sub(app.content_height));

    let focused = app.focus == FocusPane::Content;
    let border_color = if focused { Color::Cyan } else { Color::DarkGray };
    let title = app
        .active_tab()
        .map_or("Unknown view", |tab| tab.display_name());

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(format!(" {} ", title));

    let content = Paragraph::new(Text::from(page.lines))
        .block(block)
        .scroll((app.content_scroll, 0));
    frame.render_widget(content, area);

    if app.total_content_lines > app.content_height {
        let mut scrollbar_state = ScrollbarState::new(
            app.total_content_lines.saturating_sub(app.content_height) as usize,
        )
        .position(app.content_scroll as usize);
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight),
            area,
            &mut scrollbar_state,
        );
    }
}

fn build_dashboard(app: &App, page: &mut Page, now: Instant) {
    let highlights = app.controller.ui().highlights();
    let controls = app.controls();

    page.anchor("hero");
    page.push(Span::styled(
        "Expert Full-Stack Solutions.",
        Style::default().fg(Color::Cyan).bold(),
    ));
    page.paragraph(
        "BE Computer Science graduate with a 9.02 CGPA. Deeply specialized in AIML, MERN, and React Native development.",
        Style::default().fg(Color::Gray),
    );
    page.blank();
    page.anchor("hero-view-projects");
    page.push(Line::from(vec![
        control_span(app, &controls, "View Projects"),
        Span::raw("  "),
        control_span(app, &controls, "Education Info"),
    ]));
    page.blank();

    page.anchor("projects-section");
    page.heading("Project Portfolio");
    page.blank();

    let mut category = "";
    for project in PROJECTS {
        if project.category != category {
            category = project.category;
            page.push(Span::styled(
                category.to_string(),
                Style::default().fg(Color::Magenta).bold(),
            ));
        }
        page.card(
            project.id,
            highlights.is_emphasized(project.id, now),
            project.title,
            &[project.description.to_string(), project.tags.join(" · ")],
        );
    }
}

fn build_education(app: &App, page: &mut Page, now: Instant) {
    let highlights = app.controller.ui().highlights();

    page.heading("Academic Background");
    page.paragraph(
        "A track record of excellence from secondary school to university graduation.",
        Style::default().fg(Color::Gray),
    );
    page.blank();

    for edu in EDUCATION {
        let mut body = vec![
            edu.institution.to_string(),
            format!("{}  ·  Passed out {}", edu.score, edu.passout),
        ];
        if let Some(board) = edu.board {
            body.push(format!("Board: {}", board));
        }
        body.push(edu.details.to_string());
        page.card(edu.id, highlights.is_emphasized(edu.id, now), edu.degree, &body);
    }
}

fn build_contact(app: &App, page: &mut Page, now: Instant) {
    let ui = app.controller.ui();
    let controls = app.controls();

    if ui.is_form_submitted() {
        page.heading("Message Sent!");
        page.paragraph(
            &format!("Thanks {}, I'll get back to you soon.", ui.form().name),
            Style::default().fg(Color::Gray),
        );
        page.blank();
        page.push(control_span(app, &controls, "New Form"));
        return;
    }

    page.heading("Inquiry Form");
    page.paragraph(
        "I'm currently accepting new projects.",
        Style::default().fg(Color::Gray),
    );
    page.blank();

    for (i, (field, element_id, placeholder)) in FORM_FIELDS.iter().enumerate() {
        let editing = app.input_mode == InputMode::FormEditing && app.form_field_idx == i;
        let emphasized = ui.highlights().is_emphasized(element_id, now);
        let value = ui.form().get(field).unwrap_or_default();

        let label_style = if editing {
            Style::default().fg(Color::Yellow).bold()
        } else if emphasized {
            Style::default().fg(Color::Black).bg(Color::Yellow).bold()
        } else {
            Style::default().fg(Color::White).bold()
        };
        let rule_style = if editing || emphasized {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        page.anchor(element_id);
        page.push(Span::styled(placeholder.to_string(), label_style));

        let mut shown = value.to_string();
        if editing {
            let byte_pos = crate::app::char_to_byte_index(&shown, app.form_cursor);
            shown.insert(byte_pos, '▏');
        }
        let value_lines = if shown.is_empty() {
            vec![Line::from(vec![
                Span::styled("│ ", rule_style),
                Span::styled("(empty)", Style::default().fg(Color::DarkGray).italic()),
            ])]
        } else {
            wrap_text(&shown, page.width.saturating_sub(2))
                .into_iter()
                .map(|line| {
                    Line::from(vec![
                        Span::styled("│ ", rule_style),
                        Span::styled(line, Style::default().fg(Color::Cyan)),
                    ])
                })
                .collect()
        };
        for line in value_lines {
            page.push(line);
        }
        page.blank();
    }

    for (field, value) in &ui.form().extra {
        page.push(Line::from(vec![
            Span::styled(format!("{}: ", field), Style::default().fg(Color::DarkGray)),
            Span::raw(value.clone()),
        ]));
    }

    page.anchor("submit-btn");
    let emphasized = ui.highlights().is_emphasized("submit-btn", now);
    let mut button = control_span(app, &controls, "Send Inquiry");
    if emphasized {
        button.style = Style::default().fg(Color::Black).bg(Color::Yellow).bold();
    }
    page.push(button);
}

fn render_chat(app: &mut App, frame: &mut Frame, area: Rect) {
    let [chat_area, input_area] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(3),
    ])
    .areas(area);

    // Store areas for mouse hit-testing and scroll calculations
    app.chat_area = Some(chat_area);
    app.chat_height = chat_area.height.saturating_sub(2);
    app.chat_width = chat_area.width.saturating_sub(2);

    let focused = app.focus == FocusPane::Chat;
    let border_color = if focused { Color::Cyan } else { Color::DarkGray };
    let chat_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(format!(" Assistant · {} ", app.controller.backend_description()));

    let busy = app.controller.is_busy();
    let transcript = app.controller.transcript();

    let chat_text = if transcript.is_empty() && !busy {
        let mut lines = vec![
            Line::from(Span::styled(
                format!(
                    "Ask me for specific data about {}'s academic history or projects!",
                    OWNER_NAME
                ),
                Style::default().fg(Color::Gray),
            )),
            Line::default(),
            Line::from(Span::styled(
                "Try (Tab while typing):",
                Style::default().fg(Color::DarkGray),
            )),
        ];
        lines.extend(SUGGESTED_QUESTIONS.iter().map(|q| {
            Line::from(Span::styled(
                format!("  • {}", q),
                Style::default().fg(Color::DarkGray).italic(),
            ))
        }));
        Text::from(lines)
    } else {
        let mut lines: Vec<Line> = Vec::new();

        for msg in transcript {
            match msg.role {
                ChatRole::User => {
                    lines.push(Line::from(Span::styled(
                        "You:",
                        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                    )));
                    lines.push(Line::from(msg.content.clone()));
                }
                ChatRole::Assistant => {
                    lines.push(Line::from(Span::styled(
                        "Assistant:",
                        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                    )));
                    lines.extend(msg.content.lines().map(parse_markdown_line));
                }
            }
            lines.push(Line::default());
        }

        if busy {
            lines.push(Line::from(Span::styled(
                "Assistant:",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )));
            // Animated ellipsis: cycles through ".", "..", "..."
            let dots = ".".repeat((app.animation_frame as usize) + 1);
            lines.push(Line::from(Span::styled(
                format!("Thinking{}", dots),
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
            )));
        }

        Text::from(lines)
    };

    let chat = Paragraph::new(chat_text)
        .block(chat_block)
        .wrap(Wrap { trim: true })
        .scroll((app.chat_scroll, 0));
    frame.render_widget(chat, chat_area);

    let editing = app.input_mode == InputMode::Editing;
    let input_border_color = if editing { Color::Yellow } else { Color::DarkGray };
    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(input_border_color))
        .title(" Ask (i to type) ");

    // Horizontal scrolling keeps the cursor visible
    let inner_width = input_area.width.saturating_sub(2) as usize;
    let cursor_pos = app.chat_cursor;
    let scroll_offset = if inner_width == 0 {
        0
    } else if cursor_pos >= inner_width {
        cursor_pos - inner_width + 1
    } else {
        0
    };

    let input_text = if app.chat_input.is_empty() && !editing {
        Line::from(Span::styled(
            format!("Ask me about {}'s grades or projects...", OWNER_NAME),
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        let visible: String = app
            .chat_input
            .chars()
            .skip(scroll_offset)
            .take(inner_width)
            .collect();
        Line::from(Span::styled(visible, Style::default().fg(Color::Cyan)))
    };
    frame.render_widget(Paragraph::new(input_text).block(input_block), input_area);

    if editing {
        let cursor_x = (cursor_pos - scroll_offset) as u16;
        frame.set_cursor_position((input_area.x + cursor_x + 1, input_area.y + 1));
    }
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let (mode_text, mode_style) = match app.input_mode {
        InputMode::Normal => (" NORMAL ", Style::default().bg(Color::Blue).fg(Color::White)),
        InputMode::Editing => (" ASK ", Style::default().bg(Color::Yellow).fg(Color::Black)),
        InputMode::FormEditing => (" FORM ", Style::default().bg(Color::Magenta).fg(Color::White)),
    };

    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let pairs: &[(&str, &str)] = match app.input_mode {
        InputMode::Normal => &[
            ("1-3", "view"),
            ("j/k", "scroll"),
            ("h/l", "select"),
            ("Enter", "press"),
            ("i", "ask"),
            ("c", "chat"),
            ("f", "form"),
            ("s", "send form"),
            ("n", "new form"),
            ("M", "model"),
            ("P", "provider"),
            ("q", "quit"),
        ],
        InputMode::Editing => &[
            ("Enter", "send"),
            ("Tab", "suggest"),
            ("Esc", "done"),
        ],
        InputMode::FormEditing => &[
            ("Tab", "next field"),
            ("Esc", "done"),
        ],
    };

    let mut spans = vec![Span::styled(mode_text, mode_style), Span::raw(" ")];
    for (key, label) in pairs {
        spans.push(Span::styled(format!(" {} ", key), key_style));
        spans.push(Span::styled(format!(" {} ", label), label_style));
    }

    let status = match (&app.status_message, app.controller.status()) {
        (Some(message), _) => Span::styled(format!(" {} ", message), Style::default().fg(Color::Yellow)),
        (None, TurnStatus::Error) => Span::styled(" assistant unavailable ", Style::default().fg(Color::Red)),
        (None, TurnStatus::Loading) => Span::styled(" thinking ", Style::default().fg(Color::DarkGray)),
        (None, _) => Span::raw(""),
    };
    spans.push(status);

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_model_picker(app: &mut App, frame: &mut Frame, area: Rect) {
    // Calculate popup size and position (centered)
    let popup_width = 44.min(area.width.saturating_sub(4));
    let popup_height = (app.available_models.len() as u16 + 2).min(area.height.saturating_sub(4));

    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" {} model (Enter/Esc) ", app.current_provider.display_name()));

    let items: Vec<ListItem> = app
        .available_models
        .iter()
        .map(|model| {
            let style = if model == &app.selected_model {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(format!(" {} ", model)).style(style)
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, popup_area, &mut app.model_picker_state);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_markdown_bold() {
        let line = parse_markdown_line("Your CGPA was **9.02** overall");
        assert_eq!(line.spans.len(), 3);
        assert_eq!(line.spans[1].content, "9.02");
        assert!(line.spans[1].style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_parse_markdown_unclosed_is_literal() {
        let line = parse_markdown_line("a **b");
        assert_eq!(line.spans.len(), 1);
        assert_eq!(line.spans[0].content, "a **b");
    }

    #[test]
    fn test_wrap_text() {
        assert_eq!(wrap_text("one two three", 7), vec!["one two", "three"]);
        assert_eq!(wrap_text("abcdefgh", 3), vec!["abc", "def", "gh"]);
        assert_eq!(wrap_text("", 5), vec![""]);
    }

    #[test]
    fn test_card_records_anchor_and_emphasis() {
        let mut page = Page::new(40);
        page.blank();
        page.card("proj-rn-1", true, "FitTrack Pro", &["Fitness app".to_string()]);
        assert_eq!(page.anchors.get("proj-rn-1"), Some(&1));
        assert_eq!(page.lines[1].spans[0].content, "┃ ");
        assert_eq!(page.lines.len(), 4);
    }
}
