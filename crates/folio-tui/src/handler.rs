use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use folio_core::Tab;
use ratatui::layout::Rect;

use crate::app::{App, FocusPane, InputMode};
use crate::tui::AppEvent;

pub async fn handle_event(app: &mut App, event: AppEvent) -> Result<()> {
    match event {
        AppEvent::Key(key) => handle_key(app, key).await?,
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => app.tick_animation(),
    }
    Ok(())
}

async fn handle_key(app: &mut App, key: KeyEvent) -> Result<()> {
    // Global keys that work in any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return Ok(());
    }

    if app.show_model_picker {
        handle_model_picker(app, key);
        return Ok(());
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, key).await,
        InputMode::Editing => handle_chat_editing(app, key),
        InputMode::FormEditing => handle_form_editing(app, key),
    }

    Ok(())
}

fn handle_model_picker(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.show_model_picker = false,
        KeyCode::Char('j') | KeyCode::Down => app.model_picker_nav_down(),
        KeyCode::Char('k') | KeyCode::Up => app.model_picker_nav_up(),
        KeyCode::Enter => app.select_model(),
        _ => {}
    }
}

async fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,

        // Views
        KeyCode::Char('1') => app.select_tab(Tab::Dashboard),
        KeyCode::Char('2') => app.select_tab(Tab::Education),
        KeyCode::Char('3') => app.select_tab(Tab::Contact),

        // Chat
        KeyCode::Char('c') => app.toggle_chat(),
        KeyCode::Char('i') | KeyCode::Char('/') => app.start_chat_input(),
        KeyCode::Tab => {
            if app.show_chat {
                app.focus = match app.focus {
                    FocusPane::Content => FocusPane::Chat,
                    FocusPane::Chat => FocusPane::Content,
                };
            }
        }

        // Scrolling
        KeyCode::Char('j') | KeyCode::Down => match app.focus {
            FocusPane::Content => app.scroll_down(),
            FocusPane::Chat => app.chat_scroll = app.chat_scroll.saturating_add(1),
        },
        KeyCode::Char('k') | KeyCode::Up => match app.focus {
            FocusPane::Content => app.scroll_up(),
            FocusPane::Chat => app.chat_scroll = app.chat_scroll.saturating_sub(1),
        },
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.scroll_half_page_down();
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.scroll_half_page_up();
        }
        KeyCode::Char('g') => app.scroll_to_top(),
        KeyCode::Char('G') => app.scroll_to_bottom(),

        // Buttons and links on the current view
        KeyCode::Char('l') | KeyCode::Right => app.next_control(),
        KeyCode::Char('h') | KeyCode::Left => app.prev_control(),
        KeyCode::Enter => app.activate_selected_control(),
        KeyCode::Esc => {
            app.selected_control = None;
            app.status_message = None;
        }

        // Contact form
        KeyCode::Char('f') => app.edit_next_form_field(),
        KeyCode::Char('s') => app.submit_form(),
        KeyCode::Char('n') => app.start_new_form(),

        // Provider and model
        KeyCode::Char('M') => app.open_model_picker().await,
        KeyCode::Char('P') => app.cycle_provider(),

        _ => {}
    }
}

fn handle_chat_editing(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.input_mode = InputMode::Normal,
        KeyCode::Enter => app.send_chat(),
        KeyCode::Tab => app.cycle_suggestion(),
        KeyCode::Backspace => app.chat_backspace(),
        KeyCode::Delete => app.chat_delete(),
        KeyCode::Left => app.chat_cursor = app.chat_cursor.saturating_sub(1),
        KeyCode::Right => {
            let char_count = app.chat_input.chars().count();
            app.chat_cursor = (app.chat_cursor + 1).min(char_count);
        }
        KeyCode::Home => app.chat_cursor = 0,
        KeyCode::End => app.chat_cursor = app.chat_input.chars().count(),
        KeyCode::Char(c) => app.chat_insert(c),
        _ => {}
    }
}

fn handle_form_editing(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.input_mode = InputMode::Normal,
        KeyCode::Tab | KeyCode::Enter => app.edit_next_form_field(),
        KeyCode::Backspace => app.form_backspace(),
        KeyCode::Left => app.form_cursor_left(),
        KeyCode::Right => app.form_cursor_right(),
        KeyCode::Char(c) => app.form_insert(c),
        _ => {}
    }
}

fn point_in_rect(x: u16, y: u16, rect: Rect) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    let x = mouse.column;
    let y = mouse.row;

    let in_chat = app.chat_area.is_some_and(|r| point_in_rect(x, y, r));
    let in_content = app.content_area.is_some_and(|r| point_in_rect(x, y, r));

    match mouse.kind {
        MouseEventKind::ScrollDown => {
            if in_chat {
                app.chat_scroll = app.chat_scroll.saturating_add(3);
            } else if in_content {
                for _ in 0..3 {
                    app.scroll_down();
                }
            }
        }
        MouseEventKind::ScrollUp => {
            if in_chat {
                app.chat_scroll = app.chat_scroll.saturating_sub(3);
            } else if in_content {
                for _ in 0..3 {
                    app.scroll_up();
                }
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventKind;
    use folio_core::Config;

    fn test_app() -> App {
        App::new(Config {
            provider: Some("ollama".into()),
            ollama_url: Some("http://localhost:1".into()),
            ..Config::default()
        })
    }

    fn press(code: KeyCode) -> AppEvent {
        AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[tokio::test]
    async fn test_number_keys_switch_tabs() {
        let mut app = test_app();
        handle_event(&mut app, press(KeyCode::Char('2'))).await.unwrap();
        assert_eq!(app.active_tab(), Some(Tab::Education));
        handle_event(&mut app, press(KeyCode::Char('3'))).await.unwrap();
        assert_eq!(app.active_tab(), Some(Tab::Contact));
    }

    #[tokio::test]
    async fn test_typing_in_chat_input() {
        let mut app = test_app();
        handle_event(&mut app, press(KeyCode::Char('i'))).await.unwrap();
        assert_eq!(app.input_mode, InputMode::Editing);

        for c in "hi".chars() {
            handle_event(&mut app, press(KeyCode::Char(c))).await.unwrap();
        }
        handle_event(&mut app, press(KeyCode::Char('q'))).await.unwrap();
        assert!(!app.should_quit);
        assert_eq!(app.chat_input, "hiq");

        handle_event(&mut app, press(KeyCode::Esc)).await.unwrap();
        handle_event(&mut app, press(KeyCode::Char('q'))).await.unwrap();
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn test_ctrl_c_quits_from_any_mode() {
        let mut app = test_app();
        app.start_chat_input();
        let mut key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        key.kind = KeyEventKind::Press;
        handle_event(&mut app, AppEvent::Key(key)).await.unwrap();
        assert!(app.should_quit);
    }

    #[test]
    fn test_point_in_rect() {
        let rect = Rect::new(10, 5, 4, 2);
        assert!(point_in_rect(10, 5, rect));
        assert!(point_in_rect(13, 6, rect));
        assert!(!point_in_rect(14, 6, rect));
        assert!(!point_in_rect(9, 5, rect));
    }
}
