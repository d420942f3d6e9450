use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use crate::app::{App, InputMode, SuggestionAction};
use crate::forms::FieldKind;
use crate::tui::AppEvent;

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

pub async fn handle_event(app: &mut App, event: AppEvent) -> Result<()> {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => {
            app.tick_animation();
            app.poll_reply().await;
        }
    }
    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Ctrl-C quits from anywhere.
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    // An open form captures all input.
    if app.active_form.is_some() {
        handle_form_key(app, key);
        return;
    }

    // Suggestion shortcuts work in both modes.
    if let Some(action) = suggestion_for_key(key.code) {
        app.apply_suggestion(action);
        return;
    }

    match app.input_mode {
        InputMode::Editing => handle_editing_key(app, key),
        InputMode::Normal => handle_normal_key(app, key),
    }
}

fn suggestion_for_key(code: KeyCode) -> Option<SuggestionAction> {
    match code {
        KeyCode::F(2) => Some(SuggestionAction::ScheduleAppointment),
        KeyCode::F(3) => Some(SuggestionAction::Services),
        KeyCode::F(4) => Some(SuggestionAction::Resources),
        _ => None,
    }
}

fn handle_editing_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Tab => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Enter => {
            app.send_current_input();
        }
        KeyCode::Backspace => {
            if app.cursor > 0 {
                app.cursor -= 1;
                let byte_pos = char_to_byte_index(&app.input, app.cursor);
                app.input.remove(byte_pos);
            }
        }
        KeyCode::Delete => {
            let char_count = app.input.chars().count();
            if app.cursor < char_count {
                let byte_pos = char_to_byte_index(&app.input, app.cursor);
                app.input.remove(byte_pos);
            }
        }
        KeyCode::Left => {
            app.cursor = app.cursor.saturating_sub(1);
        }
        KeyCode::Right => {
            let char_count = app.input.chars().count();
            app.cursor = (app.cursor + 1).min(char_count);
        }
        KeyCode::Home => {
            app.cursor = 0;
        }
        KeyCode::End => {
            app.cursor = app.input.chars().count();
        }
        KeyCode::Char(c) => {
            let byte_pos = char_to_byte_index(&app.input, app.cursor);
            app.input.insert(byte_pos, c);
            app.cursor += 1;
        }
        _ => {}
    }
}

fn handle_normal_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,

        // Back into the input box.
        KeyCode::Char('i') | KeyCode::Char('/') | KeyCode::Tab => {
            app.input_mode = InputMode::Editing;
            app.cursor = app.input.chars().count();
        }

        // Transcript scrolling
        KeyCode::Char('j') | KeyCode::Down => app.chat_scroll_down(),
        KeyCode::Char('k') | KeyCode::Up => app.chat_scroll_up(),
        KeyCode::Char('g') => app.chat_scroll = 0,
        KeyCode::Char('G') => app.scroll_chat_to_bottom(),

        // Suggestion shortcuts, numbered as displayed
        KeyCode::Char('1') => app.apply_suggestion(SuggestionAction::ScheduleAppointment),
        KeyCode::Char('2') => app.apply_suggestion(SuggestionAction::Services),
        KeyCode::Char('3') => app.apply_suggestion(SuggestionAction::Resources),

        _ => {}
    }
}

fn handle_form_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.cancel_form();
            return;
        }
        KeyCode::Enter => {
            app.submit_active_form();
            return;
        }
        _ => {}
    }

    let Some(form) = app.active_form.as_mut() else {
        return;
    };

    match key.code {
        KeyCode::Tab | KeyCode::Down => form.focus_next(),
        KeyCode::BackTab | KeyCode::Up => form.focus_prev(),

        // Choice fields cycle with arrows (or space); text fields edit.
        KeyCode::Left => form.choice_prev(),
        KeyCode::Right => form.choice_next(),
        KeyCode::Char(' ') => match form.focused().kind {
            FieldKind::Choice(_) => form.choice_next(),
            FieldKind::Text => form.insert_char(' '),
        },
        KeyCode::Backspace => form.backspace(),
        KeyCode::Char(c) => form.insert_char(c),

        _ => {}
    }
}

/// Check if a point is within a rectangle
fn point_in_rect(x: u16, y: u16, rect: Rect) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    if app.active_form.is_some() {
        return;
    }

    let in_chat = app
        .chat_area
        .map(|r| point_in_rect(mouse.column, mouse.row, r))
        .unwrap_or(false);
    if !in_chat {
        return;
    }

    match mouse.kind {
        MouseEventKind::ScrollDown => {
            app.chat_scroll_down();
            app.chat_scroll_down();
            app.chat_scroll_down();
        }
        MouseEventKind::ScrollUp => {
            app.chat_scroll_up();
            app.chat_scroll_up();
            app.chat_scroll_up();
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn test_app() -> App {
        let mut config = Config::new();
        config.reply_delay_min_ms = 0;
        config.reply_delay_max_ms = 0;
        App::new(config, Some(7))
    }

    #[test]
    fn test_editing_inserts_at_cursor() {
        let mut app = test_app();
        for c in ['h', 'i'] {
            handle_key(&mut app, press(KeyCode::Char(c)));
        }
        handle_key(&mut app, press(KeyCode::Home));
        handle_key(&mut app, press(KeyCode::Char('o')));
        assert_eq!(app.input, "ohi");
        assert_eq!(app.cursor, 1);
    }

    #[test]
    fn test_backspace_is_utf8_safe() {
        let mut app = test_app();
        for c in ['c', 'a', 'f', 'é'] {
            handle_key(&mut app, press(KeyCode::Char(c)));
        }
        handle_key(&mut app, press(KeyCode::Backspace));
        assert_eq!(app.input, "caf");
    }

    #[tokio::test]
    async fn test_enter_submits_input() {
        let mut app = test_app();
        for c in "hello".chars() {
            handle_key(&mut app, press(KeyCode::Char(c)));
        }
        handle_key(&mut app, press(KeyCode::Enter));
        assert_eq!(app.conversation.messages().len(), 2);
        assert!(app.input.is_empty());
        app.abort_pending_reply();
    }

    #[test]
    fn test_function_keys_trigger_suggestions() {
        let mut app = test_app();
        handle_key(&mut app, press(KeyCode::F(2)));
        assert!(app.active_form.is_some());
    }

    #[test]
    fn test_esc_cancels_form_without_submitting() {
        let mut app = test_app();
        handle_key(&mut app, press(KeyCode::F(2)));
        handle_key(&mut app, press(KeyCode::Char('J')));
        handle_key(&mut app, press(KeyCode::Esc));
        assert!(app.active_form.is_none());
        assert_eq!(app.conversation.messages().len(), 1);
    }

    #[test]
    fn test_form_captures_typing() {
        let mut app = test_app();
        handle_key(&mut app, press(KeyCode::F(2)));
        for c in "Jane".chars() {
            handle_key(&mut app, press(KeyCode::Char(c)));
        }
        let form = app.active_form.as_ref().expect("form open");
        assert_eq!(form.fields[0].value, "Jane");
        // Chat input is untouched while the form is open.
        assert!(app.input.is_empty());
    }

    #[test]
    fn test_tab_moves_form_focus() {
        let mut app = test_app();
        handle_key(&mut app, press(KeyCode::F(2)));
        handle_key(&mut app, press(KeyCode::Tab));
        let form = app.active_form.as_ref().expect("form open");
        assert_eq!(form.focus, 1);
    }
}
