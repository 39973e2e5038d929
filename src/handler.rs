use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crate::app::{App, InputMode};
use crate::chat::{self, ChatRole};
use crate::tui::AppEvent;

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

pub fn handle_event(app: &mut App, event: AppEvent) -> Result<()> {
    match event {
        AppEvent::Key(key) => handle_key(app, key)?,
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => {
            app.tick_animation();
        }
    }
    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) -> Result<()> {
    // Global keys that work in any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return Ok(());
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, key),
        InputMode::Editing => handle_editing_mode(app, key),
    }

    Ok(())
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('i') | KeyCode::Char('e') => {
            app.input_mode = InputMode::Editing;
        }
        KeyCode::Char('j') | KeyCode::Down => app.scroll_down(),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_up(),
        KeyCode::Char('G') => app.scroll_to_bottom(),
        _ => {}
    }
}

fn handle_editing_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Enter => {
            // One turn in flight at a time; ignore Enter while loading.
            if !app.input.is_empty() && app.turn_task.is_none() {
                let question = app.input.clone();
                app.append(ChatRole::User, question.clone());

                app.input.clear();
                app.cursor = 0;
                app.loading = true;

                // Scroll to bottom so "Thinking..." is visible
                app.scroll_to_bottom();

                // Spawn background task to run the two-pass turn
                let openai = app.openai.clone();
                let search = app.search.clone();
                let model = app.model.clone();
                app.turn_task = Some(tokio::spawn(async move {
                    chat::run_turn(&openai, &search, &model, &question).await
                }));
            }
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openai::OpenAiClient;
    use crate::search::SearchClient;
    use crossterm::event::KeyEvent;

    fn test_app() -> App {
        App::new(
            OpenAiClient::new("sk-test"),
            SearchClient::new("http://localhost:8888"),
            "gpt-3.5-turbo".to_string(),
        )
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::from(code)
    }

    #[test]
    fn test_char_to_byte_index_multibyte() {
        let s = "héllo";
        assert_eq!(char_to_byte_index(s, 0), 0);
        assert_eq!(char_to_byte_index(s, 2), 3); // 'é' is two bytes
        assert_eq!(char_to_byte_index(s, 99), s.len());
    }

    #[test]
    fn test_typing_inserts_at_cursor() {
        let mut app = test_app();
        for c in "abc".chars() {
            handle_key(&mut app, key(KeyCode::Char(c))).unwrap();
        }
        handle_key(&mut app, key(KeyCode::Left)).unwrap();
        handle_key(&mut app, key(KeyCode::Char('x'))).unwrap();
        assert_eq!(app.input, "abxc");
    }

    #[tokio::test]
    async fn test_enter_on_empty_input_is_ignored() {
        let mut app = test_app();
        handle_key(&mut app, key(KeyCode::Enter)).unwrap();
        assert!(app.messages.is_empty());
        assert!(app.turn_task.is_none());
        assert!(!app.loading);
    }

    #[tokio::test]
    async fn test_enter_appends_user_turn_and_spawns_task() {
        let mut app = test_app();
        app.input = "What is the capital of France?".to_string();
        app.cursor = app.input.chars().count();

        handle_key(&mut app, key(KeyCode::Enter)).unwrap();

        assert_eq!(app.messages.len(), 1);
        assert_eq!(app.messages[0].role, ChatRole::User);
        assert_eq!(app.messages[0].content, "What is the capital of France?");
        assert!(app.input.is_empty());
        assert_eq!(app.cursor, 0);
        assert!(app.loading);
        assert!(app.turn_task.is_some());

        // Drop the in-flight request task.
        app.turn_task.take().unwrap().abort();
    }

    #[tokio::test]
    async fn test_enter_refused_while_turn_in_flight() {
        let mut app = test_app();
        app.input = "first".to_string();
        handle_key(&mut app, key(KeyCode::Enter)).unwrap();

        app.input = "second".to_string();
        handle_key(&mut app, key(KeyCode::Enter)).unwrap();

        // Only the first question made it into the transcript.
        assert_eq!(app.messages.len(), 1);
        assert_eq!(app.messages[0].content, "first");

        app.turn_task.take().unwrap().abort();
    }
}
