//! Keyboard and mouse dispatch. The chat overlay captures input while it
//! is open; everything else goes to the grid.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};

use crate::app::App;
use crate::tui::AppEvent;

pub fn handle_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        // Rewrap changes the line count, so re-anchor the chat list
        AppEvent::Resize(_, _) => app.chat.scroll_to_bottom(),
        AppEvent::Tick => app.on_tick(),
        AppEvent::BotReply(text) => app.chat.receive_reply(text),
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Ctrl+C quits from anywhere, even mid-draft
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit();
        return;
    }

    if app.chat.open {
        handle_chat_key(app, key);
    } else {
        handle_grid_key(app, key);
    }
}

fn handle_chat_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.chat.close(),
        KeyCode::Enter => app.chat.send(),
        KeyCode::Backspace => app.chat.backspace(),
        KeyCode::Delete => app.chat.delete_char(),
        KeyCode::Left => app.chat.cursor_left(),
        KeyCode::Right => app.chat.cursor_right(),
        KeyCode::Home => app.chat.cursor_home(),
        KeyCode::End => app.chat.cursor_end(),
        KeyCode::Up => app.chat.scroll_up(),
        KeyCode::Down => app.chat.scroll_down(),
        KeyCode::Char(c) => app.chat.insert_char(c),
        _ => {}
    }
}

fn handle_grid_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('a') => app.chat.toggle_open(),
        KeyCode::Left | KeyCode::Char('h') => app.grid.move_left(),
        KeyCode::Right | KeyCode::Char('l') => app.grid.move_right(),
        KeyCode::Up | KeyCode::Char('k') => app.grid.move_up(),
        KeyCode::Down | KeyCode::Char('j') => app.grid.move_down(),
        KeyCode::Char('g') => app.grid.move_first(),
        KeyCode::Char('G') => app.grid.move_last(),
        KeyCode::Char(' ') => {
            if let Some(id) = app.grid.selected().map(|p| p.id.clone()) {
                app.grid.toggle_compare(&id);
            }
        }
        KeyCode::Char('f') => {
            if let Some(id) = app.grid.selected().map(|p| p.id.clone()) {
                app.grid.toggle_like(&id);
            }
        }
        KeyCode::Enter => app.flash_status("Demo: Mua ngay!"),
        KeyCode::Char('x') => {
            if !app.grid.compare.is_empty() {
                app.grid.clear_compare();
            }
        }
        KeyCode::Char('s') => {
            if !app.grid.compare.is_empty() {
                app.flash_status("Demo: so sánh chưa triển khai");
            }
        }
        _ => {}
    }
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::ScrollUp => {
            if app.chat.open {
                app.chat.scroll_up();
            } else {
                app.grid.move_up();
            }
        }
        MouseEventKind::ScrollDown => {
            if app.chat.open {
                app.chat.scroll_down();
            } else {
                app.grid.move_down();
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::{ChatMessage, Who};
    use crate::products::GridConfig;
    use crate::storage::MemoryStore;
    use std::sync::Arc;
    use tokio::sync::mpsc;

    fn app() -> App {
        let (tx, _rx) = mpsc::unbounded_channel();
        App::new(GridConfig::default(), Arc::new(MemoryStore::new()), tx)
    }

    fn key(code: KeyCode) -> AppEvent {
        AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn a_toggles_the_chat_overlay_and_esc_closes_it() {
        let mut app = app();
        handle_event(&mut app, key(KeyCode::Char('a')));
        assert!(app.chat.open);
        handle_event(&mut app, key(KeyCode::Esc));
        assert!(!app.chat.open);
    }

    #[test]
    fn typing_goes_to_the_draft_while_the_chat_is_open() {
        let mut app = app();
        handle_event(&mut app, key(KeyCode::Char('a')));
        for c in ['q', 'x', 's'] {
            handle_event(&mut app, key(KeyCode::Char(c)));
        }
        assert_eq!(app.chat.draft, "qxs");
        assert!(!app.should_quit, "q must not quit while drafting");
        handle_event(&mut app, key(KeyCode::Backspace));
        assert_eq!(app.chat.draft, "qx");
    }

    #[test]
    fn q_quits_from_the_grid() {
        let mut app = app();
        handle_event(&mut app, key(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[test]
    fn ctrl_c_quits_even_while_drafting() {
        let mut app = app();
        handle_event(&mut app, key(KeyCode::Char('a')));
        handle_event(
            &mut app,
            AppEvent::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
        );
        assert!(app.should_quit);
    }

    #[test]
    fn space_toggles_compare_for_the_selected_card() {
        let mut app = app();
        handle_event(&mut app, key(KeyCode::Char(' ')));
        assert!(app.grid.is_compared("p1"));
        handle_event(&mut app, key(KeyCode::Char(' ')));
        assert!(!app.grid.is_compared("p1"));
    }

    #[test]
    fn f_toggles_like_for_the_selected_card() {
        let mut app = app();
        handle_event(&mut app, key(KeyCode::Right));
        handle_event(&mut app, key(KeyCode::Char('f')));
        assert!(app.grid.is_liked("p2"));
    }

    #[test]
    fn enter_flashes_the_buy_placeholder() {
        let mut app = app();
        handle_event(&mut app, key(KeyCode::Enter));
        assert_eq!(app.status, "Demo: Mua ngay!");
    }

    #[test]
    fn tray_actions_require_a_nonempty_compare_set() {
        let mut app = app();
        handle_event(&mut app, key(KeyCode::Char('s')));
        assert!(app.status.is_empty());

        handle_event(&mut app, key(KeyCode::Char(' ')));
        handle_event(&mut app, key(KeyCode::Char('s')));
        assert_eq!(app.status, "Demo: so sánh chưa triển khai");

        handle_event(&mut app, key(KeyCode::Char('x')));
        assert!(app.grid.compare.is_empty());
    }

    #[test]
    fn bot_replies_are_appended_to_the_chat() {
        let mut app = app();
        let before = app.chat.messages.len();
        handle_event(&mut app, AppEvent::BotReply("Mình nhận: “ok”".to_string()));
        assert_eq!(app.chat.messages.len(), before + 1);
        assert_eq!(app.chat.messages[before].text, "Mình nhận: “ok”");
    }

    #[tokio::test(start_paused = true)]
    async fn enter_sends_the_draft_while_the_chat_is_open() {
        let mut app = app();
        handle_event(&mut app, key(KeyCode::Char('a')));
        for c in "tư vấn giúp mình".chars() {
            handle_event(&mut app, key(KeyCode::Char(c)));
        }
        handle_event(&mut app, key(KeyCode::Enter));

        assert_eq!(app.chat.draft, "");
        let last = app.chat.messages.last().unwrap();
        assert_eq!(last.text, "tư vấn giúp mình");
        assert!(app.chat.reply_pending());
    }

    #[test]
    fn wheel_scrolls_the_grid_or_the_chat_list() {
        let mut app = app();
        app.grid.columns = 3;
        let scroll_down = AppEvent::Mouse(MouseEvent {
            kind: MouseEventKind::ScrollDown,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        });
        handle_event(&mut app, scroll_down);
        assert_eq!(app.grid.cursor, 3);

        handle_event(&mut app, key(KeyCode::Char('a')));
        app.chat.scroll = 4;
        let scroll_up = AppEvent::Mouse(MouseEvent {
            kind: MouseEventKind::ScrollUp,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        });
        handle_event(&mut app, scroll_up);
        assert_eq!(app.chat.scroll, 3);
    }

    #[test]
    fn resize_reanchors_the_chat_list() {
        let mut app = app();
        app.chat.list_width = 10;
        app.chat.list_height = 4;
        app.chat.messages = vec![
            ChatMessage {
                who: Who::Bot,
                text: "a".repeat(25),
            },
            ChatMessage {
                who: Who::User,
                text: "a".repeat(25),
            },
        ];
        app.chat.scroll_to_bottom();
        assert_eq!(app.chat.scroll, 6);

        // Wheel away from the bottom, then resize.
        app.chat.scroll_up();
        app.chat.scroll_up();
        assert_eq!(app.chat.scroll, 4);

        handle_event(&mut app, AppEvent::Resize(80, 24));
        assert_eq!(app.chat.scroll, 6, "resize must re-stick to the newest line");
    }
}
