//! Floating chat assistant: a launcher bubble toggling an overlay panel,
//! with persisted history and a simulated reply after each sent message.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use crate::storage::{Store, CHAT_HISTORY_KEY};
use crate::tui::AppEvent;

/// Delay before the simulated reply to a sent message lands.
pub const REPLY_DELAY: Duration = Duration::from_millis(1000);

const DEFAULT_GREETING: &str = "Chào bạn 👋 mình là mini chat.";

/// One chat line. Serializes exactly like the original widget's history
/// (`[{"who":"user","text":"…"}]`) so previously saved sessions still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub who: Who,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Who {
    User,
    Bot,
}

pub struct ChatWidget {
    pub open: bool,
    pub draft: String,
    /// Cursor position in `draft`, counted in characters.
    pub cursor: usize,
    pub messages: Vec<ChatMessage>,
    pub scroll: u16,
    /// Message list dimensions recorded by the last render, for scroll math.
    pub list_width: u16,
    pub list_height: u16,
    store: Arc<dyn Store>,
    events: UnboundedSender<AppEvent>,
    pending: Vec<JoinHandle<()>>,
}

impl ChatWidget {
    pub fn new(store: Arc<dyn Store>, events: UnboundedSender<AppEvent>) -> Self {
        let messages = load_history(store.as_ref());
        Self {
            open: false,
            draft: String::new(),
            cursor: 0,
            messages,
            scroll: 0,
            list_width: 0,
            list_height: 0,
            store,
            events,
            pending: Vec::new(),
        }
    }

    /// Launcher toggle. Snaps the list to the newest message so reopening
    /// never lands on a stale scroll position.
    pub fn toggle_open(&mut self) {
        self.open = !self.open;
        self.scroll_to_bottom();
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// Commit the draft: append it as a user message and schedule the
    /// simulated reply. Drafts that trim to nothing are discarded.
    pub fn send(&mut self) {
        let text = self.draft.trim().to_string();
        self.draft.clear();
        self.cursor = 0;
        if text.is_empty() {
            return;
        }
        self.messages.push(ChatMessage {
            who: Who::User,
            text: text.clone(),
        });
        self.persist();
        self.scroll_to_bottom();
        self.schedule_reply(text);
    }

    /// Each send gets its own timer; rapid sends stack replies instead of
    /// debouncing. Handles are kept so teardown can abort unfired timers.
    fn schedule_reply(&mut self, text: String) {
        let events = self.events.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(REPLY_DELAY).await;
            let _ = events.send(AppEvent::BotReply(format!("Mình nhận: “{text}”")));
        });
        self.pending.retain(|task| !task.is_finished());
        self.pending.push(handle);
    }

    /// Append the bot message produced by a reply timer.
    pub fn receive_reply(&mut self, text: String) {
        self.messages.push(ChatMessage {
            who: Who::Bot,
            text,
        });
        self.persist();
        self.scroll_to_bottom();
        self.pending.retain(|task| !task.is_finished());
    }

    /// True while at least one simulated reply has not landed yet.
    pub fn reply_pending(&self) -> bool {
        self.pending.iter().any(|task| !task.is_finished())
    }

    /// Abort timers that have not fired. Called on quit and on drop.
    pub fn cancel_pending(&mut self) {
        for task in self.pending.drain(..) {
            task.abort();
        }
    }

    pub fn insert_char(&mut self, c: char) {
        let byte_pos = char_to_byte_index(&self.draft, self.cursor);
        self.draft.insert(byte_pos, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let byte_pos = char_to_byte_index(&self.draft, self.cursor);
            self.draft.remove(byte_pos);
        }
    }

    pub fn delete_char(&mut self) {
        if self.cursor < self.draft.chars().count() {
            let byte_pos = char_to_byte_index(&self.draft, self.cursor);
            self.draft.remove(byte_pos);
        }
    }

    pub fn cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.draft.chars().count());
    }

    pub fn cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor = self.draft.chars().count();
    }

    /// Estimate the rendered height of the message list and scroll so the
    /// newest line is visible. Uses the dimensions recorded by the last
    /// render, with fixed fallbacks before the first one.
    pub fn scroll_to_bottom(&mut self) {
        let wrap_width = if self.list_width > 0 {
            self.list_width as usize
        } else {
            40
        };

        let mut total_lines: u16 = 0;
        for msg in &self.messages {
            total_lines += 1; // who line
            for line in msg.text.lines() {
                let char_count = line.chars().count();
                if char_count == 0 {
                    total_lines += 1;
                } else {
                    total_lines += ((char_count / wrap_width) + 1) as u16;
                }
            }
            total_lines += 1; // blank line between messages
        }
        if self.reply_pending() {
            total_lines += 2; // who line + typing indicator
        }

        let visible = if self.list_height > 0 {
            self.list_height
        } else {
            10
        };
        self.scroll = total_lines.saturating_sub(visible);
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        self.scroll = self.scroll.saturating_add(1);
    }

    fn persist(&self) {
        if let Ok(raw) = serde_json::to_string(&self.messages) {
            self.store.write(CHAT_HISTORY_KEY, &raw);
        }
    }
}

impl Drop for ChatWidget {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

/// Convert a character index to a byte index for UTF-8 safe string edits.
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

fn default_history() -> Vec<ChatMessage> {
    vec![ChatMessage {
        who: Who::Bot,
        text: DEFAULT_GREETING.to_string(),
    }]
}

/// Saved history, or the default greeting when the stored value is absent,
/// malformed, or not an array. The loaded value is not written back.
fn load_history(store: &dyn Store) -> Vec<ChatMessage> {
    match store.read(CHAT_HISTORY_KEY) {
        Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|err| {
            tracing::debug!(error = %err, "stored chat history unreadable, using greeting");
            default_history()
        }),
        None => default_history(),
    }
}
