//! Application state: the product grid plus the floating chat overlay.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc::UnboundedSender;

use crate::chat::ChatWidget;
use crate::products::{GridConfig, ProductWidget};
use crate::storage::Store;
use crate::tui::AppEvent;

/// How long a transient status message stays in the footer.
pub const STATUS_TIMEOUT: Duration = Duration::from_millis(2500);

pub struct App {
    pub should_quit: bool,
    pub grid: ProductWidget,
    pub chat: ChatWidget,
    /// Footer status flash, cleared by the tick after [STATUS_TIMEOUT].
    pub status: String,
    pub status_set_at: Option<Instant>,
    /// Animation frame for the typing indicator, cycling 0 through 2.
    pub animation_frame: u8,
}

impl App {
    pub fn new(
        config: GridConfig,
        store: Arc<dyn Store>,
        events: UnboundedSender<AppEvent>,
    ) -> Self {
        Self {
            should_quit: false,
            grid: ProductWidget::new(config, store.clone()),
            chat: ChatWidget::new(store, events),
            status: String::new(),
            status_set_at: None,
            animation_frame: 0,
        }
    }

    /// Show a transient message in the footer.
    pub fn flash_status(&mut self, message: impl Into<String>) {
        self.status = message.into();
        self.status_set_at = Some(Instant::now());
    }

    /// Driven by the 300ms tick: advances the typing animation while a
    /// reply is pending and expires the status flash.
    pub fn on_tick(&mut self) {
        if self.chat.reply_pending() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
        if let Some(set_at) = self.status_set_at {
            if set_at.elapsed() >= STATUS_TIMEOUT {
                self.status.clear();
                self.status_set_at = None;
            }
        }
    }

    /// Stop the event loop, aborting any reply timers that have not fired.
    pub fn quit(&mut self) {
        self.chat.cancel_pending();
        self.should_quit = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use tokio::sync::mpsc;

    fn app() -> App {
        let (tx, _rx) = mpsc::unbounded_channel();
        App::new(GridConfig::default(), Arc::new(MemoryStore::new()), tx)
    }

    #[test]
    fn quit_sets_the_exit_flag() {
        let mut app = app();
        assert!(!app.should_quit);
        app.quit();
        assert!(app.should_quit);
        assert!(!app.chat.reply_pending());
    }

    #[test]
    fn status_flash_expires_after_the_timeout() {
        let mut app = app();
        app.flash_status("Demo: Mua ngay!");
        assert_eq!(app.status, "Demo: Mua ngay!");

        app.on_tick();
        assert_eq!(app.status, "Demo: Mua ngay!", "fresh flash must survive a tick");

        app.status_set_at = Instant::now().checked_sub(STATUS_TIMEOUT + Duration::from_millis(1));
        app.on_tick();
        assert!(app.status.is_empty());
        assert!(app.status_set_at.is_none());
    }

    #[test]
    fn animation_is_idle_without_a_pending_reply() {
        let mut app = app();
        app.on_tick();
        app.on_tick();
        assert_eq!(app.animation_frame, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn animation_cycles_while_a_reply_is_pending() {
        let mut app = app();
        app.chat.draft = "alo".to_string();
        app.chat.send();

        app.on_tick();
        assert_eq!(app.animation_frame, 1);
        app.on_tick();
        assert_eq!(app.animation_frame, 2);
        app.on_tick();
        assert_eq!(app.animation_frame, 0);
    }
}
