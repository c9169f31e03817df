//! TUI storefront demo: a product grid with liked and compare sets, plus a
//! floating chat assistant with simulated replies.
//!
//! State that survives restarts (chat history, liked products) goes through
//! the [storage::Store] port; everything else is per-session.

pub mod app;
pub mod catalog;
pub mod chat;
pub mod format;
pub mod handler;
pub mod products;
pub mod storage;
pub mod theme;
pub mod tui;
pub mod ui;

pub use app::App;
pub use catalog::Product;
pub use chat::{ChatMessage, ChatWidget, Who};
pub use products::{GridConfig, ProductWidget};
pub use storage::{FileStore, MemoryStore, Store};
pub use theme::{Theme, ThemeOverrides};
