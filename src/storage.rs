//! Persisted widget state, one JSON payload per key.
//!
//! The widgets treat storage as best-effort session continuity: a missing
//! directory, unreadable file, or malformed payload falls back to the
//! widget's default and is never surfaced as an error.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use anyhow::{anyhow, Result};

/// Chat history key: JSON array of chat messages.
pub const CHAT_HISTORY_KEY: &str = "chat-history";
/// Liked product ids key: JSON array of id strings.
pub const LIKED_KEY: &str = "tgdd-liked";

/// Key-value port the widgets persist through. Reads answer `None` for
/// anything absent or unreadable; writes swallow their own failures.
pub trait Store: Send + Sync {
    fn read(&self, key: &str) -> Option<String>;
    fn write(&self, key: &str, value: &str);
}

/// Store backed by one `<key>.json` file per key in a single directory.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Store under the platform config directory (`…/gianhang/`).
    pub fn open_default() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;
        Ok(Self::at(config_dir.join("gianhang")))
    }

    /// Store rooted at an explicit directory, created lazily on first write.
    pub fn at(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Store for FileStore {
    fn read(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.path_for(key)).ok()
    }

    fn write(&self, key: &str, value: &str) {
        let result =
            fs::create_dir_all(&self.dir).and_then(|()| fs::write(self.path_for(key), value));
        if let Err(err) = result {
            tracing::debug!(key, error = %err, "skipping state write");
        }
    }
}

/// In-memory store for tests and embedders that want no files on disk.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of writes accepted so far. Lets tests assert that loading
    /// persisted state does not immediately write it back.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::Relaxed)
    }
}

impl Store for MemoryStore {
    fn read(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn write(&self, key: &str, value: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_string(), value.to_string());
            self.writes.fetch_add(1, Ordering::Relaxed);
        }
    }
}
