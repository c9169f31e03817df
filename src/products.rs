//! Product grid: liked set, bounded compare set, cursor navigation.

use std::sync::Arc;

use crate::catalog::{sample_products, Product};
use crate::storage::{Store, LIKED_KEY};
use crate::theme::Theme;

/// Compare tray capacity. A fifth product cannot be added; removal is
/// always allowed.
pub const COMPARE_LIMIT: usize = 4;

/// Caller configuration, mirroring the original widget's props.
#[derive(Debug, Clone)]
pub struct GridConfig {
    /// Products to show. Empty means the built-in demo catalog.
    pub items: Vec<Product>,
    pub title: String,
    /// Smaller line under the title. Empty hides it.
    pub subtitle: String,
    pub currency: String,
    pub theme: Theme,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            title: "Gợi ý cho bạn".to_string(),
            subtitle: "Hàng mới • Trả góp 0% • Ưu đãi online".to_string(),
            currency: "VND".to_string(),
            theme: Theme::default(),
        }
    }
}

pub struct ProductWidget {
    pub products: Vec<Product>,
    pub title: String,
    pub subtitle: String,
    pub currency: String,
    pub theme: Theme,
    /// Liked product ids in the order they were first liked. Persisted.
    pub liked: Vec<String>,
    /// Compare selection in insertion order. Session-only, capped at
    /// [COMPARE_LIMIT].
    pub compare: Vec<String>,
    /// Index of the selected product.
    pub cursor: usize,
    /// First visible card row.
    pub row_offset: usize,
    /// Grid geometry recorded by the last render.
    pub columns: usize,
    pub visible_rows: usize,
    store: Arc<dyn Store>,
}

impl ProductWidget {
    pub fn new(config: GridConfig, store: Arc<dyn Store>) -> Self {
        let products = if config.items.is_empty() {
            sample_products()
        } else {
            config.items
        };
        let liked = load_liked(store.as_ref());
        Self {
            products,
            title: config.title,
            subtitle: config.subtitle,
            currency: config.currency,
            theme: config.theme,
            liked,
            compare: Vec::new(),
            cursor: 0,
            row_offset: 0,
            columns: 1,
            visible_rows: 1,
            store,
        }
    }

    pub fn selected(&self) -> Option<&Product> {
        self.products.get(self.cursor)
    }

    pub fn is_liked(&self, id: &str) -> bool {
        self.liked.iter().any(|x| x == id)
    }

    pub fn is_compared(&self, id: &str) -> bool {
        self.compare.iter().any(|x| x == id)
    }

    /// Symmetric membership toggle. The liked set is persisted on every
    /// change, never on load.
    pub fn toggle_like(&mut self, id: &str) {
        if let Some(pos) = self.liked.iter().position(|x| x == id) {
            self.liked.remove(pos);
        } else {
            self.liked.push(id.to_string());
        }
        self.persist_liked();
    }

    /// Toggle membership in the compare selection. Adding stops silently at
    /// [COMPARE_LIMIT] members.
    pub fn toggle_compare(&mut self, id: &str) {
        if let Some(pos) = self.compare.iter().position(|x| x == id) {
            self.compare.remove(pos);
        } else if self.compare.len() < COMPARE_LIMIT {
            self.compare.push(id.to_string());
        }
    }

    pub fn clear_compare(&mut self) {
        self.compare.clear();
    }

    /// Products for the current compare ids, in insertion order. Ids that
    /// do not resolve against the current list are dropped silently.
    pub fn resolved_compare(&self) -> Vec<&Product> {
        self.compare
            .iter()
            .filter_map(|id| self.products.iter().find(|p| &p.id == id))
            .collect()
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.products.len().saturating_sub(1));
    }

    pub fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(self.columns.max(1));
    }

    pub fn move_down(&mut self) {
        let cols = self.columns.max(1);
        self.cursor = (self.cursor + cols).min(self.products.len().saturating_sub(1));
    }

    pub fn move_first(&mut self) {
        self.cursor = 0;
    }

    pub fn move_last(&mut self) {
        self.cursor = self.products.len().saturating_sub(1);
    }

    /// Shift the visible window so the selected card's row is on screen.
    /// Render calls this once geometry for the frame is known.
    pub fn ensure_cursor_visible(&mut self) {
        let cols = self.columns.max(1);
        let rows = self.visible_rows.max(1);
        let row = self.cursor / cols;
        if row < self.row_offset {
            self.row_offset = row;
        } else if row >= self.row_offset + rows {
            self.row_offset = row + 1 - rows;
        }
    }

    fn persist_liked(&self) {
        if let Ok(raw) = serde_json::to_string(&self.liked) {
            self.store.write(LIKED_KEY, &raw);
        }
    }
}

/// Saved liked ids; absent or malformed storage means an empty set.
fn load_liked(store: &dyn Store) -> Vec<String> {
    let Some(raw) = store.read(LIKED_KEY) else {
        return Vec::new();
    };
    serde_json::from_str(&raw).unwrap_or_else(|err| {
        tracing::debug!(error = %err, "stored liked set unreadable, starting empty");
        Vec::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn widget() -> (ProductWidget, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let grid = ProductWidget::new(GridConfig::default(), store.clone());
        (grid, store)
    }

    #[test]
    fn config_defaults_match_the_original_props() {
        let config = GridConfig::default();
        assert_eq!(config.title, "Gợi ý cho bạn");
        assert_eq!(config.subtitle, "Hàng mới • Trả góp 0% • Ưu đãi online");
        assert_eq!(config.currency, "VND");
    }

    #[test]
    fn empty_items_fall_back_to_the_sample_catalog() {
        let (grid, store) = widget();
        assert_eq!(grid.products.len(), 10);
        assert_eq!(store.write_count(), 0, "loading must not write back");

        let custom = GridConfig {
            items: sample_products().into_iter().take(2).collect(),
            ..Default::default()
        };
        let grid = ProductWidget::new(custom, Arc::new(MemoryStore::new()));
        assert_eq!(grid.products.len(), 2);
    }

    #[test]
    fn toggle_like_flips_membership_and_persists() {
        let (mut grid, store) = widget();
        grid.toggle_like("p3");
        assert!(grid.is_liked("p3"));
        assert!(store.read(LIKED_KEY).unwrap().contains("p3"));

        grid.toggle_like("p3");
        assert!(!grid.is_liked("p3"));
        assert_eq!(store.read(LIKED_KEY).as_deref(), Some("[]"));
    }

    #[test]
    fn liked_set_survives_a_reload() {
        let store = Arc::new(MemoryStore::new());
        let mut first = ProductWidget::new(GridConfig::default(), store.clone());
        first.toggle_like("p1");
        first.toggle_like("p5");
        drop(first);

        let second = ProductWidget::new(GridConfig::default(), store);
        assert_eq!(second.liked, vec!["p1".to_string(), "p5".to_string()]);
    }

    #[test]
    fn malformed_liked_payload_means_empty_set() {
        let store = Arc::new(MemoryStore::new());
        store.write(LIKED_KEY, "not json at all");
        let grid = ProductWidget::new(GridConfig::default(), store);
        assert!(grid.liked.is_empty());
    }

    #[test]
    fn compare_stops_at_four_members() {
        let (mut grid, _store) = widget();
        for id in ["p1", "p2", "p3", "p4", "p5"] {
            grid.toggle_compare(id);
        }
        assert_eq!(grid.compare.len(), COMPARE_LIMIT);
        assert!(!grid.is_compared("p5"), "fifth add must be a no-op");

        // Removal works at the cap, and frees a slot.
        grid.toggle_compare("p2");
        assert_eq!(grid.compare.len(), 3);
        grid.toggle_compare("p5");
        assert!(grid.is_compared("p5"));
    }

    #[test]
    fn compare_keeps_insertion_order() {
        let (mut grid, _store) = widget();
        grid.toggle_compare("p2");
        grid.toggle_compare("p10");
        grid.toggle_compare("p1");
        let names: Vec<&str> = grid.resolved_compare().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(names, vec!["p2", "p10", "p1"]);
    }

    #[test]
    fn resolved_compare_drops_unknown_ids() {
        let (mut grid, _store) = widget();
        grid.compare = vec!["p1".to_string(), "ghost".to_string(), "p3".to_string()];
        let ids: Vec<&str> = grid.resolved_compare().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p3"]);
    }

    #[test]
    fn clear_compare_empties_the_tray() {
        let (mut grid, _store) = widget();
        grid.toggle_compare("p1");
        grid.toggle_compare("p2");
        grid.clear_compare();
        assert!(grid.compare.is_empty());
    }

    #[test]
    fn cursor_moves_by_rows_and_columns() {
        let (mut grid, _store) = widget();
        grid.columns = 3;
        grid.visible_rows = 2;

        grid.move_right();
        assert_eq!(grid.cursor, 1);
        grid.move_down();
        assert_eq!(grid.cursor, 4);
        grid.move_up();
        assert_eq!(grid.cursor, 1);
        grid.move_left();
        grid.move_left();
        assert_eq!(grid.cursor, 0);

        grid.move_last();
        assert_eq!(grid.cursor, 9);
        grid.move_down();
        assert_eq!(grid.cursor, 9, "down from the last row stays put");
        grid.move_first();
        assert_eq!(grid.cursor, 0);
    }

    #[test]
    fn visible_window_follows_the_cursor() {
        let (mut grid, _store) = widget();
        grid.columns = 3;
        grid.visible_rows = 2;

        grid.move_last(); // row 3
        grid.ensure_cursor_visible();
        assert_eq!(grid.row_offset, 2);

        grid.move_first();
        grid.ensure_cursor_visible();
        assert_eq!(grid.row_offset, 0);
    }

    #[test]
    fn selected_returns_the_product_under_the_cursor() {
        let (mut grid, _store) = widget();
        assert_eq!(grid.selected().map(|p| p.id.as_str()), Some("p1"));
        grid.move_right();
        assert_eq!(grid.selected().map(|p| p.id.as_str()), Some("p2"));
    }
}
