//! Storefront palette: one color per themed role, with caller overrides.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use ratatui::style::Color;
use serde::Deserialize;

/// Colors for every themed role in the UI.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    /// Accent used for prices, selection borders, the chat launcher.
    pub brand: Color,
    /// Card interior background.
    pub card_bg: Color,
    pub text: Color,
    pub muted: Color,
    /// Card and panel borders.
    pub line: Color,
    /// Discount badges.
    pub danger: Color,
    /// Star ratings.
    pub gold: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            brand: Color::Rgb(0xff, 0x7a, 0x00),
            card_bg: Color::Rgb(0x17, 0x18, 0x1f),
            text: Color::Rgb(0xe8, 0xea, 0xf2),
            muted: Color::Rgb(0x8a, 0x91, 0xa6),
            line: Color::Rgb(0x3a, 0x3f, 0x52),
            danger: Color::Rgb(0xe6, 0x3f, 0x4d),
            gold: Color::Rgb(0xfe, 0xc1, 0x20),
        }
    }
}

/// Optional color overrides, camelCase keys as in the widget's original
/// `theme` prop (`{"brand": "#ff7a00", "cardBg": "#17181f"}`). Unknown keys
/// are ignored; unparseable values leave the default in place.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeOverrides {
    pub brand: Option<String>,
    pub card_bg: Option<String>,
    pub text: Option<String>,
    pub muted: Option<String>,
    pub line: Option<String>,
    pub danger: Option<String>,
    pub gold: Option<String>,
}

impl ThemeOverrides {
    /// Read overrides from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read theme file: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("invalid theme JSON in {}", path.display()))
    }
}

impl Theme {
    /// The default palette with any parseable overrides applied.
    pub fn with_overrides(overrides: &ThemeOverrides) -> Self {
        let mut theme = Self::default();
        apply(&mut theme.brand, overrides.brand.as_deref());
        apply(&mut theme.card_bg, overrides.card_bg.as_deref());
        apply(&mut theme.text, overrides.text.as_deref());
        apply(&mut theme.muted, overrides.muted.as_deref());
        apply(&mut theme.line, overrides.line.as_deref());
        apply(&mut theme.danger, overrides.danger.as_deref());
        apply(&mut theme.gold, overrides.gold.as_deref());
        theme
    }
}

fn apply(slot: &mut Color, hex: Option<&str>) {
    let Some(raw) = hex else { return };
    match parse_hex(raw) {
        Some(color) => *slot = color,
        None => tracing::debug!(value = raw, "ignoring unparseable theme color"),
    }
}

/// Parse `#rrggbb` (leading `#` optional) into a terminal RGB color.
pub fn parse_hex(s: &str) -> Option<Color> {
    let hex = s.trim();
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_parses_with_and_without_hash() {
        assert_eq!(parse_hex("#ff7a00"), Some(Color::Rgb(0xff, 0x7a, 0x00)));
        assert_eq!(parse_hex("FFC120"), Some(Color::Rgb(0xff, 0xc1, 0x20)));
        assert_eq!(parse_hex(" #102030 "), Some(Color::Rgb(0x10, 0x20, 0x30)));
    }

    #[test]
    fn bad_hex_is_rejected() {
        assert_eq!(parse_hex(""), None);
        assert_eq!(parse_hex("#fff"), None);
        assert_eq!(parse_hex("#gg0000"), None);
        assert_eq!(parse_hex("red"), None);
    }

    #[test]
    fn overrides_touch_only_the_keys_given() {
        let overrides = ThemeOverrides {
            brand: Some("#123456".to_string()),
            ..Default::default()
        };
        let theme = Theme::with_overrides(&overrides);
        assert_eq!(theme.brand, Color::Rgb(0x12, 0x34, 0x56));
        assert_eq!(theme.text, Theme::default().text);
    }

    #[test]
    fn unparseable_override_keeps_the_default() {
        let overrides = ThemeOverrides {
            gold: Some("shiny".to_string()),
            ..Default::default()
        };
        let theme = Theme::with_overrides(&overrides);
        assert_eq!(theme.gold, Theme::default().gold);
    }

    #[test]
    fn override_json_accepts_camel_case_and_extra_keys() {
        let overrides: ThemeOverrides =
            serde_json::from_str(r##"{"cardBg": "#101010", "radius": 12}"##).unwrap();
        let theme = Theme::with_overrides(&overrides);
        assert_eq!(theme.card_bg, Color::Rgb(0x10, 0x10, 0x10));
    }

    #[test]
    fn overrides_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("theme.json");
        std::fs::write(&path, r##"{"brand": "#00aaff"}"##).unwrap();

        let theme = Theme::with_overrides(&ThemeOverrides::load(&path).unwrap());
        assert_eq!(theme.brand, Color::Rgb(0x00, 0xaa, 0xff));
        assert!(ThemeOverrides::load(&dir.path().join("nope.json")).is_err());
    }
}
