//! Configuration file support for gpick
//!
//! Config file location: `~/.config/gpick/config.toml` (XDG_CONFIG_HOME)
//!
//! Example config:
//! ```toml
//! [ui]
//! selected_marker = "*"
//! unselected_marker = " "
//! short_id_len = 7
//!
//! [time]
//! mode = "relative"   # relative | absolute | custom
//! format = "%Y-%m-%d"
//!
//! [theme.defs]
//! nord11 = "#BF616A"
//!
//! [theme]
//! id = "nord11"
//! when = "green"
//! author = "blue"
//! cursor_bg = "white"
//! cursor_fg = "black"
//! ```

use crate::color;
use gpick_core::{LineStyle, TimeFormatter, TimeMode, DEFAULT_SHORT_ID_LEN};
use ratatui::style::Color;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;

/// UI configuration
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Glyph shown in front of a selected commit
    pub selected_marker: String,
    /// Glyph shown in front of an unselected commit
    pub unselected_marker: String,
    /// Number of id characters to display
    pub short_id_len: usize,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            selected_marker: "*".to_string(),
            unselected_marker: " ".to_string(),
            short_id_len: DEFAULT_SHORT_ID_LEN,
        }
    }
}

/// Commit time display
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TimeConfig {
    pub mode: TimeMode,
    /// Format used in custom mode (strftime or `time` description syntax)
    pub format: String,
}

/// Theme colors, each a hex value, an ANSI name or a key of `defs`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub defs: HashMap<String, String>,
    pub id: Option<String>,
    pub message: Option<String>,
    pub when: Option<String>,
    pub author: Option<String>,
    pub marker: Option<String>,
    pub cursor_bg: Option<String>,
    pub cursor_fg: Option<String>,
    pub info_bar_bg: Option<String>,
    pub info_bar_fg: Option<String>,
}

/// Theme with every token resolved to a ratatui color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedTheme {
    pub id: Color,
    pub message: Color,
    pub when: Color,
    pub author: Color,
    pub marker: Color,
    pub cursor_bg: Color,
    pub cursor_fg: Color,
    pub info_bar_bg: Color,
    pub info_bar_fg: Color,
}

impl Default for ResolvedTheme {
    fn default() -> Self {
        ThemeConfig::default().resolve()
    }
}

impl ThemeConfig {
    /// Resolve theme config to concrete colors, falling back per token
    pub fn resolve(&self) -> ResolvedTheme {
        let resolve = |token: &Option<String>, fallback: Color| -> Color {
            token
                .as_deref()
                .and_then(|value| color::resolve_color(value, &self.defs))
                .unwrap_or(fallback)
        };

        ResolvedTheme {
            id: resolve(&self.id, Color::Red),
            message: resolve(&self.message, Color::Reset),
            when: resolve(&self.when, Color::Green),
            author: resolve(&self.author, Color::Blue),
            marker: resolve(&self.marker, Color::Yellow),
            cursor_bg: resolve(&self.cursor_bg, Color::White),
            cursor_fg: resolve(&self.cursor_fg, Color::Black),
            info_bar_bg: resolve(&self.info_bar_bg, Color::DarkGray),
            info_bar_fg: resolve(&self.info_bar_fg, Color::Black),
        }
    }
}

/// Root configuration
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub ui: UiConfig,
    pub time: TimeConfig,
    pub theme: ThemeConfig,
}

impl Config {
    /// Get all possible config file paths in priority order
    fn config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // 1. XDG_CONFIG_HOME (if set)
        if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
            paths.push(PathBuf::from(xdg).join("gpick").join("config.toml"));
        }

        // 2. ~/.config/gpick/config.toml (XDG default, works on all platforms)
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".config").join("gpick").join("config.toml"));
        }

        // 3. Platform-specific config dir (~/Library/Application Support on macOS)
        if let Some(config_dir) = dirs::config_dir() {
            let platform_path = config_dir.join("gpick").join("config.toml");
            if !paths.contains(&platform_path) {
                paths.push(platform_path);
            }
        }

        paths
    }

    /// Get the first existing config file path
    pub fn config_path() -> Option<PathBuf> {
        Self::config_paths().into_iter().find(|p| p.exists())
    }

    /// Load config from XDG config path
    /// Returns default config if file doesn't exist or can't be parsed
    pub fn load() -> Self {
        Self::config_path()
            .and_then(|path| {
                tracing::debug!(path = %path.display(), "loading config");
                std::fs::read_to_string(&path).ok()
            })
            .and_then(|content| {
                Self::parse(&content)
                    .map_err(|e| {
                        eprintln!("Warning: Failed to parse config: {}", e);
                        e
                    })
                    .ok()
            })
            .unwrap_or_default()
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn line_style(&self) -> LineStyle {
        LineStyle {
            selected_marker: self.ui.selected_marker.clone(),
            unselected_marker: self.ui.unselected_marker.clone(),
        }
    }

    pub fn time_formatter(&self) -> TimeFormatter {
        TimeFormatter::new(self.time.mode, Some(self.time.format.as_str()))
    }
}
