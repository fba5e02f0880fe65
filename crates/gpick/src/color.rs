//! Theme color parsing

use ratatui::style::Color;
use std::collections::HashMap;

/// Named terminal colors accepted in the theme. Dashes, underscores and case
/// are ignored when matching.
const NAMED_COLORS: &[(&str, Color)] = &[
    ("default", Color::Reset),
    ("reset", Color::Reset),
    ("black", Color::Black),
    ("red", Color::Red),
    ("green", Color::Green),
    ("yellow", Color::Yellow),
    ("blue", Color::Blue),
    ("magenta", Color::Magenta),
    ("cyan", Color::Cyan),
    ("gray", Color::Gray),
    ("grey", Color::Gray),
    ("darkgray", Color::DarkGray),
    ("darkgrey", Color::DarkGray),
    ("lightred", Color::LightRed),
    ("lightgreen", Color::LightGreen),
    ("lightyellow", Color::LightYellow),
    ("lightblue", Color::LightBlue),
    ("lightmagenta", Color::LightMagenta),
    ("lightcyan", Color::LightCyan),
    ("white", Color::White),
];

/// Parse `#rrggbb` (the `#` is optional) into an RGB color
pub fn parse_hex(value: &str) -> Option<Color> {
    let digits = value.trim().trim_start_matches('#');
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let channel = |at: usize| u8::from_str_radix(&digits[at..at + 2], 16).ok();
    Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?))
}

pub fn parse_named(name: &str) -> Option<Color> {
    let key: String = name
        .chars()
        .filter(|c| *c != '-' && *c != '_')
        .map(|c| c.to_ascii_lowercase())
        .collect();
    NAMED_COLORS
        .iter()
        .find(|(candidate, _)| *candidate == key)
        .map(|(_, color)| *color)
}

/// Resolve a theme token. A key of `defs` wins, then `#hex`, then a color name.
pub fn resolve_color(value: &str, defs: &HashMap<String, String>) -> Option<Color> {
    let value = value.trim();
    match defs.get(value) {
        Some(defined) => parse_hex(defined),
        None if value.starts_with('#') => parse_hex(value),
        None => parse_named(value),
    }
}
