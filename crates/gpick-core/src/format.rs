//! Single-line rendering of a candidate commit
//!
//! Lines are built as a list of [`Segment`]s so that a front end can style
//! each field however it likes. Width is always measured on the segment text,
//! never on styling, so truncation is the same for plain and colored output.

use crate::commit::Commit;
use crate::time_format::TimeFormatter;
use regex::Regex;
use std::sync::OnceLock;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

const ELLIPSIS: &str = "...";

/// The part of a commit line a segment belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Marker,
    Separator,
    Id,
    Message,
    When,
    Author,
    Ellipsis,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub field: Field,
    pub text: String,
}

impl Segment {
    fn new(field: Field, text: impl Into<String>) -> Self {
        Self {
            field,
            text: text.into(),
        }
    }
}

/// Glyphs used for the selection column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineStyle {
    pub selected_marker: String,
    pub unselected_marker: String,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            selected_marker: "*".to_string(),
            unselected_marker: " ".to_string(),
        }
    }
}

impl LineStyle {
    /// Width of the selection column; both glyphs are padded to it
    pub fn marker_width(&self) -> usize {
        display_width(&self.selected_marker)
            .max(display_width(&self.unselected_marker))
            .max(1)
    }
}

#[derive(Debug, Clone, Default)]
pub struct LineFormatter {
    style: LineStyle,
    time_format: TimeFormatter,
}

impl LineFormatter {
    pub fn new(style: LineStyle, time_format: TimeFormatter) -> Self {
        Self { style, time_format }
    }

    /// Build the segments for one line, cut to `width` printable cells.
    ///
    /// Field order is fixed: marker, id, message, time, author.
    pub fn segments(&self, commit: &Commit, selected: bool, width: usize, now: i64) -> Vec<Segment> {
        let marker = if selected {
            &self.style.selected_marker
        } else {
            &self.style.unselected_marker
        };
        let mut segments = vec![
            Segment::new(Field::Marker, pad_to_width(marker, self.style.marker_width())),
            Segment::new(Field::Separator, " "),
        ];
        segments.extend(self.commit_segments(commit, now));
        truncate_segments(segments, width)
    }

    pub fn format(&self, commit: &Commit, selected: bool, width: usize, now: i64) -> String {
        join(self.segments(commit, selected, width, now))
    }

    /// `<id> - <message> (<when>) <<author>>` with no selection column and
    /// no width limit, for output that is not a picker
    pub fn plain_line(&self, commit: &Commit, now: i64) -> String {
        join(self.commit_segments(commit, now))
    }

    fn commit_segments(&self, commit: &Commit, now: i64) -> Vec<Segment> {
        vec![
            Segment::new(Field::Id, commit.short_id.as_str()),
            Segment::new(Field::Separator, " - "),
            Segment::new(Field::Message, commit.single_line_message()),
            Segment::new(Field::Separator, " "),
            Segment::new(
                Field::When,
                format!("({})", self.time_format.format(commit.timestamp, now)),
            ),
            Segment::new(Field::Separator, " "),
            Segment::new(Field::Author, format!("<{}>", commit.author)),
        ]
    }
}

fn join(segments: Vec<Segment>) -> String {
    segments.into_iter().map(|segment| segment.text).collect()
}

/// Render one commit as a plain display line no wider than `width` cells
pub fn format_line(commit: &Commit, selected: bool, width: usize, now: i64) -> String {
    LineFormatter::default().format(commit, selected, width, now)
}

/// Printable width in terminal cells, ignoring ANSI escape sequences
pub fn display_width(text: &str) -> usize {
    match ansi_pattern() {
        Some(pattern) if text.contains('\u{1b}') => {
            UnicodeWidthStr::width(pattern.replace_all(text, "").as_ref())
        }
        _ => UnicodeWidthStr::width(text),
    }
}

/// Cut `text` to at most `max_width` cells, ending in "..." when shortened
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    join(truncate_segments(vec![Segment::new(Field::Message, text)], max_width))
}

fn truncate_segments(segments: Vec<Segment>, max_width: usize) -> Vec<Segment> {
    let total: usize = segments.iter().map(|segment| display_width(&segment.text)).sum();
    if total <= max_width {
        return segments;
    }
    if max_width < ELLIPSIS.len() {
        return vec![Segment::new(Field::Ellipsis, ".".repeat(max_width))];
    }

    let mut budget = max_width - ELLIPSIS.len();
    let mut out = Vec::new();
    'outer: for segment in segments {
        let mut kept = String::new();
        for grapheme in segment.text.graphemes(true) {
            let grapheme_width = UnicodeWidthStr::width(grapheme);
            if grapheme_width > budget {
                if !kept.is_empty() {
                    out.push(Segment::new(segment.field, kept));
                }
                break 'outer;
            }
            budget -= grapheme_width;
            kept.push_str(grapheme);
        }
        out.push(Segment::new(segment.field, kept));
    }
    out.push(Segment::new(Field::Ellipsis, ELLIPSIS));
    out
}

fn pad_to_width(text: &str, width: usize) -> String {
    let text_width = display_width(text);
    if text_width >= width {
        return text.to_string();
    }
    format!("{text}{}", " ".repeat(width - text_width))
}

fn ansi_pattern() -> Option<&'static Regex> {
    static ANSI: OnceLock<Option<Regex>> = OnceLock::new();
    ANSI.get_or_init(|| Regex::new(r"\x1b\[[0-9;?]*[ -/]*[@-~]").ok())
        .as_ref()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commit::{test_commit, RawLogEntry};

    const NOW: i64 = 1_700_000_000 + 3 * 86_400;

    fn commit_with(message: Option<&str>, author: &str) -> Commit {
        Commit::from_raw(
            RawLogEntry {
                oid: Some("abc1234def".to_string()),
                author_name: Some(author.to_string()),
                author_time: Some(1_700_000_000),
                message: message.map(str::to_string),
            },
            7,
        )
        .unwrap()
    }

    #[test]
    fn test_full_line() {
        let commit = test_commit("abc1234ffff", "fix bug");
        assert_eq!(
            format_line(&commit, false, 200, NOW),
            "  abc1234 - fix bug (3 days ago) <Ada>"
        );
        assert_eq!(
            format_line(&commit, true, 200, NOW),
            "* abc1234 - fix bug (3 days ago) <Ada>"
        );
    }

    #[test]
    fn test_newlines_become_spaces() {
        let commit = test_commit("abc1234", "subject\n\nbody");
        assert!(format_line(&commit, false, 200, NOW).contains(" - subject body ("));
    }

    #[test]
    fn test_empty_message() {
        let commit = commit_with(None, "Ada");
        assert_eq!(
            format_line(&commit, false, 200, NOW),
            "  abc1234 -  (3 days ago) <Ada>"
        );
    }

    #[test]
    fn test_truncates_with_ellipsis() {
        let commit = test_commit("abc1234", "a rather long commit message");
        let line = format_line(&commit, true, 20, NOW);
        assert_eq!(line, "* abc1234 - a rat...");
        assert_eq!(display_width(&line), 20);
    }

    #[test]
    fn test_width_bound_holds_for_all_widths() {
        let commits = [
            test_commit("abc1234", "fix bug"),
            commit_with(Some("日本語のコミットメッセージ"), "山田 太郎"),
            commit_with(Some("emoji 🎉🎉 and combining e\u{301}"), "Zoë"),
            commit_with(None, ""),
        ];
        for commit in &commits {
            for width in 4..80 {
                for selected in [false, true] {
                    let line = format_line(commit, selected, width, NOW);
                    assert!(
                        display_width(&line) <= width,
                        "{line:?} exceeds width {width}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_tiny_widths() {
        let commit = test_commit("abc1234", "fix bug");
        assert_eq!(format_line(&commit, false, 0, NOW), "");
        assert_eq!(format_line(&commit, false, 2, NOW), "..");
        assert_eq!(format_line(&commit, false, 4, NOW), " ...");
    }

    #[test]
    fn test_formatting_is_pure() {
        let commit = test_commit("abc1234", "deterministic");
        for width in [10, 30, 120] {
            assert_eq!(
                format_line(&commit, true, width, NOW),
                format_line(&commit, true, width, NOW)
            );
        }
    }

    #[test]
    fn test_segments_keep_field_order() {
        let commit = test_commit("abc1234", "fix bug");
        let fields: Vec<Field> = LineFormatter::default()
            .segments(&commit, false, 200, NOW)
            .into_iter()
            .map(|segment| segment.field)
            .filter(|field| *field != Field::Separator)
            .collect();
        assert_eq!(
            fields,
            vec![Field::Marker, Field::Id, Field::Message, Field::When, Field::Author]
        );
    }

    #[test]
    fn test_wide_marker_pads_column() {
        let formatter = LineFormatter::new(
            LineStyle {
                selected_marker: "✔".to_string(),
                unselected_marker: String::new(),
            },
            TimeFormatter::default(),
        );
        let commit = test_commit("abc1234", "x");
        let selected = formatter.format(&commit, true, 200, NOW);
        let unselected = formatter.format(&commit, false, 200, NOW);
        assert_eq!(display_width(&selected), display_width(&unselected));
    }

    #[test]
    fn test_plain_line_has_no_selection_column() {
        let formatter = LineFormatter::new(
            LineStyle {
                selected_marker: "✔".to_string(),
                unselected_marker: "·".to_string(),
            },
            TimeFormatter::default(),
        );
        let commit = test_commit("abc1234ffff", "a rather long commit message that is never cut");
        assert_eq!(
            formatter.plain_line(&commit, NOW),
            "abc1234 - a rather long commit message that is never cut (3 days ago) <Ada>"
        );
    }

    #[test]
    fn test_control_characters_never_reach_the_line() {
        let commit = test_commit("abc1234", "esc \u{1b}[31mred\u{1b}[0m text\twith tab");
        let line = format_line(&commit, false, 30, NOW);
        assert!(!line.chars().any(char::is_control), "{line:?}");
        assert!(display_width(&line) <= 30);

        let commit = test_commit("abc1234", "a\tb");
        assert_eq!(
            format_line(&commit, false, 200, NOW),
            "  abc1234 - a b (3 days ago) <Ada>"
        );
    }

    #[test]
    fn test_display_width_ignores_ansi() {
        assert_eq!(display_width("\u{1b}[31mabc1234\u{1b}[0m"), 7);
        assert_eq!(display_width("日本"), 4);
    }

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("hello", 10), "hello");
        assert_eq!(truncate_to_width("hello world", 8), "hello...");
        assert_eq!(truncate_to_width("日本語テキスト", 8), "日本...");
    }
}
