//! Interactive commit picker

use crate::config::ResolvedTheme;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use gpick_core::{
    truncate_to_width, CandidateList, Commit, Field, LineFormatter, Segment, SelectionTracker,
};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame,
};

const TITLE_HEIGHT: u16 = 1;
const INFO_BAR_HEIGHT: u16 = 1;
const HELP_TEXT: &str =
    "Esc quit • ↑↓ navigate • Enter choose commits • Space pick • a all • c clear • i invert";

/// How the picker session ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerExit {
    /// Left without picking anything
    Quit,
    /// Confirmed; commits are in history order
    Pick(Vec<Commit>),
}

#[derive(Debug, Clone)]
pub struct Picker {
    title: String,
    tracker: SelectionTracker,
    formatter: LineFormatter,
    theme: ResolvedTheme,
    cursor: usize,
    scroll: usize,
    last_list_area: Rect,
    now: i64,
}

impl Picker {
    pub fn new(
        title: String,
        candidates: CandidateList,
        formatter: LineFormatter,
        theme: ResolvedTheme,
        now: i64,
    ) -> Self {
        Self {
            title,
            tracker: SelectionTracker::new(candidates),
            formatter,
            theme,
            cursor: 0,
            scroll: 0,
            last_list_area: Rect::default(),
            now,
        }
    }

    #[cfg(test)]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[cfg(test)]
    pub fn tracker(&self) -> &SelectionTracker {
        &self.tracker
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<PickerExit> {
        let view_height = self.list_height();
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Some(PickerExit::Quit);
            }
            KeyCode::Esc | KeyCode::Char('q') => return Some(PickerExit::Quit),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(1, view_height),
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-1, view_height),
            KeyCode::PageDown => self.page_down(view_height),
            KeyCode::PageUp => self.page_up(view_height),
            KeyCode::Home | KeyCode::Char('g') => self.select_first(view_height),
            KeyCode::End | KeyCode::Char('G') => self.select_last(view_height),
            KeyCode::Enter => self.toggle_current(),
            KeyCode::Char('a') => self.tracker.select_all(),
            KeyCode::Char('c') => self.tracker.clear(),
            KeyCode::Char('i') => self.tracker.invert(),
            KeyCode::Char(' ') => return Some(self.confirm()),
            _ => {}
        }
        None
    }

    pub fn handle_mouse(&mut self, event: MouseEvent) {
        let view_height = self.list_height();
        match event.kind {
            MouseEventKind::ScrollUp => self.move_cursor(-1, view_height),
            MouseEventKind::ScrollDown => self.move_cursor(1, view_height),
            MouseEventKind::Down(MouseButton::Left) => {
                if self.select_at_mouse(event.row) {
                    self.toggle_current();
                }
            }
            _ => {}
        }
    }

    pub fn confirm(&self) -> PickerExit {
        PickerExit::Pick(
            self.tracker
                .selected_commits()
                .into_iter()
                .cloned()
                .collect(),
        )
    }

    pub fn toggle_current(&mut self) {
        if let Err(err) = self.tracker.toggle(self.cursor) {
            tracing::warn!(%err, "ignoring toggle");
        }
    }

    pub fn move_cursor(&mut self, delta: isize, view_height: usize) {
        if self.tracker.is_empty() {
            self.cursor = 0;
            self.scroll = 0;
            return;
        }
        let len = self.tracker.len() as isize;
        self.cursor = (self.cursor as isize + delta).clamp(0, len - 1) as usize;
        self.ensure_visible(view_height);
    }

    pub fn select_first(&mut self, view_height: usize) {
        self.cursor = 0;
        self.scroll = 0;
        self.ensure_visible(view_height);
    }

    pub fn select_last(&mut self, view_height: usize) {
        if !self.tracker.is_empty() {
            self.cursor = self.tracker.len() - 1;
            self.ensure_visible(view_height);
        }
    }

    pub fn page_up(&mut self, view_height: usize) {
        let delta = view_height.saturating_sub(1).max(1) as isize;
        self.move_cursor(-delta, view_height);
    }

    pub fn page_down(&mut self, view_height: usize) {
        let delta = view_height.saturating_sub(1).max(1) as isize;
        self.move_cursor(delta, view_height);
    }

    /// Move the cursor to the row under `y`; false when `y` is not on a commit
    pub fn select_at_mouse(&mut self, y: u16) -> bool {
        let area = self.last_list_area;
        if area.height == 0 || y < area.y || y >= area.y + area.height {
            return false;
        }
        let index = (y - area.y) as usize + self.scroll;
        if index >= self.tracker.len() {
            return false;
        }
        self.cursor = index;
        self.ensure_visible(area.height as usize);
        true
    }

    fn list_height(&self) -> usize {
        self.last_list_area.height as usize
    }

    fn ensure_visible(&mut self, view_height: usize) {
        if view_height == 0 || self.tracker.is_empty() {
            self.scroll = 0;
            return;
        }
        if self.cursor < self.scroll {
            self.scroll = self.cursor;
        } else if self.cursor >= self.scroll + view_height {
            self.scroll = self.cursor + 1 - view_height;
        }
    }

    pub fn draw(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(TITLE_HEIGHT),
                Constraint::Min(0),
                Constraint::Length(INFO_BAR_HEIGHT),
            ])
            .split(frame.area());

        self.draw_title(frame, chunks[0]);
        self.draw_list(frame, chunks[1]);
        self.draw_info_bar(frame, chunks[2]);
    }

    fn draw_title(&self, frame: &mut Frame, area: Rect) {
        let title = truncate_to_width(&self.title, area.width as usize);
        let paragraph = Paragraph::new(Line::from(Span::styled(
            title,
            Style::default().add_modifier(Modifier::BOLD),
        )));
        frame.render_widget(paragraph, area);
    }

    fn draw_list(&mut self, frame: &mut Frame, area: Rect) {
        self.last_list_area = area;
        let height = area.height as usize;
        let width = area.width as usize;
        self.ensure_visible(height);

        let candidates = self.tracker.candidates();
        let end = (self.scroll + height).min(candidates.len());
        let mut lines = Vec::with_capacity(height);
        for index in self.scroll..end {
            let commit = &candidates[index];
            let selected = self.tracker.is_selected(index).unwrap_or(false);
            let segments = self.formatter.segments(commit, selected, width, self.now);
            lines.push(self.styled_line(segments, index == self.cursor, width));
        }

        frame.render_widget(Paragraph::new(lines), area);
    }

    fn styled_line(&self, segments: Vec<Segment>, is_cursor: bool, width: usize) -> Line<'static> {
        let cursor_style = Style::default()
            .bg(self.theme.cursor_bg)
            .fg(self.theme.cursor_fg);
        let mut used = 0usize;
        let mut spans = Vec::with_capacity(segments.len() + 1);
        for segment in segments {
            used += gpick_core::display_width(&segment.text);
            let style = if is_cursor {
                cursor_style
            } else {
                self.field_style(segment.field)
            };
            spans.push(Span::styled(segment.text, style));
        }
        if is_cursor && used < width {
            spans.push(Span::styled(" ".repeat(width - used), cursor_style));
        }
        Line::from(spans)
    }

    fn field_style(&self, field: Field) -> Style {
        match field {
            Field::Marker => Style::default()
                .fg(self.theme.marker)
                .add_modifier(Modifier::BOLD),
            Field::Id => Style::default().fg(self.theme.id),
            Field::Message => Style::default().fg(self.theme.message),
            Field::When => Style::default().fg(self.theme.when),
            Field::Author => Style::default().fg(self.theme.author),
            Field::Separator | Field::Ellipsis => Style::default(),
        }
    }

    fn draw_info_bar(&self, frame: &mut Frame, area: Rect) {
        let count = self.tracker.selected_count();
        let text = format!("{HELP_TEXT} • {count}/{} selected", self.tracker.len());
        let bar = Paragraph::new(Line::from(truncate_to_width(&text, area.width as usize)))
            .alignment(Alignment::Center)
            .block(
                Block::default().style(
                    Style::default()
                        .bg(self.theme.info_bar_bg)
                        .fg(self.theme.info_bar_fg),
                ),
            );
        frame.render_widget(bar, area);
    }
}
