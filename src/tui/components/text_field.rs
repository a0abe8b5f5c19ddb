//! # TextField Component
//!
//! An editable field bound to a string owned by the core `Editor`.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `FieldState` (cursor, scroll, cached width) lives in `TuiState`
//! - `TextField` is created per event / per frame with the borrowed text
//!
//! The field never mutates the text itself. Edits come back as
//! `FieldEvent::Changed(new_text)` and the caller dispatches them to the core,
//! so the draft has a single owner.
//!
//! Rows are hard-wrapped by display width (no word breaking), which keeps the
//! cursor mapping exact: every byte of the text belongs to exactly one row.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Paragraph};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Enter advances focus; pasted newlines become spaces.
    SingleLine,
    /// Enter inserts a newline; Up/Down move between rows.
    MultiLine,
}

/// High-level events emitted by a TextField
#[derive(Debug, Clone, PartialEq)]
pub enum FieldEvent {
    /// Text was edited; carries the full new text.
    Changed(String),
    /// Cursor moved without changing the text.
    Moved,
    /// Enter in a single-line field.
    Advance,
}

/// Cursor and scroll tracking for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldState {
    /// Byte offset into the bound text (0..=len, on a char boundary)
    pub cursor: usize,
    /// First visible row
    pub scroll: u16,
    /// Inner width from the last render (used for vertical movement)
    pub last_width: u16,
}

impl FieldState {
    const DEFAULT_WIDTH: u16 = 60;

    pub fn new() -> Self {
        Self {
            cursor: 0,
            scroll: 0,
            last_width: Self::DEFAULT_WIDTH,
        }
    }

    /// Keep the cursor valid after the text changed underneath it.
    pub fn clamp_to(&mut self, text: &str) {
        self.cursor = self.cursor.min(text.len());
        while !text.is_char_boundary(self.cursor) {
            self.cursor -= 1;
        }
    }

    pub fn move_to_end(&mut self, text: &str) {
        self.cursor = text.len();
    }
}

impl Default for FieldState {
    fn default() -> Self {
        Self::new()
    }
}

/// One visual row as a byte range of the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Row {
    start: usize,
    end: usize,
    /// Last row of its logical (newline-delimited) line.
    last_of_line: bool,
}

fn layout_rows(text: &str, width: u16) -> Vec<Row> {
    let width = usize::from(width.max(1));
    let mut rows = Vec::new();
    let mut line_start = 0;

    for line in text.split('\n') {
        let mut row_start = line_start;
        let mut used = 0;
        for (i, c) in line.char_indices() {
            let w = c.width().unwrap_or(0);
            if used > 0 && used + w > width {
                rows.push(Row {
                    start: row_start,
                    end: line_start + i,
                    last_of_line: false,
                });
                row_start = line_start + i;
                used = 0;
            }
            used += w;
        }
        rows.push(Row {
            start: row_start,
            end: line_start + line.len(),
            last_of_line: true,
        });
        line_start += line.len() + 1;
    }

    rows
}

fn cursor_row(rows: &[Row], cursor: usize) -> usize {
    rows.iter()
        .position(|r| {
            cursor >= r.start && (cursor < r.end || (cursor == r.end && r.last_of_line))
        })
        .unwrap_or(rows.len().saturating_sub(1))
}

/// Byte offset within `row` closest to display column `col` without passing it.
fn offset_at_column(text: &str, row: Row, col: usize) -> usize {
    let mut used = 0;
    for (i, c) in text[row.start..row.end].char_indices() {
        let w = c.width().unwrap_or(0);
        if used + w > col {
            return row.start + i;
        }
        used += w;
    }
    row.end
}

fn prev_boundary(text: &str, pos: usize) -> usize {
    text[..pos].char_indices().next_back().map(|(i, _)| i).unwrap_or(0)
}

fn next_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .chars()
        .next()
        .map(|c| pos + c.len_utf8())
        .unwrap_or(text.len())
}

/// Transient wrapper binding a `FieldState` to the text it edits.
pub struct TextField<'a> {
    text: &'a str,
    state: &'a mut FieldState,
    kind: FieldKind,
    label: &'a str,
    placeholder: &'a str,
    focused: bool,
}

impl<'a> TextField<'a> {
    pub fn new(text: &'a str, state: &'a mut FieldState, kind: FieldKind) -> Self {
        state.clamp_to(text);
        Self {
            text,
            state,
            kind,
            label: "",
            placeholder: "",
            focused: false,
        }
    }

    pub fn label(mut self, label: &'a str) -> Self {
        self.label = label;
        self
    }

    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = placeholder;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    fn insert(&mut self, s: &str) -> FieldEvent {
        let mut next = String::with_capacity(self.text.len() + s.len());
        next.push_str(&self.text[..self.state.cursor]);
        next.push_str(s);
        next.push_str(&self.text[self.state.cursor..]);
        self.state.cursor += s.len();
        FieldEvent::Changed(next)
    }

    fn remove(&mut self, start: usize, end: usize) -> FieldEvent {
        let mut next = String::with_capacity(self.text.len());
        next.push_str(&self.text[..start]);
        next.push_str(&self.text[end..]);
        self.state.cursor = start;
        FieldEvent::Changed(next)
    }

    fn move_to(&mut self, pos: usize) -> Option<FieldEvent> {
        (pos != self.state.cursor).then(|| {
            self.state.cursor = pos;
            FieldEvent::Moved
        })
    }

    fn move_vertically(&mut self, down: bool) -> Option<FieldEvent> {
        let rows = layout_rows(self.text, self.state.last_width);
        let current = cursor_row(&rows, self.state.cursor);
        let target = if down {
            current + 1
        } else {
            current.checked_sub(1)?
        };
        let target_row = *rows.get(target)?;
        let col = self.text[rows[current].start..self.state.cursor].width();
        let pos = offset_at_column(self.text, target_row, col);
        self.move_to(pos)
    }
}

impl EventHandler for TextField<'_> {
    type Event = FieldEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        let cursor = self.state.cursor;
        match event {
            TuiEvent::InputChar(c) => {
                let mut buf = [0u8; 4];
                Some(self.insert(c.encode_utf8(&mut buf)))
            }
            TuiEvent::Paste(text) => {
                let text = match self.kind {
                    FieldKind::SingleLine => text.replace(['\r', '\n'], " "),
                    FieldKind::MultiLine => text.replace("\r\n", "\n"),
                };
                (!text.is_empty()).then(|| self.insert(&text))
            }
            TuiEvent::Enter => match self.kind {
                FieldKind::SingleLine => Some(FieldEvent::Advance),
                FieldKind::MultiLine => Some(self.insert("\n")),
            },
            TuiEvent::Backspace => {
                (cursor > 0).then(|| self.remove(prev_boundary(self.text, cursor), cursor))
            }
            TuiEvent::Delete => (cursor < self.text.len())
                .then(|| self.remove(cursor, next_boundary(self.text, cursor))),
            TuiEvent::CursorLeft => self.move_to(prev_boundary(self.text, cursor)),
            TuiEvent::CursorRight => self.move_to(next_boundary(self.text, cursor)),
            TuiEvent::CursorHome => {
                let line_start = self.text[..cursor].rfind('\n').map(|i| i + 1).unwrap_or(0);
                self.move_to(line_start)
            }
            TuiEvent::CursorEnd => {
                let line_end = self.text[cursor..]
                    .find('\n')
                    .map(|i| cursor + i)
                    .unwrap_or(self.text.len());
                self.move_to(line_end)
            }
            TuiEvent::CursorUp if self.kind == FieldKind::MultiLine => self.move_vertically(false),
            TuiEvent::CursorDown if self.kind == FieldKind::MultiLine => self.move_vertically(true),
            _ => None,
        }
    }
}

impl Component for TextField<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let inner_width = area.width.saturating_sub(2);
        let visible_rows = area.height.saturating_sub(2).max(1);
        self.state.last_width = inner_width;

        let rows = layout_rows(self.text, inner_width);
        let row_idx = cursor_row(&rows, self.state.cursor) as u16;
        if row_idx < self.state.scroll {
            self.state.scroll = row_idx;
        } else if row_idx >= self.state.scroll + visible_rows {
            self.state.scroll = row_idx + 1 - visible_rows;
        }

        let lines: Vec<Line> = if self.text.is_empty() {
            vec![Line::styled(self.placeholder, Style::default().fg(Color::DarkGray))]
        } else {
            rows.iter()
                .skip(usize::from(self.state.scroll))
                .take(usize::from(visible_rows))
                .map(|r| Line::raw(&self.text[r.start..r.end]))
                .collect()
        };

        let border_style = if self.focused {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(self.label);

        frame.render_widget(Paragraph::new(lines).block(block), area);

        if self.focused && inner_width > 0 {
            let row = rows[usize::from(row_idx)];
            let col = (self.text[row.start..self.state.cursor].width() as u16).min(inner_width - 1);
            frame.set_cursor_position((
                area.x + 1 + col,
                area.y + 1 + (row_idx - self.state.scroll),
            ));
        }
    }
}
