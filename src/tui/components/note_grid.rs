//! # NoteGrid Component
//!
//! Scrollable grid of note cards. Each card shows the title, a wrapped
//! preview of the content, and a `[x]` delete affordance in its top border.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `NoteGridState` lives in `TuiState`
//! - `NoteGrid` is created each frame with the borrowed notes
//!
//! Selection and deletion are separate targets. `GridGeometry::hit` maps a
//! point to exactly one of `GridHit::Delete` (the `[x]` cells) or
//! `GridHit::Select` (anywhere else on the card), so a delete click can
//! never also select the card underneath it.

use ratatui::Frame;
use ratatui::layout::{Alignment, Position, Rect, Size};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Paragraph};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::api::{Note, NoteId};
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

pub const CARD_HEIGHT: u16 = 7;
pub const CARD_MIN_WIDTH: u16 = 24;
pub const DELETE_LABEL: &str = "[x]";

/// Rows that fit in a `u16`-tall scroll buffer. Cards past this are not laid out.
const MAX_ROWS: usize = (u16::MAX / CARD_HEIGHT) as usize;

/// What a point inside the grid lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridHit {
    Select(usize),
    Delete(usize),
}

/// Card placement for a given content width, in scroll-content coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridGeometry {
    pub columns: u16,
    pub card_width: u16,
}

impl GridGeometry {
    pub fn for_width(width: u16) -> Self {
        let columns = (width / CARD_MIN_WIDTH).max(1);
        Self {
            columns,
            card_width: (width / columns).max(1),
        }
    }

    /// How many cards can be laid out at this width.
    pub fn capacity(&self) -> usize {
        MAX_ROWS * usize::from(self.columns)
    }

    pub fn content_height(&self, count: usize) -> u16 {
        let rows = count
            .min(self.capacity())
            .div_ceil(usize::from(self.columns));
        // rows <= MAX_ROWS, so this fits
        rows as u16 * CARD_HEIGHT
    }

    /// Card position for `index`. Indices at or past `capacity()` are pinned
    /// to the last row.
    pub fn card_rect(&self, index: usize) -> Rect {
        let columns = usize::from(self.columns);
        let col = (index % columns) as u16;
        let row = (index / columns).min(MAX_ROWS - 1) as u16;
        Rect::new(col * self.card_width, row * CARD_HEIGHT, self.card_width, CARD_HEIGHT)
    }

    /// Cells of the `[x]` label: right-aligned in the top border, inside the corner.
    pub fn delete_rect(&self, index: usize) -> Rect {
        let card = self.card_rect(index);
        let label_width = DELETE_LABEL.len() as u16;
        Rect::new(
            card.right().saturating_sub(1 + label_width),
            card.y,
            label_width,
            1,
        )
    }

    pub fn hit(&self, x: u16, y: u16, count: usize) -> Option<GridHit> {
        let col = x / self.card_width;
        if col >= self.columns {
            return None;
        }
        let row = y / CARD_HEIGHT;
        let index = usize::from(row) * usize::from(self.columns) + usize::from(col);
        if index >= count.min(self.capacity()) {
            return None;
        }
        if self.delete_rect(index).contains(Position::new(x, y)) {
            Some(GridHit::Delete(index))
        } else {
            Some(GridHit::Select(index))
        }
    }
}

/// Events emitted by the grid.
#[derive(Debug, Clone, PartialEq)]
pub enum GridEvent {
    Select(Note),
    Delete(NoteId),
}

/// Persistent state for the grid.
pub struct NoteGridState {
    /// Highlighted card (keyboard cursor)
    pub selected: usize,
    /// Note under the highlight, so it survives inserts and removals above it
    anchor: Option<NoteId>,
    pub scroll_state: ScrollViewState,
    /// Layout from the last render, for hit testing and keyboard movement
    pub geometry: GridGeometry,
    pub area: Rect,
}

impl NoteGridState {
    pub fn new() -> Self {
        Self {
            selected: 0,
            anchor: None,
            scroll_state: ScrollViewState::default(),
            geometry: GridGeometry::for_width(CARD_MIN_WIDTH),
            area: Rect::default(),
        }
    }

    /// Highlight `index` in `notes`.
    pub fn select(&mut self, index: usize, notes: &[Note]) {
        self.selected = index;
        self.anchor = notes.get(index).map(|n| n.id);
    }

    /// Follow the highlighted note after the list changed. If it is gone,
    /// keep the position, clamped to the list.
    pub fn sync(&mut self, notes: &[Note]) {
        if let Some(id) = self.anchor
            && let Some(index) = notes.iter().position(|n| n.id == id)
        {
            self.selected = index;
        }
        let last = notes.len().min(self.geometry.capacity()).saturating_sub(1);
        self.select(self.selected.min(last), notes);
    }

    /// Map a screen position to a card target, using the last rendered layout.
    pub fn hit_test(&self, column: u16, row: u16, count: usize) -> Option<GridHit> {
        if !self.area.contains(Position::new(column, row)) {
            return None;
        }
        let x = column - self.area.x;
        let y = (row - self.area.y).saturating_add(self.scroll_state.offset().y);
        self.geometry.hit(x, y, count)
    }

    pub fn scroll_to_selected(&mut self) {
        let card = self.geometry.card_rect(self.selected);
        let offset_y = self.scroll_state.offset().y;
        let viewport = self.area.height;

        if card.y < offset_y {
            self.scroll_state.set_offset(Position { x: 0, y: card.y });
        } else if viewport > 0 && card.bottom() > offset_y.saturating_add(viewport) {
            let new_y = card.bottom().saturating_sub(viewport);
            self.scroll_state.set_offset(Position { x: 0, y: new_y });
        }
    }

    fn move_by(&mut self, delta: isize, notes: &[Note]) {
        let count = notes.len().min(self.geometry.capacity());
        let target = self.selected as isize + delta;
        if (0..count as isize).contains(&target) {
            self.select(target as usize, notes);
            self.scroll_to_selected();
        }
    }
}

impl Default for NoteGridState {
    fn default() -> Self {
        Self::new()
    }
}

/// Transient render/event wrapper for the grid.
pub struct NoteGrid<'a> {
    notes: &'a [Note],
    state: &'a mut NoteGridState,
    focused: bool,
    editing: Option<NoteId>,
}

impl<'a> NoteGrid<'a> {
    pub fn new(notes: &'a [Note], state: &'a mut NoteGridState) -> Self {
        state.sync(notes);
        Self {
            notes,
            state,
            focused: false,
            editing: None,
        }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn editing(mut self, editing: Option<NoteId>) -> Self {
        self.editing = editing;
        self
    }

    fn card<'n>(&self, index: usize, note: &'n Note, width: u16) -> Paragraph<'n> {
        let inner_width = usize::from(width.saturating_sub(2));
        let title_width = inner_width.saturating_sub(DELETE_LABEL.len() + 1);

        let border_style = if self.focused && index == self.state.selected {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else if self.editing == Some(note.id) {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(Line::from(truncate_to_width(&note.title, title_width)).style(
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ))
            .title(Line::from(DELETE_LABEL).right_aligned().style(Style::default().fg(Color::Red)));

        Paragraph::new(preview_lines(&note.content, inner_width))
            .style(Style::default().fg(Color::Gray))
            .block(block)
    }
}

impl EventHandler for NoteGrid<'_> {
    type Event = GridEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        let notes = self.notes;
        let count = notes.len().min(self.state.geometry.capacity());
        let columns = self.state.geometry.columns as isize;
        let selected = self.state.selected as isize;
        match event {
            TuiEvent::CursorLeft => self.state.move_by(-1, notes),
            TuiEvent::CursorRight => self.state.move_by(1, notes),
            TuiEvent::CursorUp => self.state.move_by(-columns, notes),
            TuiEvent::CursorDown => self.state.move_by(columns, notes),
            TuiEvent::CursorHome => self.state.move_by(-selected, notes),
            TuiEvent::CursorEnd => {
                let last = count.saturating_sub(1) as isize;
                self.state.move_by(last - selected, notes)
            }
            TuiEvent::PageUp => self.state.scroll_state.scroll_page_up(),
            TuiEvent::PageDown => self.state.scroll_state.scroll_page_down(),
            TuiEvent::Enter => {
                return self
                    .notes
                    .get(self.state.selected)
                    .map(|note| GridEvent::Select(note.clone()));
            }
            TuiEvent::InputChar('x') | TuiEvent::Delete => {
                return self
                    .notes
                    .get(self.state.selected)
                    .map(|note| GridEvent::Delete(note.id));
            }
            _ => {}
        }
        None
    }
}

impl Component for NoteGrid<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.state.area = area;

        if self.notes.is_empty() {
            let empty = Paragraph::new("No notes yet. Write one above and press Ctrl+S.")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center);
            frame.render_widget(empty, area);
            return;
        }

        // One column reserved for the scrollbar
        let content_width = area.width.saturating_sub(1);
        let geometry = GridGeometry::for_width(content_width);
        self.state.geometry = geometry;
        self.state.sync(self.notes);
        let total_height = geometry.content_height(self.notes.len());

        let max_offset = total_height.saturating_sub(area.height);
        if self.state.scroll_state.offset().y > max_offset {
            self.state.scroll_state.set_offset(Position { x: 0, y: max_offset });
        }

        let mut scroll_view = ScrollView::new(Size::new(content_width, total_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        // Only cards intersecting the viewport
        let top = self.state.scroll_state.offset().y;
        let bottom = top.saturating_add(area.height);
        let columns = usize::from(geometry.columns);
        let first = usize::from(top / CARD_HEIGHT) * columns;
        let last = (usize::from(bottom.div_ceil(CARD_HEIGHT)) * columns)
            .min(self.notes.len())
            .min(geometry.capacity());
        for (index, note) in self.notes.iter().enumerate().take(last).skip(first) {
            let rect = geometry.card_rect(index);
            scroll_view.render_widget(self.card(index, note, rect.width), rect);
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);
    }
}

/// Wrapped content lines that fit inside a card, with an ellipsis when cut.
fn preview_lines(content: &str, width: usize) -> Vec<Line<'static>> {
    let max_lines = usize::from(CARD_HEIGHT - 2);
    if width == 0 {
        return Vec::new();
    }
    let wrapped = textwrap::wrap(content, width);
    let truncated = wrapped.len() > max_lines;
    let mut lines: Vec<String> = wrapped
        .into_iter()
        .take(max_lines)
        .map(|l| l.into_owned())
        .collect();
    if truncated && let Some(last) = lines.last_mut() {
        *last = truncate_to_width(&format!("{last}…"), width);
    }
    lines.into_iter().map(Line::from).collect()
}

/// Cut `s` to at most `max` display columns, marking the cut with `…`.
fn truncate_to_width(s: &str, max: usize) -> String {
    if s.width() <= max {
        return s.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}
