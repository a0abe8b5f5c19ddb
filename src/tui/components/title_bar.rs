//! # TitleBar Component
//!
//! Top status bar: app name, note count, edit mode, in-flight requests and
//! the transient status message.
//!
//! Stateless: everything it shows is passed in as props.
//!
//! ```text
//! Notekeeper | 3 notes | editing #2 | saving (1) | Title is required
//! ```
//!
//! Request failures are not shown here. They go to the log.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::api::NoteId;
use crate::tui::component::Component;

pub struct TitleBar {
    pub note_count: usize,
    pub editing: Option<NoteId>,
    pub pending: usize,
    pub status_message: String,
}

impl TitleBar {
    pub fn new(
        note_count: usize,
        editing: Option<NoteId>,
        pending: usize,
        status_message: String,
    ) -> Self {
        Self {
            note_count,
            editing,
            pending,
            status_message,
        }
    }

    fn segments(&self) -> Vec<String> {
        let mut parts = vec![match self.note_count {
            1 => "1 note".to_string(),
            n => format!("{n} notes"),
        }];
        if let Some(id) = self.editing {
            parts.push(format!("editing #{id}"));
        }
        if self.pending > 0 {
            parts.push(format!("saving ({})", self.pending));
        }
        if !self.status_message.is_empty() {
            parts.push(self.status_message.clone());
        }
        parts
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![Span::styled(
            "Notekeeper",
            Style::default()
                .fg(Color::Black)
                .bg(Color::LightGreen)
                .add_modifier(Modifier::BOLD),
        )];
        for part in self.segments() {
            spans.push(Span::styled(" | ", Style::default().fg(Color::DarkGray)));
            spans.push(Span::raw(part));
        }

        frame.render_widget(Line::from(spans), area);
    }
}
