use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

use crate::core::state::App;
use crate::tui::component::Component;
use crate::tui::components::{FieldKind, NoteGrid, TextField, TitleBar};
use crate::tui::{Focus, TuiState};

const CONTENT_HEIGHT: u16 = 7;
const ADD_LABEL: &str = "[Add Note]";
const SAVE_LABEL: &str = "[Save]";
const CANCEL_LABEL: &str = "[Cancel]";
const HINT: &str = "Ctrl+S save · Esc cancel · Tab focus · x delete · Ctrl+C quit";

/// Screen regions from the last draw, used for mouse hit testing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScreenLayout {
    pub title: Rect,
    pub content: Rect,
    pub submit_button: Rect,
    /// Only present while editing an existing note
    pub cancel_button: Option<Rect>,
    pub grid: Rect,
}

/// What a mouse click outside the grid cards lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenHit {
    Title,
    Content,
    Submit,
    Cancel,
    Grid,
}

impl ScreenLayout {
    pub fn hit(&self, column: u16, row: u16) -> Option<ScreenHit> {
        let pos = Position::new(column, row);
        if self.submit_button.contains(pos) {
            Some(ScreenHit::Submit)
        } else if self.cancel_button.is_some_and(|r| r.contains(pos)) {
            Some(ScreenHit::Cancel)
        } else if self.title.contains(pos) {
            Some(ScreenHit::Title)
        } else if self.content.contains(pos) {
            Some(ScreenHit::Content)
        } else if self.grid.contains(pos) {
            Some(ScreenHit::Grid)
        } else {
            None
        }
    }
}

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState) {
    use Constraint::{Length, Min};
    let layout = Layout::vertical([Length(1), Length(3), Length(CONTENT_HEIGHT), Length(1), Min(0)]);
    let [title_bar_area, title_area, content_area, buttons_area, grid_area] =
        layout.areas(frame.area());

    TitleBar::new(
        app.notes.len(),
        app.editor.editing,
        app.pending,
        app.status_message.clone(),
    )
    .render(frame, title_bar_area);

    TextField::new(&app.editor.title, &mut tui.title_field, FieldKind::SingleLine)
        .label(" Title ")
        .placeholder("Title")
        .focused(tui.focus == Focus::Title)
        .render(frame, title_area);

    TextField::new(&app.editor.content, &mut tui.content_field, FieldKind::MultiLine)
        .label(" Content ")
        .placeholder("Write your note here...")
        .focused(tui.focus == Focus::Content)
        .render(frame, content_area);

    let (submit_button, cancel_button) = draw_buttons(frame, buttons_area, app.editor.is_editing());

    NoteGrid::new(app.notes.as_slice(), &mut tui.grid)
        .focused(tui.focus == Focus::Grid)
        .editing(app.editor.editing)
        .render(frame, grid_area);

    tui.layout = ScreenLayout {
        title: title_area,
        content: content_area,
        submit_button,
        cancel_button,
        grid: grid_area,
    };
}

/// Draw the button row and return the submit and (optional) cancel regions.
fn draw_buttons(frame: &mut Frame, area: Rect, editing: bool) -> (Rect, Option<Rect>) {
    let button_style = Style::default()
        .fg(Color::Black)
        .bg(Color::LightGreen)
        .add_modifier(Modifier::BOLD);
    let cancel_style = Style::default().fg(Color::Black).bg(Color::Gray);

    let submit_label = if editing { SAVE_LABEL } else { ADD_LABEL };
    let submit = button_rect(area, 0, submit_label);
    let mut spans = vec![Span::styled(submit_label, button_style)];

    let cancel = editing.then(|| {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(CANCEL_LABEL, cancel_style));
        button_rect(area, submit.width + 1, CANCEL_LABEL)
    });

    spans.push(Span::raw("  "));
    spans.push(Span::styled(HINT, Style::default().fg(Color::DarkGray)));

    frame.render_widget(Line::from(spans), area);
    (submit, cancel)
}

fn button_rect(area: Rect, offset: u16, label: &str) -> Rect {
    let x = area.x.saturating_add(offset);
    let width = (label.width() as u16).min(area.right().saturating_sub(x));
    Rect::new(x, area.y, width, area.height.min(1))
}
