//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the board,
//! and translates keyboard and mouse events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Requests
//!
//! Request effects returned by `update()` run in spawned tokio tasks. Each
//! task sends its completion `Action` back over a channel that the loop
//! drains between polls. Nothing waits on a request, so the user can keep
//! editing, selecting and deleting while saves are in flight.
//!
//! ## Redraw Strategy
//!
//! - **Requests pending**: polls every ~80ms so completions show up promptly.
//! - **Idle**: sleeps up to 500ms, only redraws on events or terminal resize.
//!
//! A `SteadyBlock` cursor style is used instead of a blinking cursor because
//! ratatui's `set_cursor_position` resets the terminal's blink timer on every
//! `draw()` call.

mod component;
mod components;
mod event;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::Duration;

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;

use crate::api::{Note, NotesService};
use crate::core::action::{Action, Effect, update};
use crate::core::effects;
use crate::core::state::{App, DraftError};
use crate::tui::component::EventHandler;
use crate::tui::components::{
    FieldEvent, FieldKind, FieldState, GridEvent, GridHit, NoteGrid, NoteGridState, TextField,
};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};
use crate::tui::ui::{ScreenHit, ScreenLayout};

/// Which part of the screen receives keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Title,
    Content,
    Grid,
}

impl Focus {
    pub fn next(self) -> Self {
        match self {
            Focus::Title => Focus::Content,
            Focus::Content => Focus::Grid,
            Focus::Grid => Focus::Title,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Focus::Title => Focus::Grid,
            Focus::Content => Focus::Title,
            Focus::Grid => Focus::Content,
        }
    }
}

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub focus: Focus,
    pub title_field: FieldState,
    pub content_field: FieldState,
    pub grid: NoteGridState,
    /// Regions from the last draw
    pub layout: ScreenLayout,
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            focus: Focus::Title, // User expects to type immediately
            title_field: FieldState::new(),
            content_field: FieldState::new(),
            grid: NoteGridState::new(),
            layout: ScreenLayout::default(),
        }
    }

    /// Put both fields' cursors at the end of a freshly loaded note.
    fn load_note(&mut self, note: &Note) {
        self.title_field.move_to_end(&note.title);
        self.content_field.move_to_end(&note.content);
        self.focus = Focus::Title;
    }
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
            // Harmlessly ignored by terminals without the Kitty protocol
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, steady block cursor, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide
        );
    }
}

pub fn run(service: Arc<dyn NotesService>) -> std::io::Result<()> {
    info!("Starting TUI against {}", service.name());
    let mut app = App::new();
    let mut tui = TuiState::new();

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = match TerminalModeGuard::new() {
        Ok(guard) => Some(guard),
        Err(e) => {
            warn!("Failed to enable terminal modes: {}", e);
            None
        }
    };

    // Completions from background request tasks
    let (tx, rx) = mpsc::channel();

    let mut should_quit = apply(&mut app, &mut tui, Action::Load, &service, &tx);
    let mut needs_redraw = true; // Force first frame

    while !should_quit {
        if needs_redraw {
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui))?;
            needs_redraw = false;
        }

        // Completions are only drained between polls
        let timeout = if app.pending > 0 {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(500)
        };
        // Process first event + drain ALL pending events before next draw.
        // The first poll can come back empty on an ignored event (key release,
        // mouse move) while real input is still queued behind it.
        let events = poll_event_timeout(timeout)
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate));
        let step = handle_events(&mut app, &mut tui, events, &service, &tx);
        needs_redraw |= step.redraw;
        should_quit |= step.quit;

        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            should_quit |= apply(&mut app, &mut tui, action, &service, &tx);
        }
    }

    ratatui::restore();
    info!("TUI exited");
    Ok(())
}

/// Outcome of one batch of terminal events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct LoopStep {
    redraw: bool,
    quit: bool,
}

/// Route and apply every event in `events`, stopping early on quit.
fn handle_events(
    app: &mut App,
    tui: &mut TuiState,
    events: impl Iterator<Item = TuiEvent>,
    service: &Arc<dyn NotesService>,
    tx: &mpsc::Sender<Action>,
) -> LoopStep {
    let mut step = LoopStep::default();
    for event in events {
        step.redraw = true;
        if let Some(action) = route_event(app, tui, &event)
            && apply(app, tui, action, service, tx)
        {
            step.quit = true;
            break;
        }
    }
    step
}

/// Run an action through `update()` and act on its effect. Returns true to quit.
fn apply(
    app: &mut App,
    tui: &mut TuiState,
    action: Action,
    service: &Arc<dyn NotesService>,
    tx: &mpsc::Sender<Action>,
) -> bool {
    match update(app, action) {
        Effect::Quit => return true,
        Effect::None => {}
        // Send the user to the field that needs filling
        Effect::Rejected(DraftError::EmptyTitle) => tui.focus = Focus::Title,
        Effect::Rejected(DraftError::EmptyContent) => tui.focus = Focus::Content,
        request => spawn_effect(service.clone(), request, tx.clone()),
    }
    false
}

fn spawn_effect(service: Arc<dyn NotesService>, effect: Effect, tx: mpsc::Sender<Action>) {
    info!("Spawning request: {:?}", effect);
    tokio::spawn(async move {
        if let Some(action) = effects::perform(service.as_ref(), effect).await
            && tx.send(action).is_err()
        {
            warn!("Failed to send request completion: receiver dropped");
        }
    });
}

/// Translate one terminal event into at most one core action, updating
/// presentation state (focus, cursors, grid highlight) along the way.
fn route_event(app: &App, tui: &mut TuiState, event: &TuiEvent) -> Option<Action> {
    match event {
        TuiEvent::Quit => Some(Action::Quit),
        TuiEvent::Submit => Some(Action::Submit),
        TuiEvent::Escape => Some(Action::Cancel),
        TuiEvent::Tab => {
            tui.focus = tui.focus.next();
            None
        }
        TuiEvent::BackTab => {
            tui.focus = tui.focus.prev();
            None
        }
        TuiEvent::Resize => None,
        TuiEvent::ScrollUp => {
            tui.grid.scroll_state.scroll_up();
            None
        }
        TuiEvent::ScrollDown => {
            tui.grid.scroll_state.scroll_down();
            None
        }
        TuiEvent::MouseClick(column, row) => route_click(app, tui, *column, *row),
        _ => route_to_focused(app, tui, event),
    }
}

fn route_click(app: &App, tui: &mut TuiState, column: u16, row: u16) -> Option<Action> {
    // Card targets first: a click on [x] deletes and does nothing else
    match tui.grid.hit_test(column, row, app.notes.len()) {
        Some(GridHit::Delete(index)) => {
            return app.notes.get(index).map(|note| Action::DeleteNote(note.id));
        }
        Some(GridHit::Select(index)) => {
            let note = app.notes.get(index)?.clone();
            tui.grid.select(index, app.notes.as_slice());
            tui.load_note(&note);
            return Some(Action::SelectNote(note));
        }
        None => {}
    }

    match tui.layout.hit(column, row)? {
        ScreenHit::Submit => Some(Action::Submit),
        ScreenHit::Cancel => Some(Action::Cancel),
        ScreenHit::Title => {
            tui.focus = Focus::Title;
            None
        }
        ScreenHit::Content => {
            tui.focus = Focus::Content;
            None
        }
        ScreenHit::Grid => {
            tui.focus = Focus::Grid;
            None
        }
    }
}

fn route_to_focused(app: &App, tui: &mut TuiState, event: &TuiEvent) -> Option<Action> {
    match tui.focus {
        Focus::Title => {
            let field_event =
                TextField::new(&app.editor.title, &mut tui.title_field, FieldKind::SingleLine)
                    .handle_event(event)?;
            match field_event {
                FieldEvent::Changed(text) => Some(Action::EditTitle(text)),
                FieldEvent::Advance => {
                    tui.focus = Focus::Content;
                    None
                }
                FieldEvent::Moved => None,
            }
        }
        Focus::Content => {
            let field_event =
                TextField::new(&app.editor.content, &mut tui.content_field, FieldKind::MultiLine)
                    .handle_event(event)?;
            match field_event {
                FieldEvent::Changed(text) => Some(Action::EditContent(text)),
                FieldEvent::Advance | FieldEvent::Moved => None,
            }
        }
        Focus::Grid => {
            let grid_event =
                NoteGrid::new(app.notes.as_slice(), &mut tui.grid).handle_event(event)?;
            match grid_event {
                GridEvent::Select(note) => {
                    tui.load_note(&note);
                    Some(Action::SelectNote(note))
                }
                GridEvent::Delete(id) => Some(Action::DeleteNote(id)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::NoteId;
    use crate::tui::components::note_grid::GridGeometry;
    use ratatui::layout::Rect;

    fn notes() -> Vec<Note> {
        vec![
            Note::new(1, "A", "alpha"),
            Note::new(2, "B", "beta"),
            Note::new(3, "C", "gamma"),
        ]
    }

    /// Grid placed at y=10 with two 24-wide columns (plus scrollbar column).
    fn tui_with_grid() -> TuiState {
        let mut tui = TuiState::new();
        tui.grid.area = Rect::new(0, 10, 49, 14);
        tui.grid.geometry = GridGeometry::for_width(48);
        tui.layout.grid = tui.grid.area;
        tui
    }

    #[test]
    fn test_focus_cycles() {
        assert_eq!(Focus::Title.next(), Focus::Content);
        assert_eq!(Focus::Grid.next(), Focus::Title);
        assert_eq!(Focus::Title.prev(), Focus::Grid);
    }

    #[test]
    fn test_typing_in_title_edits_title() {
        let app = App::with_notes(vec![]);
        let mut tui = TuiState::new();
        let action = route_event(&app, &mut tui, &TuiEvent::InputChar('h'));
        assert_eq!(action, Some(Action::EditTitle("h".into())));
    }

    #[test]
    fn test_enter_in_title_moves_to_content() {
        let app = App::with_notes(vec![]);
        let mut tui = TuiState::new();
        assert_eq!(route_event(&app, &mut tui, &TuiEvent::Enter), None);
        assert_eq!(tui.focus, Focus::Content);

        let action = route_event(&app, &mut tui, &TuiEvent::Enter);
        assert_eq!(action, Some(Action::EditContent("\n".into())));
    }

    #[test]
    fn test_global_keys() {
        let app = App::with_notes(vec![]);
        let mut tui = TuiState::new();
        assert_eq!(route_event(&app, &mut tui, &TuiEvent::Submit), Some(Action::Submit));
        assert_eq!(route_event(&app, &mut tui, &TuiEvent::Escape), Some(Action::Cancel));
        assert_eq!(route_event(&app, &mut tui, &TuiEvent::Quit), Some(Action::Quit));
    }

    #[test]
    fn test_delete_click_never_selects() {
        let app = App::with_notes(notes());
        let mut tui = tui_with_grid();
        tui.focus = Focus::Content;
        tui.grid.select(2, &notes());

        // [x] of card 1 (second column) spans x 44..47 on its top border row
        let action = route_event(&app, &mut tui, &TuiEvent::MouseClick(45, 10));

        assert_eq!(action, Some(Action::DeleteNote(NoteId(2))));
        assert_eq!(tui.focus, Focus::Content);
        assert_eq!(tui.grid.selected, 2);
    }

    #[test]
    fn test_card_click_selects_and_focuses_title() {
        let app = App::with_notes(notes());
        let mut tui = tui_with_grid();
        tui.focus = Focus::Grid;

        let action = route_event(&app, &mut tui, &TuiEvent::MouseClick(3, 18));

        assert_eq!(action, Some(Action::SelectNote(Note::new(3, "C", "gamma"))));
        assert_eq!(tui.grid.selected, 2);
        assert_eq!(tui.focus, Focus::Title);
        assert_eq!(tui.title_field.cursor, 1);
        assert_eq!(tui.content_field.cursor, 5);
    }

    #[test]
    fn test_click_below_last_card_focuses_grid() {
        let app = App::with_notes(notes());
        let mut tui = tui_with_grid();
        let action = route_event(&app, &mut tui, &TuiEvent::MouseClick(30, 20));
        assert_eq!(action, None);
        assert_eq!(tui.focus, Focus::Grid);
    }

    #[test]
    fn test_submit_button_click() {
        let app = App::with_notes(vec![]);
        let mut tui = TuiState::new();
        tui.layout.submit_button = Rect::new(0, 11, 10, 1);
        let action = route_event(&app, &mut tui, &TuiEvent::MouseClick(4, 11));
        assert_eq!(action, Some(Action::Submit));
    }

    #[test]
    fn test_grid_keys_select_and_delete() {
        let app = App::with_notes(notes());
        let mut tui = tui_with_grid();
        tui.focus = Focus::Grid;

        assert_eq!(route_event(&app, &mut tui, &TuiEvent::CursorRight), None);
        assert_eq!(
            route_event(&app, &mut tui, &TuiEvent::InputChar('x')),
            Some(Action::DeleteNote(NoteId(2)))
        );
        assert_eq!(tui.focus, Focus::Grid);

        let action = route_event(&app, &mut tui, &TuiEvent::Enter);
        assert_eq!(action, Some(Action::SelectNote(Note::new(2, "B", "beta"))));
        assert_eq!(tui.focus, Focus::Title);
    }

    #[test]
    fn test_events_after_ignored_poll_still_redraw() {
        let mut app = App::with_notes(vec![]);
        let mut tui = TuiState::new();
        let service: Arc<dyn NotesService> = Arc::new(crate::test_support::MockNotesService::new());
        let (tx, _rx) = mpsc::channel();

        // Blocking poll saw only a key release; the keypress came from the drain
        let first: Option<TuiEvent> = None;
        let events = first.into_iter().chain([TuiEvent::InputChar('c')]);
        let step = handle_events(&mut app, &mut tui, events, &service, &tx);

        assert_eq!(step, LoopStep { redraw: true, quit: false });
        assert_eq!(app.editor.title, "c");
    }

    #[test]
    fn test_no_events_no_redraw_and_quit_stops_batch() {
        let mut app = App::with_notes(vec![]);
        let mut tui = TuiState::new();
        let service: Arc<dyn NotesService> = Arc::new(crate::test_support::MockNotesService::new());
        let (tx, _rx) = mpsc::channel();

        let step = handle_events(&mut app, &mut tui, std::iter::empty(), &service, &tx);
        assert_eq!(step, LoopStep::default());

        let events = [TuiEvent::Quit, TuiEvent::InputChar('z')].into_iter();
        let step = handle_events(&mut app, &mut tui, events, &service, &tx);
        assert!(step.quit);
        assert_eq!(app.editor.title, "");
    }

    #[test]
    fn test_grid_highlight_follows_note_after_create() {
        let mut app = App::with_notes(notes());
        let mut tui = tui_with_grid();
        tui.focus = Focus::Grid;
        tui.grid.select(1, app.notes.as_slice());

        update(&mut app, Action::NoteCreated(Ok(Note::new(4, "D", "delta"))));

        let action = route_event(&app, &mut tui, &TuiEvent::Delete);
        assert_eq!(action, Some(Action::DeleteNote(NoteId(2))));
    }

    #[test]
    fn test_rejected_submit_focuses_missing_field() {
        let mut app = App::with_notes(vec![]);
        let mut tui = TuiState::new();
        let service: Arc<dyn NotesService> = Arc::new(crate::test_support::MockNotesService::new());
        let (tx, _rx) = mpsc::channel();

        update(&mut app, Action::EditTitle("T".into()));
        tui.focus = Focus::Grid;
        assert!(!apply(&mut app, &mut tui, Action::Submit, &service, &tx));
        assert_eq!(tui.focus, Focus::Content);
        assert_eq!(app.pending, 0);
    }

    #[tokio::test]
    async fn test_request_completion_arrives_on_channel() {
        let mut app = App::new();
        let mut tui = TuiState::new();
        let service: Arc<dyn NotesService> = Arc::new(
            crate::test_support::MockNotesService::with_notes(vec![Note::new(1, "A", "a")]),
        );
        let (tx, rx) = mpsc::channel();

        assert!(!apply(&mut app, &mut tui, Action::Load, &service, &tx));
        assert_eq!(app.pending, 1);

        let action = tokio::task::spawn_blocking(move || rx.recv_timeout(Duration::from_secs(5)))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(action, Action::NotesLoaded(Ok(vec![Note::new(1, "A", "a")])));
    }
}
