//! # NoteBoard
//!
//! Awaitable façade over `App` + `update()` + `perform()`. Each operation
//! dispatches its action, runs the resulting request to completion, and
//! feeds the completion back through the reducer, so the state transitions
//! are exactly the ones the TUI sees.
//!
//! Used by the non-interactive subcommands and by tests. Unlike the TUI,
//! requests here never overlap.

use std::fmt;
use std::sync::Arc;

use crate::api::{Note, NoteId, NotesService, ServiceError};
use crate::core::action::{Action, Effect, update};
use crate::core::effects::perform;
use crate::core::state::{App, DraftError, Editor, NoteList};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// Submit refused locally; no request was sent.
    Rejected(DraftError),
    Service(ServiceError),
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardError::Rejected(reason) => write!(f, "{reason}"),
            BoardError::Service(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for BoardError {}

impl From<ServiceError> for BoardError {
    fn from(e: ServiceError) -> Self {
        BoardError::Service(e)
    }
}

pub struct NoteBoard {
    app: App,
    service: Arc<dyn NotesService>,
}

impl NoteBoard {
    pub fn new(service: Arc<dyn NotesService>) -> Self {
        Self {
            app: App::new(),
            service,
        }
    }

    /// Board over an already-known list, skipping `load()`.
    pub fn with_notes(service: Arc<dyn NotesService>, notes: Vec<Note>) -> Self {
        Self {
            app: App::with_notes(notes),
            service,
        }
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    pub fn notes(&self) -> &NoteList {
        &self.app.notes
    }

    pub fn editor(&self) -> &Editor {
        &self.app.editor
    }

    /// Apply an action and drive any request it causes to completion.
    async fn dispatch(&mut self, action: Action) -> Result<(), BoardError> {
        let effect = update(&mut self.app, action);
        if let Effect::Rejected(reason) = effect {
            return Err(BoardError::Rejected(reason));
        }
        if let Some(completion) = perform(self.service.as_ref(), effect).await {
            let failure = completion.failure().cloned();
            update(&mut self.app, completion);
            if let Some(e) = failure {
                return Err(BoardError::Service(e));
            }
        }
        Ok(())
    }

    /// Replace the list with the server's. On failure the list is untouched.
    pub async fn load(&mut self) -> Result<(), BoardError> {
        self.dispatch(Action::Load).await
    }

    pub fn select_note(&mut self, note: &Note) {
        update(&mut self.app, Action::SelectNote(note.clone()));
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        update(&mut self.app, Action::EditTitle(title.into()));
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        update(&mut self.app, Action::EditContent(content.into()));
    }

    /// Create or update depending on whether a note is selected.
    pub async fn submit(&mut self) -> Result<(), BoardError> {
        self.dispatch(Action::Submit).await
    }

    pub fn cancel(&mut self) {
        update(&mut self.app, Action::Cancel);
    }

    pub async fn delete_note(&mut self, id: NoteId) -> Result<(), BoardError> {
        self.dispatch(Action::DeleteNote(id)).await
    }
}
