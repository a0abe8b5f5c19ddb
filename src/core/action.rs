//! # Actions
//!
//! Everything that can happen in Notekeeper becomes an `Action`.
//! User presses Ctrl+S? That's `Action::Submit`.
//! Server answers the create? That's `Action::NoteCreated(result)`.
//!
//! The `update()` function takes the current state and an action, mutates the
//! state, and returns an `Effect` describing the I/O the caller must perform.
//! No I/O happens here.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//!                                             │
//!                       effects::perform() ◄──┘
//!                                │
//!                  completion Action → update()
//! ```
//!
//! Requests are never cancelled and nothing serializes them. A completion
//! is applied whenever it arrives, keyed by the id captured when the request
//! was issued; the last one to land wins.

use log::{debug, info, warn};

use crate::api::{Note, NoteDraft, NoteId, ServiceError};
use crate::core::state::{App, DraftError};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Board mounted: fetch the list.
    Load,
    NotesLoaded(Result<Vec<Note>, ServiceError>),
    EditTitle(String),
    EditContent(String),
    SelectNote(Note),
    Submit,
    NoteCreated(Result<Note, ServiceError>),
    NoteUpdated {
        id: NoteId,
        result: Result<Note, ServiceError>,
    },
    Cancel,
    DeleteNote(NoteId),
    NoteDeleted {
        id: NoteId,
        result: Result<(), ServiceError>,
    },
    Quit,
}

impl Action {
    /// The service failure carried by a completion action, if any.
    pub fn failure(&self) -> Option<&ServiceError> {
        match self {
            Action::NotesLoaded(Err(e))
            | Action::NoteCreated(Err(e))
            | Action::NoteUpdated { result: Err(e), .. }
            | Action::NoteDeleted { result: Err(e), .. } => Some(e),
            _ => None,
        }
    }
}

/// I/O requested by `update()`.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    Quit,
    FetchNotes,
    CreateNote(NoteDraft),
    UpdateNote { id: NoteId, draft: NoteDraft },
    DeleteNote(NoteId),
    /// Submit refused by the required-field check; nothing was sent.
    Rejected(DraftError),
}

impl Effect {
    /// Whether this effect issues a request to the notes service.
    pub fn is_request(&self) -> bool {
        matches!(
            self,
            Effect::FetchNotes | Effect::CreateNote(_) | Effect::UpdateNote { .. } | Effect::DeleteNote(_)
        )
    }
}

pub fn update(app: &mut App, action: Action) -> Effect {
    let effect = match action {
        Action::Load => {
            app.status_message = String::from("Loading notes...");
            Effect::FetchNotes
        }
        Action::NotesLoaded(result) => {
            complete(app);
            match result {
                Ok(notes) => {
                    info!("Loaded {} notes", notes.len());
                    app.notes.replace_all(notes);
                    app.status_message = String::new();
                }
                Err(e) => {
                    // The list stays as it was (empty at startup); no retry.
                    record_failure(app, "load notes", &e);
                    app.status_message = String::new();
                }
            }
            Effect::None
        }
        Action::EditTitle(title) => {
            app.editor.title = title;
            Effect::None
        }
        Action::EditContent(content) => {
            app.editor.content = content;
            Effect::None
        }
        Action::SelectNote(note) => {
            debug!("Selected note {}", note.id);
            app.editor.load(&note);
            Effect::None
        }
        Action::Submit => match app.editor.draft() {
            Err(reason) => {
                debug!("Submit rejected: {}", reason);
                app.status_message = reason.to_string();
                Effect::Rejected(reason)
            }
            Ok(draft) => {
                app.status_message = String::new();
                match app.editor.editing {
                    Some(id) => Effect::UpdateNote { id, draft },
                    None => Effect::CreateNote(draft),
                }
            }
        },
        Action::NoteCreated(result) => {
            complete(app);
            match result {
                Ok(note) => {
                    info!("Created note {}", note.id);
                    app.notes.prepend(note);
                    app.editor.clear_fields();
                }
                Err(e) => record_failure(app, "create note", &e),
            }
            Effect::None
        }
        Action::NoteUpdated { id, result } => {
            complete(app);
            match result {
                Ok(note) => {
                    let replaced = app.notes.replace(id, &note);
                    info!("Updated note {} ({} entries replaced)", id, replaced);
                    // Clears whatever is in the editor now, even if a different
                    // note was selected while this request was in flight.
                    app.editor.clear();
                }
                Err(e) => record_failure(app, "update note", &e),
            }
            Effect::None
        }
        Action::Cancel => {
            app.editor.clear();
            app.status_message = String::new();
            Effect::None
        }
        Action::DeleteNote(id) => Effect::DeleteNote(id),
        Action::NoteDeleted { id, result } => {
            complete(app);
            match result {
                // Only a confirmed delete touches the list.
                Ok(()) => {
                    let removed = app.notes.remove(id);
                    info!("Deleted note {} ({} entries removed)", id, removed);
                }
                Err(e) => record_failure(app, "delete note", &e),
            }
            Effect::None
        }
        Action::Quit => Effect::Quit,
    };

    if effect.is_request() {
        app.pending += 1;
    }
    effect
}

fn complete(app: &mut App) {
    app.pending = app.pending.saturating_sub(1);
}

fn record_failure(app: &mut App, what: &str, error: &ServiceError) {
    warn!("Failed to {}: {}", what, error);
    app.last_error = Some(format!("{what}: {error}"));
}
