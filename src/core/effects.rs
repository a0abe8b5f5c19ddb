//! Executes request effects against a `NotesService`.
//!
//! `perform` is the only place the core touches the network. It returns the
//! completion `Action` to feed back into `update()`. The TUI calls it inside a
//! spawned task; `NoteBoard` awaits it inline.

use log::debug;

use crate::api::NotesService;
use crate::core::action::{Action, Effect};

/// Run the request behind `effect`, if any, and return its completion.
pub async fn perform(service: &dyn NotesService, effect: Effect) -> Option<Action> {
    let completion = match effect {
        Effect::FetchNotes => Action::NotesLoaded(service.list().await),
        Effect::CreateNote(draft) => Action::NoteCreated(service.create(&draft).await),
        Effect::UpdateNote { id, draft } => Action::NoteUpdated {
            id,
            result: service.update(id, &draft).await,
        },
        Effect::DeleteNote(id) => Action::NoteDeleted {
            id,
            result: service.delete(id).await,
        },
        Effect::None | Effect::Quit | Effect::Rejected(_) => return None,
    };
    debug!("{} service completed: {:?}", service.name(), completion);
    Some(completion)
}
