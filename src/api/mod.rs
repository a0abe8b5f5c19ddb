pub mod http;
pub mod service;
pub mod types;

pub use http::HttpNotesService;
pub use service::{NotesService, ServiceError};
pub use types::{Note, NoteDraft, NoteId};
