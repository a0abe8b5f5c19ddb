//! # TUI Components
//!
//! ## Stateless Components (Props-Based Rendering)
//!
//! - `TitleBar`: note count, edit mode, in-flight requests, status message
//!
//! ## Stateful Components (Event-Driven)
//!
//! Persistent state lives in `TuiState`; the component itself is a transient
//! wrapper built per frame or per event around borrowed data.
//!
//! - `TextField` / `FieldState`: title and content inputs
//! - `NoteGrid` / `NoteGridState`: scrollable card grid with select and delete
//!
//! Components never touch `App`. They emit events (`FieldEvent`,
//! `GridEvent`) and the event loop turns those into core `Action`s.
//!
//! ```text
//! components/
//! ├── mod.rs
//! ├── title_bar.rs
//! ├── text_field.rs
//! └── note_grid.rs
//! ```

mod title_bar;
pub use title_bar::TitleBar;

pub mod note_grid;
pub mod text_field;
pub use note_grid::{GridEvent, GridHit, NoteGrid, NoteGridState};
pub use text_field::{FieldEvent, FieldKind, FieldState, TextField};
