//! # Application State
//!
//! Core business state for Notekeeper. Domain logic only, no TUI types.
//! Presentation state (focus, cursors, grid highlight) lives in `tui`.
//!
//! ```text
//! App
//! ├── notes: NoteList            // mirror of the server's list
//! ├── editor: Editor             // draft shown in the form
//! ├── status_message: String     // title bar text
//! ├── pending: usize             // requests issued, not yet completed
//! └── last_error: Option<String> // most recent failure (diagnostics only)
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use std::fmt;

use crate::api::{Note, NoteDraft, NoteId};

/// Ordered mirror of the server's notes. New notes go to the front.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteList {
    notes: Vec<Note>,
}

impl NoteList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole list, keeping the server's order.
    pub fn replace_all(&mut self, notes: Vec<Note>) {
        self.notes = notes;
    }

    pub fn prepend(&mut self, note: Note) {
        self.notes.insert(0, note);
    }

    /// Swap every entry whose id is `id` for `note`, in place.
    /// Returns how many entries were replaced.
    pub fn replace(&mut self, id: NoteId, note: &Note) -> usize {
        let mut replaced = 0;
        for entry in self.notes.iter_mut().filter(|n| n.id == id) {
            *entry = note.clone();
            replaced += 1;
        }
        replaced
    }

    /// Drop every entry with the given id. Returns how many were removed.
    pub fn remove(&mut self, id: NoteId) -> usize {
        let before = self.notes.len();
        self.notes.retain(|n| n.id != id);
        before - self.notes.len()
    }

    pub fn get(&self, index: usize) -> Option<&Note> {
        self.notes.get(index)
    }

    pub fn find(&self, id: NoteId) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Note> {
        self.notes.iter()
    }

    pub fn as_slice(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}

impl From<Vec<Note>> for NoteList {
    fn from(notes: Vec<Note>) -> Self {
        Self { notes }
    }
}

/// Why a draft was refused before reaching the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftError {
    EmptyTitle,
    EmptyContent,
}

impl fmt::Display for DraftError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DraftError::EmptyTitle => write!(f, "Title is required"),
            DraftError::EmptyContent => write!(f, "Content is required"),
        }
    }
}

impl std::error::Error for DraftError {}

/// The form's draft, optionally bound to the note being edited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Editor {
    pub title: String,
    pub content: String,
    /// Some = submitting updates this note; None = submitting creates.
    pub editing: Option<NoteId>,
}

impl Editor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a note for editing. Any unsaved draft is discarded.
    pub fn load(&mut self, note: &Note) {
        self.title = note.title.clone();
        self.content = note.content.clone();
        self.editing = Some(note.id);
    }

    /// Reset fields and drop the edit binding.
    pub fn clear(&mut self) {
        self.clear_fields();
        self.editing = None;
    }

    pub fn clear_fields(&mut self) {
        self.title.clear();
        self.content.clear();
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.content.is_empty() && self.editing.is_none()
    }

    /// Required-field check. Whitespace-only fields count as empty.
    pub fn draft(&self) -> Result<NoteDraft, DraftError> {
        if self.title.trim().is_empty() {
            return Err(DraftError::EmptyTitle);
        }
        if self.content.trim().is_empty() {
            return Err(DraftError::EmptyContent);
        }
        Ok(NoteDraft::new(self.title.clone(), self.content.clone()))
    }
}

#[derive(Debug, Clone)]
pub struct App {
    pub notes: NoteList,
    pub editor: Editor,
    pub status_message: String,
    /// Requests in flight. Display only; nothing is blocked on it.
    pub pending: usize,
    pub last_error: Option<String>,
}

impl App {
    pub fn new() -> Self {
        Self {
            notes: NoteList::new(),
            editor: Editor::new(),
            status_message: String::from("Loading notes..."),
            pending: 0,
            last_error: None,
        }
    }

    /// Start from a known list (tests and headless runs).
    pub fn with_notes(notes: Vec<Note>) -> Self {
        Self {
            notes: NoteList::from(notes),
            status_message: String::new(),
            ..Self::new()
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NoteList {
        NoteList::from(vec![Note::new(1, "A", "a"), Note::new(2, "B", "b"), Note::new(3, "C", "c")])
    }

    #[test]
    fn test_app_new_defaults() {
        let app = App::new();
        assert!(app.notes.is_empty());
        assert!(app.editor.is_empty());
        assert_eq!(app.pending, 0);
        assert!(app.last_error.is_none());
    }

    #[test]
    fn test_prepend_puts_note_first() {
        let mut list = sample();
        list.prepend(Note::new(9, "Z", "z"));
        assert_eq!(list.len(), 4);
        assert_eq!(list.get(0).map(|n| n.id), Some(NoteId(9)));
    }

    #[test]
    fn test_replace_keeps_position() {
        let mut list = sample();
        let replaced = list.replace(NoteId(2), &Note::new(2, "B2", "b2"));
        assert_eq!(replaced, 1);
        let titles: Vec<_> = list.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B2", "C"]);
    }

    #[test]
    fn test_replace_unknown_id_is_noop() {
        let mut list = sample();
        assert_eq!(list.replace(NoteId(42), &Note::new(42, "X", "x")), 0);
        assert_eq!(list, sample());
    }

    #[test]
    fn test_remove_drops_all_matching() {
        let mut list = NoteList::from(vec![Note::new(1, "A", "a"), Note::new(1, "A", "a"), Note::new(2, "B", "b")]);
        assert_eq!(list.remove(NoteId(1)), 2);
        assert_eq!(list.as_slice(), &[Note::new(2, "B", "b")]);
    }

    #[test]
    fn test_editor_load_and_clear() {
        let mut editor = Editor::new();
        editor.load(&Note::new(5, "Title", "Body"));
        assert_eq!(editor.editing, Some(NoteId(5)));
        assert_eq!(editor.title, "Title");
        assert_eq!(editor.content, "Body");

        editor.clear();
        assert!(editor.is_empty());
    }

    #[test]
    fn test_editor_clear_fields_keeps_binding() {
        let mut editor = Editor::new();
        editor.load(&Note::new(5, "Title", "Body"));
        editor.clear_fields();
        assert_eq!(editor.editing, Some(NoteId(5)));
        assert!(editor.title.is_empty());
    }

    #[test]
    fn test_draft_requires_both_fields() {
        let mut editor = Editor::new();
        assert_eq!(editor.draft(), Err(DraftError::EmptyTitle));

        editor.title = "T".into();
        assert_eq!(editor.draft(), Err(DraftError::EmptyContent));

        editor.content = "   \n".into();
        assert_eq!(editor.draft(), Err(DraftError::EmptyContent));

        editor.content = "C".into();
        assert_eq!(editor.draft(), Ok(NoteDraft::new("T", "C")));
    }
}
