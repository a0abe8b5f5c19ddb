//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Mutex;

use async_trait::async_trait;

use crate::api::{Note, NoteDraft, NoteId, NotesService, ServiceError};

/// One recorded call against the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List,
    Create(NoteDraft),
    Update(NoteId, NoteDraft),
    Delete(NoteId),
}

#[derive(Default)]
struct Inner {
    notes: Vec<Note>,
    next_id: i64,
    fail_with: Option<ServiceError>,
    calls: Vec<Call>,
}

/// In-memory notes backend that behaves like the REST server and records
/// every call it receives.
pub struct MockNotesService {
    inner: Mutex<Inner>,
}

impl MockNotesService {
    pub fn new() -> Self {
        Self::with_notes(Vec::new())
    }

    pub fn with_notes(notes: Vec<Note>) -> Self {
        let next_id = notes.iter().map(|n| n.id.0).max().unwrap_or(0) + 1;
        Self {
            inner: Mutex::new(Inner {
                notes,
                next_id,
                ..Default::default()
            }),
        }
    }

    /// Every following call fails with `error` until `recover()`.
    pub fn fail_with(&self, error: ServiceError) {
        self.inner.lock().unwrap().fail_with = Some(error);
    }

    pub fn recover(&self) {
        self.inner.lock().unwrap().fail_with = None;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn stored(&self) -> Vec<Note> {
        self.inner.lock().unwrap().notes.clone()
    }

    fn record(&self, call: Call) -> Result<std::sync::MutexGuard<'_, Inner>, ServiceError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(call);
        match inner.fail_with.clone() {
            Some(error) => Err(error),
            None => Ok(inner),
        }
    }
}

#[async_trait]
impl NotesService for MockNotesService {
    fn name(&self) -> &str {
        "mock"
    }

    async fn list(&self) -> Result<Vec<Note>, ServiceError> {
        let inner = self.record(Call::List)?;
        Ok(inner.notes.clone())
    }

    async fn create(&self, draft: &NoteDraft) -> Result<Note, ServiceError> {
        let mut inner = self.record(Call::Create(draft.clone()))?;
        let note = Note::new(inner.next_id, draft.title.clone(), draft.content.clone());
        inner.next_id += 1;
        inner.notes.insert(0, note.clone());
        Ok(note)
    }

    async fn update(&self, id: NoteId, draft: &NoteDraft) -> Result<Note, ServiceError> {
        let mut inner = self.record(Call::Update(id, draft.clone()))?;
        let note = inner
            .notes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or(ServiceError::NotFound(id))?;
        note.title = draft.title.clone();
        note.content = draft.content.clone();
        Ok(note.clone())
    }

    async fn delete(&self, id: NoteId) -> Result<(), ServiceError> {
        let mut inner = self.record(Call::Delete(id))?;
        let before = inner.notes.len();
        inner.notes.retain(|n| n.id != id);
        if inner.notes.len() == before {
            return Err(ServiceError::NotFound(id));
        }
        Ok(())
    }
}
