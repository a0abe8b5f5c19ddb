//! HTTP implementation of `NotesService` over the REST API.
//!
//! ```text
//! GET    {base}/api/notes        → [Note]
//! POST   {base}/api/notes        → Note
//! PUT    {base}/api/notes/{id}   → Note
//! DELETE {base}/api/notes/{id}   → (body ignored)
//! ```
//!
//! No timeouts are configured on the client; a request only fails when the
//! transport reports an error.

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;

use super::service::{NotesService, ServiceError};
use super::types::{Note, NoteDraft, NoteId};

pub const NOTES_PATH: &str = "/api/notes";

/// Which kind of request produced a response, for status classification.
#[derive(Debug, Clone, Copy)]
enum Request {
    List,
    Create,
    Update(NoteId),
    Delete(NoteId),
}

impl Request {
    fn target(self) -> Option<NoteId> {
        match self {
            Request::Update(id) | Request::Delete(id) => Some(id),
            Request::List | Request::Create => None,
        }
    }

    fn carries_body(self) -> bool {
        matches!(self, Request::Create | Request::Update(_))
    }
}

/// Maps a non-success status onto the error taxonomy.
fn classify(request: Request, status: StatusCode, body: String) -> ServiceError {
    match (status, request.target()) {
        (StatusCode::NOT_FOUND, Some(id)) => ServiceError::NotFound(id),
        (StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY, _) if request.carries_body() => {
            ServiceError::Validation(body)
        }
        _ => ServiceError::Server {
            status: status.as_u16(),
            message: body,
        },
    }
}

/// REST client for the notes API.
pub struct HttpNotesService {
    base_url: String,
    client: reqwest::Client,
}

impl HttpNotesService {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self) -> String {
        format!("{}{}", self.base_url, NOTES_PATH)
    }

    fn note_url(&self, id: NoteId) -> String {
        format!("{}{}/{}", self.base_url, NOTES_PATH, id)
    }

    /// Turns a non-success response into the matching `ServiceError`.
    async fn check(request: Request, response: Response) -> Result<Response, ServiceError> {
        debug!("{:?} response status: {}", request, response.status());

        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "unknown error".to_string());
        warn!("Notes API error on {:?}: {} - {}", request, status, body);
        Err(classify(request, status, body))
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ServiceError> {
        response
            .json::<T>()
            .await
            .map_err(|e| ServiceError::Parse(e.to_string()))
    }
}

#[async_trait]
impl NotesService for HttpNotesService {
    fn name(&self) -> &str {
        "http"
    }

    async fn list(&self) -> Result<Vec<Note>, ServiceError> {
        info!("GET {}", self.collection_url());
        let response = self
            .client
            .get(self.collection_url())
            .send()
            .await
            .map_err(|e| ServiceError::Network(e.to_string()))?;

        let response = Self::check(Request::List, response).await?;
        let notes: Vec<Note> = Self::decode(response).await?;
        debug!("Listed {} notes", notes.len());
        Ok(notes)
    }

    async fn create(&self, draft: &NoteDraft) -> Result<Note, ServiceError> {
        info!("POST {} (title_len={})", self.collection_url(), draft.title.len());
        let response = self
            .client
            .post(self.collection_url())
            .json(draft)
            .send()
            .await
            .map_err(|e| ServiceError::Network(e.to_string()))?;

        let response = Self::check(Request::Create, response).await?;
        Self::decode(response).await
    }

    async fn update(&self, id: NoteId, draft: &NoteDraft) -> Result<Note, ServiceError> {
        info!("PUT {}", self.note_url(id));
        let response = self
            .client
            .put(self.note_url(id))
            .json(draft)
            .send()
            .await
            .map_err(|e| ServiceError::Network(e.to_string()))?;

        let response = Self::check(Request::Update(id), response).await?;
        Self::decode(response).await
    }

    async fn delete(&self, id: NoteId) -> Result<(), ServiceError> {
        info!("DELETE {}", self.note_url(id));
        let response = self
            .client
            .delete(self.note_url(id))
            .send()
            .await
            .map_err(|e| ServiceError::Network(e.to_string()))?;

        // Acknowledgement body is not consumed.
        Self::check(Request::Delete(id), response).await?;
        Ok(())
    }
}
