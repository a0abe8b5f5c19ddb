//! Non-interactive subcommands.
//!
//! Each one drives a `NoteBoard`, so `edit` goes through the same
//! load → select → submit path as the form in the TUI.

use std::io::{self, Write};

use clap::Subcommand;
use log::info;

use crate::api::{Note, NoteId, ServiceError};
use crate::core::{BoardError, NoteBoard};

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print every note
    List,
    /// Create a note
    Add {
        #[arg(short, long)]
        title: String,
        #[arg(short, long)]
        content: String,
    },
    /// Change a note's title and/or content
    Edit {
        id: i64,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long)]
        content: Option<String>,
    },
    /// Delete a note
    Delete { id: i64 },
}

#[derive(Debug)]
pub enum CliError {
    Board(BoardError),
    Io(io::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Board(e) => write!(f, "{e}"),
            CliError::Io(e) => write!(f, "output error: {e}"),
        }
    }
}

impl std::error::Error for CliError {}

impl From<BoardError> for CliError {
    fn from(e: BoardError) -> Self {
        CliError::Board(e)
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Io(e)
    }
}

pub fn format_note(note: &Note) -> String {
    let mut out = format!("#{} {}", note.id, note.title);
    for line in note.content.lines() {
        out.push_str("\n    ");
        out.push_str(line);
    }
    out
}

pub async fn execute(
    board: &mut NoteBoard,
    command: Command,
    out: &mut impl Write,
) -> Result<(), CliError> {
    info!("Running subcommand: {:?}", command);
    match command {
        Command::List => {
            board.load().await?;
            if board.notes().is_empty() {
                writeln!(out, "No notes.")?;
            }
            for note in board.notes().iter() {
                writeln!(out, "{}", format_note(note))?;
            }
        }
        Command::Add { title, content } => {
            board.set_title(title);
            board.set_content(content);
            board.submit().await?;
            if let Some(note) = board.notes().get(0) {
                writeln!(out, "Created {}", format_note(note))?;
            }
        }
        Command::Edit { id, title, content } => {
            let id = NoteId(id);
            board.load().await?;
            let note = board
                .notes()
                .find(id)
                .cloned()
                .ok_or(BoardError::Service(ServiceError::NotFound(id)))?;
            board.select_note(&note);
            if let Some(title) = title {
                board.set_title(title);
            }
            if let Some(content) = content {
                board.set_content(content);
            }
            board.submit().await?;
            if let Some(updated) = board.notes().find(id) {
                writeln!(out, "Updated {}", format_note(updated))?;
            }
        }
        Command::Delete { id } => {
            board.delete_note(NoteId(id)).await?;
            writeln!(out, "Deleted #{id}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::DraftError;
    use crate::test_support::{Call, MockNotesService};
    use std::sync::Arc;

    fn setup(notes: Vec<Note>) -> (NoteBoard, Arc<MockNotesService>) {
        let service = Arc::new(MockNotesService::with_notes(notes));
        (NoteBoard::new(service.clone()), service)
    }

    #[test]
    fn test_format_note_indents_content() {
        let note = Note::new(3, "Todo", "one\ntwo");
        assert_eq!(format_note(&note), "#3 Todo\n    one\n    two");
    }

    #[tokio::test]
    async fn test_list_prints_notes() {
        let (mut board, _) = setup(vec![Note::new(1, "A", "a")]);
        let mut out = Vec::new();
        execute(&mut board, Command::List, &mut out).await.unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "#1 A\n    a\n");
    }

    #[tokio::test]
    async fn test_list_empty() {
        let (mut board, _) = setup(vec![]);
        let mut out = Vec::new();
        execute(&mut board, Command::List, &mut out).await.unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "No notes.\n");
    }

    #[tokio::test]
    async fn test_add_rejects_blank_content_without_request() {
        let (mut board, service) = setup(vec![]);
        let mut out = Vec::new();
        let result = execute(
            &mut board,
            Command::Add {
                title: "T".into(),
                content: " ".into(),
            },
            &mut out,
        )
        .await;
        assert!(matches!(
            result,
            Err(CliError::Board(BoardError::Rejected(DraftError::EmptyContent)))
        ));
        assert!(service.calls().is_empty());
    }

    #[tokio::test]
    async fn test_edit_keeps_unspecified_fields() {
        let (mut board, service) = setup(vec![Note::new(1, "A", "a")]);
        let mut out = Vec::new();
        execute(
            &mut board,
            Command::Edit {
                id: 1,
                title: None,
                content: Some("b".into()),
            },
            &mut out,
        )
        .await
        .unwrap();
        assert_eq!(service.stored(), vec![Note::new(1, "A", "b")]);
        assert!(String::from_utf8(out).unwrap().starts_with("Updated #1 A"));
    }

    #[tokio::test]
    async fn test_edit_unknown_id_sends_no_update() {
        let (mut board, service) = setup(vec![Note::new(1, "A", "a")]);
        let mut out = Vec::new();
        let result = execute(
            &mut board,
            Command::Edit {
                id: 9,
                title: Some("x".into()),
                content: None,
            },
            &mut out,
        )
        .await;
        assert!(result.is_err());
        assert_eq!(service.calls(), vec![Call::List]);
    }

    #[tokio::test]
    async fn test_delete_reports() {
        let (mut board, _) = setup(vec![Note::new(4, "A", "a")]);
        let mut out = Vec::new();
        execute(&mut board, Command::Delete { id: 4 }, &mut out)
            .await
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Deleted #4\n");
    }
}
