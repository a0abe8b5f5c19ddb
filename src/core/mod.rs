//! # Core Application Logic
//!
//! This module contains Notekeeper's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (notes+editor) │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │  • perform() (requests) │
//!                    └───────────┬─────────────┘
//!                                │
//!                  ┌─────────────┴─────────────┐
//!                  ▼                           ▼
//!           ┌────────────┐              ┌────────────┐
//!           │    TUI     │              │ NoteBoard  │
//!           │  Adapter   │              │ (CLI/tests)│
//!           │ (ratatui)  │              │            │
//!           └────────────┘              └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: `App`, `NoteList`, `Editor`
//! - [`action`]: The `Action` enum and `update()`
//! - [`effects`]: Runs request effects against a `NotesService`
//! - [`board`]: Awaitable `NoteBoard` operations
//! - [`config`]: Layered configuration

pub mod action;
pub mod board;
pub mod config;
pub mod effects;
pub mod state;

pub use action::{Action, Effect, update};
pub use board::{BoardError, NoteBoard};
pub use state::App;
