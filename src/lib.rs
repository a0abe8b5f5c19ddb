//! Notekeeper library exports for testing

pub mod api;
pub mod cli;
pub mod core;
pub mod tui;

#[cfg(test)]
pub mod test_support;
