//! Status output for store operations.
//!
//! Repositories report what they did ("Created new file", "Could not save")
//! through a [`StatusSink`] handed to them at construction time.

use std::cell::RefCell;

pub trait StatusSink {
    fn emit(&self, message: &str);
}

/// Prints every status line to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl StatusSink for ConsoleSink {
    fn emit(&self, message: &str) {
        println!("{message}");
    }
}

/// Drops every status line.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentSink;

impl StatusSink for SilentSink {
    fn emit(&self, _message: &str) {}
}

/// Keeps status lines in memory so callers can inspect them afterwards.
#[derive(Debug, Default)]
pub struct RecordingSink {
    messages: RefCell<Vec<String>>,
}

impl RecordingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }

    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        self.messages.borrow().iter().any(|m| m.contains(needle))
    }
}

impl StatusSink for RecordingSink {
    fn emit(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }
}
