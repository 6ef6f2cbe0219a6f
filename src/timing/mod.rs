//! Parsing for the raw timing captures written during a sweep.

pub mod entry;
pub mod parse;

pub use entry::{EntryKey, LogEntry};
pub use parse::parse_capture;
