//! Log processing for logscope
//!
//! This crate turns a directory of tab-separated log files into a read-only
//! [`LogStore`] and provides the typed queries over it.

mod loader;
mod parser;
mod store;

pub use loader::{DEFAULT_EXTENSION, IngestReport, LoadError, LogLoader, RejectedLine};
pub use parser::{LineError, LogParser};
pub use store::LogStore;

// Re-export types used in our public API
pub use logscope_types::{DateRange, Event, LogEntry, Status};
