//! Shared types for logscope
//!
//! This crate contains the record model used by the loader, the store and the
//! query engine: [`LogEntry`], the closed [`Event`] and [`Status`] sets, and
//! the [`DateRange`] predicate every accessor filters with.

use chrono::NaiveDateTime;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ============================================================================
// Timestamps
// ============================================================================

/// Timestamp layout used by log files and by query text (`dd.MM.yyyy HH:mm:ss`)
pub const TIMESTAMP_FORMAT: &str = "%d.%m.%Y %H:%M:%S";

/// A timestamp that did not match [`TIMESTAMP_FORMAT`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid timestamp {input:?}: {reason}")]
pub struct TimestampError {
    pub input: String,
    pub reason: String,
}

/// Parse a timestamp in [`TIMESTAMP_FORMAT`], ignoring surrounding whitespace
pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime, TimestampError> {
    let trimmed = s.trim();
    NaiveDateTime::parse_from_str(trimmed, TIMESTAMP_FORMAT).map_err(|e| TimestampError {
        input: trimmed.to_string(),
        reason: e.to_string(),
    })
}

/// Render a timestamp in [`TIMESTAMP_FORMAT`]
pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

// ============================================================================
// Closed token sets
// ============================================================================

/// A token that is not a member of a closed set
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} {token:?}")]
pub struct UnknownToken {
    pub kind: &'static str,
    pub token: String,
}

/// What the user did
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Event {
    Login,
    Download,
    WriteMessage,
    SolveTask,
    DoneTask,
}

impl Event {
    pub const ALL: [Event; 5] = [
        Self::Login,
        Self::Download,
        Self::WriteMessage,
        Self::SolveTask,
        Self::DoneTask,
    ];

    /// Token as it appears in log lines
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Login => "LOGIN",
            Self::Download => "DOWNLOAD",
            Self::WriteMessage => "WRITE_MESSAGE",
            Self::SolveTask => "SOLVE_TASK",
            Self::DoneTask => "DONE_TASK",
        }
    }
}

impl FromStr for Event {
    type Err = UnknownToken;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|e| e.as_str() == s)
            .ok_or_else(|| UnknownToken {
                kind: "event",
                token: s.to_string(),
            })
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of an event
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Ok,
    Failed,
    Error,
}

impl Status {
    pub const ALL: [Status; 3] = [Self::Ok, Self::Failed, Self::Error];

    /// Token as it appears in log lines
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Failed => "FAILED",
            Self::Error => "ERROR",
        }
    }
}

impl FromStr for Status {
    type Err = UnknownToken;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|st| st.as_str() == s)
            .ok_or_else(|| UnknownToken {
                kind: "status",
                token: s.to_string(),
            })
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Log Types
// ============================================================================

/// A single parsed log record
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogEntry {
    /// Client address as logged (not validated)
    pub ip: String,

    /// User name
    pub user: String,

    /// When the event happened
    pub timestamp: NaiveDateTime,

    pub event: Event,

    /// Task id for task events, 0 otherwise
    pub action: i32,

    pub status: Status,
}

impl LogEntry {
    pub fn new(
        ip: String,
        user: String,
        timestamp: NaiveDateTime,
        event: Event,
        action: i32,
        status: Status,
    ) -> Self {
        Self {
            ip,
            user,
            timestamp,
            event,
            action,
            status,
        }
    }
}

// ============================================================================
// Date range
// ============================================================================

/// Optional, exclusive bounds on an entry timestamp
///
/// Both sides are independent: a missing `after` is unbounded below and a
/// missing `before` is unbounded above. A timestamp equal to either bound is
/// outside the range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct DateRange {
    pub after: Option<NaiveDateTime>,
    pub before: Option<NaiveDateTime>,
}

impl DateRange {
    /// Matches every timestamp
    pub fn all() -> Self {
        Self::default()
    }

    pub fn new(after: Option<NaiveDateTime>, before: Option<NaiveDateTime>) -> Self {
        Self { after, before }
    }

    pub fn after(after: NaiveDateTime) -> Self {
        Self::new(Some(after), None)
    }

    pub fn before(before: NaiveDateTime) -> Self {
        Self::new(None, Some(before))
    }

    pub fn between(after: NaiveDateTime, before: NaiveDateTime) -> Self {
        Self::new(Some(after), Some(before))
    }

    /// Same lower bound, no upper bound
    pub fn without_upper(self) -> Self {
        Self {
            before: None,
            ..self
        }
    }

    /// Check whether a timestamp falls strictly inside the range
    pub fn contains(&self, ts: &NaiveDateTime) -> bool {
        in_range(ts, self.after.as_ref(), self.before.as_ref())
    }
}

/// Exclusive range check with independently optional bounds
pub fn in_range(
    ts: &NaiveDateTime,
    after: Option<&NaiveDateTime>,
    before: Option<&NaiveDateTime>,
) -> bool {
    after.is_none_or(|a| ts > a) && before.is_none_or(|b| ts < b)
}
