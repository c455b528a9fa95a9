use std::num::ParseIntError;

use thiserror::Error;

use logscope_types::{Event, LogEntry, Status, TimestampError, UnknownToken, parse_timestamp};

/// Why a log line was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineError {
    #[error("expected 5 tab-separated fields, found {found}")]
    FieldCount { found: usize },

    #[error("empty {0} field")]
    EmptyField(&'static str),

    #[error(transparent)]
    Timestamp(#[from] TimestampError),

    #[error("event field {0:?} has more than one space")]
    EventShape(String),

    #[error(transparent)]
    Token(#[from] UnknownToken),

    #[error("invalid action id: {0}")]
    Action(#[from] ParseIntError),
}

/// Parser for `ip \t user \t date \t event[ action] \t status` lines
pub struct LogParser;

impl LogParser {
    /// Parse a raw log line into a LogEntry
    pub fn parse_line(raw: &str) -> Result<LogEntry, LineError> {
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        let mut fields: Vec<&str> = line.split('\t').collect();
        while fields.len() > 1 && fields.last() == Some(&"") {
            fields.pop();
        }
        let [ip, user, date, event, status] = fields.as_slice() else {
            return Err(LineError::FieldCount {
                found: fields.len(),
            });
        };

        let ip = Self::non_empty(ip, "ip")?;
        let user = Self::non_empty(user, "user")?;
        let timestamp = parse_timestamp(date)?;
        let (event, action) = Self::split_event(event.trim())?;
        let event: Event = event.parse()?;
        let action: i32 = match action {
            Some(id) => id.parse()?,
            None => 0,
        };
        let status: Status = status.trim().parse()?;

        Ok(LogEntry::new(ip, user, timestamp, event, action, status))
    }

    fn non_empty(field: &str, name: &'static str) -> Result<String, LineError> {
        let trimmed = field.trim();
        if trimmed.is_empty() {
            return Err(LineError::EmptyField(name));
        }
        Ok(trimmed.to_string())
    }

    /// Split `EVENT` or `EVENT ACTION`
    fn split_event(field: &str) -> Result<(&str, Option<&str>), LineError> {
        match field.split_once(' ') {
            None => Ok((field, None)),
            Some((_, action)) if action.contains(' ') => {
                Err(LineError::EventShape(field.to_string()))
            }
            Some((event, action)) => Ok((event, Some(action))),
        }
    }
}
