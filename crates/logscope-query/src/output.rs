use std::collections::BTreeSet;

use chrono::NaiveDateTime;

use logscope_types::{Event, Status, format_timestamp};

use crate::field::Field;

/// Result of a text query
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueryOutput {
    /// IPs or user names
    Strings(BTreeSet<String>),
    Dates(BTreeSet<NaiveDateTime>),
    Events(BTreeSet<Event>),
    Statuses(BTreeSet<Status>),
    /// The text was not a recognised query
    NoMatch,
}

impl QueryOutput {
    /// Empty result of the type a query projecting `target` returns
    pub fn empty(target: Field) -> Self {
        match target {
            Field::Ip | Field::User => Self::Strings(BTreeSet::new()),
            Field::Date => Self::Dates(BTreeSet::new()),
            Field::Event => Self::Events(BTreeSet::new()),
            Field::Status => Self::Statuses(BTreeSet::new()),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Strings(v) => v.len(),
            Self::Dates(v) => v.len(),
            Self::Events(v) => v.len(),
            Self::Statuses(v) => v.len(),
            Self::NoMatch => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Short name of the value type
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Strings(_) => "strings",
            Self::Dates(_) => "dates",
            Self::Events(_) => "events",
            Self::Statuses(_) => "statuses",
            Self::NoMatch => "no_match",
        }
    }

    /// Values rendered for display, in sorted order
    pub fn lines(&self) -> Vec<String> {
        match self {
            Self::Strings(v) => v.iter().cloned().collect(),
            Self::Dates(v) => v.iter().map(format_timestamp).collect(),
            Self::Events(v) => v.iter().map(|e| e.to_string()).collect(),
            Self::Statuses(v) => v.iter().map(|s| s.to_string()).collect(),
            Self::NoMatch => Vec::new(),
        }
    }
}

impl From<BTreeSet<String>> for QueryOutput {
    fn from(v: BTreeSet<String>) -> Self {
        Self::Strings(v)
    }
}

impl From<BTreeSet<NaiveDateTime>> for QueryOutput {
    fn from(v: BTreeSet<NaiveDateTime>) -> Self {
        Self::Dates(v)
    }
}

impl From<BTreeSet<Event>> for QueryOutput {
    fn from(v: BTreeSet<Event>) -> Self {
        Self::Events(v)
    }
}

impl From<BTreeSet<Status>> for QueryOutput {
    fn from(v: BTreeSet<Status>) -> Self {
        Self::Statuses(v)
    }
}
