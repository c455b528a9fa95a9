//! Query text parser
//!
//! Grammar:
//! ```text
//! get <field>
//! get <target> for <filter> = "<value>" [and date between "<after>" and "<before>"]
//! ```
//!
//! Keywords are lower-case and whitespace between tokens is free. The value is
//! everything after the first `=` up to `and date between`, with all double
//! quotes removed and surrounding whitespace trimmed.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use logscope_types::{DateRange, format_timestamp, parse_timestamp};

use crate::field::Field;

/// Separates the filter value from the optional date bounds
pub const DATE_RANGE_KEYWORD: &str = "and date between";

static SHORT_FORM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*get\s+(?P<field>\S+)\s*$").unwrap());

static LONG_FORM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^\s*get\s+(?P<target>[^\s=]+)\s+for\s+(?P<filter>[^\s=]+)\s*=(?P<rest>.*)$")
        .unwrap()
});

/// A parsed query
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Request {
    /// `get <field>`: every distinct value of the field
    Short(Field),
    /// `get <target> for <filter> = <value> ...`
    Long(LongRequest),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LongRequest {
    pub target: Field,
    pub filter: Field,
    /// Unquoted, trimmed filter value
    pub value: String,
    /// Present only when both bounds parsed
    pub range: Option<DateRange>,
}

impl LongRequest {
    pub fn new(target: Field, filter: Field, value: impl Into<String>) -> Self {
        Self {
            target,
            filter,
            value: value.into(),
            range: None,
        }
    }

    pub fn with_range(mut self, range: DateRange) -> Self {
        self.range = Some(range);
        self
    }
}

/// Parse query text, returning `None` when it matches neither form
pub fn parse_query(input: &str) -> Option<Request> {
    if let Some(caps) = SHORT_FORM.captures(input) {
        return caps["field"].parse().ok().map(Request::Short);
    }

    let caps = LONG_FORM.captures(input)?;
    let target: Field = caps["target"].parse().ok()?;
    let filter: Field = caps["filter"].parse().ok()?;
    if target == filter {
        return None;
    }

    let rest = &caps["rest"];
    let (value, range) = match rest.split_once(DATE_RANGE_KEYWORD) {
        Some((value, bounds)) => (value, parse_range(bounds)),
        None => (rest, None),
    };

    Some(Request::Long(LongRequest {
        target,
        filter,
        value: unquote(value),
        range,
    }))
}

/// Parse `"<after>" and "<before>"`; any failure drops the whole range
fn parse_range(text: &str) -> Option<DateRange> {
    let Some((after, before)) = text.split_once("and") else {
        warn!(range = text.trim(), "date range needs two bounds, ignoring it");
        return None;
    };

    match (parse_timestamp(&unquote(after)), parse_timestamp(&unquote(before))) {
        (Ok(after), Ok(before)) => Some(DateRange::between(after, before)),
        (Err(e), _) | (_, Err(e)) => {
            warn!(error = %e, "bad date range bound, ignoring the range");
            None
        }
    }
}

fn unquote(s: &str) -> String {
    s.replace('"', "").trim().to_string()
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Request::Short(field) => write!(f, "get {field}"),
            Request::Long(req) => {
                write!(f, "get {} for {} = \"{}\"", req.target, req.filter, req.value)?;
                if let Some(DateRange {
                    after: Some(after),
                    before: Some(before),
                }) = req.range
                {
                    write!(
                        f,
                        " {DATE_RANGE_KEYWORD} \"{}\" and \"{}\"",
                        format_timestamp(&after),
                        format_timestamp(&before)
                    )?;
                }
                Ok(())
            }
        }
    }
}
