use thiserror::Error;
use tracing::{debug, warn};

use logscope_logs::LogStore;
use logscope_types::{DateRange, Event, Status, parse_timestamp};

use crate::dispatch::{self, FilterValue};
use crate::field::Field;
use crate::output::QueryOutput;
use crate::parser::{LongRequest, Request, parse_query};

/// Query failures that are reported to the caller
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("unknown event {0:?}")]
    UnknownEvent(String),

    #[error("unknown status {0:?}")]
    UnknownStatus(String),
}

/// Answers text queries against a [`LogStore`]
#[derive(Clone, Debug)]
pub struct QueryEngine {
    store: LogStore,
}

impl QueryEngine {
    pub fn new(store: LogStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &LogStore {
        &self.store
    }

    /// Parse and run a query
    ///
    /// Text that is not a valid query yields [`QueryOutput::NoMatch`]. Only an
    /// event or status value outside the known tokens is an error.
    pub fn execute(&self, query: &str) -> Result<QueryOutput, QueryError> {
        match parse_query(query) {
            Some(request) => self.run(&request),
            None => {
                debug!(query, "not a recognised query");
                Ok(QueryOutput::NoMatch)
            }
        }
    }

    /// Run an already parsed request
    pub fn run(&self, request: &Request) -> Result<QueryOutput, QueryError> {
        match request {
            Request::Short(field) => Ok(self.all_values(*field)),
            Request::Long(req) => self.run_long(req),
        }
    }

    /// Distinct values of a field over the whole collection
    fn all_values(&self, field: Field) -> QueryOutput {
        let all = DateRange::all();
        match field {
            Field::Ip => self.store.unique_ips(all).into(),
            Field::User => self.store.all_users().into(),
            Field::Date => self.store.all_dates().into(),
            Field::Event => self.store.all_events(all).into(),
            Field::Status => self.store.all_statuses(all).into(),
        }
    }

    fn run_long(&self, req: &LongRequest) -> Result<QueryOutput, QueryError> {
        let Some(route) = dispatch::lookup(req.target, req.filter) else {
            return Ok(QueryOutput::NoMatch);
        };

        let Some(value) = typed_value(req.filter, &req.value)? else {
            return Ok(QueryOutput::empty(req.target));
        };

        debug!(
            projection = %req.target,
            filter = %req.filter,
            accessor = ?route.accessor,
            "dispatching query"
        );
        Ok(route.invoke(&self.store, &value, req.range.unwrap_or_default()))
    }
}

/// Convert the raw value for `filter`; `Ok(None)` for an unparseable date
fn typed_value(filter: Field, raw: &str) -> Result<Option<FilterValue>, QueryError> {
    let value = match filter {
        Field::Ip | Field::User => FilterValue::Text(raw.to_string()),
        Field::Date => match parse_timestamp(raw) {
            Ok(date) => FilterValue::Date(date),
            Err(e) => {
                warn!(error = %e, "cannot parse date filter value");
                return Ok(None);
            }
        },
        Field::Event => FilterValue::Event(
            raw.parse::<Event>()
                .map_err(|_| QueryError::UnknownEvent(raw.to_string()))?,
        ),
        Field::Status => FilterValue::Status(
            raw.parse::<Status>()
                .map_err(|_| QueryError::UnknownStatus(raw.to_string()))?,
        ),
    };
    Ok(Some(value))
}
