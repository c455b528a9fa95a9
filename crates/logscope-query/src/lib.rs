//! Text query language for logscope
//!
//! A query names a field to return and, optionally, a field to filter on with
//! an optional date range:
//!
//! ```text
//! get user for ip = "1.2.3.4" and date between "01.01.2020 00:00:00" and "02.01.2020 00:00:00"
//! ```
//!
//! [`QueryEngine::execute`] parses the text and calls the matching
//! [`LogStore`](logscope_logs::LogStore) accessor.

mod dispatch;
mod engine;
mod field;
mod output;
mod parser;

pub use dispatch::{Accessor, Bounds, FilterValue, ROUTES, Route, lookup};
pub use engine::{QueryEngine, QueryError};
pub use field::Field;
pub use output::QueryOutput;
pub use parser::{DATE_RANGE_KEYWORD, LongRequest, Request, parse_query};
