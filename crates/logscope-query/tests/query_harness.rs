//! Text query integration harness.
//!
//! # What this covers
//!
//! - **Dispatch round-trip**: every long-form `(target, filter)` pair returns
//!   exactly what the matching `LogStore` accessor returns, with and without a
//!   date range. `user for ip` is compared against the accessor with the upper
//!   bound removed.
//! - **Short form**: `get <field>` returns every distinct value regardless of
//!   date bounds.
//! - **Soft failures**: malformed query text, bad range bounds and bad date
//!   filters degrade to empty results; unknown tokens are errors.
//! - **Ingestion through a real directory**: queries run against a store
//!   loaded from temporary `.log` files.
//!
//! # Running
//!
//! ```sh
//! cargo test -p logscope-query --test query_harness
//! ```

mod common;
use common::*;

use std::collections::{BTreeMap, BTreeSet};

use pretty_assertions::assert_eq;
use rstest::rstest;

use logscope_logs::{DateRange, Event, LogStore, Status};
use logscope_query::{QueryEngine, QueryError, QueryOutput};

const AFTER: &str = "01.01.2013 00:00:00";
const BEFORE: &str = "01.01.2021 00:00:00";

fn engine() -> QueryEngine {
    QueryEngine::new(LogDir::corpus().open())
}

/// `query` followed by a date range clause
fn between(query: &str, after: &str, before: &str) -> String {
    format!(r#"{query} and date between "{after}" and "{before}""#)
}

fn strings(items: &[&str]) -> QueryOutput {
    QueryOutput::Strings(items.iter().map(|s| s.to_string()).collect())
}

// ---------------------------------------------------------------------------
// Dispatch round-trip
// ---------------------------------------------------------------------------

type Direct = fn(&LogStore, DateRange) -> QueryOutput;

#[rstest]
#[case::user_for_ip(r#"get user for ip = "127.0.0.1""#,
    |s: &LogStore, r: DateRange| QueryOutput::from(s.users_for_ip("127.0.0.1", r.without_upper())))]
#[case::date_for_ip(r#"get date for ip = "146.34.15.5""#,
    |s: &LogStore, r: DateRange| QueryOutput::from(s.dates_for_ip("146.34.15.5", r)))]
#[case::event_for_ip(r#"get event for ip = "127.0.0.1""#,
    |s: &LogStore, r: DateRange| QueryOutput::from(s.events_for_ip("127.0.0.1", r)))]
#[case::status_for_ip(r#"get status for ip = "192.168.100.2""#,
    |s: &LogStore, r: DateRange| QueryOutput::from(s.statuses_for_ip("192.168.100.2", r)))]
#[case::ip_for_user(r#"get ip for user = "Amigo""#,
    |s: &LogStore, r: DateRange| QueryOutput::from(s.ips_for_user("Amigo", r)))]
#[case::date_for_user(r#"get date for user = "Ivan""#,
    |s: &LogStore, r: DateRange| QueryOutput::from(s.dates_for_user("Ivan", r)))]
#[case::event_for_user(r#"get event for user = "Eduard""#,
    |s: &LogStore, r: DateRange| QueryOutput::from(s.events_for_user("Eduard", r)))]
#[case::status_for_user(r#"get status for user = "Vasya""#,
    |s: &LogStore, r: DateRange| QueryOutput::from(s.statuses_for_user("Vasya", r)))]
#[case::ip_for_date(r#"get ip for date = "14.10.2021 11:38:21""#,
    |s: &LogStore, r: DateRange| {
        QueryOutput::from(s.ips_for_date(ts("14.10.2021 11:38:21"), r))
    })]
#[case::user_for_date(r#"get user for date = "30.01.2014 12:56:22""#,
    |s: &LogStore, r: DateRange| {
        QueryOutput::from(s.users_for_date(ts("30.01.2014 12:56:22"), r))
    })]
#[case::event_for_date(r#"get event for date = "13.09.2013 05:04:50""#,
    |s: &LogStore, r: DateRange| {
        QueryOutput::from(s.events_for_date(ts("13.09.2013 05:04:50"), r))
    })]
#[case::status_for_date(r#"get status for date = "11.12.2013 10:11:12""#,
    |s: &LogStore, r: DateRange| {
        QueryOutput::from(s.statuses_for_date(ts("11.12.2013 10:11:12"), r))
    })]
#[case::ip_for_event(r#"get ip for event = "SOLVE_TASK""#,
    |s: &LogStore, r: DateRange| QueryOutput::from(s.ips_for_event(Event::SolveTask, r)))]
#[case::user_for_event(r#"get user for event = "WRITE_MESSAGE""#,
    |s: &LogStore, r: DateRange| QueryOutput::from(s.users_for_event(Event::WriteMessage, r)))]
#[case::date_for_event(r#"get date for event = "LOGIN""#,
    |s: &LogStore, r: DateRange| QueryOutput::from(s.dates_for_event(Event::Login, r)))]
#[case::status_for_event(r#"get status for event = "DONE_TASK""#,
    |s: &LogStore, r: DateRange| QueryOutput::from(s.statuses_for_event(Event::DoneTask, r)))]
#[case::ip_for_status(r#"get ip for status = "ERROR""#,
    |s: &LogStore, r: DateRange| QueryOutput::from(s.ips_for_status(Status::Error, r)))]
#[case::user_for_status(r#"get user for status = "OK""#,
    |s: &LogStore, r: DateRange| QueryOutput::from(s.users_for_status(Status::Ok, r)))]
#[case::date_for_status(r#"get date for status = "FAILED""#,
    |s: &LogStore, r: DateRange| QueryOutput::from(s.dates_for_status(Status::Failed, r)))]
#[case::event_for_status(r#"get event for status = "OK""#,
    |s: &LogStore, r: DateRange| QueryOutput::from(s.events_for_status(Status::Ok, r)))]
fn long_form_matches_accessor(
    #[case] query: &str,
    #[case] direct: Direct,
    #[values(false, true)] ranged: bool,
) {
    let engine = engine();
    let (text, range) = if ranged {
        (
            between(query, AFTER, BEFORE),
            DateRange::between(ts(AFTER), ts(BEFORE)),
        )
    } else {
        (query.to_string(), DateRange::all())
    };

    let expected = direct(engine.store(), range);
    assert_eq!(engine.execute(&text).unwrap(), expected);
}

#[test]
fn user_for_ip_ignores_upper_bound() {
    let engine = engine();
    let year = |query: &str| between(query, "01.01.2013 00:00:00", "01.01.2014 00:00:00");

    let query = year(r#"get user for ip = "127.0.0.1""#);
    assert_eq!(engine.execute(&query).unwrap(), strings(&["Amigo", "Ivan"]));

    let query = year(r#"get ip for user = "Ivan""#);
    assert_eq!(engine.execute(&query).unwrap(), strings(&["127.0.0.1"]));
    let query = year(r#"get ip for user = "Amigo""#);
    assert_eq!(engine.execute(&query).unwrap(), strings(&[]));
}

// ---------------------------------------------------------------------------
// Short form
// ---------------------------------------------------------------------------

#[test]
fn short_form_returns_every_value() {
    let engine = engine();
    let store = engine.store();
    let all = DateRange::all();

    assert_eq!(
        engine.execute("get ip").unwrap(),
        QueryOutput::from(store.unique_ips(all))
    );
    assert_eq!(
        engine.execute("get user").unwrap(),
        strings(&["Amigo", "Eduard", "Ivan", "Vasya"])
    );
    assert_eq!(engine.execute("get date").unwrap().len(), CORPUS.len());
    assert_eq!(
        engine.execute("get event").unwrap(),
        QueryOutput::Events(Event::ALL.into_iter().collect())
    );
    assert_eq!(
        engine.execute("get status").unwrap(),
        QueryOutput::Statuses(Status::ALL.into_iter().collect())
    );
}

#[test]
fn repeated_queries_are_equal() {
    let engine = engine();
    let query = between(
        r#"get date for event = "SOLVE_TASK""#,
        "01.01.2013 00:00:00",
        "01.01.2030 00:00:00",
    );
    let first = engine.execute(&query).unwrap();
    let second = engine.execute(&query).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.len(), 4);
}

// ---------------------------------------------------------------------------
// Soft and hard failures
// ---------------------------------------------------------------------------

#[rstest]
#[case::empty("")]
#[case::unknown_verb("select ip")]
#[case::unknown_field("get action")]
#[case::self_pair(r#"get user for user = "Amigo""#)]
#[case::missing_for(r#"get user ip = "127.0.0.1""#)]
#[case::upper_case_keyword(r#"GET user for ip = "127.0.0.1""#)]
fn malformed_text_is_no_match(#[case] query: &str) {
    assert_eq!(engine().execute(query).unwrap(), QueryOutput::NoMatch);
}

#[test]
fn bad_range_bound_drops_range() {
    let engine = engine();
    let unbounded = engine.execute(r#"get date for user = "Amigo""#).unwrap();
    let query = r#"get date for user = "Amigo" and date between "soon" and "01.01.2014 00:00:00""#;
    assert_eq!(engine.execute(query).unwrap(), unbounded);
    let query = r#"get date for user = "Amigo" and date between "01.01.2013 00:00:00""#;
    assert_eq!(engine.execute(query).unwrap(), unbounded);
}

#[test]
fn bad_date_filter_is_empty() {
    let out = engine().execute(r#"get event for date = "30.02.2014""#).unwrap();
    assert_eq!(out, QueryOutput::Events(BTreeSet::new()));
}

#[test]
fn unknown_tokens_are_errors() {
    let engine = engine();
    assert_eq!(
        engine.execute(r#"get user for event = "login""#),
        Err(QueryError::UnknownEvent("login".to_string()))
    );
    assert_eq!(
        engine.execute(r#"get user for status = "WARN""#),
        Err(QueryError::UnknownStatus("WARN".to_string()))
    );
}

// ---------------------------------------------------------------------------
// Ingestion through the filesystem
// ---------------------------------------------------------------------------

#[test]
fn two_line_scenario() {
    let dir = LogDir::new().file(
        "activity.log",
        &[
            "1.1.1.1\talice\t01.01.2020 10:00:00\tLOGIN\tOK",
            "1.1.1.1\talice\t02.01.2020 10:00:00\tDOWNLOAD\tOK",
        ],
    );
    let engine = QueryEngine::new(dir.open());
    assert_eq!(
        engine.execute(r#"get user for event = "LOGIN""#).unwrap(),
        strings(&["alice"])
    );
    let query = between(
        r#"get ip for event = "DOWNLOAD""#,
        "01.01.2020 00:00:00",
        "01.01.2020 23:59:59",
    );
    assert_eq!(engine.execute(&query).unwrap(), strings(&[]));
}

#[test]
fn malformed_line_is_dropped() {
    let dir = LogDir::new().file(
        "activity.log",
        &[
            "1.1.1.1\talice\t01.01.2020 10:00:00\tLOGIN\tOK",
            "1.1.1.1\talice\t01.01.2020 10:00:00\tLOGIN",
        ],
    );
    let store = dir.open();
    assert_eq!(store.len(), 1);
    assert_eq!(store.report().rejected.len(), 1);
    assert_eq!(store.report().rejected[0].line_number, 2);
}

#[test]
fn solved_task_counts() {
    let dir = LogDir::new().file(
        "tasks.log",
        &[
            "1.1.1.1\talice\t01.01.2020 10:00:00\tSOLVE_TASK 1\tOK",
            "1.1.1.1\talice\t01.01.2020 11:00:00\tSOLVE_TASK 1\tFAILED",
            "2.2.2.2\tbob\t01.01.2020 12:00:00\tSOLVE_TASK 2\tOK",
        ],
    );
    let store = dir.open();
    assert_eq!(
        store.all_solved_tasks_and_their_number(DateRange::all()),
        BTreeMap::from([(1, 2), (2, 1)])
    );
}

#[test]
fn other_files_are_ignored() {
    let dir = LogDir::corpus()
        .file("notes.txt", &["not\ta\tlog"])
        .bytes("broken.log", &[0xff, 0xfe, b'\n']);
    let store = dir.open();
    assert_eq!(store.len(), CORPUS.len());
    assert_eq!(store.report().unreadable.len(), 1);
    assert_eq!(store.report().files.len(), 2);
}
