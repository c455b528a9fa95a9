//! Writing query results and collection summaries to stdout

use std::collections::{BTreeMap, BTreeSet};
use std::io::{self, BufRead, Write};

use serde::Serialize;

use logscope_logs::{DateRange, Event, LogStore};
use logscope_query::QueryOutput;

use crate::config::OutputFormat;

/// JSON shape of one answered query
#[derive(Debug, Serialize)]
struct QueryReport<'a> {
    query: &'a str,
    kind: &'static str,
    values: Vec<String>,
}

/// Totals over the whole collection
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub entries: usize,
    pub files: usize,
    pub rejected_lines: usize,
    pub unique_ips: usize,
    pub users: usize,
    pub events: BTreeSet<Event>,
    pub solved_tasks: BTreeMap<i32, usize>,
    pub done_tasks: BTreeMap<i32, usize>,
}

impl Summary {
    pub fn collect(store: &LogStore) -> Self {
        let all = DateRange::all();
        let report = store.report();
        Self {
            entries: store.len(),
            files: report.files.len(),
            rejected_lines: report.rejected.len(),
            unique_ips: store.number_of_unique_ips(all),
            users: store.number_of_users(all),
            events: store.all_events(all),
            solved_tasks: store.all_solved_tasks_and_their_number(all),
            done_tasks: store.all_done_tasks_and_their_number(all),
        }
    }
}

pub fn write_output(
    out: &mut impl Write,
    query: &str,
    output: &QueryOutput,
    format: OutputFormat,
) -> io::Result<()> {
    match format {
        OutputFormat::Plain => {
            for line in output.lines() {
                writeln!(out, "{line}")?;
            }
        }
        OutputFormat::Json => {
            let report = QueryReport {
                query,
                kind: output.kind(),
                values: output.lines(),
            };
            serde_json::to_writer(&mut *out, &report)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

pub fn write_summary(
    out: &mut impl Write,
    summary: &Summary,
    format: OutputFormat,
) -> io::Result<()> {
    match format {
        OutputFormat::Plain => {
            writeln!(out, "entries: {}", summary.entries)?;
            writeln!(out, "files: {}", summary.files)?;
            writeln!(out, "rejected lines: {}", summary.rejected_lines)?;
            writeln!(out, "unique ips: {}", summary.unique_ips)?;
            writeln!(out, "users: {}", summary.users)?;
            let events: Vec<_> = summary.events.iter().map(Event::as_str).collect();
            writeln!(out, "events: {}", events.join(", "))?;
            writeln!(out, "solved tasks: {}", task_counts(&summary.solved_tasks))?;
            writeln!(out, "done tasks: {}", task_counts(&summary.done_tasks))?;
        }
        OutputFormat::Json => {
            serde_json::to_writer(&mut *out, summary)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

fn task_counts(counts: &BTreeMap<i32, usize>) -> String {
    counts
        .iter()
        .map(|(task, n)| format!("{task}={n}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Queries from a line-oriented reader, skipping blanks and `#` comments
pub fn read_queries(input: impl BufRead) -> io::Result<Vec<String>> {
    let mut queries = Vec::new();
    for line in input.lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        queries.push(trimmed.to_string());
    }
    Ok(queries)
}
