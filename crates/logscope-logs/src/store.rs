use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDateTime;

use logscope_types::{DateRange, Event, LogEntry, Status};

use crate::loader::{IngestReport, LoadError, LogLoader};

/// Read-only collection of parsed entries and the typed queries over it
///
/// The entries are fixed at construction. Cloning is cheap and clones share
/// the same storage, so a store can be handed to several readers at once.
/// Every accessor builds a fresh result; nothing returned aliases the store.
#[derive(Clone, Debug, Default)]
pub struct LogStore {
    entries: Arc<[LogEntry]>,
    report: Arc<IngestReport>,
}

impl LogStore {
    /// Load every `.log` file in `dir`
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, LoadError> {
        Self::open_with(&LogLoader::new(dir.as_ref()))
    }

    /// Load using a configured loader
    pub fn open_with(loader: &LogLoader) -> Result<Self, LoadError> {
        let (entries, report) = loader.load()?;
        Ok(Self {
            entries: entries.into(),
            report: Arc::new(report),
        })
    }

    pub fn from_entries(entries: Vec<LogEntry>) -> Self {
        let report = IngestReport {
            accepted: entries.len(),
            ..IngestReport::default()
        };
        Self {
            entries: entries.into(),
            report: Arc::new(report),
        }
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Ingestion summary for this store
    pub fn report(&self) -> &IngestReport {
        &self.report
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // ------------------------------------------------------------------------
    // Building blocks
    // ------------------------------------------------------------------------

    /// Entries inside `range` that satisfy `keep`
    fn matching<'a, F>(&'a self, range: DateRange, keep: F) -> impl Iterator<Item = &'a LogEntry>
    where
        F: Fn(&LogEntry) -> bool,
    {
        self.entries
            .iter()
            .filter(move |e| range.contains(&e.timestamp) && keep(*e))
    }

    /// Distinct projected values of matching entries
    fn distinct<T, F, P>(&self, range: DateRange, keep: F, project: P) -> BTreeSet<T>
    where
        T: Ord,
        F: Fn(&LogEntry) -> bool,
        P: Fn(&LogEntry) -> T,
    {
        self.matching(range, keep).map(project).collect()
    }

    fn earliest<F>(&self, range: DateRange, keep: F) -> Option<NaiveDateTime>
    where
        F: Fn(&LogEntry) -> bool,
    {
        self.matching(range, keep).map(|e| e.timestamp).min()
    }

    fn task_counts(&self, event: Event, range: DateRange) -> BTreeMap<i32, usize> {
        let mut counts = BTreeMap::new();
        for entry in self.matching(range, |e| e.event == event) {
            *counts.entry(entry.action).or_insert(0) += 1;
        }
        counts
    }

    // ------------------------------------------------------------------------
    // IP queries
    // ------------------------------------------------------------------------

    pub fn number_of_unique_ips(&self, range: DateRange) -> usize {
        self.unique_ips(range).len()
    }

    pub fn unique_ips(&self, range: DateRange) -> BTreeSet<String> {
        self.distinct(range, |_| true, |e| e.ip.clone())
    }

    pub fn ips_for_user(&self, user: &str, range: DateRange) -> BTreeSet<String> {
        self.distinct(range, |e| e.user == user, |e| e.ip.clone())
    }

    pub fn ips_for_event(&self, event: Event, range: DateRange) -> BTreeSet<String> {
        self.distinct(range, |e| e.event == event, |e| e.ip.clone())
    }

    pub fn ips_for_status(&self, status: Status, range: DateRange) -> BTreeSet<String> {
        self.distinct(range, |e| e.status == status, |e| e.ip.clone())
    }

    pub fn ips_for_date(&self, date: NaiveDateTime, range: DateRange) -> BTreeSet<String> {
        self.distinct(range, |e| e.timestamp == date, |e| e.ip.clone())
    }

    // ------------------------------------------------------------------------
    // User queries
    // ------------------------------------------------------------------------

    /// Every user in the collection, regardless of date
    pub fn all_users(&self) -> BTreeSet<String> {
        self.distinct(DateRange::all(), |_| true, |e| e.user.clone())
    }

    pub fn number_of_users(&self, range: DateRange) -> usize {
        self.matching(range, |_| true)
            .map(|e| e.user.as_str())
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Number of distinct events the user produced
    pub fn number_of_user_events(&self, user: &str, range: DateRange) -> usize {
        self.events_for_user(user, range).len()
    }

    pub fn users_for_ip(&self, ip: &str, range: DateRange) -> BTreeSet<String> {
        self.distinct(range, |e| e.ip == ip, |e| e.user.clone())
    }

    pub fn users_for_date(&self, date: NaiveDateTime, range: DateRange) -> BTreeSet<String> {
        self.distinct(range, |e| e.timestamp == date, |e| e.user.clone())
    }

    pub fn users_for_event(&self, event: Event, range: DateRange) -> BTreeSet<String> {
        self.distinct(range, |e| e.event == event, |e| e.user.clone())
    }

    pub fn users_for_status(&self, status: Status, range: DateRange) -> BTreeSet<String> {
        self.distinct(range, |e| e.status == status, |e| e.user.clone())
    }

    pub fn logged_users(&self, range: DateRange) -> BTreeSet<String> {
        self.users_for_event(Event::Login, range)
    }

    pub fn downloaded_plugin_users(&self, range: DateRange) -> BTreeSet<String> {
        self.users_for_event(Event::Download, range)
    }

    pub fn wrote_message_users(&self, range: DateRange) -> BTreeSet<String> {
        self.users_for_event(Event::WriteMessage, range)
    }

    pub fn solved_task_users(&self, range: DateRange) -> BTreeSet<String> {
        self.users_for_event(Event::SolveTask, range)
    }

    pub fn solved_task_users_for(&self, task: i32, range: DateRange) -> BTreeSet<String> {
        self.users_for_task(Event::SolveTask, task, range)
    }

    pub fn done_task_users(&self, range: DateRange) -> BTreeSet<String> {
        self.users_for_event(Event::DoneTask, range)
    }

    pub fn done_task_users_for(&self, task: i32, range: DateRange) -> BTreeSet<String> {
        self.users_for_task(Event::DoneTask, task, range)
    }

    fn users_for_task(&self, event: Event, task: i32, range: DateRange) -> BTreeSet<String> {
        self.distinct(
            range,
            |e| e.event == event && e.action == task,
            |e| e.user.clone(),
        )
    }

    // ------------------------------------------------------------------------
    // Date queries
    // ------------------------------------------------------------------------

    /// Every timestamp in the collection, regardless of range
    pub fn all_dates(&self) -> BTreeSet<NaiveDateTime> {
        self.distinct(DateRange::all(), |_| true, |e| e.timestamp)
    }

    pub fn dates_for_ip(&self, ip: &str, range: DateRange) -> BTreeSet<NaiveDateTime> {
        self.distinct(range, |e| e.ip == ip, |e| e.timestamp)
    }

    pub fn dates_for_user(&self, user: &str, range: DateRange) -> BTreeSet<NaiveDateTime> {
        self.distinct(range, |e| e.user == user, |e| e.timestamp)
    }

    pub fn dates_for_event(&self, event: Event, range: DateRange) -> BTreeSet<NaiveDateTime> {
        self.distinct(range, |e| e.event == event, |e| e.timestamp)
    }

    pub fn dates_for_status(&self, status: Status, range: DateRange) -> BTreeSet<NaiveDateTime> {
        self.distinct(range, |e| e.status == status, |e| e.timestamp)
    }

    pub fn dates_for_user_and_event(
        &self,
        user: &str,
        event: Event,
        range: DateRange,
    ) -> BTreeSet<NaiveDateTime> {
        self.distinct(
            range,
            |e| e.user == user && e.event == event,
            |e| e.timestamp,
        )
    }

    pub fn dates_when_something_failed(&self, range: DateRange) -> BTreeSet<NaiveDateTime> {
        self.dates_for_status(Status::Failed, range)
    }

    pub fn dates_when_error_happened(&self, range: DateRange) -> BTreeSet<NaiveDateTime> {
        self.dates_for_status(Status::Error, range)
    }

    /// Earliest login of `user`, if any
    pub fn date_when_user_logged_first_time(
        &self,
        user: &str,
        range: DateRange,
    ) -> Option<NaiveDateTime> {
        self.earliest(range, |e| e.user == user && e.event == Event::Login)
    }

    pub fn date_when_user_solved_task(
        &self,
        user: &str,
        task: i32,
        range: DateRange,
    ) -> Option<NaiveDateTime> {
        self.earliest(range, |e| {
            e.user == user && e.event == Event::SolveTask && e.action == task
        })
    }

    pub fn date_when_user_done_task(
        &self,
        user: &str,
        task: i32,
        range: DateRange,
    ) -> Option<NaiveDateTime> {
        self.earliest(range, |e| {
            e.user == user && e.event == Event::DoneTask && e.action == task
        })
    }

    pub fn dates_when_user_wrote_message(
        &self,
        user: &str,
        range: DateRange,
    ) -> BTreeSet<NaiveDateTime> {
        self.dates_for_user_and_event(user, Event::WriteMessage, range)
    }

    pub fn dates_when_user_downloaded_plugin(
        &self,
        user: &str,
        range: DateRange,
    ) -> BTreeSet<NaiveDateTime> {
        self.dates_for_user_and_event(user, Event::Download, range)
    }

    // ------------------------------------------------------------------------
    // Event queries
    // ------------------------------------------------------------------------

    pub fn number_of_all_events(&self, range: DateRange) -> usize {
        self.all_events(range).len()
    }

    pub fn all_events(&self, range: DateRange) -> BTreeSet<Event> {
        self.distinct(range, |_| true, |e| e.event)
    }

    pub fn events_for_ip(&self, ip: &str, range: DateRange) -> BTreeSet<Event> {
        self.distinct(range, |e| e.ip == ip, |e| e.event)
    }

    pub fn events_for_user(&self, user: &str, range: DateRange) -> BTreeSet<Event> {
        self.distinct(range, |e| e.user == user, |e| e.event)
    }

    pub fn events_for_date(&self, date: NaiveDateTime, range: DateRange) -> BTreeSet<Event> {
        self.distinct(range, |e| e.timestamp == date, |e| e.event)
    }

    pub fn events_for_status(&self, status: Status, range: DateRange) -> BTreeSet<Event> {
        self.distinct(range, |e| e.status == status, |e| e.event)
    }

    pub fn failed_events(&self, range: DateRange) -> BTreeSet<Event> {
        self.events_for_status(Status::Failed, range)
    }

    pub fn error_events(&self, range: DateRange) -> BTreeSet<Event> {
        self.events_for_status(Status::Error, range)
    }

    /// Number of SOLVE_TASK entries for `task` (every attempt counts)
    pub fn number_of_attempts_to_solve_task(&self, task: i32, range: DateRange) -> usize {
        self.matching(range, move |e| e.event == Event::SolveTask && e.action == task)
            .count()
    }

    /// Number of DONE_TASK entries for `task`
    pub fn number_of_successful_attempts_to_solve_task(
        &self,
        task: i32,
        range: DateRange,
    ) -> usize {
        self.matching(range, move |e| e.event == Event::DoneTask && e.action == task)
            .count()
    }

    /// Task id to number of SOLVE_TASK entries
    pub fn all_solved_tasks_and_their_number(&self, range: DateRange) -> BTreeMap<i32, usize> {
        self.task_counts(Event::SolveTask, range)
    }

    /// Task id to number of DONE_TASK entries
    pub fn all_done_tasks_and_their_number(&self, range: DateRange) -> BTreeMap<i32, usize> {
        self.task_counts(Event::DoneTask, range)
    }

    // ------------------------------------------------------------------------
    // Status queries
    // ------------------------------------------------------------------------

    pub fn all_statuses(&self, range: DateRange) -> BTreeSet<Status> {
        self.distinct(range, |_| true, |e| e.status)
    }

    pub fn statuses_for_ip(&self, ip: &str, range: DateRange) -> BTreeSet<Status> {
        self.distinct(range, |e| e.ip == ip, |e| e.status)
    }

    pub fn statuses_for_user(&self, user: &str, range: DateRange) -> BTreeSet<Status> {
        self.distinct(range, |e| e.user == user, |e| e.status)
    }

    pub fn statuses_for_date(&self, date: NaiveDateTime, range: DateRange) -> BTreeSet<Status> {
        self.distinct(range, |e| e.timestamp == date, |e| e.status)
    }

    pub fn statuses_for_event(&self, event: Event, range: DateRange) -> BTreeSet<Status> {
        self.distinct(range, |e| e.event == event, |e| e.status)
    }
}
