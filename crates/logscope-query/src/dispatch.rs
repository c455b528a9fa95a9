//! Mapping from (target, filter) field pairs to store accessors

use chrono::NaiveDateTime;

use logscope_logs::LogStore;
use logscope_types::{DateRange, Event, Status};

use crate::field::Field;
use crate::output::QueryOutput;

/// Which date bounds a route passes to its accessor
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bounds {
    Both,
    /// The upper bound is always dropped
    AfterOnly,
}

/// Store accessor reachable from query text
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Accessor {
    UsersForIp,
    DatesForIp,
    EventsForIp,
    StatusesForIp,
    IpsForUser,
    DatesForUser,
    EventsForUser,
    StatusesForUser,
    IpsForDate,
    UsersForDate,
    EventsForDate,
    StatusesForDate,
    IpsForEvent,
    UsersForEvent,
    DatesForEvent,
    StatusesForEvent,
    IpsForStatus,
    UsersForStatus,
    DatesForStatus,
    EventsForStatus,
}

/// Typed filter value
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FilterValue {
    Text(String),
    Date(NaiveDateTime),
    Event(Event),
    Status(Status),
}

/// One cell of the dispatch table
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Route {
    pub target: Field,
    pub filter: Field,
    pub accessor: Accessor,
    pub bounds: Bounds,
}

const fn route(target: Field, filter: Field, accessor: Accessor, bounds: Bounds) -> Route {
    Route {
        target,
        filter,
        accessor,
        bounds,
    }
}

use Accessor::*;
use Bounds::*;
use Field::{Date, Event as Ev, Ip, Status as St, User};

/// Every valid (target, filter) pair, grouped by filter field
///
/// `user for ip` ignores the upper date bound; every other pair honours both.
pub static ROUTES: [Route; 20] = [
    route(User, Ip, UsersForIp, AfterOnly),
    route(Date, Ip, DatesForIp, Both),
    route(Ev, Ip, EventsForIp, Both),
    route(St, Ip, StatusesForIp, Both),
    route(Ip, User, IpsForUser, Both),
    route(Date, User, DatesForUser, Both),
    route(Ev, User, EventsForUser, Both),
    route(St, User, StatusesForUser, Both),
    route(Ip, Date, IpsForDate, Both),
    route(User, Date, UsersForDate, Both),
    route(Ev, Date, EventsForDate, Both),
    route(St, Date, StatusesForDate, Both),
    route(Ip, Ev, IpsForEvent, Both),
    route(User, Ev, UsersForEvent, Both),
    route(Date, Ev, DatesForEvent, Both),
    route(St, Ev, StatusesForEvent, Both),
    route(Ip, St, IpsForStatus, Both),
    route(User, St, UsersForStatus, Both),
    route(Date, St, DatesForStatus, Both),
    route(Ev, St, EventsForStatus, Both),
];

/// Find the route for a pair; `None` when `target == filter`
pub fn lookup(target: Field, filter: Field) -> Option<&'static Route> {
    ROUTES
        .iter()
        .find(|r| r.target == target && r.filter == filter)
}

impl Route {
    /// Date range actually handed to the accessor
    pub fn effective_range(&self, range: DateRange) -> DateRange {
        match self.bounds {
            Both => range,
            AfterOnly => range.without_upper(),
        }
    }

    /// Run the accessor; a value of the wrong kind yields an empty result
    pub fn invoke(&self, store: &LogStore, value: &FilterValue, range: DateRange) -> QueryOutput {
        let range = self.effective_range(range);
        match (self.accessor, value) {
            (UsersForIp, FilterValue::Text(ip)) => store.users_for_ip(ip, range).into(),
            (DatesForIp, FilterValue::Text(ip)) => store.dates_for_ip(ip, range).into(),
            (EventsForIp, FilterValue::Text(ip)) => store.events_for_ip(ip, range).into(),
            (StatusesForIp, FilterValue::Text(ip)) => store.statuses_for_ip(ip, range).into(),

            (IpsForUser, FilterValue::Text(user)) => store.ips_for_user(user, range).into(),
            (DatesForUser, FilterValue::Text(user)) => store.dates_for_user(user, range).into(),
            (EventsForUser, FilterValue::Text(user)) => store.events_for_user(user, range).into(),
            (StatusesForUser, FilterValue::Text(user)) => {
                store.statuses_for_user(user, range).into()
            }

            (IpsForDate, FilterValue::Date(date)) => store.ips_for_date(*date, range).into(),
            (UsersForDate, FilterValue::Date(date)) => store.users_for_date(*date, range).into(),
            (EventsForDate, FilterValue::Date(date)) => store.events_for_date(*date, range).into(),
            (StatusesForDate, FilterValue::Date(date)) => {
                store.statuses_for_date(*date, range).into()
            }

            (IpsForEvent, FilterValue::Event(event)) => store.ips_for_event(*event, range).into(),
            (UsersForEvent, FilterValue::Event(event)) => {
                store.users_for_event(*event, range).into()
            }
            (DatesForEvent, FilterValue::Event(event)) => {
                store.dates_for_event(*event, range).into()
            }
            (StatusesForEvent, FilterValue::Event(event)) => {
                store.statuses_for_event(*event, range).into()
            }

            (IpsForStatus, FilterValue::Status(status)) => {
                store.ips_for_status(*status, range).into()
            }
            (UsersForStatus, FilterValue::Status(status)) => {
                store.users_for_status(*status, range).into()
            }
            (DatesForStatus, FilterValue::Status(status)) => {
                store.dates_for_status(*status, range).into()
            }
            (EventsForStatus, FilterValue::Status(status)) => {
                store.events_for_status(*status, range).into()
            }

            _ => QueryOutput::empty(self.target),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_table_is_total_over_distinct_pairs() {
        for target in Field::ALL {
            for filter in Field::ALL {
                let found = lookup(target, filter);
                if target == filter {
                    assert!(found.is_none());
                } else {
                    let route = found.unwrap();
                    assert_eq!((route.target, route.filter), (target, filter));
                }
            }
        }
    }

    #[test]
    fn test_accessors_are_unique() {
        let accessors: HashSet<_> = ROUTES.iter().map(|r| r.accessor).collect();
        assert_eq!(accessors.len(), ROUTES.len());
    }

    #[test]
    fn test_only_user_for_ip_drops_upper_bound() {
        let after_only: Vec<_> = ROUTES
            .iter()
            .filter(|r| r.bounds == AfterOnly)
            .map(|r| (r.target, r.filter))
            .collect();
        assert_eq!(after_only, vec![(User, Ip)]);
    }

    #[test]
    fn test_mismatched_value_is_empty() {
        let store = LogStore::default();
        let route = lookup(Ip, Ev).unwrap();
        let out = route.invoke(&store, &FilterValue::Text("LOGIN".into()), DateRange::all());
        assert_eq!(out, QueryOutput::empty(Ip));
    }
}
