//! Immutable snapshot of the busy intervals on a lawyer's calendar.

use std::collections::HashMap;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use itertools::Itertools;

use super::models::{CalendarEvent, RawCalendarEvent, TimeInterval};

/// How far ahead of "now" the calendar is read.
pub const LOOKAHEAD_DAYS: i64 = 14;

/// Which events on a (possibly shared) calendar belong to the lawyer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OwnerFilter {
    /// Every event blocks the calendar
    #[default]
    All,
    /// Only events whose category list contains this tag
    Category(String),
}

impl OwnerFilter {
    pub fn matches(&self, owner: Option<&str>) -> bool {
        match self {
            OwnerFilter::All => true,
            OwnerFilter::Category(tag) => owner.is_some_and(|categories| {
                categories
                    .split([',', ';'])
                    .any(|c| c.trim().eq_ignore_ascii_case(tag.trim()))
            }),
        }
    }
}

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Read a calendar timestamp as local wall-clock time. Offsets are dropped,
/// not converted.
pub fn parse_instant(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}

fn read_event(raw: RawCalendarEvent) -> Option<CalendarEvent> {
    let start = raw.start.as_deref().and_then(parse_instant)?;
    let end = raw.end.as_deref().and_then(parse_instant)?;
    let interval = TimeInterval::new(start, end)?;
    Some(CalendarEvent {
        id: raw.id,
        summary: raw.summary,
        interval,
        owner: raw.owner,
    })
}

#[derive(Debug, Clone)]
pub struct CalendarIndex {
    window: TimeInterval,
    events: Vec<CalendarEvent>,
    per_day: HashMap<NaiveDate, usize>,
}

impl CalendarIndex {
    /// The default read window: from `now` to the end of the last day
    /// slots are generated for, `today + LOOKAHEAD_DAYS`.
    pub fn lookahead(now: NaiveDateTime) -> TimeInterval {
        let end = now.date().and_time(NaiveTime::MIN) + Duration::days(LOOKAHEAD_DAYS + 1);
        TimeInterval::spanning(now, end - now)
    }

    /// Keep the events that fall inside `window` and belong to the owner.
    pub fn new(
        events: impl IntoIterator<Item = CalendarEvent>,
        window: TimeInterval,
        owner_filter: &OwnerFilter,
    ) -> Self {
        let events: Vec<CalendarEvent> = events
            .into_iter()
            .filter(|e| e.interval.intersects(&window))
            .filter(|e| owner_filter.matches(e.owner.as_deref()))
            .sorted_by_key(|e| e.interval)
            .collect();
        let per_day = events
            .iter()
            .map(|e| e.interval.start().date())
            .counts();

        Self {
            window,
            events,
            per_day,
        }
    }

    /// Build a snapshot from provider output. Events with missing or
    /// unreadable times are skipped rather than failing the whole fetch.
    pub fn from_raw(
        raw: impl IntoIterator<Item = RawCalendarEvent>,
        window: TimeInterval,
        owner_filter: &OwnerFilter,
    ) -> Self {
        let events = raw.into_iter().filter_map(|event| {
            let label = event
                .id
                .clone()
                .or_else(|| event.summary.clone())
                .unwrap_or_else(|| "<unnamed>".to_string());
            let parsed = read_event(event);
            if parsed.is_none() {
                tracing::warn!("Skipping calendar event with unreadable start/end: {}", label);
            }
            parsed
        });
        Self::new(events, window, owner_filter)
    }

    pub fn window(&self) -> TimeInterval {
        self.window
    }

    pub fn events(&self) -> &[CalendarEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// True when `interval` intersects any event padded by `buffer_minutes`
    /// on both sides. Ending exactly where a padded event begins (or
    /// starting exactly where one ends) is not an overlap.
    pub fn overlaps(&self, interval: &TimeInterval, buffer_minutes: u32) -> bool {
        self.events
            .iter()
            .any(|e| e.interval.widen(buffer_minutes).intersects(interval))
    }

    /// Number of events starting on `day`.
    pub fn count_by_day(&self, day: NaiveDate) -> usize {
        self.per_day.get(&day).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(day: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, day)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn event(day: u32, start: (u32, u32), end: (u32, u32)) -> CalendarEvent {
        CalendarEvent::new(
            TimeInterval::new(at(day, start.0, start.1), at(day, end.0, end.1)).unwrap(),
        )
    }

    fn raw(start: Option<&str>, end: Option<&str>) -> RawCalendarEvent {
        RawCalendarEvent {
            start: start.map(String::from),
            end: end.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn it_parses_supported_timestamp_formats() {
        let expected = at(3, 10, 0);
        assert_eq!(parse_instant("2025-03-03T10:00:00-05:00"), Some(expected));
        assert_eq!(parse_instant("2025-03-03T10:00:00Z"), Some(expected));
        assert_eq!(parse_instant("2025-03-03T10:00:00"), Some(expected));
        assert_eq!(parse_instant("2025-03-03T10:00"), Some(expected));
        assert_eq!(parse_instant("2025-03-03 10:00"), Some(expected));
        assert_eq!(parse_instant("2025-03-03"), None);
        assert_eq!(parse_instant("tomorrow"), None);
    }

    #[test]
    fn it_skips_unreadable_events() {
        let now = at(3, 8, 0);
        let index = CalendarIndex::from_raw(
            vec![
                raw(Some("2025-03-03T10:00:00"), Some("2025-03-03T11:00:00")),
                raw(None, Some("2025-03-03T11:00:00")),
                raw(Some("garbage"), Some("2025-03-03T11:00:00")),
                raw(Some("2025-03-03T12:00:00"), Some("2025-03-03T12:00:00")),
                raw(Some("2025-03-04"), Some("2025-03-05")),
            ],
            CalendarIndex::lookahead(now),
            &OwnerFilter::All,
        );
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn it_keeps_only_events_inside_the_window() {
        let now = at(3, 12, 0);
        let index = CalendarIndex::new(
            vec![
                event(3, (9, 0), (10, 0)),
                event(3, (11, 30), (12, 30)),
                event(4, (9, 0), (10, 0)),
            ],
            CalendarIndex::lookahead(now),
            &OwnerFilter::All,
        );
        assert_eq!(index.len(), 2);
        assert_eq!(index.events()[0].interval.start(), at(3, 11, 30));
    }

    #[test]
    fn it_reads_through_the_end_of_the_last_generated_day() {
        let now = at(3, 8, 0);
        let window = CalendarIndex::lookahead(now);
        assert_eq!(window.start(), now);
        assert_eq!(window.end(), at(18, 0, 0));

        let index = CalendarIndex::new(
            vec![event(17, (10, 0), (11, 0)), event(18, (9, 0), (10, 0))],
            window,
            &OwnerFilter::All,
        );
        assert_eq!(index.window(), window);
        assert_eq!(index.len(), 1);
        assert_eq!(index.count_by_day(at(17, 0, 0).date()), 1);

        let empty = CalendarIndex::new(vec![event(18, (9, 0), (10, 0))], window, &OwnerFilter::All);
        assert!(empty.is_empty());
    }

    #[test]
    fn it_applies_the_buffer_with_exclusive_boundaries() {
        let now = at(3, 8, 0);
        let index = CalendarIndex::new(
            vec![event(3, (10, 0), (11, 0))],
            CalendarIndex::lookahead(now),
            &OwnerFilter::All,
        );
        let slot = |s: (u32, u32), e: (u32, u32)| {
            TimeInterval::new(at(3, s.0, s.1), at(3, e.0, e.1)).unwrap()
        };

        assert!(index.overlaps(&slot((11, 0), (12, 0)), 15));
        assert!(!index.overlaps(&slot((11, 15), (12, 15)), 15));
        assert!(!index.overlaps(&slot((8, 45), (9, 45)), 15));
        assert!(index.overlaps(&slot((9, 0), (10, 0)), 15));
        assert!(!index.overlaps(&slot((9, 0), (10, 0)), 0));
    }

    #[test]
    fn it_counts_events_per_day() {
        let now = at(3, 8, 0);
        let index = CalendarIndex::new(
            vec![
                event(3, (9, 0), (10, 0)),
                event(3, (14, 0), (15, 0)),
                event(5, (9, 0), (10, 0)),
            ],
            CalendarIndex::lookahead(now),
            &OwnerFilter::All,
        );
        assert_eq!(index.count_by_day(at(3, 0, 0).date()), 2);
        assert_eq!(index.count_by_day(at(5, 0, 0).date()), 1);
        assert_eq!(index.count_by_day(at(4, 0, 0).date()), 0);
    }

    #[test]
    fn it_filters_shared_calendars_by_owner() {
        let now = at(3, 8, 0);
        let events = vec![
            event(3, (9, 0), (10, 0)).with_owner("Daniel H"),
            event(3, (10, 0), (11, 0)).with_owner("Tina G, Urgent"),
            event(3, (11, 0), (12, 0)),
        ];

        let all = CalendarIndex::new(events.clone(), CalendarIndex::lookahead(now), &OwnerFilter::All);
        assert_eq!(all.len(), 3);

        let tina = CalendarIndex::new(
            events,
            CalendarIndex::lookahead(now),
            &OwnerFilter::Category("tina g".to_string()),
        );
        assert_eq!(tina.len(), 1);
        assert_eq!(tina.count_by_day(at(3, 0, 0).date()), 1);
    }
}
