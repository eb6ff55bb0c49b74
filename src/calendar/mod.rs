//! Sources of existing calendar events.

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::scheduling::{OwnerFilter, RawCalendarEvent, parse_instant};

mod file;
mod memory;

pub use file::JsonFileCalendar;
pub use memory::InMemoryCalendar;

/// Read access to a calendar. Implementations return every event
/// intersecting `[start, end)`; they may pre-filter by owner but the
/// caller filters again.
#[async_trait]
pub trait CalendarProvider: Send + Sync {
    async fn fetch_events(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        owner_filter: &OwnerFilter,
    ) -> Result<Vec<RawCalendarEvent>>;
}

/// True when the event's readable times intersect `[start, end)`. Events
/// whose times can't be read are kept so the index can report them.
pub(crate) fn in_range(event: &RawCalendarEvent, start: NaiveDateTime, end: NaiveDateTime) -> bool {
    let event_start = event.start.as_deref().and_then(parse_instant);
    let event_end = event.end.as_deref().and_then(parse_instant);
    match (event_start, event_end) {
        (Some(s), Some(e)) => s < end && e > start,
        _ => true,
    }
}
