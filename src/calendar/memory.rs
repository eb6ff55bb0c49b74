use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDateTime;

use super::{CalendarProvider, in_range};
use crate::scheduling::{OwnerFilter, RawCalendarEvent};

/// Fixed list of events, mostly for tests and dry runs.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCalendar {
    events: Vec<RawCalendarEvent>,
}

impl InMemoryCalendar {
    pub fn new(events: Vec<RawCalendarEvent>) -> Self {
        Self { events }
    }
}

#[async_trait]
impl CalendarProvider for InMemoryCalendar {
    async fn fetch_events(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        owner_filter: &OwnerFilter,
    ) -> Result<Vec<RawCalendarEvent>> {
        Ok(self
            .events
            .iter()
            .filter(|e| in_range(e, start, end))
            .filter(|e| owner_filter.matches(e.owner.as_deref()))
            .cloned()
            .collect())
    }
}
