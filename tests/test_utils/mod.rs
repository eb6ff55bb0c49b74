//! Test utilities for integration tests
#![allow(dead_code)]

use std::sync::{Arc, RwLock};

use anyhow::anyhow;
use async_trait::async_trait;
use axum::{Router, body::Body};
use chrono::NaiveDateTime;

use lawhub::api::AppState;
use lawhub::api::app;
use lawhub::calendar::{CalendarProvider, InMemoryCalendar};
use lawhub::core::AppConfig;
use lawhub::lawyers::{InMemoryProfileStore, ProfileStore};
use lawhub::scheduling::{
    LawyerProfile, OwnerFilter, OwnerFilterMode, RawCalendarEvent, Scheduler, SchedulerOptions,
    Strictness, UnavailabilityPolicy,
};

/// Two lawyers: DH is always available, XX is never at the office.
pub fn test_lawyers() -> Vec<LawyerProfile> {
    serde_json::from_str(
        r#"[
            {"id": "DH", "name": "Daniel H", "email": "dh@example.com",
             "workingHours": {"start": "9:00", "end": "17:00"},
             "breakMinutes": 0, "maxDailyAppointments": 8},
            {"id": "XX", "name": "Xavier X", "email": "xx@example.com",
             "unavailability": {"office": ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"]}}
        ]"#,
    )
    .expect("Failed to parse test lawyers")
}

pub fn test_event(start: &str, end: &str) -> RawCalendarEvent {
    RawCalendarEvent {
        id: Some(format!("{}-{}", start, end)),
        summary: Some("Existing appointment".to_string()),
        start: Some(start.to_string()),
        end: Some(end.to_string()),
        owner: Some("Daniel H".to_string()),
    }
}

/// A calendar that can't be reached
pub struct FailingCalendar;

#[async_trait]
impl CalendarProvider for FailingCalendar {
    async fn fetch_events(
        &self,
        _start: NaiveDateTime,
        _end: NaiveDateTime,
        _owner_filter: &OwnerFilter,
    ) -> anyhow::Result<Vec<RawCalendarEvent>> {
        Err(anyhow!("calendar service unavailable"))
    }
}

fn test_config() -> AppConfig {
    AppConfig {
        storage_path: String::from("./data"),
        lawyers_path: String::from("./data/lawyers.json"),
        rules_path: None,
        calendar_path: String::from("./data/calendar.json"),
        owner_filter: OwnerFilterMode::All,
        strictness: Strictness::Permissive,
        google_calendar: None,
    }
}

/// Creates a test application router backed by in-memory profiles and
/// the given calendar.
pub fn test_app_with_calendar(calendar: Arc<dyn CalendarProvider>) -> Router {
    let profiles = InMemoryProfileStore::new(test_lawyers());
    let policy = UnavailabilityPolicy::from_profiles(profiles.all().iter());
    let scheduler = Scheduler::new(
        calendar,
        Arc::new(profiles),
        policy,
        SchedulerOptions::default(),
    );
    let app_state = AppState::new(scheduler, test_config());
    app(Arc::new(RwLock::new(app_state)))
}

pub fn test_app_with_events(events: Vec<RawCalendarEvent>) -> Router {
    test_app_with_calendar(Arc::new(InMemoryCalendar::new(events)))
}

/// Creates a test application router with an empty calendar.
pub async fn test_app() -> Router {
    test_app_with_events(vec![])
}

pub async fn body_to_string(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Failed to read body");
    String::from_utf8(bytes.to_vec()).expect("Body is not utf-8")
}
