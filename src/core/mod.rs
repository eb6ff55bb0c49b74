mod config;

use std::sync::Arc;

use anyhow::Result;

pub use config::{AppConfig, GoogleCalendarConfig};

use crate::calendar::{CalendarProvider, JsonFileCalendar};
use crate::google::gcal::GoogleCalendar;
use crate::lawyers::{JsonProfileStore, ProfileStore, load_rules};
use crate::scheduling::{Scheduler, SchedulerOptions, UnavailabilityPolicy};

/// Load profiles and rules and pick the calendar source.
pub async fn build_scheduler(config: &AppConfig) -> Result<Scheduler> {
    let profiles = JsonProfileStore::load(&config.lawyers_path).await?;

    let mut policy = UnavailabilityPolicy::from_profiles(profiles.all().iter());
    if let Some(rules_path) = &config.rules_path {
        policy.extend(load_rules(rules_path).await?);
    }

    let calendar: Arc<dyn CalendarProvider> = match &config.google_calendar {
        Some(gcal) => {
            tracing::debug!("Reading calendar {} from {}", gcal.calendar_id, gcal.api_url);
            Arc::new(GoogleCalendar::new(
                &gcal.api_url,
                &gcal.access_token,
                &gcal.calendar_id,
            ))
        }
        None => {
            tracing::debug!("Reading calendar from {}", config.calendar_path);
            Arc::new(JsonFileCalendar::new(&config.calendar_path))
        }
    };

    Ok(Scheduler::new(
        calendar,
        Arc::new(profiles),
        policy,
        SchedulerOptions {
            owner_filter: config.owner_filter,
            strictness: config.strictness,
        },
    ))
}
