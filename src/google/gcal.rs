//! Google Calendar API client for reading busy events

use anyhow::Result;
use async_trait::async_trait;
use chrono::{Local, NaiveDateTime, TimeZone};
use reqwest::Client;
use serde::Deserialize;

use crate::calendar::CalendarProvider;
use crate::scheduling::{OwnerFilter, RawCalendarEvent};

pub const DEFAULT_API_URL: &str = "https://www.googleapis.com";

/// Event structures from the Google Calendar API documentation
#[derive(Debug, Deserialize)]
pub struct EventDateTime {
    #[serde(rename = "dateTime")]
    pub date_time: Option<String>,
    // Set instead of `dateTime` for all-day events
    pub date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PrivateProperties {
    pub categories: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ExtendedProperties {
    #[serde(rename = "private")]
    pub private_properties: Option<PrivateProperties>,
}

#[derive(Debug, Deserialize)]
pub struct Event {
    pub id: Option<String>,
    pub summary: Option<String>,
    pub status: Option<String>,
    pub start: Option<EventDateTime>,
    pub end: Option<EventDateTime>,
    #[serde(rename = "extendedProperties")]
    pub extended_properties: Option<ExtendedProperties>,
}

#[derive(Debug, Deserialize)]
pub struct ListEventsResponse {
    // Decoded one by one so a single odd item doesn't fail the page
    pub items: Option<Vec<serde_json::Value>>,
    #[serde(rename = "nextPageToken")]
    pub next_page_token: Option<String>,
}

/// Decode the items of a page, skipping the ones that aren't events.
fn parse_items(items: Vec<serde_json::Value>) -> Vec<Event> {
    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<Event>(item.clone()) {
            Ok(event) => Some(event),
            Err(e) => {
                tracing::warn!("Skipping calendar item {}: {}", item, e);
                None
            }
        })
        .collect()
}

fn event_time(time: Option<EventDateTime>) -> Option<String> {
    time.and_then(|t| t.date_time.or(t.date))
}

impl From<Event> for RawCalendarEvent {
    fn from(event: Event) -> Self {
        let owner = event
            .extended_properties
            .and_then(|p| p.private_properties)
            .and_then(|p| p.categories);
        RawCalendarEvent {
            id: event.id,
            summary: event.summary,
            start: event_time(event.start),
            end: event_time(event.end),
            owner,
        }
    }
}

/// Wall-clock time as an RFC 3339 timestamp in the machine's offset.
fn to_rfc3339(instant: NaiveDateTime) -> String {
    match Local.from_local_datetime(&instant).earliest() {
        Some(local) => local.to_rfc3339(),
        None => instant.and_utc().to_rfc3339(),
    }
}

/// List events on a calendar between `start` and `end`, following
/// pagination. Recurring events are expanded into single instances.
pub async fn list_events(
    api_url: &str,
    access_token: &str,
    calendar_id: &str,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> Result<Vec<Event>, anyhow::Error> {
    let client = Client::new();
    let url = format!(
        "{}/calendar/v3/calendars/{}/events",
        api_url,
        urlencoding::encode(calendar_id)
    );
    let time_min = to_rfc3339(start);
    let time_max = to_rfc3339(end);

    let mut events = vec![];
    let mut page_token: Option<String> = None;
    loop {
        let mut query = vec![
            ("timeMin", time_min.as_str()),
            ("timeMax", time_max.as_str()),
            ("singleEvents", "true"),
            ("orderBy", "startTime"),
        ];
        if let Some(token) = page_token.as_deref() {
            query.push(("pageToken", token));
        }

        let res = client
            .get(&url)
            .query(&query)
            .bearer_auth(access_token)
            .send()
            .await?;
        let status = res.status();
        let text = res.text().await.unwrap_or_default();
        if !status.is_success() {
            anyhow::bail!("Calendar fetch failed: {} ({})", status, text);
        }

        let page: ListEventsResponse = serde_json::from_str(&text)?;
        events.extend(parse_items(page.items.unwrap_or_default()));
        match page.next_page_token {
            Some(token) => page_token = Some(token),
            None => break,
        }
    }

    Ok(events)
}

/// Reads events from a Google calendar with a pre-issued access token.
#[derive(Debug, Clone)]
pub struct GoogleCalendar {
    api_url: String,
    access_token: String,
    calendar_id: String,
}

impl GoogleCalendar {
    pub fn new(api_url: &str, access_token: &str, calendar_id: &str) -> Self {
        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            access_token: access_token.to_string(),
            calendar_id: calendar_id.to_string(),
        }
    }
}

#[async_trait]
impl CalendarProvider for GoogleCalendar {
    async fn fetch_events(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        owner_filter: &OwnerFilter,
    ) -> Result<Vec<RawCalendarEvent>> {
        let events = list_events(
            &self.api_url,
            &self.access_token,
            &self.calendar_id,
            start,
            end,
        )
        .await?;

        Ok(events
            .into_iter()
            // Cancelled instances of recurring events still show up
            .filter(|e| e.status.as_deref() != Some("cancelled"))
            .map(RawCalendarEvent::from)
            .filter(|e| owner_filter.matches(e.owner.as_deref()))
            .collect())
    }
}
