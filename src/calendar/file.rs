use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDateTime;

use super::{CalendarProvider, in_range};
use crate::scheduling::{OwnerFilter, RawCalendarEvent};

/// Calendar snapshot exported to a JSON array of events:
///
/// `[{"id": "1", "summary": "...", "start": "2025-03-03T10:00:00",
///    "end": "2025-03-03T11:00:00", "owner": "Daniel H"}]`
///
/// The file is read on every fetch so an external export can replace it
/// while the server runs. A missing file is an empty calendar.
#[derive(Debug, Clone)]
pub struct JsonFileCalendar {
    path: PathBuf,
}

impl JsonFileCalendar {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CalendarProvider for JsonFileCalendar {
    async fn fetch_events(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        owner_filter: &OwnerFilter,
    ) -> Result<Vec<RawCalendarEvent>> {
        let exists = tokio::fs::try_exists(&self.path)
            .await
            .with_context(|| format!("Failed to check calendar file {}", self.path.display()))?;
        if !exists {
            tracing::warn!(
                "Calendar file {} does not exist, treating it as empty",
                self.path.display()
            );
            return Ok(vec![]);
        }

        let contents = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read calendar file {}", self.path.display()))?;
        let events: Vec<RawCalendarEvent> = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse calendar file {}", self.path.display()))?;

        Ok(events
            .into_iter()
            .filter(|e| in_range(e, start, end))
            .filter(|e| owner_filter.matches(e.owner.as_deref()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::tempdir;

    fn at(day: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, day)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[tokio::test]
    async fn it_reads_events_from_a_json_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("calendar.json");
        fs::write(
            &path,
            r#"[
                {"id": "1", "summary": "Consultation", "start": "2025-03-03T10:00:00", "end": "2025-03-03T11:00:00", "owner": "Daniel H"},
                {"id": "2", "summary": "Later", "start": "2025-04-03T10:00:00", "end": "2025-04-03T11:00:00"}
            ]"#,
        )
        .unwrap();

        let calendar = JsonFileCalendar::new(&path);
        let events = calendar
            .fetch_events(at(3, 0), at(17, 0), &OwnerFilter::All)
            .await
            .unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id.as_deref(), Some("1"));
        assert_eq!(events[0].owner.as_deref(), Some("Daniel H"));
    }

    #[tokio::test]
    async fn it_treats_a_missing_file_as_empty() {
        let dir = tempdir().unwrap();
        let calendar = JsonFileCalendar::new(dir.path().join("missing.json"));
        let events = calendar
            .fetch_events(at(3, 0), at(17, 0), &OwnerFilter::All)
            .await
            .unwrap();
        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn it_errors_when_the_path_cannot_be_checked() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("export.txt");
        fs::write(&file, "").unwrap();

        // A regular file used as a directory fails with ENOTDIR, not NotFound
        let result = JsonFileCalendar::new(file.join("calendar.json"))
            .fetch_events(at(3, 0), at(17, 0), &OwnerFilter::All)
            .await;
        assert!(result.is_err());
        assert!(format!("{:#}", result.unwrap_err()).contains("Failed to check calendar file"));
    }

    #[tokio::test]
    async fn it_errors_on_malformed_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("calendar.json");
        fs::write(&path, "{not json").unwrap();

        let result = JsonFileCalendar::new(&path)
            .fetch_events(at(3, 0), at(17, 0), &OwnerFilter::All)
            .await;
        assert!(result.is_err());
    }
}
