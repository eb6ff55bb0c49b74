//! Value types shared by every stage of the scheduling pipeline.

use std::collections::BTreeMap;
use std::num::NonZeroU32;

use chrono::{Duration, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Half-open interval `[start, end)` of local wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct TimeInterval {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl TimeInterval {
    /// Returns `None` unless `start < end`.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Option<Self> {
        (start < end).then_some(Self { start, end })
    }

    /// `[start, start + length)`; lengths under a minute are rounded up to
    /// one minute so the interval is never empty.
    pub fn spanning(start: NaiveDateTime, length: Duration) -> Self {
        Self {
            start,
            end: start + length.max(Duration::minutes(1)),
        }
    }

    /// Smallest interval covering both.
    pub fn union(&self, other: &TimeInterval) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    /// Touching endpoints do not count as an intersection.
    pub fn intersects(&self, other: &TimeInterval) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Grow the interval by `minutes` on both sides.
    pub fn widen(&self, minutes: u32) -> Self {
        let pad = Duration::minutes(i64::from(minutes));
        Self {
            start: self.start - pad,
            end: self.end + pad,
        }
    }
}

fn parse_time_of_day(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .ok()
}

#[derive(Deserialize)]
struct RawWorkingHours {
    start: String,
    end: String,
}

/// Daily window in which appointments may be generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkingHours {
    start: NaiveTime,
    end: NaiveTime,
}

impl WorkingHours {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Option<Self> {
        (start < end).then_some(Self { start, end })
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }
}

impl Default for WorkingHours {
    fn default() -> Self {
        Self {
            start: NaiveTime::MIN + Duration::hours(9),
            end: NaiveTime::MIN + Duration::hours(17),
        }
    }
}

impl Serialize for WorkingHours {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("WorkingHours", 2)?;
        state.serialize_field("start", &self.start.format("%H:%M").to_string())?;
        state.serialize_field("end", &self.end.format("%H:%M").to_string())?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for WorkingHours {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::de::Error;
        let raw = RawWorkingHours::deserialize(deserializer)?;
        let start = parse_time_of_day(&raw.start)
            .ok_or_else(|| D::Error::custom(format!("invalid workingHours.start: {}", raw.start)))?;
        let end = parse_time_of_day(&raw.end)
            .ok_or_else(|| D::Error::custom(format!("invalid workingHours.end: {}", raw.end)))?;
        WorkingHours::new(start, end).ok_or_else(|| {
            D::Error::custom(format!(
                "workingHours.start {} must be before workingHours.end {}",
                raw.start, raw.end
            ))
        })
    }
}

fn unlimited_appointments() -> NonZeroU32 {
    NonZeroU32::MAX
}

/// Reads the `unavailability` map entry by entry. Entries that aren't a
/// list of strings are dropped with a warning and the rest are kept.
fn lenient_unavailability<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<BTreeMap<String, Vec<String>>, D::Error> {
    let entries = match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Object(entries) => entries,
        other => {
            tracing::warn!("Ignoring unavailability that is not an object: {}", other);
            return Ok(BTreeMap::new());
        }
    };

    Ok(entries
        .into_iter()
        .filter_map(|(location, weekdays)| {
            match serde_json::from_value::<Vec<String>>(weekdays.clone()) {
                Ok(days) => Some((location, days)),
                Err(e) => {
                    tracing::warn!(
                        "Ignoring unavailability for {:?} ({}): {}",
                        location,
                        weekdays,
                        e
                    );
                    None
                }
            }
        })
        .collect())
}

/// A lawyer as stored in `lawyers.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LawyerProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub working_hours: WorkingHours,
    /// Buffer kept free before and after every existing event
    #[serde(default)]
    pub break_minutes: u32,
    #[serde(default = "unlimited_appointments")]
    pub max_daily_appointments: NonZeroU32,
    /// Location to weekday names, e.g. `{"office": ["Monday"]}`
    #[serde(default, deserialize_with = "lenient_unavailability")]
    pub unavailability: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub specialties: Vec<String>,
}

/// Client details carried through the pipeline for the caller. Only the
/// name, email and phone are ever looked at by the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientInfo {
    pub client_title: String,
    pub client_name: String,
    pub client_email: String,
    pub client_phone: String,
    pub client_language: String,
    pub case_type: String,
    pub notes: String,
    pub is_existing_client: bool,
    pub is_ref_barreau: bool,
    pub is_first_consultation: bool,
    pub is_payment_made: bool,
    pub payment_method: String,
}

/// A submitted booking form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    #[serde(default)]
    pub lawyer_id: String,
    #[serde(default)]
    pub location: String,
    /// `YYYY-MM-DD`
    #[serde(default)]
    pub appointment_date: Option<String>,
    /// `HH:MM`
    #[serde(default)]
    pub appointment_time: Option<String>,
    #[serde(flatten)]
    pub client: ClientInfo,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl BookingRequest {
    /// The forms send empty strings for untouched fields so those count as
    /// absent.
    pub fn manual_date(&self) -> Option<&str> {
        non_blank(&self.appointment_date)
    }

    pub fn manual_time(&self) -> Option<&str> {
        non_blank(&self.appointment_time)
    }

    pub fn normalized_location(&self) -> String {
        self.location.trim().to_lowercase()
    }
}

/// Event as handed over by a calendar provider, before its times are read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCalendarEvent {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
    /// Comma separated categories, typically the owning lawyer's name
    #[serde(default)]
    pub owner: Option<String>,
}

/// An existing busy interval on the calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    pub id: Option<String>,
    pub summary: Option<String>,
    pub interval: TimeInterval,
    pub owner: Option<String>,
}

impl CalendarEvent {
    pub fn new(interval: TimeInterval) -> Self {
        Self {
            id: None,
            summary: None,
            interval,
            owner: None,
        }
    }

    pub fn with_owner(mut self, owner: &str) -> Self {
        self.owner = Some(owner.to_string());
        self
    }
}

/// Candidate appointment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Slot {
    #[serde(flatten)]
    pub interval: TimeInterval,
    pub location: String,
}

impl Slot {
    pub fn new(interval: TimeInterval, location: &str) -> Self {
        Self {
            interval,
            location: location.to_string(),
        }
    }

    pub fn start(&self) -> NaiveDateTime {
        self.interval.start()
    }

    pub fn end(&self) -> NaiveDateTime {
        self.interval.end()
    }
}

/// The engine's output: what to book, for whom, and on whose request.
#[derive(Debug, Clone, Serialize)]
pub struct Booking {
    pub slot: Slot,
    pub lawyer: LawyerProfile,
    pub request: BookingRequest,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 3)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn it_rejects_empty_intervals() {
        assert!(TimeInterval::new(at(10, 0), at(10, 0)).is_none());
        assert!(TimeInterval::new(at(11, 0), at(10, 0)).is_none());
        assert!(TimeInterval::new(at(10, 0), at(10, 1)).is_some());
    }

    #[test]
    fn it_treats_touching_intervals_as_disjoint() {
        let a = TimeInterval::new(at(9, 0), at(10, 0)).unwrap();
        let b = TimeInterval::new(at(10, 0), at(11, 0)).unwrap();
        let c = TimeInterval::new(at(9, 30), at(10, 30)).unwrap();
        assert!(!a.intersects(&b));
        assert!(a.intersects(&c));
        assert!(c.intersects(&b));
    }

    #[test]
    fn it_parses_a_lawyer_profile() {
        let profile: LawyerProfile = serde_json::from_str(
            r#"{
                "id": "DH",
                "name": "Daniel H",
                "email": "dh@example.com",
                "workingHours": {"start": "9:00", "end": "17:30"},
                "breakMinutes": 15,
                "maxDailyAppointments": 6,
                "unavailability": {"office": ["Monday"]},
                "specialties": ["divorce"]
            }"#,
        )
        .unwrap();

        assert_eq!(profile.working_hours.start(), NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        assert_eq!(profile.working_hours.end(), NaiveTime::from_hms_opt(17, 30, 0).unwrap());
        assert_eq!(profile.break_minutes, 15);
        assert_eq!(profile.max_daily_appointments.get(), 6);
        assert_eq!(profile.unavailability["office"], vec!["Monday".to_string()]);
    }

    #[test]
    fn it_drops_malformed_unavailability_entries() {
        let profile: LawyerProfile = serde_json::from_str(
            r#"{"id": "TG", "name": "T G", "email": "tg@example.com",
                "unavailability": {"office": "Friday", "phone": ["Tuesday"], "teams": [1, 2]}}"#,
        )
        .unwrap();
        assert_eq!(profile.unavailability.len(), 1);
        assert_eq!(profile.unavailability["phone"], vec!["Tuesday".to_string()]);

        let profile: LawyerProfile = serde_json::from_str(
            r#"{"id": "TG", "name": "T G", "email": "tg@example.com", "unavailability": "office"}"#,
        )
        .unwrap();
        assert!(profile.unavailability.is_empty());
    }

    #[test]
    fn it_defaults_optional_profile_fields() {
        let profile: LawyerProfile =
            serde_json::from_str(r#"{"id": "TG", "name": "T G", "email": "tg@example.com"}"#)
                .unwrap();
        assert_eq!(profile.working_hours, WorkingHours::default());
        assert_eq!(profile.break_minutes, 0);
        assert_eq!(profile.max_daily_appointments, NonZeroU32::MAX);
        assert!(profile.unavailability.is_empty());
    }

    #[test]
    fn it_rejects_inverted_working_hours() {
        let result: Result<LawyerProfile, _> = serde_json::from_str(
            r#"{"id": "X", "name": "X", "email": "x@example.com",
                "workingHours": {"start": "17:00", "end": "9:00"}}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn it_rejects_a_zero_daily_cap() {
        let result: Result<LawyerProfile, _> = serde_json::from_str(
            r#"{"id": "X", "name": "X", "email": "x@example.com", "maxDailyAppointments": 0}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn it_treats_blank_manual_fields_as_absent() {
        let request: BookingRequest = serde_json::from_str(
            r#"{"lawyerId": "DH", "location": "Office", "appointmentDate": "", "appointmentTime": " ",
                "clientName": "Jane Roe", "clientEmail": "jane@example.com", "clientPhone": "5145551234"}"#,
        )
        .unwrap();
        assert_eq!(request.manual_date(), None);
        assert_eq!(request.manual_time(), None);
        assert_eq!(request.normalized_location(), "office");
        assert_eq!(request.client.client_name, "Jane Roe");
    }
}
