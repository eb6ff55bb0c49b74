use chrono::NaiveDateTime;
use serde::Serialize;

use super::models::Booking;

/// What the mail or calendar client needs to put the appointment on the
/// lawyer's calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingDraft {
    pub subject: String,
    pub location: String,
    pub required_attendees: Vec<String>,
    pub categories: Vec<String>,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// "in person" -> "In Person"
pub fn title_case(value: &str) -> String {
    value
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

impl From<&Booking> for MeetingDraft {
    fn from(booking: &Booking) -> Self {
        Self {
            subject: booking.request.client.client_name.trim().to_string(),
            location: title_case(&booking.slot.location),
            required_attendees: vec![booking.lawyer.email.clone()],
            categories: vec![booking.lawyer.name.clone()],
            start: booking.slot.start(),
            end: booking.slot.end(),
        }
    }
}
