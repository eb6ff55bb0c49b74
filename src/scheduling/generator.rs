//! Candidate appointment generation.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Weekday};

use super::error::ValidationError;
use super::index::LOOKAHEAD_DAYS;
use super::models::{LawyerProfile, Slot, TimeInterval};
use super::validator::SlotValidator;

pub const SLOT_STEP_MINUTES: i64 = 30;
pub const SLOT_DURATION_MINUTES: i64 = 60;

pub fn slot_duration() -> Duration {
    Duration::minutes(SLOT_DURATION_MINUTES)
}

/// Lunch break `[13:00, 14:00)` on `day`.
pub fn lunch_break(day: NaiveDate) -> TimeInterval {
    let start = day.and_time(NaiveTime::MIN) + Duration::hours(13);
    TimeInterval::spanning(start, Duration::hours(1))
}

/// Round up to the next multiple of 30 minutes. Exact multiples (with no
/// seconds) are returned unchanged.
pub fn round_up_to_step(instant: NaiveDateTime) -> NaiveDateTime {
    let floor_minute = instant.minute() - instant.minute() % SLOT_STEP_MINUTES as u32;
    let floor = instant.date().and_time(NaiveTime::MIN)
        + Duration::hours(i64::from(instant.hour()))
        + Duration::minutes(i64::from(floor_minute));
    if floor == instant {
        floor
    } else {
        floor + Duration::minutes(SLOT_STEP_MINUTES)
    }
}

pub fn is_weekend(day: NaiveDate) -> bool {
    matches!(day.weekday(), Weekday::Sat | Weekday::Sun)
}

/// The single one-hour slot a caller asked for.
pub fn manual_slot(date: &str, time: &str, location: &str) -> Result<Slot, ValidationError> {
    let day = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").map_err(|_| {
        ValidationError::new("appointmentDate", format!("expected YYYY-MM-DD, got {:?}", date))
    })?;
    let start_time = NaiveTime::parse_from_str(time.trim(), "%H:%M").map_err(|_| {
        ValidationError::new("appointmentTime", format!("expected HH:MM, got {:?}", time))
    })?;
    let interval = TimeInterval::spanning(day.and_time(start_time), slot_duration());
    Ok(Slot::new(interval, location))
}

/// Walks the lookahead window producing one-hour candidates every 30
/// minutes within working hours.
pub struct SlotGenerator<'a> {
    profile: &'a LawyerProfile,
    validator: &'a SlotValidator<'a>,
}

impl<'a> SlotGenerator<'a> {
    pub fn new(profile: &'a LawyerProfile, validator: &'a SlotValidator<'a>) -> Self {
        Self { profile, validator }
    }

    /// Candidates for every day in `[today, today + LOOKAHEAD_DAYS]`.
    pub fn automatic(&self, location: &str, now: NaiveDateTime) -> Vec<Slot> {
        let today = now.date();
        today
            .iter_days()
            .take(LOOKAHEAD_DAYS as usize + 1)
            .filter(|day| !is_weekend(*day))
            .filter(|day| self.validator.day_is_open(*day, self.profile, location))
            .flat_map(|day| self.slots_for_day(day, location, now))
            .collect()
    }

    fn slots_for_day(&self, day: NaiveDate, location: &str, now: NaiveDateTime) -> Vec<Slot> {
        let hours = self.profile.working_hours;
        let day_start = day.and_time(hours.start());
        let last_start = day.and_time(hours.end()) - slot_duration();
        let lunch = lunch_break(day);

        let mut cursor = if day == now.date() {
            day_start.max(round_up_to_step(now))
        } else {
            day_start
        };

        let mut slots = vec![];
        while cursor <= last_start {
            let interval = TimeInterval::spanning(cursor, slot_duration());
            if !interval.intersects(&lunch) {
                slots.push(Slot::new(interval, location));
            }
            cursor += Duration::minutes(SLOT_STEP_MINUTES);
        }
        slots
    }
}
