use chrono::{Datelike, NaiveDate};
use serde::Deserialize;

use super::index::CalendarIndex;
use super::models::{LawyerProfile, Slot};
use super::policy::UnavailabilityPolicy;

/// How much checking a manually requested slot gets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strictness {
    /// Overlap check only
    #[default]
    Permissive,
    /// Overlap, daily cap and unavailability
    Strict,
}

/// Checks candidates against one calendar snapshot.
pub struct SlotValidator<'a> {
    index: &'a CalendarIndex,
    policy: &'a UnavailabilityPolicy,
}

impl<'a> SlotValidator<'a> {
    pub fn new(index: &'a CalendarIndex, policy: &'a UnavailabilityPolicy) -> Self {
        Self { index, policy }
    }

    /// Reject the slot when it intersects any event padded by the lawyer's
    /// break on both sides.
    pub fn is_valid(&self, slot: &Slot, profile: &LawyerProfile) -> bool {
        !self.index.overlaps(&slot.interval, profile.break_minutes)
    }

    /// Whether the day still accepts appointments at `location` for the
    /// lawyer: below the daily cap and not excluded by a rule.
    pub fn day_is_open(&self, day: NaiveDate, profile: &LawyerProfile, location: &str) -> bool {
        let booked = self.index.count_by_day(day);
        if booked >= profile.max_daily_appointments.get() as usize {
            tracing::debug!(
                "{} already has {} appointments on {}, skipping the day",
                profile.id,
                booked,
                day
            );
            return false;
        }
        if self
            .policy
            .is_unavailable(&profile.id, location, day.weekday())
        {
            tracing::debug!("{} is unavailable at {} on {}", profile.id, location, day);
            return false;
        }
        true
    }

    /// Validate a caller chosen slot.
    pub fn check_manual(&self, slot: &Slot, profile: &LawyerProfile, strictness: Strictness) -> bool {
        match strictness {
            Strictness::Permissive => self.is_valid(slot, profile),
            Strictness::Strict => {
                self.day_is_open(slot.start().date(), profile, &slot.location)
                    && self.is_valid(slot, profile)
            }
        }
    }
}
