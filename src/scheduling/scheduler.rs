//! The booking pipeline: validate, look up, fetch, generate, validate,
//! select.
//!
//! Nothing is locked on the calendar between the fetch and the caller
//! creating the appointment. Two attempts close together can both succeed
//! against the same stale snapshot and the last write wins. Callers that
//! care should re-run `schedule` after committing.

use std::str::FromStr;
use std::sync::Arc;

use chrono::{Duration, NaiveDateTime, NaiveTime};

use super::error::{SchedulingError, ValidationError};
use super::generator::{SlotGenerator, manual_slot};
use super::index::{CalendarIndex, LOOKAHEAD_DAYS, OwnerFilter};
use super::models::{Booking, BookingRequest, LawyerProfile, Slot, TimeInterval};
use super::policy::UnavailabilityPolicy;
use super::request::{Mode, validate};
use super::selector::select;
use super::validator::{SlotValidator, Strictness};
use crate::calendar::CalendarProvider;
use crate::lawyers::ProfileStore;

/// Where a scheduling attempt is in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Validating,
    ManualLookup,
    AutoGeneration,
    Validated,
    Selected,
    Done,
    Failed,
}

/// Traces stage transitions for one attempt.
struct Pipeline<'a> {
    lawyer_id: &'a str,
    stage: Stage,
}

impl<'a> Pipeline<'a> {
    fn new(lawyer_id: &'a str) -> Self {
        Self {
            lawyer_id,
            stage: Stage::Idle,
        }
    }

    fn advance(&mut self, next: Stage) {
        tracing::debug!("Scheduling {}: {:?} -> {:?}", self.lawyer_id, self.stage, next);
        self.stage = next;
    }

    fn fail(&mut self, err: impl Into<SchedulingError>) -> SchedulingError {
        let err = err.into();
        tracing::debug!(
            "Scheduling {}: {:?} -> {:?} ({})",
            self.lawyer_id,
            self.stage,
            Stage::Failed,
            err
        );
        self.stage = Stage::Failed;
        err
    }
}

/// Which calendar events count against a lawyer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OwnerFilterMode {
    /// The calendar belongs to the lawyer alone
    #[default]
    All,
    /// Shared calendar, events are tagged with the lawyer's name
    LawyerName,
}

impl OwnerFilterMode {
    pub fn filter_for(&self, profile: &LawyerProfile) -> OwnerFilter {
        match self {
            OwnerFilterMode::All => OwnerFilter::All,
            OwnerFilterMode::LawyerName => OwnerFilter::Category(profile.name.clone()),
        }
    }
}

impl FromStr for OwnerFilterMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(OwnerFilterMode::All),
            "category" | "lawyer_name" => Ok(OwnerFilterMode::LawyerName),
            other => anyhow::bail!("Unknown owner filter mode: {}", other),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerOptions {
    pub owner_filter: OwnerFilterMode,
    pub strictness: Strictness,
}

pub struct Scheduler {
    calendar: Arc<dyn CalendarProvider>,
    profiles: Arc<dyn ProfileStore>,
    policy: UnavailabilityPolicy,
    options: SchedulerOptions,
}

impl Scheduler {
    pub fn new(
        calendar: Arc<dyn CalendarProvider>,
        profiles: Arc<dyn ProfileStore>,
        policy: UnavailabilityPolicy,
        options: SchedulerOptions,
    ) -> Self {
        Self {
            calendar,
            profiles,
            policy,
            options,
        }
    }

    pub fn profiles(&self) -> &dyn ProfileStore {
        self.profiles.as_ref()
    }

    /// Run the whole pipeline for a request against a fresh calendar
    /// snapshot.
    pub async fn schedule(
        &self,
        request: &BookingRequest,
        now: NaiveDateTime,
    ) -> Result<Booking, SchedulingError> {
        let mut pipeline = Pipeline::new(&request.lawyer_id);
        pipeline.advance(Stage::Validating);

        let mode = validate(request).map_err(|e| pipeline.fail(e))?;
        let profile = self.profile(&request.lawyer_id).map_err(|e| pipeline.fail(e))?;
        let window = fetch_window(&mode, now).map_err(|e| pipeline.fail(e))?;
        let index = self
            .snapshot(&profile, window)
            .await
            .map_err(|e| pipeline.fail(e))?;

        self.decide(&mut pipeline, mode, request, profile, &index, now)
    }

    /// The synchronous core of `schedule` for a snapshot the caller already
    /// holds.
    pub fn plan(
        &self,
        request: &BookingRequest,
        profile: LawyerProfile,
        index: &CalendarIndex,
        now: NaiveDateTime,
    ) -> Result<Booking, SchedulingError> {
        let mut pipeline = Pipeline::new(&request.lawyer_id);
        pipeline.advance(Stage::Validating);
        let mode = validate(request).map_err(|e| pipeline.fail(e))?;
        self.decide(&mut pipeline, mode, request, profile, index, now)
    }

    /// Every valid automatic candidate for the lawyer at `location`, in
    /// chronological order.
    pub async fn available_slots(
        &self,
        lawyer_id: &str,
        location: &str,
        now: NaiveDateTime,
    ) -> Result<Vec<Slot>, SchedulingError> {
        if lawyer_id.trim().is_empty() {
            return Err(ValidationError::new("lawyerId", "is required").into());
        }
        let location = location.trim().to_lowercase();
        if location.is_empty() {
            return Err(ValidationError::new("location", "is required").into());
        }

        let profile = self.profile(lawyer_id)?;
        let index = self
            .snapshot(&profile, CalendarIndex::lookahead(now))
            .await?;
        let validator = SlotValidator::new(&index, &self.policy);
        Ok(automatic_candidates(&validator, &profile, &location, now))
    }

    fn profile(&self, lawyer_id: &str) -> Result<LawyerProfile, SchedulingError> {
        self.profiles
            .get(lawyer_id)
            .ok_or_else(|| SchedulingError::UnknownLawyer(lawyer_id.trim().to_string()))
    }

    async fn snapshot(
        &self,
        profile: &LawyerProfile,
        window: TimeInterval,
    ) -> Result<CalendarIndex, SchedulingError> {
        let filter = self.options.owner_filter.filter_for(profile);
        let raw = self
            .calendar
            .fetch_events(window.start(), window.end(), &filter)
            .await
            .map_err(SchedulingError::UpstreamIo)?;
        let index = CalendarIndex::from_raw(raw, window, &filter);
        tracing::debug!(
            "Calendar snapshot for {} has {} events between {} and {}",
            profile.id,
            index.len(),
            window.start(),
            window.end()
        );
        Ok(index)
    }

    fn decide(
        &self,
        pipeline: &mut Pipeline,
        mode: Mode,
        request: &BookingRequest,
        profile: LawyerProfile,
        index: &CalendarIndex,
        now: NaiveDateTime,
    ) -> Result<Booking, SchedulingError> {
        let location = request.normalized_location();
        let validator = SlotValidator::new(index, &self.policy);

        let candidates = match mode {
            Mode::Manual { date, time } => {
                pipeline.advance(Stage::ManualLookup);
                let slot = manual_slot(&date, &time, &location).map_err(|e| pipeline.fail(e))?;
                if !validator.check_manual(&slot, &profile, self.options.strictness) {
                    return Err(pipeline.fail(SchedulingError::InvalidManualSlot {
                        start: slot.start(),
                        end: slot.end(),
                    }));
                }
                vec![slot]
            }
            Mode::Automatic => {
                pipeline.advance(Stage::AutoGeneration);
                let slots = automatic_candidates(&validator, &profile, &location, now);
                if slots.is_empty() {
                    return Err(pipeline.fail(SchedulingError::NoAvailableSlot {
                        days: LOOKAHEAD_DAYS,
                    }));
                }
                slots
            }
        };
        pipeline.advance(Stage::Validated);

        let slot = select(&candidates, now)
            .cloned()
            .ok_or_else(|| pipeline.fail(SchedulingError::NoAvailableSlot { days: LOOKAHEAD_DAYS }))?;
        pipeline.advance(Stage::Selected);
        tracing::debug!("Selected {} - {} for {}", slot.start(), slot.end(), profile.id);

        let booking = Booking {
            slot,
            lawyer: profile,
            request: request.clone(),
        };
        pipeline.advance(Stage::Done);
        Ok(booking)
    }
}

fn automatic_candidates(
    validator: &SlotValidator,
    profile: &LawyerProfile,
    location: &str,
    now: NaiveDateTime,
) -> Vec<Slot> {
    SlotGenerator::new(profile, validator)
        .automatic(location, now)
        .into_iter()
        .filter(|slot| validator.is_valid(slot, profile))
        .collect()
}

/// The lookahead window, stretched to cover the whole requested day for
/// manual requests outside it.
fn fetch_window(mode: &Mode, now: NaiveDateTime) -> Result<TimeInterval, ValidationError> {
    let lookahead = CalendarIndex::lookahead(now);
    match mode {
        Mode::Automatic => Ok(lookahead),
        Mode::Manual { date, time } => {
            let slot = manual_slot(date, time, "")?;
            let day = TimeInterval::spanning(
                slot.start().date().and_time(NaiveTime::MIN),
                Duration::days(1),
            );
            Ok(lookahead.union(&day))
        }
    }
}
