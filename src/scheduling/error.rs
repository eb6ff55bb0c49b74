use chrono::NaiveDateTime;
use thiserror::Error;

/// A request field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SchedulingError {
    #[error("invalid booking request: {0}")]
    Validation(#[from] ValidationError),

    #[error("unknown lawyer: {0}")]
    UnknownLawyer(String),

    #[error("the selected time slot {start} to {end} is not available")]
    InvalidManualSlot {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    #[error("no available slots found in the next {days} days")]
    NoAvailableSlot { days: i64 },

    #[error("failed to fetch calendar events: {0:#}")]
    UpstreamIo(anyhow::Error),
}

impl SchedulingError {
    /// Stable machine readable name of the failure.
    pub fn kind(&self) -> &'static str {
        match self {
            SchedulingError::Validation(_) => "validation",
            SchedulingError::UnknownLawyer(_) => "unknown_lawyer",
            SchedulingError::InvalidManualSlot { .. } => "invalid_manual_slot",
            SchedulingError::NoAvailableSlot { .. } => "no_available_slot",
            SchedulingError::UpstreamIo(_) => "upstream_io",
        }
    }
}
