//! Appointment slot scheduling engine.

mod draft;
mod error;
mod generator;
mod index;
mod models;
mod policy;
mod request;
mod scheduler;
mod selector;
mod validator;

pub use draft::{MeetingDraft, title_case};
pub use error::{SchedulingError, ValidationError};
pub use generator::{
    SLOT_DURATION_MINUTES, SLOT_STEP_MINUTES, SlotGenerator, lunch_break, manual_slot,
    round_up_to_step,
};
pub use index::{CalendarIndex, LOOKAHEAD_DAYS, OwnerFilter, parse_instant};
pub use models::{
    Booking, BookingRequest, CalendarEvent, ClientInfo, LawyerProfile, RawCalendarEvent, Slot,
    TimeInterval, WorkingHours,
};
pub use policy::{UnavailabilityPolicy, UnavailabilityRule};
pub use request::{Mode, is_valid_email, is_valid_phone, validate};
pub use scheduler::{OwnerFilterMode, Scheduler, SchedulerOptions, Stage};
pub use selector::select;
pub use validator::{SlotValidator, Strictness};
