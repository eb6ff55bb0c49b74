//! Public types for the slots API
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::scheduling::Slot;

#[derive(Deserialize)]
pub struct SlotsQuery {
    pub lawyer_id: String,
    pub location: String,
}

#[derive(Serialize, Deserialize)]
pub struct SlotResponse {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub location: String,
}

impl From<Slot> for SlotResponse {
    fn from(slot: Slot) -> Self {
        Self {
            start: slot.start(),
            end: slot.end(),
            location: slot.location,
        }
    }
}
