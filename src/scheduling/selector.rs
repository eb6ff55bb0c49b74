use chrono::NaiveDateTime;

use super::models::Slot;

/// Pick the first slot starting strictly after `now`.
///
/// When every candidate is already in the past the first one is returned
/// anyway. Callers that can receive past slots (manual bookings for an
/// elapsed time) get a warning logged rather than an error.
pub fn select(slots: &[Slot], now: NaiveDateTime) -> Option<&Slot> {
    if let Some(slot) = slots.iter().find(|s| s.start() > now) {
        return Some(slot);
    }

    let fallback = slots.first()?;
    tracing::warn!(
        "No candidate starts after {}, falling back to the elapsed slot at {}",
        now,
        fallback.start()
    );
    Some(fallback)
}
