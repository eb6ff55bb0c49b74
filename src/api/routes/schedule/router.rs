//! Router for the schedule API

use std::sync::{Arc, RwLock};

use axum::{Router, extract::State, response::Json};

use crate::api::public::ApiError;
use crate::api::routes::{now, shared_scheduler};
use crate::api::state::AppState;
use crate::scheduling::{BookingRequest, MeetingDraft};

type SharedState = Arc<RwLock<AppState>>;

/// Choose a slot for the request and return the meeting to create
async fn schedule_handler(
    State(state): State<SharedState>,
    Json(request): Json<BookingRequest>,
) -> Result<Json<MeetingDraft>, ApiError> {
    let scheduler = shared_scheduler(&state)?;
    let booking = scheduler.schedule(&request, now()).await?;
    tracing::info!(
        "Scheduled {} with {} at {}",
        booking.request.client.client_name,
        booking.lawyer.id,
        booking.slot.start()
    );
    Ok(Json(MeetingDraft::from(&booking)))
}

/// Create the schedule router
pub fn router() -> Router<SharedState> {
    Router::new().route("/", axum::routing::post(schedule_handler))
}
