//! Router for the slots API

use std::sync::{Arc, RwLock};

use axum::{Router, extract::State, response::Json};
use axum_extra::extract::Query;

use super::public;
use crate::api::public::ApiError;
use crate::api::routes::{now, shared_scheduler};
use crate::api::state::AppState;

type SharedState = Arc<RwLock<AppState>>;

/// List every open slot for a lawyer at a location over the lookahead
async fn slots_handler(
    State(state): State<SharedState>,
    Query(params): Query<public::SlotsQuery>,
) -> Result<Json<Vec<public::SlotResponse>>, ApiError> {
    let scheduler = shared_scheduler(&state)?;
    let slots = scheduler
        .available_slots(&params.lawyer_id, &params.location, now())
        .await?;

    let resp = slots.into_iter().map(public::SlotResponse::from).collect();
    Ok(Json(resp))
}

/// Create the slots router
pub fn router() -> Router<SharedState> {
    Router::new().route("/", axum::routing::get(slots_handler))
}
