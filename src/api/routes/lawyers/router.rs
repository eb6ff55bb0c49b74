//! Router for the lawyers API

use std::sync::{Arc, RwLock};

use axum::{Router, extract::State, response::Json};

use crate::api::public::ApiError;
use crate::api::routes::shared_scheduler;
use crate::api::state::AppState;
use crate::scheduling::LawyerProfile;

type SharedState = Arc<RwLock<AppState>>;

async fn list_lawyers(
    State(state): State<SharedState>,
) -> Result<Json<Vec<LawyerProfile>>, ApiError> {
    let scheduler = shared_scheduler(&state)?;
    Ok(Json(scheduler.profiles().all()))
}

/// Create the lawyers router
pub fn router() -> Router<SharedState> {
    Router::new().route("/", axum::routing::get(list_lawyers))
}
