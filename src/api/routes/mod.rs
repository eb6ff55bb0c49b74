//! API routes module

pub mod lawyers;
pub mod schedule;
pub mod slots;

use std::sync::{Arc, RwLock};

use crate::api::public::ApiError;
use crate::api::state::AppState;
use crate::scheduling::Scheduler;
use axum::Router;

type SharedState = Arc<RwLock<AppState>>;

/// Clone the scheduler handle out of the shared state so the lock
/// isn't held across an await.
fn shared_scheduler(state: &SharedState) -> Result<Arc<Scheduler>, ApiError> {
    let shared_state = state
        .read()
        .map_err(|_| anyhow::anyhow!("Unable to read shared state"))?;
    Ok(Arc::clone(&shared_state.scheduler))
}

/// The current wall-clock time the engine schedules against
fn now() -> chrono::NaiveDateTime {
    chrono::Local::now().naive_local()
}

/// Create the combined API router
pub fn router() -> Router<SharedState> {
    Router::new()
        // Booking routes
        .nest("/schedule", schedule::router())
        // Availability routes
        .nest("/slots", slots::router())
        // Lawyer profile routes
        .nest("/lawyers", lawyers::router())
}
