use std::sync::Arc;

use crate::core::AppConfig;
use crate::scheduling::Scheduler;

pub struct AppState {
    pub scheduler: Arc<Scheduler>,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(scheduler: Scheduler, config: AppConfig) -> Self {
        Self {
            scheduler: Arc::new(scheduler),
            config,
        }
    }
}
