use anyhow::{Result, anyhow};
use chrono::NaiveDateTime;

use crate::core::{AppConfig, build_scheduler};

pub async fn run(lawyer: &str, location: &str, now: NaiveDateTime) -> Result<()> {
    let config = AppConfig::from_env()?;
    let scheduler = build_scheduler(&config).await?;

    let slots = scheduler
        .available_slots(lawyer, location, now)
        .await
        .map_err(|e| anyhow!("{}: {}", e.kind(), e))?;
    tracing::debug!("Found {} slots for {} at {}", slots.len(), lawyer, location);

    println!("{}", serde_json::to_string_pretty(&slots)?);
    Ok(())
}
