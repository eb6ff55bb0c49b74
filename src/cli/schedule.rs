use anyhow::{Context, Result, anyhow};
use chrono::NaiveDateTime;
use tokio::io::AsyncReadExt;

use crate::core::{AppConfig, build_scheduler};
use crate::scheduling::{BookingRequest, MeetingDraft};

async fn read_request(source: &str) -> Result<BookingRequest> {
    let contents = if source == "-" {
        let mut buf = String::new();
        tokio::io::stdin()
            .read_to_string(&mut buf)
            .await
            .context("Failed to read booking request from stdin")?;
        buf
    } else {
        tokio::fs::read_to_string(source)
            .await
            .with_context(|| format!("Failed to read booking request {}", source))?
    };
    serde_json::from_str(&contents).context("Failed to parse booking request")
}

pub async fn run(source: &str, now: NaiveDateTime) -> Result<()> {
    let request = read_request(source).await?;
    let config = AppConfig::from_env()?;
    let scheduler = build_scheduler(&config).await?;

    let booking = scheduler
        .schedule(&request, now)
        .await
        .map_err(|e| anyhow!("{}: {}", e.kind(), e))?;

    let draft = MeetingDraft::from(&booking);
    println!("{}", serde_json::to_string_pretty(&draft)?);
    Ok(())
}
