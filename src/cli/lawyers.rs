use anyhow::Result;

use crate::core::AppConfig;
use crate::lawyers::{JsonProfileStore, ProfileStore};

pub async fn run() -> Result<()> {
    let config = AppConfig::from_env()?;
    let store = JsonProfileStore::load(&config.lawyers_path).await?;
    println!("{}", serde_json::to_string_pretty(&store.all())?);
    Ok(())
}
