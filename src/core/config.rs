use std::env;

use anyhow::{Context, Result};

use crate::google::gcal::DEFAULT_API_URL;
use crate::scheduling::{OwnerFilterMode, Strictness};

/// Credentials for reading a Google calendar instead of the JSON export.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GoogleCalendarConfig {
    pub api_url: String,
    pub access_token: String,
    pub calendar_id: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub storage_path: String,
    pub lawyers_path: String,
    pub rules_path: Option<String>,
    pub calendar_path: String,
    pub owner_filter: OwnerFilterMode,
    pub strictness: Strictness,
    pub google_calendar: Option<GoogleCalendarConfig>,
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => anyhow::bail!("Invalid value for {}: {}", name, other),
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let storage_path = non_empty_var("LAWHUB_STORAGE_PATH").unwrap_or("./data".to_string());
        let lawyers_path = non_empty_var("LAWHUB_LAWYERS_PATH")
            .unwrap_or_else(|| format!("{}/lawyers.json", storage_path));
        let rules_path = non_empty_var("LAWHUB_RULES_PATH");
        let calendar_path = non_empty_var("LAWHUB_CALENDAR_PATH")
            .unwrap_or_else(|| format!("{}/calendar.json", storage_path));
        let owner_filter = non_empty_var("LAWHUB_CALENDAR_OWNER_FILTER")
            .map(|v| v.parse::<OwnerFilterMode>())
            .transpose()
            .context("Invalid LAWHUB_CALENDAR_OWNER_FILTER")?
            .unwrap_or_default();
        let strict_manual = match non_empty_var("LAWHUB_STRICT_MANUAL") {
            Some(v) => parse_bool("LAWHUB_STRICT_MANUAL", &v)?,
            None => false,
        };
        let google_calendar =
            non_empty_var("LAWHUB_GCAL_ACCESS_TOKEN").map(|access_token| GoogleCalendarConfig {
                api_url: non_empty_var("LAWHUB_GCAL_API_URL")
                    .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
                access_token,
                calendar_id: non_empty_var("LAWHUB_GCAL_CALENDAR_ID")
                    .unwrap_or_else(|| "primary".to_string()),
            });

        Ok(Self {
            storage_path,
            lawyers_path,
            rules_path,
            calendar_path,
            owner_filter,
            strictness: if strict_manual {
                Strictness::Strict
            } else {
                Strictness::Permissive
            },
            google_calendar,
        })
    }
}
