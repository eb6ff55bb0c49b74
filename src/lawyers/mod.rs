//! Lawyer profile lookup.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::scheduling::{LawyerProfile, UnavailabilityRule};

pub trait ProfileStore: Send + Sync {
    fn get(&self, lawyer_id: &str) -> Option<LawyerProfile>;

    /// Every profile, ordered by id.
    fn all(&self) -> Vec<LawyerProfile>;
}

/// Profiles held in memory, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProfileStore {
    profiles: HashMap<String, LawyerProfile>,
}

impl InMemoryProfileStore {
    pub fn new(profiles: impl IntoIterator<Item = LawyerProfile>) -> Self {
        Self {
            profiles: profiles
                .into_iter()
                .map(|p| (p.id.trim().to_string(), p))
                .collect(),
        }
    }
}

impl ProfileStore for InMemoryProfileStore {
    fn get(&self, lawyer_id: &str) -> Option<LawyerProfile> {
        self.profiles.get(lawyer_id.trim()).cloned()
    }

    fn all(&self) -> Vec<LawyerProfile> {
        let mut profiles: Vec<_> = self.profiles.values().cloned().collect();
        profiles.sort_by(|a, b| a.id.cmp(&b.id));
        profiles
    }
}

#[derive(Deserialize)]
struct LawyersFile {
    lawyers: Vec<LawyerProfile>,
}

/// Profiles loaded once from a `lawyers.json` file of the form
/// `{"lawyers": [{"id": "DH", ...}]}`.
pub struct JsonProfileStore {
    inner: InMemoryProfileStore,
}

impl JsonProfileStore {
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read lawyers file {}", path.display()))?;
        let file: LawyersFile = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse lawyers file {}", path.display()))?;
        tracing::debug!("Loaded {} lawyer profiles from {}", file.lawyers.len(), path.display());

        Ok(Self {
            inner: InMemoryProfileStore::new(file.lawyers),
        })
    }
}

impl ProfileStore for JsonProfileStore {
    fn get(&self, lawyer_id: &str) -> Option<LawyerProfile> {
        self.inner.get(lawyer_id)
    }

    fn all(&self) -> Vec<LawyerProfile> {
        self.inner.all()
    }
}

/// Read a standalone rules file: a JSON array of
/// `{"lawyerId", "location", "weekdays"}` objects.
///
/// Entries are decoded one at a time. A malformed entry is logged and
/// skipped, only an unreadable file or a non-array document is an error.
pub async fn load_rules(path: impl AsRef<Path>) -> Result<Vec<UnavailabilityRule>> {
    let path = path.as_ref();
    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read rules file {}", path.display()))?;
    let entries: Vec<serde_json::Value> = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse rules file {}", path.display()))?;

    let rules: Vec<UnavailabilityRule> = entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value(entry.clone()) {
            Ok(rule) => Some(rule),
            Err(e) => {
                tracing::warn!("Skipping rule {} in {}: {}", entry, path.display(), e);
                None
            }
        })
        .collect();
    tracing::debug!("Loaded {} unavailability rules from {}", rules.len(), path.display());
    Ok(rules)
}
