//! Per-lawyer unavailability table, e.g. "DH is never at the office on
//! Mondays".

use std::collections::{HashMap, HashSet};

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use super::models::LawyerProfile;

/// One row of the rule table as it appears in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnavailabilityRule {
    pub lawyer_id: String,
    pub location: String,
    pub weekdays: Vec<String>,
}

impl UnavailabilityRule {
    pub fn new(lawyer_id: &str, location: &str, weekdays: &[&str]) -> Self {
        Self {
            lawyer_id: lawyer_id.to_string(),
            location: location.to_string(),
            weekdays: weekdays.iter().map(|d| d.to_string()).collect(),
        }
    }

    fn parse_weekdays(&self) -> Result<HashSet<Weekday>, String> {
        self.weekdays
            .iter()
            .map(|name| {
                name.trim()
                    .parse::<Weekday>()
                    .map_err(|_| format!("unknown weekday {:?}", name))
            })
            .collect()
    }
}

/// Lawyer id -> lowercase location -> excluded weekdays.
///
/// Lookups never fail: anything not in the table is available.
#[derive(Debug, Clone, Default)]
pub struct UnavailabilityPolicy {
    table: HashMap<String, HashMap<String, HashSet<Weekday>>>,
}

impl UnavailabilityPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rules(rules: impl IntoIterator<Item = UnavailabilityRule>) -> Self {
        let mut policy = Self::new();
        policy.extend(rules);
        policy
    }

    /// Collect the `unavailability` maps declared on each profile.
    pub fn from_profiles<'a>(profiles: impl IntoIterator<Item = &'a LawyerProfile>) -> Self {
        Self::from_rules(profiles.into_iter().flat_map(|profile| {
            profile
                .unavailability
                .iter()
                .map(|(location, weekdays)| UnavailabilityRule {
                    lawyer_id: profile.id.clone(),
                    location: location.clone(),
                    weekdays: weekdays.clone(),
                })
        }))
    }

    pub fn extend(&mut self, rules: impl IntoIterator<Item = UnavailabilityRule>) {
        for rule in rules {
            self.add_rule(rule);
        }
    }

    /// A malformed rule is dropped with a warning so one bad entry can't
    /// block scheduling.
    pub fn add_rule(&mut self, rule: UnavailabilityRule) {
        let lawyer_id = rule.lawyer_id.trim();
        let location = rule.location.trim().to_lowercase();
        if lawyer_id.is_empty() || location.is_empty() {
            tracing::warn!("Ignoring unavailability rule without lawyer or location: {:?}", rule);
            return;
        }

        let weekdays = match rule.parse_weekdays() {
            Ok(days) => days,
            Err(reason) => {
                tracing::warn!("Ignoring unavailability rule {:?}: {}", rule, reason);
                return;
            }
        };

        self.table
            .entry(lawyer_id.to_string())
            .or_default()
            .entry(location)
            .or_default()
            .extend(weekdays);
    }

    pub fn is_unavailable(&self, lawyer_id: &str, location: &str, weekday: Weekday) -> bool {
        self.table
            .get(lawyer_id.trim())
            .and_then(|locations| locations.get(&location.trim().to_lowercase()))
            .is_some_and(|days| days.contains(&weekday))
    }
}
