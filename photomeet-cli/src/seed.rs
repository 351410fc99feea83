//! Seed fixtures: build a populated session store from a JSON file.
//!
//! The fixture lists activities with their applications and, optionally,
//! the decision already taken on each. Applications are recorded first and
//! decided afterwards, so a fixture can accept more members than the
//! capacity would admit through live applications.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;

use photomeet_core::{
    Activity, ActivityId, ActivityStatus, ApplicationId, Decision, SessionStore, UserId,
};

/// The fixture compiled into the binary, used when no --seed is given.
pub const DEFAULT_SEED: &str = include_str!("../seed.json");

#[derive(Debug, Deserialize)]
pub struct SeedData {
    pub activities: Vec<SeedActivity>,
}

#[derive(Debug, Deserialize)]
pub struct SeedActivity {
    pub id: String,
    pub title: String,
    pub organizer: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    #[serde(default)]
    pub max_participants: Option<u32>,
    #[serde(default)]
    pub applications: Vec<SeedApplication>,
}

#[derive(Debug, Deserialize)]
pub struct SeedApplication {
    pub applicant: String,
    pub message: String,
    /// Decision already on record; absent means still pending.
    #[serde(default)]
    pub decision: Option<Decision>,
}

/// Load a seed file, falling back to the embedded fixture.
pub fn load(path: Option<&Path>) -> Result<SeedData> {
    let raw = match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read seed file {}", path.display()))?,
        None => DEFAULT_SEED.to_string(),
    };
    let seed: SeedData = serde_json::from_str(&raw).context("failed to parse seed JSON")?;
    info!(activities = seed.activities.len(), "seed loaded");
    Ok(seed)
}

/// Replay the fixture through the real domain operations.
///
/// Nothing is written behind the store's back: every application and
/// decision goes through the same calls a live embedding would make, so a
/// fixture that violates the domain rules fails loudly here.
pub fn build_store(seed: &SeedData) -> Result<SessionStore> {
    let mut store = SessionStore::new();
    for activity in &seed.activities {
        let id = ActivityId::from(activity.id.clone());
        let organizer = UserId::from(activity.organizer.clone());
        store.create_activity(Activity {
            id: id.clone(),
            title: activity.title.clone(),
            organizer: organizer.clone(),
            starts_at: activity.starts_at,
            ends_at: activity.ends_at,
            max_participants: activity.max_participants,
            status: ActivityStatus::Open,
        });

        for application in &activity.applications {
            let applicant = UserId::from(application.applicant.clone());
            store
                .submit_application(&id, &applicant, application.message.clone())
                .with_context(|| {
                    format!("seeding application by {} to {}", application.applicant, activity.id)
                })?;
        }

        // Ids are minted app-1, app-2, ... in submission order.
        for (index, application) in activity.applications.iter().enumerate() {
            if let Some(decision) = application.decision {
                let application_id = ApplicationId::from(format!("app-{}", index + 1));
                store
                    .decide(&id, &organizer, &application_id, decision)
                    .with_context(|| {
                        format!("seeding decision on {} in {}", application.applicant, activity.id)
                    })?;
            }
        }
    }
    Ok(store)
}
