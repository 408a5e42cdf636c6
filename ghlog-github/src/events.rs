//! Event payloads from the GitHub events API.
//!
//! Only the envelope fields are typed; per-kind payloads stay as
//! `serde_json::Value` because the API ships a different shape per event kind
//! and the formatters only pick out a handful of fields.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

/// The `actor` envelope field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub login: String,
}

/// The `repo` envelope field (`owner/name`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repo {
    pub name: String,
}

/// One event exactly as the API returns it, UTC timestamp and all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub actor: Actor,
    pub repo: Repo,
    #[serde(default)]
    pub payload: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// An event inside the requested day window, timestamp shifted to local time.
#[derive(Debug, Clone, Serialize)]
pub struct ActivityEvent {
    pub kind: String,
    pub actor: String,
    pub repo: String,
    pub payload: serde_json::Value,
    pub created_at: DateTime<FixedOffset>,
}

impl ActivityEvent {
    /// Shift a raw event's UTC timestamp into `tz`.
    pub fn localized(raw: RawEvent, tz: FixedOffset) -> Self {
        Self {
            kind: raw.kind,
            actor: raw.actor.login,
            repo: raw.repo.name,
            payload: raw.payload,
            created_at: raw.created_at.with_timezone(&tz),
        }
    }
}
