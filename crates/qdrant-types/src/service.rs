//! Service-level descriptors: health and snapshots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Health check reply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthInfo {
    pub title: String,
    pub version: String,
    /// Build commit, when the service reports one
    #[serde(default)]
    pub commit: Option<String>,
}

/// A collection snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotInfo {
    /// Snapshot name, used to delete it later
    pub name: String,
    /// Size in bytes
    pub size_bytes: i64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub checksum: Option<String>,
}
