use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use smartsplit_domain::{Group, GroupLimits};

use crate::error::SnapshotError;
use crate::normalize::normalize_group_with_limits;
use crate::records::RawGroup;

pub const SNAPSHOT_VERSION: &str = "2.0";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotEnvelope<'a> {
    version: &'static str,
    export_date: DateTime<Utc>,
    groups: &'a [Group],
}

#[derive(Deserialize)]
struct RawSnapshot {
    version: Option<String>,
    groups: Option<Vec<RawGroup>>,
}

/// Serializes the groups into a versioned snapshot document.
pub fn export_groups(
    groups: &[Group],
    export_date: DateTime<Utc>,
) -> Result<String, SnapshotError> {
    let envelope = SnapshotEnvelope {
        version: SNAPSHOT_VERSION,
        export_date,
        groups,
    };
    Ok(serde_json::to_string_pretty(&envelope)?)
}

pub fn import_groups(snapshot: &str) -> Result<Vec<Group>, SnapshotError> {
    import_groups_with_limits(snapshot, GroupLimits::default())
}

/// Parses a snapshot document and normalizes every group in it. Documents
/// without a version marker are accepted as legacy exports; a mismatched
/// marker is rejected.
pub fn import_groups_with_limits(
    snapshot: &str,
    limits: GroupLimits,
) -> Result<Vec<Group>, SnapshotError> {
    let raw: RawSnapshot = serde_json::from_str(snapshot)?;

    if let Some(version) = raw.version {
        if version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion { found: version });
        }
    }

    let raw_groups = raw.groups.ok_or(SnapshotError::MissingGroups)?;
    tracing::info!(group_count = raw_groups.len(), "importing snapshot");

    raw_groups
        .into_iter()
        .enumerate()
        .map(|(position, group)| Ok(normalize_group_with_limits(group, position, limits)?))
        .collect()
}
