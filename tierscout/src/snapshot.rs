//! Per-event snapshot persistence
//!
//! Serializes the {pool, board, notes} triple to the snapshots table under
//! `tierlist_{event}`, with the notes map mirrored alone under
//! `descriptions_{event}` so either key can rebuild the notes view. JSON
//! field names match the original storage format.

use crate::{AvailablePool, NotesStore, TierBoard};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tierscout_common::db::snapshots;
use tierscout_common::Result;
use tracing::debug;

/// The serialized form of one event's scouting state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub available_teams: AvailablePool,
    pub tier_teams: TierBoard,
    pub team_descriptions: NotesStore,
}

impl Snapshot {
    /// Normalize tier keys after deserialization.
    pub fn normalize(&mut self) {
        self.tier_teams.ensure_tiers();
        self.team_descriptions.ensure_tiers();
    }
}

/// Snapshot reads and writes for one database.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    pool: SqlitePool,
}

impl SnapshotStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn storage_key(event_key: &str) -> String {
        format!("tierlist_{}", event_key)
    }

    pub fn descriptions_key(event_key: &str) -> String {
        format!("descriptions_{}", event_key)
    }

    /// Load the snapshot for an event, if one was ever persisted.
    pub async fn load(&self, event_key: &str) -> Result<Option<Snapshot>> {
        let Some(raw) = snapshots::read(&self.pool, &Self::storage_key(event_key)).await? else {
            return Ok(None);
        };

        let mut snapshot: Snapshot = serde_json::from_str(&raw)?;
        snapshot.normalize();
        debug!(
            event_key,
            available = snapshot.available_teams.len(),
            placed = snapshot.tier_teams.placed_count(),
            "Loaded stored snapshot"
        );
        Ok(Some(snapshot))
    }

    /// Persist the full snapshot plus the notes-only mirror. Both writes
    /// happen before this returns; a failure propagates to the caller and
    /// is treated as session-fatal upstream.
    pub async fn save(&self, event_key: &str, snapshot: &Snapshot) -> Result<()> {
        let full = serde_json::to_string(snapshot)?;
        let notes_only = serde_json::to_string(&snapshot.team_descriptions)?;

        snapshots::write(&self.pool, &Self::storage_key(event_key), &full).await?;
        snapshots::write(&self.pool, &Self::descriptions_key(event_key), &notes_only).await?;
        Ok(())
    }

    /// Drop both stored keys for an event (hard reset before a refetch).
    pub async fn reset(&self, event_key: &str) -> Result<()> {
        snapshots::delete(&self.pool, &Self::storage_key(event_key)).await?;
        snapshots::delete(&self.pool, &Self::descriptions_key(event_key)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_keys_derive_from_event_code() {
        assert_eq!(SnapshotStore::storage_key("2026tuis"), "tierlist_2026tuis");
        assert_eq!(
            SnapshotStore::descriptions_key("2026tuis"),
            "descriptions_2026tuis"
        );
    }

    #[test]
    fn snapshot_json_uses_original_field_names() {
        let snapshot = Snapshot {
            available_teams: AvailablePool::new(),
            tier_teams: TierBoard::new(),
            team_descriptions: NotesStore::new(),
        };
        let json = serde_json::to_value(&snapshot).unwrap();

        assert!(json.get("availableTeams").is_some());
        assert!(json.get("tierTeams").is_some());
        assert!(json.get("teamDescriptions").is_some());
    }
}
