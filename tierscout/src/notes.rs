//! Per-placement scout notes store
//!
//! Companion of the tier board: an entry exists for (tier, team) exactly
//! while that team occupies that tier slot. All writes happen inside the
//! session's place/remove transitions; nothing else mutates this store.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tierscout_common::{NotesEntry, ScoutNotes, Tier};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotesStore {
    tiers: BTreeMap<Tier, BTreeMap<u32, NotesEntry>>,
}

impl NotesStore {
    pub fn new() -> Self {
        let mut tiers = BTreeMap::new();
        for tier in Tier::ALL {
            tiers.insert(tier, BTreeMap::new());
        }
        Self { tiers }
    }

    /// Re-insert any tier keys missing from a deserialized store.
    pub fn ensure_tiers(&mut self) {
        for tier in Tier::ALL {
            self.tiers.entry(tier).or_default();
        }
    }

    /// Delete every entry for a team id, across all tiers.
    pub fn strip(&mut self, team_id: u32) {
        for entries in self.tiers.values_mut() {
            entries.remove(&team_id);
        }
    }

    /// Write (or overwrite) the entry for a placed team.
    pub fn insert(&mut self, tier: Tier, team_id: u32, notes: ScoutNotes, scout_name: &str) {
        self.tiers.entry(tier).or_default().insert(
            team_id,
            NotesEntry {
                notes,
                scout_name: scout_name.to_string(),
            },
        );
    }

    /// Delete the entry for (tier, team), if present.
    pub fn remove(&mut self, tier: Tier, team_id: u32) {
        if let Some(entries) = self.tiers.get_mut(&tier) {
            entries.remove(&team_id);
        }
    }

    pub fn notes_for(&self, tier: Tier, team_id: u32) -> Option<&NotesEntry> {
        self.tiers.get(&tier)?.get(&team_id)
    }

    pub fn entry_count(&self) -> usize {
        self.tiers.values().map(BTreeMap::len).sum()
    }

    pub fn clear(&mut self) {
        for entries in self.tiers.values_mut() {
            entries.clear();
        }
    }
}

impl Default for NotesStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_then_lookup() {
        let mut store = NotesStore::new();
        let notes = ScoutNotes {
            driver_skill: "excellent".to_string(),
            ..Default::default()
        };
        store.insert(Tier::S, 254, notes, "Riley");

        let entry = store.notes_for(Tier::S, 254).unwrap();
        assert_eq!(entry.notes.driver_skill, "excellent");
        assert_eq!(entry.scout_name, "Riley");
        assert!(store.notes_for(Tier::A, 254).is_none());
    }

    #[test]
    fn strip_clears_all_tiers() {
        let mut store = NotesStore::new();
        store.insert(Tier::S, 254, ScoutNotes::default(), "Riley");
        store.insert(Tier::B, 254, ScoutNotes::default(), "Riley");

        store.strip(254);
        assert_eq!(store.entry_count(), 0);
    }

    #[test]
    fn numeric_keys_serialize_as_json_object_keys() {
        let mut store = NotesStore::new();
        store.insert(Tier::A, 1678, ScoutNotes::default(), "Sam");

        let json = serde_json::to_value(&store).unwrap();
        assert_eq!(json["A"]["1678"]["scoutName"], "Sam");
    }
}
