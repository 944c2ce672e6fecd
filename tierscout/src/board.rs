//! Five-tier ranking board
//!
//! Ordered sequences of teams per tier, append-on-placement. Invariant: a
//! team id appears in at most one tier's sequence at any time; `strip`
//! enforces that unconditionally before every append.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tierscout_common::{Team, Tier};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TierBoard {
    tiers: BTreeMap<Tier, Vec<Team>>,
}

impl TierBoard {
    /// Empty board with all five tiers present.
    pub fn new() -> Self {
        let mut tiers = BTreeMap::new();
        for tier in Tier::ALL {
            tiers.insert(tier, Vec::new());
        }
        Self { tiers }
    }

    /// Re-insert any tier keys missing from a deserialized board. Stored
    /// snapshots always carry all five, but hydration must not trust that.
    pub fn ensure_tiers(&mut self) {
        for tier in Tier::ALL {
            self.tiers.entry(tier).or_default();
        }
    }

    /// Remove a team id from every tier sequence. Returns the removed team
    /// and the tier it occupied, if any.
    pub fn strip(&mut self, team_id: u32) -> Option<(Tier, Team)> {
        let mut stripped = None;
        for (tier, teams) in self.tiers.iter_mut() {
            if let Some(pos) = teams.iter().position(|t| t.id == team_id) {
                stripped = Some((*tier, teams.remove(pos)));
            }
        }
        stripped
    }

    /// Append a team to the end of a tier's sequence.
    pub fn append(&mut self, tier: Tier, team: Team) {
        self.tiers.entry(tier).or_default().push(team);
    }

    /// Remove a team from the named tier only. Returns `None` (and changes
    /// nothing) when the team is not in that tier.
    pub fn remove(&mut self, tier: Tier, team_id: u32) -> Option<Team> {
        let teams = self.tiers.get_mut(&tier)?;
        let pos = teams.iter().position(|t| t.id == team_id)?;
        Some(teams.remove(pos))
    }

    pub fn tier(&self, tier: Tier) -> &[Team] {
        self.tiers.get(&tier).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The tier currently holding a team, if any.
    pub fn tier_of(&self, team_id: u32) -> Option<Tier> {
        self.tiers
            .iter()
            .find(|(_, teams)| teams.iter().any(|t| t.id == team_id))
            .map(|(tier, _)| *tier)
    }

    pub fn contains(&self, team_id: u32) -> bool {
        self.tier_of(team_id).is_some()
    }

    /// Total teams placed across all tiers.
    pub fn placed_count(&self) -> usize {
        self.tiers.values().map(Vec::len).sum()
    }

    /// Empty all tiers (event reseed).
    pub fn clear(&mut self) {
        for teams in self.tiers.values_mut() {
            teams.clear();
        }
    }

    pub fn iter_mut_teams(&mut self) -> impl Iterator<Item = &mut Team> {
        self.tiers.values_mut().flat_map(|teams| teams.iter_mut())
    }
}

impl Default for TierBoard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team(id: u32) -> Team {
        Team::from_number(id)
    }

    #[test]
    fn append_preserves_insertion_order() {
        let mut board = TierBoard::new();
        board.append(Tier::B, team(33));
        board.append(Tier::B, team(254));
        board.append(Tier::B, team(118));

        let ids: Vec<u32> = board.tier(Tier::B).iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![33, 254, 118]);
    }

    #[test]
    fn strip_removes_from_any_tier() {
        let mut board = TierBoard::new();
        board.append(Tier::S, team(254));

        let (tier, stripped) = board.strip(254).unwrap();
        assert_eq!(tier, Tier::S);
        assert_eq!(stripped.id, 254);
        assert!(!board.contains(254));
        assert!(board.strip(254).is_none());
    }

    #[test]
    fn remove_from_wrong_tier_changes_nothing() {
        let mut board = TierBoard::new();
        board.append(Tier::A, team(254));

        assert!(board.remove(Tier::S, 254).is_none());
        assert_eq!(board.tier_of(254), Some(Tier::A));
    }

    #[test]
    fn serializes_with_bare_letter_keys() {
        let mut board = TierBoard::new();
        board.append(Tier::S, team(254));

        let json = serde_json::to_value(&board).unwrap();
        assert_eq!(json["S"][0]["id"], 254);
        assert_eq!(json["D"], serde_json::json!([]));
    }

    #[test]
    fn ensure_tiers_fills_missing_keys() {
        let mut board: TierBoard = serde_json::from_str(r#"{"S":[],"A":[]}"#).unwrap();
        board.ensure_tiers();

        assert!(board.tier(Tier::D).is_empty());
        assert_eq!(board.placed_count(), 0);
    }
}
