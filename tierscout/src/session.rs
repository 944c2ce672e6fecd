//! Scouting session state machine
//!
//! Owns the {pool, board, notes} triple for one event and keeps it
//! consistent: a team is either in the available pool or in exactly one
//! tier, and a notes entry lives exactly as long as its tier placement.
//! Every mutation persists the full snapshot before returning and announces
//! itself on the event bus.
//!
//! Per-team states: unassigned -> placed(tier) -> placed(other tier) ->
//! unassigned. Operations referencing teams or slots that do not exist are
//! deliberate no-ops, so repeated UI callbacks cannot corrupt state.

use crate::fetch::colors::VerifiedColors;
use crate::snapshot::{Snapshot, SnapshotStore};
use crate::{AvailablePool, NotesStore, TierBoard};
use std::collections::HashMap;
use tierscout_common::events::{EventBus, SessionEvent};
use tierscout_common::{NotesEntry, Result, ScoutNotes, Team, Tier};
use tracing::{debug, info};

pub struct Session {
    event_key: String,
    scout_name: String,
    pool: AvailablePool,
    board: TierBoard,
    notes: NotesStore,
    store: SnapshotStore,
    bus: EventBus,
}

impl Session {
    /// Rebuild a session from the stored snapshot for `event_key`, if one
    /// exists. Cache-first: when this returns `Some`, the caller skips the
    /// roster fetch entirely.
    pub async fn hydrate(
        event_key: &str,
        scout_name: &str,
        store: SnapshotStore,
        bus: EventBus,
    ) -> Result<Option<Self>> {
        let Some(snapshot) = store.load(event_key).await? else {
            return Ok(None);
        };

        let session = Self {
            event_key: event_key.to_string(),
            scout_name: scout_name.to_string(),
            pool: snapshot.available_teams,
            board: snapshot.tier_teams,
            notes: snapshot.team_descriptions,
            store,
            bus,
        };

        info!(
            event_key,
            available = session.pool.len(),
            placed = session.board.placed_count(),
            "Session hydrated from stored snapshot"
        );
        session.bus.emit(SessionEvent::SessionHydrated {
            event_key: session.event_key.clone(),
            team_count: session.pool.len() + session.board.placed_count(),
        });

        Ok(Some(session))
    }

    /// Seed a fresh session from a just-fetched roster: the pool is
    /// replaced, all tiers and notes are cleared, and the empty-board
    /// snapshot is persisted immediately.
    pub async fn seed(
        event_key: &str,
        scout_name: &str,
        teams: Vec<Team>,
        store: SnapshotStore,
        bus: EventBus,
    ) -> Result<Self> {
        let mut session = Self {
            event_key: event_key.to_string(),
            scout_name: scout_name.to_string(),
            pool: AvailablePool::new(),
            board: TierBoard::new(),
            notes: NotesStore::new(),
            store,
            bus,
        };

        let team_count = teams.len();
        session.pool.load(teams);
        session.board.clear();
        session.notes.clear();
        session.persist().await?;

        info!(event_key, team_count, "Seeded new session from roster");
        session.bus.emit(SessionEvent::SessionSeeded {
            event_key: session.event_key.clone(),
            team_count,
        });

        Ok(session)
    }

    /// Place a team into a tier with the supplied notes.
    ///
    /// One logical transaction: strip the team from every tier, append it
    /// to the target tier, withdraw it from the pool, and write the notes
    /// entry. Placing into the tier a team already occupies is the
    /// edit-notes path. Unknown team ids are a no-op.
    pub async fn place(&mut self, tier: Tier, team_id: u32, notes: ScoutNotes) -> Result<bool> {
        let team = match self.resolve_team(team_id) {
            Some(team) => team,
            None => {
                debug!(team_id, "Ignoring placement of unknown team");
                return Ok(false);
            }
        };

        self.board.strip(team_id);
        self.board.append(tier, team);
        self.pool.withdraw(team_id);
        self.notes.strip(team_id);
        self.notes.insert(tier, team_id, notes, &self.scout_name);

        self.persist().await?;
        self.bus.emit(SessionEvent::TeamPlaced { tier, team_id });
        Ok(true)
    }

    /// Remove a team from the named tier back to the available pool,
    /// deleting its notes entry. A team not present in that tier is a
    /// no-op with no side effects anywhere (including persistence).
    pub async fn remove(&mut self, tier: Tier, team_id: u32) -> Result<bool> {
        let Some(team) = self.board.remove(tier, team_id) else {
            debug!(%tier, team_id, "Ignoring removal from a tier not holding the team");
            return Ok(false);
        };

        self.notes.remove(tier, team_id);
        self.pool.restore(team);

        self.persist().await?;
        self.bus.emit(SessionEvent::TeamRemoved { tier, team_id });
        Ok(true)
    }

    /// Merge color enrichment into the current state, by team id, wherever
    /// each team currently sits. A patch, never a replacement: placements
    /// made while the fetch was in flight stay exactly where they are.
    pub async fn apply_colors(&mut self, colors: &HashMap<u32, VerifiedColors>) -> Result<usize> {
        let mut updated = 0;
        for team in self.pool.iter_mut().chain(self.board.iter_mut_teams()) {
            if let Some(c) = colors.get(&team.id) {
                team.primary_color = Some(c.primary.clone());
                team.secondary_color = Some(c.secondary.clone());
                updated += 1;
            }
        }

        if updated > 0 {
            self.persist().await?;
        }
        self.bus.emit(SessionEvent::ColorsApplied { updated });
        Ok(updated)
    }

    /// Look up a team anywhere in the session (pool first, then tiers).
    fn resolve_team(&self, team_id: u32) -> Option<Team> {
        if let Some(team) = self.pool.get(team_id) {
            return Some(team.clone());
        }
        let tier = self.board.tier_of(team_id)?;
        self.board
            .tier(tier)
            .iter()
            .find(|t| t.id == team_id)
            .cloned()
    }

    /// Write the full snapshot back to storage. Runs inside every mutating
    /// operation, before it returns; an error here means scouting work can
    /// no longer persist and must surface to the operator.
    async fn persist(&self) -> Result<()> {
        let snapshot = self.to_snapshot();
        self.store.save(&self.event_key, &snapshot).await?;
        self.bus.emit(SessionEvent::SnapshotSaved {
            event_key: self.event_key.clone(),
        });
        Ok(())
    }

    pub fn to_snapshot(&self) -> Snapshot {
        Snapshot {
            available_teams: self.pool.clone(),
            tier_teams: self.board.clone(),
            team_descriptions: self.notes.clone(),
        }
    }

    pub fn event_key(&self) -> &str {
        &self.event_key
    }

    pub fn pool(&self) -> &AvailablePool {
        &self.pool
    }

    pub fn board(&self) -> &TierBoard {
        &self.board
    }

    pub fn notes(&self) -> &NotesStore {
        &self.notes
    }

    pub fn notes_for(&self, tier: Tier, team_id: u32) -> Option<&NotesEntry> {
        self.notes.notes_for(tier, team_id)
    }
}
