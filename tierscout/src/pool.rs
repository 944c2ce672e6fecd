//! Available-team pool
//!
//! Holds the teams not currently placed in any tier. The pool and the tier
//! board partition the event roster between them; `withdraw` and `restore`
//! are both idempotent so repeated drag/remove callbacks cannot duplicate
//! or lose a team.

use serde::{Deserialize, Serialize};
use tierscout_common::Team;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AvailablePool {
    teams: Vec<Team>,
}

impl AvailablePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the pool contents when seeding a brand-new event.
    pub fn load(&mut self, teams: Vec<Team>) {
        self.teams = teams;
    }

    /// Remove a team from the pool. Silent no-op when absent; a team being
    /// placed may legitimately already sit in a tier instead of here.
    pub fn withdraw(&mut self, team_id: u32) {
        self.teams.retain(|t| t.id != team_id);
    }

    /// Re-add a team, unless it is already present.
    pub fn restore(&mut self, team: Team) {
        if !self.contains(team.id) {
            self.teams.push(team);
        }
    }

    pub fn contains(&self, team_id: u32) -> bool {
        self.teams.iter().any(|t| t.id == team_id)
    }

    pub fn get(&self, team_id: u32) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == team_id)
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Team> {
        self.teams.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Team> {
        self.teams.iter_mut()
    }

    /// Teams ordered by number for display.
    pub fn sorted_by_id(&self) -> Vec<&Team> {
        let mut teams: Vec<&Team> = self.teams.iter().collect();
        teams.sort_by_key(|t| t.id);
        teams
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team(id: u32) -> Team {
        Team::from_number(id)
    }

    #[test]
    fn withdraw_absent_is_noop() {
        let mut pool = AvailablePool::new();
        pool.load(vec![team(111), team(254)]);

        pool.withdraw(9999);
        assert_eq!(pool.len(), 2);

        pool.withdraw(254);
        assert_eq!(pool.len(), 1);
        assert!(!pool.contains(254));
    }

    #[test]
    fn restore_is_idempotent() {
        let mut pool = AvailablePool::new();
        pool.restore(team(254));
        pool.restore(team(254));

        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn load_replaces_prior_contents() {
        let mut pool = AvailablePool::new();
        pool.load(vec![team(1), team(2)]);
        pool.load(vec![team(3)]);

        assert_eq!(pool.len(), 1);
        assert!(pool.contains(3));
        assert!(!pool.contains(1));
    }

    #[test]
    fn sorted_by_id_orders_numerically() {
        let mut pool = AvailablePool::new();
        pool.load(vec![team(1678), team(33), team(254)]);

        let ids: Vec<u32> = pool.sorted_by_id().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![33, 254, 1678]);
    }
}
