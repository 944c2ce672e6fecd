//! Session event definitions and EventBus
//!
//! Mutations to the scouting session are announced on a broadcast bus.
//! Subscribers today: the auto-export scheduler (arms its debounce timer on
//! board/notes changes) and diagnostic logging.

use crate::model::Tier;
use tokio::sync::broadcast;

/// Events emitted by a scouting session
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// Session state rebuilt from a stored snapshot (roster fetch skipped)
    SessionHydrated { event_key: String, team_count: usize },

    /// Fresh session seeded from a roster fetch
    SessionSeeded { event_key: String, team_count: usize },

    /// Team placed into (or re-rated within) a tier
    TeamPlaced { tier: Tier, team_id: u32 },

    /// Team removed from a tier back to the available pool
    TeamRemoved { tier: Tier, team_id: u32 },

    /// Color enrichment merged into the current state
    ColorsApplied { updated: usize },

    /// Full snapshot written to durable storage
    SnapshotSaved { event_key: String },

    /// Webhook export delivered
    ExportSucceeded { destination: String },

    /// Webhook export failed
    ExportFailed { reason: String },
}

impl SessionEvent {
    /// True for mutations that should arm the auto-export debounce timer.
    pub fn changes_board(&self) -> bool {
        matches!(
            self,
            SessionEvent::TeamPlaced { .. } | SessionEvent::TeamRemoved { .. }
        )
    }
}

/// Broadcast bus for session events
///
/// Uses tokio::broadcast internally: every subscriber sees every event
/// emitted after it subscribed; slow subscribers drop oldest events rather
/// than blocking emitters.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<SessionEvent>,
}

impl EventBus {
    /// Create a bus buffering up to `capacity` events per subscriber.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Subscribe to all future events.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers.
    ///
    /// An event with no listeners is not an error; sessions run the same
    /// with or without an attached scheduler.
    pub fn emit(&self, event: SessionEvent) {
        let _ = self.tx.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(100)
    }
}
