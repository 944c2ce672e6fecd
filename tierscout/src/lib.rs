//! tierscout - Tier-ranking scouting tool
//!
//! Core state machine for a scouting session: an available-team pool, a
//! five-tier ranking board, per-placement scout notes, per-event snapshot
//! persistence, and a debounced webhook export path. The CLI in `main.rs`
//! is a thin surface over [`session::Session`].

pub mod board;
pub mod display;
pub mod export;
pub mod fetch;
pub mod notes;
pub mod pool;
pub mod session;
pub mod snapshot;

pub use board::TierBoard;
pub use notes::NotesStore;
pub use pool::AvailablePool;
pub use session::Session;
pub use snapshot::{Snapshot, SnapshotStore};
