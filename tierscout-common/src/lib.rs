//! # TierScout Common Library
//!
//! Shared code for the TierScout workspace:
//! - Scouting data model (teams, tiers, notes)
//! - Error types
//! - Configuration loading and data folder resolution
//! - SQLite database layer (settings and per-event snapshots)
//! - Session event definitions and EventBus

pub mod config;
pub mod db;
pub mod error;
pub mod events;
pub mod model;

pub use error::{Error, Result};
pub use model::{NotesEntry, ScoutNotes, Team, Tier};
