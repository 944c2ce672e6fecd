//! SQLite database layer
//!
//! One database per device holds the `settings` table (current event code,
//! scout name, webhook configuration) and the `snapshots` key/value table,
//! the durable per-event storage for scouting sessions.

mod init;
pub mod settings;
pub mod snapshots;

pub use init::init_database;
