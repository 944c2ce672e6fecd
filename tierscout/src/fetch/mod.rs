//! HTTP boundary adapters
//!
//! Clients for the two public competition-data sources. Both degrade
//! gracefully: a roster failure means no teams (surfaced to the operator),
//! a colors failure means uncolored teams. Neither is ever fatal.

pub mod colors;
pub mod tba;
