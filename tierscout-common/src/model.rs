//! Scouting data model shared across the TierScout crates
//!
//! Serde shapes (camelCase field names, bare-letter tier keys) match the
//! JSON the original spreadsheet tooling consumes, so exported payloads and
//! stored snapshots stay interchangeable with it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A competition team as fetched from the roster source.
///
/// Identity is the numeric team number. Colors are optional display
/// enrichment applied once after the roster fetch; the core carries them
/// but never interprets them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: u32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_color: Option<String>,
}

impl Team {
    /// Roster entries display the bare team number as their name.
    pub fn from_number(number: u32) -> Self {
        Self {
            id: number,
            name: number.to_string(),
            primary_color: None,
            secondary_color: None,
        }
    }
}

/// Ranking tier. Closed set, ordered best to worst.
///
/// Declaration order drives `Ord`, so ordered maps keyed by `Tier` iterate
/// S, A, B, C, D.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    S,
    A,
    B,
    C,
    D,
}

impl Tier {
    /// All tiers in display order.
    pub const ALL: [Tier; 5] = [Tier::S, Tier::A, Tier::B, Tier::C, Tier::D];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::S => "S",
            Tier::A => "A",
            Tier::B => "B",
            Tier::C => "C",
            Tier::D => "D",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "S" => Ok(Tier::S),
            "A" => Ok(Tier::A),
            "B" => Ok(Tier::B),
            "C" => Ok(Tier::C),
            "D" => Ok(Tier::D),
            other => Err(format!("unknown tier '{}' (expected S, A, B, C or D)", other)),
        }
    }
}

/// Structured scouting notes attached to a placed team.
///
/// Created (defaulted empty if not supplied) whenever a team enters a tier
/// and destroyed when it leaves; see the session state machine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoutNotes {
    #[serde(default)]
    pub driver_skill: String,
    #[serde(default)]
    pub hardware_electro: String,
    #[serde(default)]
    pub communication: String,
    #[serde(default)]
    pub basic_game_knowledge: String,
    #[serde(default)]
    pub under_trench: bool,
}

/// Notes plus the scout attributed as their author.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotesEntry {
    pub notes: ScoutNotes,
    pub scout_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_parses_case_insensitively() {
        assert_eq!("s".parse::<Tier>().unwrap(), Tier::S);
        assert_eq!(" b ".parse::<Tier>().unwrap(), Tier::B);
        assert!("F".parse::<Tier>().is_err());
    }

    #[test]
    fn tier_orders_best_to_worst() {
        let mut tiers = vec![Tier::D, Tier::S, Tier::B];
        tiers.sort();
        assert_eq!(tiers, vec![Tier::S, Tier::B, Tier::D]);
    }

    #[test]
    fn team_serializes_camel_case() {
        let team = Team {
            id: 254,
            name: "254".to_string(),
            primary_color: Some("#0d47a1".to_string()),
            secondary_color: None,
        };
        let json = serde_json::to_value(&team).unwrap();
        assert_eq!(json["primaryColor"], "#0d47a1");
        assert!(json.get("secondaryColor").is_none());
    }

    #[test]
    fn notes_default_is_empty() {
        let notes = ScoutNotes::default();
        assert!(notes.driver_skill.is_empty());
        assert!(!notes.under_trench);
    }
}
