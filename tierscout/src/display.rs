//! Plain-text rendering for the CLI surface
//!
//! Presentation glue only: nothing here mutates session state.

use crate::fetch::tba::{Match, MatchResult};
use crate::{AvailablePool, NotesStore, TierBoard};
use chrono::{Local, TimeZone};
use std::fmt::Write;
use tierscout_common::Tier;

const POOL_ROW_WIDTH: usize = 10;

/// Render the tier board with per-placement notes summaries.
pub fn format_board(board: &TierBoard, notes: &NotesStore) -> String {
    let mut out = String::new();
    for tier in Tier::ALL {
        let teams = board.tier(tier);
        if teams.is_empty() {
            let _ = writeln!(out, "{} | (empty)", tier);
            continue;
        }

        let numbers: Vec<String> = teams.iter().map(|t| t.id.to_string()).collect();
        let _ = writeln!(out, "{} | {}", tier, numbers.join("  "));

        for team in teams {
            if let Some(entry) = notes.notes_for(tier, team.id) {
                let _ = writeln!(out, "      {}: {}", team.id, summarize(entry));
            }
        }
    }
    out
}

fn summarize(entry: &tierscout_common::NotesEntry) -> String {
    let mut parts = Vec::new();
    let n = &entry.notes;
    for (label, text) in [
        ("driver", &n.driver_skill),
        ("hardware", &n.hardware_electro),
        ("comms", &n.communication),
        ("game", &n.basic_game_knowledge),
    ] {
        if !text.is_empty() {
            parts.push(format!("{}: {}", label, text));
        }
    }
    if n.under_trench {
        parts.push("fits under trench".to_string());
    }
    let scout = if entry.scout_name.is_empty() {
        "Unknown".to_string()
    } else {
        entry.scout_name.clone()
    };
    if parts.is_empty() {
        format!("(no notes) [scout: {}]", scout)
    } else {
        format!("{} [scout: {}]", parts.join("; "), scout)
    }
}

/// Render the available pool, sorted by team number.
pub fn format_pool(pool: &AvailablePool) -> String {
    if pool.is_empty() {
        return "(no unranked teams)\n".to_string();
    }

    let mut out = String::new();
    for row in pool.sorted_by_id().chunks(POOL_ROW_WIDTH) {
        let numbers: Vec<String> = row.iter().map(|t| format!("{:>5}", t.id)).collect();
        let _ = writeln!(out, "{}", numbers.join(" "));
    }
    out
}

/// Render the match schedule, one line per match.
pub fn format_matches(matches: &[Match]) -> String {
    let mut out = String::new();
    for m in matches {
        let red = join_numbers(&m.alliances.red.team_numbers());
        let blue = join_numbers(&m.alliances.blue.team_numbers());

        let status = if m.played() {
            let score = format!("{} - {}", m.alliances.red.score, m.alliances.blue.score);
            let outcome = match m.result() {
                Some(MatchResult::RedWin) => "RED WIN",
                Some(MatchResult::BlueWin) => "BLUE WIN",
                Some(MatchResult::Tie) => "TIE",
                None => "",
            };
            format!("{:>9}  {}", score, outcome)
        } else {
            match m.time {
                Some(t) => match Local.timestamp_opt(t, 0).single() {
                    Some(dt) => dt.format("%H:%M").to_string(),
                    None => "Upcoming".to_string(),
                },
                None => "Upcoming".to_string(),
            }
        };

        let _ = writeln!(out, "{:<7} {:>17} vs {:<17} {}", m.label(), red, blue, status);
    }
    out
}

fn join_numbers(numbers: &[u32]) -> String {
    numbers
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
