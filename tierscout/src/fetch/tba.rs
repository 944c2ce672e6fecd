//! The Blue Alliance API client
//!
//! Event rosters and simple match schedules, authenticated with the
//! `X-TBA-Auth-Key` header.

use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tierscout_common::Team;
use tracing::{debug, info};

const TBA_BASE_URL: &str = "https://www.thebluealliance.com/api/v3";
const USER_AGENT: &str = concat!("tierscout/", env!("CARGO_PKG_VERSION"));
const AUTH_HEADER: &str = "X-TBA-Auth-Key";

/// TBA client errors
#[derive(Debug, Error)]
pub enum TbaError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Event not found: {0}")]
    EventNotFound(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Roster entry as returned by `/event/{key}/teams`.
#[derive(Debug, Deserialize)]
struct TbaTeam {
    team_number: u32,
}

/// One alliance of a simple match.
#[derive(Debug, Clone, Deserialize)]
pub struct Alliance {
    pub team_keys: Vec<String>,
    /// -1 until the match has been played.
    pub score: i64,
}

impl Alliance {
    /// Numeric team ids, stripped of the "frc" key prefix.
    pub fn team_numbers(&self) -> Vec<u32> {
        self.team_keys
            .iter()
            .filter_map(|k| k.trim_start_matches("frc").parse().ok())
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Alliances {
    pub red: Alliance,
    pub blue: Alliance,
}

/// Match outcome once both scores are in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchResult {
    RedWin,
    BlueWin,
    Tie,
}

/// Simple match record from `/event/{key}/matches/simple`.
#[derive(Debug, Clone, Deserialize)]
pub struct Match {
    pub key: String,
    pub match_number: u32,
    pub comp_level: String,
    #[serde(default)]
    pub set_number: Option<u32>,
    pub alliances: Alliances,
    /// Scheduled time, unix seconds.
    #[serde(default)]
    pub time: Option<i64>,
}

impl Match {
    pub fn played(&self) -> bool {
        self.alliances.red.score >= 0 && self.alliances.blue.score >= 0
    }

    pub fn result(&self) -> Option<MatchResult> {
        if !self.played() {
            return None;
        }
        Some(match self.alliances.red.score.cmp(&self.alliances.blue.score) {
            std::cmp::Ordering::Greater => MatchResult::RedWin,
            std::cmp::Ordering::Less => MatchResult::BlueWin,
            std::cmp::Ordering::Equal => MatchResult::Tie,
        })
    }

    /// Display label: "QM12", or "SF1-2" for elimination sets.
    pub fn label(&self) -> String {
        let level = self.comp_level.to_uppercase();
        match self.set_number {
            Some(set) if self.comp_level != "qm" => {
                format!("{}{}-{}", level, set, self.match_number)
            }
            _ => format!("{}{}", level, self.match_number),
        }
    }

    fn comp_level_rank(&self) -> u8 {
        match self.comp_level.as_str() {
            "qm" => 1,
            "qf" => 2,
            "sf" => 3,
            "f" => 4,
            _ => 99,
        }
    }
}

/// Sort matches into schedule order: qualification before elimination
/// rounds, then by match number.
pub fn sort_matches(matches: &mut [Match]) {
    matches.sort_by(|a, b| {
        a.comp_level_rank()
            .cmp(&b.comp_level_rank())
            .then(a.match_number.cmp(&b.match_number))
    });
}

/// The Blue Alliance API client
pub struct TbaClient {
    http_client: reqwest::Client,
    api_key: String,
}

impl TbaClient {
    pub fn new(api_key: &str) -> Result<Self, TbaError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| TbaError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            api_key: api_key.to_string(),
        })
    }

    async fn get(&self, path: &str, event_key: &str) -> Result<reqwest::Response, TbaError> {
        let url = format!("{}{}", TBA_BASE_URL, path);
        debug!(url = %url, "Querying TBA API");

        let response = self
            .http_client
            .get(&url)
            .header(AUTH_HEADER, &self.api_key)
            .send()
            .await
            .map_err(|e| TbaError::Network(e.to_string()))?;

        let status = response.status();
        if status == 404 {
            return Err(TbaError::EventNotFound(event_key.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TbaError::Api(status.as_u16(), body));
        }
        Ok(response)
    }

    /// Fetch the team roster for an event, ordered by team number.
    pub async fn event_teams(&self, event_key: &str) -> Result<Vec<Team>, TbaError> {
        let response = self
            .get(&format!("/event/{}/teams", event_key), event_key)
            .await?;

        let mut roster: Vec<TbaTeam> = response
            .json()
            .await
            .map_err(|e| TbaError::Parse(e.to_string()))?;
        roster.sort_by_key(|t| t.team_number);

        let teams: Vec<Team> = roster
            .into_iter()
            .map(|t| Team::from_number(t.team_number))
            .collect();

        info!(event_key, team_count = teams.len(), "Fetched event roster");
        Ok(teams)
    }

    /// Fetch the simple match schedule for an event, in schedule order.
    pub async fn event_matches(&self, event_key: &str) -> Result<Vec<Match>, TbaError> {
        let response = self
            .get(&format!("/event/{}/matches/simple", event_key), event_key)
            .await?;

        let mut matches: Vec<Match> = response
            .json()
            .await
            .map_err(|e| TbaError::Parse(e.to_string()))?;
        sort_matches(&mut matches);

        info!(event_key, match_count = matches.len(), "Fetched match schedule");
        Ok(matches)
    }
}
