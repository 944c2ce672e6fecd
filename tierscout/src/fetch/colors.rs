//! frc-colors API client
//!
//! Batch lookup of team display colors. Colors apply only when the upstream
//! record is marked verified; everything else loads uncolored.

use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

const COLORS_BASE_URL: &str = "https://api.frc-colors.com/v1/team";

/// Colors client errors
#[derive(Debug, Error)]
pub enum ColorsError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// A verified primary/secondary color pair for one team.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedColors {
    pub primary: String,
    pub secondary: String,
}

#[derive(Debug, Deserialize)]
struct ColorsResponse {
    #[serde(default)]
    teams: HashMap<String, TeamColorRecord>,
}

#[derive(Debug, Deserialize)]
struct TeamColorRecord {
    #[serde(default)]
    colors: Option<ColorSet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ColorSet {
    #[serde(default)]
    primary_hex: Option<String>,
    #[serde(default)]
    secondary_hex: Option<String>,
    #[serde(default)]
    verified: bool,
}

fn verified_colors(response: ColorsResponse) -> HashMap<u32, VerifiedColors> {
    let mut out = HashMap::new();
    for (key, record) in response.teams {
        let Ok(team_id) = key.parse::<u32>() else {
            continue;
        };
        let Some(colors) = record.colors else {
            continue;
        };
        if !colors.verified {
            continue;
        }
        if let (Some(primary), Some(secondary)) = (colors.primary_hex, colors.secondary_hex) {
            out.insert(team_id, VerifiedColors { primary, secondary });
        }
    }
    out
}

/// frc-colors API client
pub struct ColorsClient {
    http_client: reqwest::Client,
}

impl ColorsClient {
    pub fn new() -> Result<Self, ColorsError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ColorsError::Network(e.to_string()))?;

        Ok(Self { http_client })
    }

    /// Fetch verified colors for a batch of team ids. Teams without a
    /// verified record simply do not appear in the result.
    pub async fn team_colors(
        &self,
        team_ids: &[u32],
    ) -> Result<HashMap<u32, VerifiedColors>, ColorsError> {
        if team_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let query: Vec<(&str, String)> =
            team_ids.iter().map(|id| ("team", id.to_string())).collect();

        debug!(batch = team_ids.len(), "Querying frc-colors API");
        let response = self
            .http_client
            .get(COLORS_BASE_URL)
            .query(&query)
            .send()
            .await
            .map_err(|e| ColorsError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ColorsError::Api(status.as_u16(), body));
        }

        let parsed: ColorsResponse = response
            .json()
            .await
            .map_err(|e| ColorsError::Parse(e.to_string()))?;

        let colors = verified_colors(parsed);
        info!(
            requested = team_ids.len(),
            verified = colors.len(),
            "Fetched team colors"
        );
        Ok(colors)
    }
}
