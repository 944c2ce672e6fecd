//! Spreadsheet webhook export
//!
//! Two paths share one wire format:
//! - `export_now`: interactive, reports success or failure to the caller
//!   and hands back the serialized payload for the presentation layer.
//! - `ExportScheduler`: debounced background send armed after each board or
//!   notes mutation; failures are logged, never surfaced to a caller.
//!
//! Both paths announce delivery outcomes on the session bus as
//! `ExportSucceeded` / `ExportFailed`.
//!
//! The POST is form-encoded with a single `data` field carrying the JSON
//! payload. Delivery is at-most-once: non-2xx responses are failures, with
//! no retry and no queue.

use crate::session::Session;
use serde::Serialize;
use tierscout_common::events::{EventBus, SessionEvent};
use std::sync::Mutex;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

/// Default debounce window for auto-export.
pub const AUTO_EXPORT_DEBOUNCE: Duration = Duration::from_millis(1000);

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Export errors
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("No spreadsheet URL configured")]
    NoDestination,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Webhook error {0}: {1}")]
    Http(u16, String),

    #[error("Payload serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// The JSON payload the spreadsheet webhook consumes.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportPayload {
    pub tier_teams: crate::TierBoard,
    pub team_descriptions: crate::NotesStore,
    /// Unix milliseconds at payload construction.
    pub timestamp: i64,
    pub scout_name: String,
}

impl ExportPayload {
    pub fn from_session(session: &Session, scout_name: &str) -> Self {
        Self {
            tier_teams: session.board().clone(),
            team_descriptions: session.notes().clone(),
            timestamp: chrono::Utc::now().timestamp_millis(),
            scout_name: scout_name.to_string(),
        }
    }

    pub fn to_json(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// POST the serialized payload as the `data` form field.
async fn post_to_webhook(
    client: &reqwest::Client,
    url: &str,
    data: &str,
) -> Result<(), ExportError> {
    let response = client
        .post(url)
        .form(&[("data", data)])
        .send()
        .await
        .map_err(|e| ExportError::Network(e.to_string()))?;

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    debug!(%status, body_len = body.len(), "Webhook POST response");

    if !status.is_success() {
        return Err(ExportError::Http(status.as_u16(), body));
    }
    Ok(())
}

/// Interactive export: POST to the configured webhook and return the
/// serialized payload for the operator (the CLI prints it for pasting).
///
/// An unconfigured destination is an explicit error, not a partial no-op.
pub async fn export_now(
    url: &str,
    payload: &ExportPayload,
    bus: &EventBus,
) -> Result<String, ExportError> {
    if url.is_empty() {
        return Err(ExportError::NoDestination);
    }

    let data = payload.to_json()?;
    let client = reqwest::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .map_err(|e| ExportError::Network(e.to_string()))?;

    match post_to_webhook(&client, url, &data).await {
        Ok(()) => {
            info!(destination = url, "Exported tier data to webhook");
            bus.emit(SessionEvent::ExportSucceeded {
                destination: url.to_string(),
            });
            Ok(data)
        }
        Err(e) => {
            bus.emit(SessionEvent::ExportFailed {
                reason: e.to_string(),
            });
            Err(e)
        }
    }
}

/// Debounced auto-export with a single cancellable timer slot.
///
/// Re-arming aborts any pending unfired send, so N state changes inside the
/// debounce window collapse to exactly one POST carrying the state as of
/// the last change. The slot is owned here; cancellation-on-rearm is
/// structural, not a caller discipline.
pub struct ExportScheduler {
    client: reqwest::Client,
    url: String,
    delay: Duration,
    bus: EventBus,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl ExportScheduler {
    pub fn new(url: &str, delay: Duration, bus: EventBus) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.to_string(),
            delay,
            bus,
            pending: Mutex::new(None),
        }
    }

    /// (Re)arm the debounce timer with the payload for the change that just
    /// happened. No-op while no destination is configured.
    pub fn schedule(&self, payload: &ExportPayload) {
        if self.url.is_empty() {
            debug!("Auto-export armed with no destination URL; skipping");
            return;
        }

        let data = match payload.to_json() {
            Ok(data) => data,
            Err(e) => {
                // Background context: log and drop, never surface.
                error!("Auto export payload serialization failed: {}", e);
                return;
            }
        };

        let client = self.client.clone();
        let url = self.url.clone();
        let delay = self.delay;
        let bus = self.bus.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            match post_to_webhook(&client, &url, &data).await {
                Ok(()) => {
                    info!("Auto export successful");
                    bus.emit(SessionEvent::ExportSucceeded { destination: url });
                }
                Err(e) => {
                    error!("Auto export failed: {}", e);
                    bus.emit(SessionEvent::ExportFailed {
                        reason: e.to_string(),
                    });
                }
            }
        });

        let mut pending = self.pending.lock().expect("scheduler slot poisoned");
        if let Some(previous) = pending.replace(handle) {
            previous.abort();
        }
    }

    /// Wait for the pending send, if any, to fire and finish. Used by the
    /// one-shot CLI before exit; an aborted (re-armed) task resolves here
    /// without error.
    pub async fn idle(&self) {
        let handle = self.pending.lock().expect("scheduler slot poisoned").take();
        if let Some(handle) = handle {
            let _ = handle.await;
        }
    }
}
