//! Settings table accessors

use crate::{Error, Result};
use sqlx::SqlitePool;

/// Read a setting, defaulting to the empty string when absent or NULL.
pub async fn get(pool: &SqlitePool, key: &str) -> Result<String> {
    let value: Option<Option<String>> =
        sqlx::query_scalar("SELECT value FROM settings WHERE key = ?")
            .bind(key)
            .fetch_optional(pool)
            .await?;

    Ok(value.flatten().unwrap_or_default())
}

/// Read a boolean setting stored as "true"/"false".
pub async fn get_bool(pool: &SqlitePool, key: &str) -> Result<bool> {
    Ok(get(pool, key).await? == "true")
}

/// Write a setting, creating it if needed.
pub async fn set(pool: &SqlitePool, key: &str, value: &str) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO settings (key, value, updated_at) VALUES (?, ?, CURRENT_TIMESTAMP)
        ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = CURRENT_TIMESTAMP
        "#,
    )
    .bind(key)
    .bind(value)
    .execute(pool)
    .await?;

    Ok(())
}

/// Keys the `config` CLI command may read and write.
pub const EDITABLE_KEYS: [&str; 5] = [
    "event_key",
    "scout_name",
    "spreadsheet_url",
    "auto_export",
    "use_team_colors",
];

/// Validate a key against the editable set before writing.
pub fn validate_key(key: &str) -> Result<()> {
    if EDITABLE_KEYS.contains(&key) {
        Ok(())
    } else {
        Err(Error::InvalidInput(format!(
            "unknown setting '{}' (valid: {})",
            key,
            EDITABLE_KEYS.join(", ")
        )))
    }
}
