//! Snapshots table accessors
//!
//! Raw key/value reads and writes; snapshot encoding lives with the session
//! code in the application crate.

use crate::Result;
use sqlx::SqlitePool;

/// Read the stored value for a snapshot key, if any.
pub async fn read(pool: &SqlitePool, key: &str) -> Result<Option<String>> {
    let value: Option<String> = sqlx::query_scalar("SELECT value FROM snapshots WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await?;

    Ok(value)
}

/// Write (or overwrite) the value for a snapshot key. Last write wins.
pub async fn write(pool: &SqlitePool, key: &str, value: &str) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO snapshots (key, value, updated_at) VALUES (?, ?, CURRENT_TIMESTAMP)
        ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = CURRENT_TIMESTAMP
        "#,
    )
    .bind(key)
    .bind(value)
    .execute(pool)
    .await?;

    Ok(())
}

/// Delete the stored value for a snapshot key, if any.
pub async fn delete(pool: &SqlitePool, key: &str) -> Result<()> {
    sqlx::query("DELETE FROM snapshots WHERE key = ?")
        .bind(key)
        .execute(pool)
        .await?;

    Ok(())
}
