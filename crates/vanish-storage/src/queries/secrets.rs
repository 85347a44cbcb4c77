// SPDX-FileCopyrightText: 2026 Vanish Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Secret record operations.

use rusqlite::{params, OptionalExtension};
use vanish_core::{SecretRecord, StoreStatistics, VanishError, RATE_LIMIT_RETENTION_SECS};

use crate::database::{map_tr_err, Database};
use crate::queries::meta;

/// Insert a new secret. A duplicate token violates the UNIQUE constraint and
/// surfaces as a storage error; the existing row is left untouched.
pub async fn insert_secret(db: &Database, record: &SecretRecord) -> Result<(), VanishError> {
    let record = record.clone();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT INTO secrets (token, ciphertext, iv, created_at, expires_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    record.token,
                    record.ciphertext,
                    record.iv,
                    record.created_at,
                    record.expires_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Fetch a secret that is still live at `now`.
pub async fn get_live_secret(
    db: &Database,
    token: &str,
    now: i64,
) -> Result<Option<SecretRecord>, VanishError> {
    let token = token.to_string();
    db.connection()
        .call(move |conn| -> Result<Option<SecretRecord>, rusqlite::Error> {
            conn.query_row(
                "SELECT token, ciphertext, iv, created_at, expires_at
                 FROM secrets WHERE token = ?1 AND expires_at > ?2",
                params![token, now],
                |row| {
                    Ok(SecretRecord {
                        token: row.get(0)?,
                        ciphertext: row.get(1)?,
                        iv: row.get(2)?,
                        created_at: row.get(3)?,
                        expires_at: row.get(4)?,
                    })
                },
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

/// Delete a secret by token. Returns whether a row was removed.
pub async fn delete_secret(db: &Database, token: &str) -> Result<bool, VanishError> {
    let token = token.to_string();
    db.connection()
        .call(move |conn| -> Result<bool, rusqlite::Error> {
            let n = conn.execute("DELETE FROM secrets WHERE token = ?1", params![token])?;
            Ok(n > 0)
        })
        .await
        .map_err(map_tr_err)
}

/// Delete every secret with `expires_at <= now` and record the sweep time.
pub async fn delete_expired(db: &Database, now: i64) -> Result<u64, VanishError> {
    db.connection()
        .call(move |conn| -> Result<u64, rusqlite::Error> {
            let tx = conn.transaction()?;
            let deleted = tx.execute("DELETE FROM secrets WHERE expires_at <= ?1", params![now])?;
            meta::set(&tx, meta::LAST_CLEANUP_KEY, &now.to_string())?;
            tx.commit()?;
            Ok(deleted as u64)
        })
        .await
        .map_err(map_tr_err)
}

/// Aggregate counts as of `now`, read in a single transaction.
pub async fn statistics(db: &Database, now: i64) -> Result<StoreStatistics, VanishError> {
    let recent_since = now - RATE_LIMIT_RETENTION_SECS as i64;
    db.connection()
        .call(move |conn| -> Result<StoreStatistics, rusqlite::Error> {
            let tx = conn.transaction()?;
            let (total, active): (i64, i64) = tx.query_row(
                "SELECT COUNT(*), COALESCE(SUM(CASE WHEN expires_at > ?1 THEN 1 ELSE 0 END), 0)
                 FROM secrets",
                params![now],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )?;
            let rate_limit_records: i64 = tx.query_row(
                "SELECT COUNT(*) FROM rate_limits WHERE window_start > ?1",
                params![recent_since],
                |row| row.get(0),
            )?;
            let last_cleanup_at = meta::last_cleanup_at(&tx)?;
            tx.commit()?;

            Ok(StoreStatistics {
                total_secrets: total as u64,
                active_secrets: active as u64,
                expired_secrets: (total - active) as u64,
                rate_limit_records: rate_limit_records as u64,
                last_cleanup_at,
            })
        })
        .await
        .map_err(map_tr_err)
}
