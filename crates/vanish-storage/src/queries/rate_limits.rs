// SPDX-FileCopyrightText: 2026 Vanish Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rate-limit counter operations.

use rusqlite::{params, OptionalExtension, TransactionBehavior};
use vanish_core::{RateDecision, RateLimitRecord, VanishError};

use crate::database::{map_tr_err, Database};

/// Read, evaluate and write the counter for `identity_hash` in one
/// IMMEDIATE transaction so no other writer can interleave.
pub async fn check_and_record(
    db: &Database,
    identity_hash: &str,
    now: i64,
    max_requests: u32,
    window_secs: u64,
) -> Result<RateDecision, VanishError> {
    let identity_hash = identity_hash.to_string();
    db.connection()
        .call(move |conn| -> Result<RateDecision, rusqlite::Error> {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            let existing = tx
                .query_row(
                    "SELECT identity_hash, request_count, window_start
                     FROM rate_limits WHERE identity_hash = ?1",
                    params![identity_hash],
                    |row| {
                        Ok(RateLimitRecord {
                            identity_hash: row.get(0)?,
                            request_count: row.get(1)?,
                            window_start: row.get(2)?,
                        })
                    },
                )
                .optional()?;

            let (decision, next) = RateLimitRecord::evaluate(
                existing.as_ref(),
                &identity_hash,
                now,
                max_requests,
                window_secs,
            );

            if let Some(next) = next {
                tx.execute(
                    "INSERT INTO rate_limits (identity_hash, request_count, window_start)
                     VALUES (?1, ?2, ?3)
                     ON CONFLICT(identity_hash) DO UPDATE SET
                         request_count = excluded.request_count,
                         window_start = excluded.window_start",
                    params![next.identity_hash, next.request_count, next.window_start],
                )?;
            }
            tx.commit()?;

            Ok(decision)
        })
        .await
        .map_err(map_tr_err)
}

/// Delete records whose window started before `now - retention_secs`.
pub async fn delete_stale(db: &Database, now: i64, retention_secs: u64) -> Result<u64, VanishError> {
    let cutoff = now.saturating_sub(i64::try_from(retention_secs).unwrap_or(i64::MAX));
    db.connection()
        .call(move |conn| -> Result<u64, rusqlite::Error> {
            let n = conn.execute("DELETE FROM rate_limits WHERE window_start < ?1", params![cutoff])?;
            Ok(n as u64)
        })
        .await
        .map_err(map_tr_err)
}

/// Delete every record.
pub async fn delete_all(db: &Database) -> Result<u64, VanishError> {
    db.connection()
        .call(|conn| -> Result<u64, rusqlite::Error> {
            let n = conn.execute("DELETE FROM rate_limits", [])?;
            Ok(n as u64)
        })
        .await
        .map_err(map_tr_err)
}

/// Newest windows first.
pub async fn list_recent(db: &Database, limit: usize) -> Result<Vec<RateLimitRecord>, VanishError> {
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    db.connection()
        .call(move |conn| -> Result<Vec<RateLimitRecord>, rusqlite::Error> {
            let mut stmt = conn.prepare(
                "SELECT identity_hash, request_count, window_start
                 FROM rate_limits ORDER BY window_start DESC, id DESC LIMIT ?1",
            )?;
            let rows = stmt.query_map(params![limit], |row| {
                Ok(RateLimitRecord {
                    identity_hash: row.get(0)?,
                    request_count: row.get(1)?,
                    window_start: row.get(2)?,
                })
            })?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn third_request_allowed_fourth_denied() {
        let db = Database::open_in_memory().await.unwrap();
        for _ in 0..3 {
            let d = check_and_record(&db, "id", 1_000, 3, 3600).await.unwrap();
            assert!(d.is_allowed());
        }
        let d = check_and_record(&db, "id", 1_010, 3, 3600).await.unwrap();
        assert_eq!(d, RateDecision::Denied { retry_after_secs: 3590 });

        let records = list_recent(&db, 10).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].request_count, 3);
    }

    #[tokio::test]
    async fn window_expiry_resets_counter() {
        let db = Database::open_in_memory().await.unwrap();
        for _ in 0..3 {
            check_and_record(&db, "id", 1_000, 3, 3600).await.unwrap();
        }
        let d = check_and_record(&db, "id", 4_601, 3, 3600).await.unwrap();
        assert!(d.is_allowed());

        let records = list_recent(&db, 10).await.unwrap();
        assert_eq!(records[0].request_count, 1);
        assert_eq!(records[0].window_start, 4_601);
    }

    #[tokio::test]
    async fn stale_records_are_swept_by_window_start() {
        let db = Database::open_in_memory().await.unwrap();
        check_and_record(&db, "old", 100, 5, 60).await.unwrap();
        check_and_record(&db, "new", 900, 5, 60).await.unwrap();

        assert_eq!(delete_stale(&db, 1_000, 500).await.unwrap(), 1);
        let left = list_recent(&db, 10).await.unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].identity_hash, "new");
    }

    #[tokio::test]
    async fn list_orders_newest_first_and_limits() {
        let db = Database::open_in_memory().await.unwrap();
        for (i, id) in ["a", "b", "c"].iter().enumerate() {
            check_and_record(&db, id, 100 + i as i64, 5, 60).await.unwrap();
        }
        let listed = list_recent(&db, 2).await.unwrap();
        let ids: Vec<_> = listed.iter().map(|r| r.identity_hash.as_str()).collect();
        assert_eq!(ids, vec!["c", "b"]);

        assert_eq!(delete_all(&db).await.unwrap(), 3);
        assert!(list_recent(&db, 10).await.unwrap().is_empty());
    }
}
