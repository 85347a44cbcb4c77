// SPDX-FileCopyrightText: 2026 Vanish Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for SqliteStorage through the storage traits.

use std::sync::Arc;

use tempfile::tempdir;
use vanish_config::model::StorageConfig;
use vanish_core::{
    RateLimitStore, SecretRecord, SecretStore, StorageAdapter, VanishError,
    RATE_LIMIT_RETENTION_SECS,
};
use vanish_storage::SqliteStorage;

async fn open_storage(dir: &tempfile::TempDir) -> Arc<SqliteStorage> {
    let path = dir.path().join("vanish.db");
    let storage = SqliteStorage::new(StorageConfig {
        database_path: path.to_string_lossy().into_owned(),
        wal_mode: true,
    });
    storage.initialize().await.unwrap();
    Arc::new(storage)
}

fn secret(token: &str, payload: &[u8], created_at: i64, ttl: i64) -> SecretRecord {
    SecretRecord {
        token: token.to_string(),
        ciphertext: payload.to_vec(),
        iv: vec![9; 12],
        created_at,
        expires_at: created_at + ttl,
    }
}

#[tokio::test]
async fn colliding_token_does_not_overwrite() {
    let dir = tempdir().unwrap();
    let storage = open_storage(&dir).await;
    let token = "0123456789abcdef0123456789abcdef";

    let first = secret(token, b"first", 1_000, 3600);
    let second = secret(token, b"second", 1_000, 3600);

    let (a, b) = tokio::join!(storage.put(&first), storage.put(&second));
    let outcomes = [a, b];
    assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(outcomes
        .iter()
        .any(|r| matches!(r, Err(VanishError::Storage { .. }))));

    let stored = storage.get(token, 1_001).await.unwrap().unwrap();
    assert!(stored.ciphertext == b"first" || stored.ciphertext == b"second");
    assert_eq!(storage.statistics(1_001).await.unwrap().total_secrets, 1);
}

#[tokio::test]
async fn cleanup_removes_exactly_expired_and_is_idempotent() {
    let dir = tempdir().unwrap();
    let storage = open_storage(&dir).await;

    storage.put(&secret(&"1".repeat(32), b"a", 0, 100)).await.unwrap();
    storage.put(&secret(&"2".repeat(32), b"b", 0, 200)).await.unwrap();
    storage.put(&secret(&"3".repeat(32), b"c", 0, 300)).await.unwrap();

    // expires_at <= now is swept; the boundary record at 200 goes too.
    assert_eq!(storage.cleanup_expired(200).await.unwrap(), 2);
    assert_eq!(storage.cleanup_expired(200).await.unwrap(), 0);

    assert!(storage.get(&"3".repeat(32), 200).await.unwrap().is_some());
    let stats = storage.statistics(200).await.unwrap();
    assert_eq!(stats.total_secrets, 1);
    assert_eq!(stats.active_secrets, 1);
    assert_eq!(stats.last_cleanup_at, Some(200));
}

#[tokio::test]
async fn concurrent_checks_never_exceed_limit() {
    let dir = tempdir().unwrap();
    let storage = open_storage(&dir).await;

    let mut handles = Vec::new();
    for _ in 0..20 {
        let storage = Arc::clone(&storage);
        handles.push(tokio::spawn(async move {
            storage
                .check_and_record("same-client", 5_000, 3, 3600)
                .await
                .unwrap()
        }));
    }

    let mut allowed = 0;
    for handle in handles {
        if handle.await.unwrap().is_allowed() {
            allowed += 1;
        }
    }
    assert_eq!(allowed, 3);
}

#[tokio::test]
async fn huge_window_denies_and_keeps_connection_usable() {
    let dir = tempdir().unwrap();
    let storage = open_storage(&dir).await;

    for window_secs in [i64::MAX as u64, u64::MAX] {
        let client = format!("client-{window_secs}");
        let mut allowed = 0;
        for _ in 0..6 {
            if storage
                .check_and_record(&client, 5_000, 3, window_secs)
                .await
                .unwrap()
                .is_allowed()
            {
                allowed += 1;
            }
        }
        assert_eq!(allowed, 3);
    }

    let other = storage
        .check_and_record("unrelated", 5_000, 3, 60)
        .await
        .unwrap();
    assert!(other.is_allowed());
    assert_eq!(storage.statistics(5_000).await.unwrap().total_secrets, 0);
}

#[tokio::test]
async fn rate_limit_retention_and_statistics() {
    let dir = tempdir().unwrap();
    let storage = open_storage(&dir).await;
    let week = RATE_LIMIT_RETENTION_SECS as i64;
    let now = 10 * week;

    storage.check_and_record("ancient", now - week - 1, 5, 60).await.unwrap();
    storage.check_and_record("recent", now - 10, 5, 60).await.unwrap();

    assert_eq!(storage.statistics(now).await.unwrap().rate_limit_records, 1);
    assert_eq!(
        storage
            .cleanup_rate_limits(now, RATE_LIMIT_RETENTION_SECS)
            .await
            .unwrap(),
        1
    );
    assert!(storage.clear_rate_limits().await.unwrap());
    assert!(storage.list_rate_limits(50).await.unwrap().is_empty());
}

#[tokio::test]
async fn data_survives_reopen() {
    let dir = tempdir().unwrap();
    let token = "abcdefabcdefabcdefabcdefabcdef12";
    {
        let storage = open_storage(&dir).await;
        storage.put(&secret(token, b"persisted", 0, 1_000)).await.unwrap();
        storage.close().await.unwrap();
    }
    let storage = open_storage(&dir).await;
    let found = storage.get(token, 10).await.unwrap().unwrap();
    assert_eq!(found.ciphertext, b"persisted");
}
