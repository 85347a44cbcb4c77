// SPDX-FileCopyrightText: 2026 Vanish Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key/value bookkeeping.

use rusqlite::{params, OptionalExtension};

/// Key under which the last expired-secret sweep time is stored.
pub const LAST_CLEANUP_KEY: &str = "last_cleanup_at";

pub(crate) fn set(conn: &rusqlite::Connection, key: &str, value: &str) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO meta (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![key, value],
    )?;
    Ok(())
}

pub(crate) fn get(conn: &rusqlite::Connection, key: &str) -> rusqlite::Result<Option<String>> {
    conn.query_row("SELECT value FROM meta WHERE key = ?1", params![key], |row| {
        row.get(0)
    })
    .optional()
}

/// Last sweep time, ignoring unparseable values.
pub(crate) fn last_cleanup_at(conn: &rusqlite::Connection) -> rusqlite::Result<Option<i64>> {
    Ok(get(conn, LAST_CLEANUP_KEY)?.and_then(|v| v.parse().ok()))
}
