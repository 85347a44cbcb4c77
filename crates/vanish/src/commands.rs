// SPDX-FileCopyrightText: 2026 Vanish Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One-shot maintenance commands: `cleanup`, `stats`, `generate-key`
//! and `clear-rate-limits`.

use std::io::IsTerminal;
use std::sync::Arc;

use serde::Serialize;
use vanish_config::VanishConfig;
use vanish_core::clock::format_timestamp;
use vanish_core::{StorageAdapter, StoreStatistics, SystemClock, VanishError};
use vanish_engine::{EngineSettings, SecretService};
use vanish_ratelimit::IdentityHasher;
use vanish_storage::SqliteStorage;

/// Open storage and wire a [`SecretService`] over it using the system clock.
pub async fn open_service(config: &VanishConfig) -> Result<Arc<SecretService>, VanishError> {
    let storage = Arc::new(SqliteStorage::new(config.storage.clone()));
    storage.initialize().await?;

    let hasher = IdentityHasher::new(config.rate_limit.identity_salt.as_deref())?;
    Ok(Arc::new(SecretService::new(
        storage,
        hasher,
        Arc::new(SystemClock),
        EngineSettings::from_config(config),
    )))
}

/// Structured statistics output for `--json` mode.
#[derive(Debug, Serialize)]
pub struct StatsOutput {
    #[serde(flatten)]
    pub stats: StoreStatistics,
    pub last_cleanup: String,
    pub database_path: String,
}

/// Run `vanish cleanup`.
pub async fn run_cleanup(config: &VanishConfig) -> Result<(), VanishError> {
    let service = open_service(config).await?;
    let report = service.cleanup().await?;
    service.shutdown().await?;

    println!(
        "Removed {} expired secret(s) and {} stale rate-limit record(s) at {}.",
        report.secrets_deleted,
        report.rate_limits_deleted,
        format_timestamp(report.timestamp)
    );
    Ok(())
}

/// Run `vanish stats`.
pub async fn run_stats(config: &VanishConfig, json: bool, plain: bool) -> Result<(), VanishError> {
    let service = open_service(config).await?;
    let stats = service.statistics().await?;
    service.shutdown().await?;

    let output = StatsOutput {
        last_cleanup: stats
            .last_cleanup_at
            .map(format_timestamp)
            .unwrap_or_else(|| "Never".to_string()),
        stats,
        database_path: config.storage.database_path.clone(),
    };

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
        );
    } else {
        let use_color = !plain && std::io::stdout().is_terminal();
        print_stats(&output, use_color);
    }
    Ok(())
}

fn print_stats(output: &StatsOutput, use_color: bool) {
    let stats = &output.stats;
    println!();
    println!("  vanish stats");
    println!("  {}", "-".repeat(35));

    if use_color {
        use colored::Colorize;
        println!("    Active:       {}", stats.active_secrets.to_string().green());
        println!("    Expired:      {}", stats.expired_secrets.to_string().yellow());
    } else {
        println!("    Active:       {}", stats.active_secrets);
        println!("    Expired:      {}", stats.expired_secrets);
    }
    println!("    Total:        {}", stats.total_secrets);
    println!("    Rate limits:  {}", stats.rate_limit_records);
    println!("    Last cleanup: {}", output.last_cleanup);
    println!("    Database:     {}", output.database_path);
    println!();
}

/// Run `vanish generate-key`.
pub fn run_generate_key() -> Result<(), VanishError> {
    let key = vanish_crypto::generate_key()?;
    println!("{key}");
    if std::io::stderr().is_terminal() {
        eprintln!();
        eprintln!("Set it as `[encryption] key` in vanish.toml or VANISH_ENCRYPTION_KEY.");
        eprintln!("Changing the key makes every stored secret unreadable.");
    }
    Ok(())
}

/// Run `vanish clear-rate-limits`.
pub async fn run_clear_rate_limits(config: &VanishConfig) -> Result<(), VanishError> {
    let service = open_service(config).await?;
    service.clear_rate_limits().await?;
    service.shutdown().await?;
    println!("All rate-limit records cleared.");
    Ok(())
}
