// SPDX-FileCopyrightText: 2026 Vanish Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `vanish serve`: HTTP gateway plus the periodic expiry sweeper.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};
use vanish_config::VanishConfig;
use vanish_core::VanishError;
use vanish_cron::Sweeper;
use vanish_gateway::{start_server, GatewayState};

use crate::commands::open_service;
use crate::shutdown;

/// Runs the server until SIGINT/SIGTERM, then stops the sweeper and flushes storage.
pub async fn run_serve(config: VanishConfig) -> Result<(), VanishError> {
    let service = open_service(&config).await?;
    info!(
        database = %config.storage.database_path,
        key_configured = service.encryption_info().key_configured,
        "storage initialized"
    );
    if !service.encryption_info().key_configured {
        warn!("no encryption key configured, secret creation will fail until one is set");
    }
    if config.server.admin_token.is_none() {
        info!("admin token not set, /admin endpoints are disabled");
    }

    let cancel = shutdown::install_signal_handler();

    let sweeper = Arc::new(Sweeper::new(
        Arc::clone(&service),
        Duration::from_secs(config.cleanup.interval_secs),
    ));
    let sweeper_task = sweeper.spawn(cancel.clone());
    info!(
        interval_secs = config.cleanup.interval_secs,
        "expiry sweeper started"
    );

    let state = GatewayState::new(Arc::clone(&service), &config.server);
    let served = start_server(&config.server, state, cancel.clone()).await;

    // A bind failure returns before any signal, so stop the sweeper either way.
    cancel.cancel();
    if let Err(e) = sweeper_task.await {
        warn!(error = %e, "sweeper task did not shut down cleanly");
    }
    if let Err(e) = service.shutdown().await {
        warn!(error = %e, "storage checkpoint on shutdown failed");
    }

    served?;
    info!("vanish serve shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber with the given log level.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("vanish={log_level},tower_http={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();
}
