// SPDX-FileCopyrightText: 2026 Ticketdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `ticketdesk serve` implementation.
//!
//! Builds the credential table and session store from config, starts the
//! idle-session sweeper, and runs the gateway until SIGINT/SIGTERM.

use std::time::Duration;

use ticketdesk_config::TicketdeskConfig;
use ticketdesk_core::TicketdeskError;
use ticketdesk_gateway::{AppState, ServerConfig, start_server};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Runs the server until a shutdown signal arrives.
pub async fn run_serve(config: TicketdeskConfig) -> Result<(), TicketdeskError> {
    init_tracing(&config.server.log_level);

    info!(
        host = %config.server.host,
        port = config.server.port,
        users = config.users.len(),
        "starting ticketdesk"
    );

    let state = AppState::from_config(&config)?;
    let cancel = install_signal_handler();

    let sweeper = state.sessions.spawn_sweeper(
        Duration::from_secs(config.session.sweep_interval_secs),
        cancel.clone(),
    );
    info!(
        idle_timeout_secs = config.session.idle_timeout_secs,
        sweep_interval_secs = config.session.sweep_interval_secs,
        "session sweeper started"
    );

    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
    };
    let result = start_server(&server_config, state, cancel.clone()).await;

    // Stop the sweeper even when the server exits on its own.
    cancel.cancel();
    if let Err(e) = sweeper.await {
        warn!(error = %e, "session sweeper task ended abnormally");
    }

    result?;
    info!("ticketdesk serve shutdown complete");
    Ok(())
}

/// Cancel the returned token on SIGINT or SIGTERM.
fn install_signal_handler() -> CancellationToken {
    let token = CancellationToken::new();
    let token_clone = token.clone();

    tokio::spawn(async move {
        let ctrl_c = tokio::signal::ctrl_c();

        #[cfg(unix)]
        {
            use tokio::signal::unix::{SignalKind, signal};
            match signal(SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    tokio::select! {
                        _ = ctrl_c => {
                            info!("received SIGINT (Ctrl+C), initiating shutdown");
                        }
                        _ = sigterm.recv() => {
                            info!("received SIGTERM, initiating shutdown");
                        }
                    }
                }
                Err(e) => {
                    warn!(error = %e, "failed to install SIGTERM handler, using Ctrl+C only");
                    let _ = ctrl_c.await;
                    info!("received SIGINT (Ctrl+C), initiating shutdown");
                }
            }
        }

        #[cfg(not(unix))]
        {
            let _ = ctrl_c.await;
            info!("received Ctrl+C, initiating shutdown");
        }

        token_clone.cancel();
        debug!("shutdown signal handler completed");
    });

    token
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("ticketdesk={log_level},warn")));

    // try_init: a subscriber may already be installed (tests).
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .try_init();
}
