// SPDX-FileCopyrightText: 2026 Ticketdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use ticketdesk_auth::{AuthGate, CredentialTable};
use ticketdesk_config::TicketdeskConfig;
use ticketdesk_core::{Priority, TicketdeskError};
use ticketdesk_session::SessionManager;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

use crate::auth::{require_api_session, require_page_session};
use crate::handlers;
use crate::pages;
use crate::session_layer::session_middleware;

/// Request-handling settings (mirrors the relevant parts of `TicketdeskConfig`).
#[derive(Debug, Clone)]
pub struct GatewaySettings {
    /// Name of the session cookie.
    pub cookie_name: String,
    /// Mark the session cookie `Secure`.
    pub secure_cookie: bool,
    /// Require `X-CSRF-Token` on mutating API calls.
    pub csrf_on_api: bool,
    /// Priority for creates that omit one.
    pub default_priority: Priority,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            cookie_name: "ticketdesk_session".to_string(),
            secure_cookie: false,
            csrf_on_api: true,
            default_priority: Priority::Medium,
        }
    }
}

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Owner of all live sessions.
    pub sessions: SessionManager,
    /// Login/logout decisions.
    pub auth: AuthGate,
    /// Request-handling settings.
    pub settings: Arc<GatewaySettings>,
    /// Process start time for uptime calculation.
    pub start_time: std::time::Instant,
}

impl AppState {
    pub fn new(sessions: SessionManager, auth: AuthGate, settings: GatewaySettings) -> Self {
        Self {
            sessions,
            auth,
            settings: Arc::new(settings),
            start_time: std::time::Instant::now(),
        }
    }

    /// Build the full state from configuration, hashing the credential table.
    pub fn from_config(config: &TicketdeskConfig) -> Result<Self, TicketdeskError> {
        let credentials = CredentialTable::from_config(&config.users)?;
        let auth = AuthGate::new(Arc::new(credentials), config.tickets.discard_on_logout);
        let sessions = SessionManager::new(
            Duration::from_secs(config.session.idle_timeout_secs),
            config.session.max_sessions,
        );
        let settings = GatewaySettings {
            cookie_name: config.session.cookie_name.clone(),
            secure_cookie: config.session.secure_cookie,
            csrf_on_api: config.security.csrf_on_api,
            default_priority: config.tickets.default_priority,
        };
        Ok(Self::new(sessions, auth, settings))
    }
}

/// Gateway listener configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
}

/// Build the application router.
///
/// Routes:
/// - GET /health (public, no session)
/// - GET /session, GET|POST /login, GET|POST /logout
/// - GET /dashboard, GET|POST /tickets (login required, redirects otherwise)
/// - GET|POST|PUT|DELETE /api/tickets, GET /api/stats (login required, 401 otherwise)
pub fn build_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(handlers::get_health))
        .with_state(state.clone());

    let session_routes = Router::new()
        .route("/session", get(pages::get_session))
        .route("/login", get(pages::get_login).post(pages::post_login))
        .route("/logout", get(pages::logout).post(pages::logout))
        .with_state(state.clone());

    let page_routes = Router::new()
        .route("/dashboard", get(pages::get_dashboard))
        .route(
            "/tickets",
            get(pages::get_tickets_page).post(pages::post_tickets_form),
        )
        .route_layer(axum_middleware::from_fn(require_page_session))
        .with_state(state.clone());

    let api_routes = Router::new()
        .route(
            "/api/tickets",
            get(handlers::list_tickets)
                .post(handlers::create_ticket)
                .put(handlers::update_ticket)
                .delete(handlers::delete_ticket)
                .fallback(handlers::method_not_allowed),
        )
        .route("/api/stats", get(handlers::get_stats))
        .route_layer(axum_middleware::from_fn(require_api_session))
        .with_state(state.clone());

    let sessioned = Router::new()
        .merge(session_routes)
        .merge(page_routes)
        .merge(api_routes)
        .layer(axum_middleware::from_fn_with_state(
            state,
            session_middleware,
        ));

    Router::new()
        .merge(public_routes)
        .merge(sessioned)
        .layer(TraceLayer::new_for_http())
}

/// Start the gateway HTTP server and serve until `shutdown` fires.
pub async fn start_server(
    config: &ServerConfig,
    state: AppState,
    shutdown: CancellationToken,
) -> Result<(), TicketdeskError> {
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| TicketdeskError::Server {
            message: format!("failed to bind gateway to {addr}: {e}"),
            source: Some(Box::new(e)),
        })?;

    let local = listener
        .local_addr()
        .map(|a| a.to_string())
        .unwrap_or(addr);
    tracing::info!("Gateway server listening on {local}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| TicketdeskError::Server {
            message: format!("gateway server error: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!("Gateway server stopped");
    Ok(())
}
