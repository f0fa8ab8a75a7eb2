// SPDX-FileCopyrightText: 2026 Ticketdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authentication middleware for the gateway.
//!
//! Both layers expect [`session_middleware`](crate::session_layer::session_middleware)
//! to have attached a [`SessionHandle`]. API routes answer `401` with a JSON
//! body; page routes redirect to `/login`.

use axum::{
    extract::{Extension, Request},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use ticketdesk_auth::AuthGate;
use ticketdesk_session::SessionHandle;

use crate::error::ApiError;

/// Path unauthenticated page requests are sent to.
pub const LOGIN_PATH: &str = "/login";

async fn is_authenticated(session: &SessionHandle) -> bool {
    let session = session.lock().await;
    AuthGate::require_authenticated(&session).is_ok()
}

/// Reject unauthenticated API requests with `401`.
pub async fn require_api_session(
    Extension(session): Extension<SessionHandle>,
    request: Request,
    next: Next,
) -> Response {
    if !is_authenticated(&session).await {
        tracing::debug!(path = %request.uri().path(), "unauthenticated api request");
        return ApiError::from(ticketdesk_core::TicketdeskError::Unauthenticated).into_response();
    }
    next.run(request).await
}

/// Redirect unauthenticated page requests to the login page.
pub async fn require_page_session(
    Extension(session): Extension<SessionHandle>,
    request: Request,
    next: Next,
) -> Response {
    if !is_authenticated(&session).await {
        tracing::debug!(path = %request.uri().path(), "redirecting to login");
        return Redirect::to(LOGIN_PATH).into_response();
    }
    next.run(request).await
}
