// SPDX-FileCopyrightText: 2026 Ticketdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! JSON API handlers.
//!
//! Handles GET/POST/PUT/DELETE /api/tickets, GET /api/stats, GET /health.

use axum::{
    Json,
    body::Bytes,
    extract::{
        Extension, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::HeaderMap,
};
use serde::{Deserialize, Serialize};
use ticketdesk_auth::AuthGate;
use ticketdesk_core::{Ticket, TicketDraft, TicketId, TicketPatch, TicketStats};
use ticketdesk_session::{Session, SessionHandle};
use ticketdesk_tickets::summarize;

use crate::error::{ActionResponse, ApiError};
use crate::server::AppState;

/// Header carrying the anti-forgery token on API calls.
pub const CSRF_HEADER: &str = "x-csrf-token";

/// Message returned when an update or delete names no ticket.
pub const NO_ID_MESSAGE: &str = "No ID provided";

/// Response body for POST /api/tickets.
#[derive(Debug, Serialize)]
pub struct CreateResponse {
    pub success: bool,
    pub ticket: Ticket,
}

/// Request body for PUT /api/tickets: the target id plus the fields to merge.
#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(flatten)]
    pub patch: TicketPatch,
}

/// Ticket id for DELETE, from the query string or the JSON body.
#[derive(Debug, Default, Deserialize)]
pub struct DeleteTarget {
    #[serde(default)]
    pub id: Option<String>,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub sessions: usize,
}

fn non_empty_id(raw: Option<String>) -> Option<TicketId> {
    raw.map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .map(TicketId)
}

fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

/// Verify the API anti-forgery header when the gateway requires it.
fn check_api_token(
    state: &AppState,
    session: &Session,
    headers: &HeaderMap,
) -> Result<(), ApiError> {
    if !state.settings.csrf_on_api {
        return Ok(());
    }
    let submitted = headers.get(CSRF_HEADER).and_then(|v| v.to_str().ok());
    AuthGate::verify_csrf(session, submitted)?;
    Ok(())
}

/// GET /api/tickets
pub async fn list_tickets(
    Extension(session): Extension<SessionHandle>,
) -> Result<Json<Vec<Ticket>>, ApiError> {
    let session = session.lock().await;
    AuthGate::require_authenticated(&session)?;
    Ok(Json(session.tickets().to_vec()))
}

/// POST /api/tickets
pub async fn create_ticket(
    State(state): State<AppState>,
    Extension(session): Extension<SessionHandle>,
    headers: HeaderMap,
    body: Result<Json<TicketDraft>, JsonRejection>,
) -> Result<Json<CreateResponse>, ApiError> {
    let mut session = session.lock().await;
    AuthGate::require_authenticated(&session)?;
    check_api_token(&state, &session, &headers)?;
    let draft = json_body(body)?;

    let ticket = session
        .repository(state.settings.default_priority)
        .create(draft)?;
    Ok(Json(CreateResponse {
        success: true,
        ticket,
    }))
}

/// PUT /api/tickets
///
/// A body without an id is a recoverable failure (`success: false`), not an
/// HTTP error.
pub async fn update_ticket(
    State(state): State<AppState>,
    Extension(session): Extension<SessionHandle>,
    headers: HeaderMap,
    body: Result<Json<UpdateRequest>, JsonRejection>,
) -> Result<Json<ActionResponse>, ApiError> {
    let mut session = session.lock().await;
    AuthGate::require_authenticated(&session)?;
    check_api_token(&state, &session, &headers)?;
    let request = json_body(body)?;

    let Some(id) = non_empty_id(request.id) else {
        return Ok(Json(ActionResponse::failure(NO_ID_MESSAGE)));
    };

    session
        .repository(state.settings.default_priority)
        .update(&id, request.patch)?;
    Ok(Json(ActionResponse::ok()))
}

/// DELETE /api/tickets?id=...
///
/// Accepts the id from the query string or a JSON body. Deleting an unknown
/// id still succeeds.
pub async fn delete_ticket(
    State(state): State<AppState>,
    Extension(session): Extension<SessionHandle>,
    query: Result<Query<DeleteTarget>, QueryRejection>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ActionResponse>, ApiError> {
    let mut session = session.lock().await;
    AuthGate::require_authenticated(&session)?;
    check_api_token(&state, &session, &headers)?;
    let Query(query) = query.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

    let from_body = if body.iter().all(u8::is_ascii_whitespace) {
        DeleteTarget::default()
    } else {
        serde_json::from_slice::<DeleteTarget>(&body)
            .map_err(|e| ApiError::BadRequest(format!("invalid JSON body: {e}")))?
    };

    let Some(id) = non_empty_id(query.id).or_else(|| non_empty_id(from_body.id)) else {
        return Ok(Json(ActionResponse::failure(NO_ID_MESSAGE)));
    };

    session.repository(state.settings.default_priority).delete(&id);
    Ok(Json(ActionResponse::ok()))
}

/// Fallback for unsupported methods on /api/tickets.
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

/// GET /api/stats
pub async fn get_stats(
    Extension(session): Extension<SessionHandle>,
) -> Result<Json<TicketStats>, ApiError> {
    let session = session.lock().await;
    AuthGate::require_authenticated(&session)?;
    Ok(Json(summarize(session.tickets())))
}

/// GET /health
pub async fn get_health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        sessions: state.sessions.len(),
    })
}
