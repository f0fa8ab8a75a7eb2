// SPDX-FileCopyrightText: 2026 Ticketdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Form and page endpoints: login, logout, dashboard, and the ticket form.
//!
//! Page GETs return the view model a template layer renders. Form POSTs
//! answer with `303 See Other` redirects on success.

use std::fmt::Display;
use std::str::FromStr;

use axum::{
    Form, Json,
    extract::{Extension, State, rejection::FormRejection},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Deserializer, Serialize, de};
use ticketdesk_auth::AuthGate;
use ticketdesk_core::{
    Identity, Priority, Ticket, TicketDraft, TicketId, TicketStatus, TicketdeskError,
};
use ticketdesk_session::SessionHandle;
use ticketdesk_tickets::{DashboardCard, dashboard_cards, summarize};

use crate::auth::LOGIN_PATH;
use crate::error::ApiError;
use crate::server::AppState;
use crate::session_layer::session_cookie;

/// Where a successful login lands.
pub const DASHBOARD_PATH: &str = "/dashboard";

/// Where ticket form actions land.
pub const TICKETS_PATH: &str = "/tickets";

/// Globals a template layer injects on every page.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub authenticated: bool,
    pub user: Option<Identity>,
    pub csrf_token: String,
}

/// View model for the login page.
#[derive(Debug, Serialize)]
pub struct LoginView {
    pub csrf_token: String,
    pub error: Option<String>,
}

/// Login form fields.
#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default, rename = "_csrf_token")]
    pub csrf_token: Option<String>,
}

/// View model for the dashboard.
#[derive(Debug, Serialize)]
pub struct DashboardView {
    pub user: Option<Identity>,
    pub stats: [DashboardCard; 3],
}

/// View model for the ticket list page.
#[derive(Debug, Serialize)]
pub struct TicketsView {
    pub tickets: Vec<Ticket>,
    pub csrf_token: String,
}

/// Ticket form submission (`action=create` or `action=delete`).
#[derive(Debug, Default, Deserialize)]
pub struct TicketForm {
    #[serde(default)]
    pub action: String,
    #[serde(default, rename = "_csrf_token")]
    pub csrf_token: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub status: Option<TicketStatus>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub priority: Option<Priority>,
}

/// An unselected `<select>` posts an empty value; treat it as absent.
fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.trim().is_empty() => {
            raw.trim().parse().map(Some).map_err(de::Error::custom)
        }
        _ => Ok(None),
    }
}

fn form_body<T>(form: Result<Form<T>, FormRejection>) -> Result<T, ApiError> {
    form.map(|Form(value)| value)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

/// GET /session
pub async fn get_session(Extension(session): Extension<SessionHandle>) -> Json<SessionView> {
    let session = session.lock().await;
    Json(SessionView {
        authenticated: session.is_authenticated(),
        user: session.user().cloned(),
        csrf_token: session.csrf_token().to_string(),
    })
}

/// GET /login
///
/// Already-authenticated sessions go straight to the dashboard.
pub async fn get_login(Extension(session): Extension<SessionHandle>) -> Response {
    let session = session.lock().await;
    if session.is_authenticated() {
        return Redirect::to(DASHBOARD_PATH).into_response();
    }
    Json(LoginView {
        csrf_token: session.csrf_token().to_string(),
        error: None,
    })
    .into_response()
}

/// POST /login
///
/// Token mismatch answers `403`, bad credentials `401`; neither stores
/// anything on the session. A successful login moves the session to a new
/// id and anti-forgery token and reissues the cookie.
pub async fn post_login(
    State(state): State<AppState>,
    Extension(session): Extension<SessionHandle>,
    jar: CookieJar,
    form: Result<Form<LoginForm>, FormRejection>,
) -> Result<(CookieJar, Redirect), ApiError> {
    let form = form_body(form)?;
    let mut session = session.lock().await;
    AuthGate::verify_csrf(&session, form.csrf_token.as_deref())?;

    // Argon2 verification is CPU-bound.
    let gate = state.auth.clone();
    let LoginForm {
        email, password, ..
    } = form;
    let identity = tokio::task::spawn_blocking(move || gate.authenticate(&email, &password))
        .await
        .map_err(|e| TicketdeskError::Internal(format!("login task failed: {e}")))??;

    session.set_user(identity);
    let rotated = state.sessions.rotate(&mut session)?;
    let cookie = session_cookie(&state.settings, rotated.id());
    Ok((jar.add(cookie), Redirect::to(DASHBOARD_PATH)))
}

/// GET or POST /logout
pub async fn logout(
    State(state): State<AppState>,
    Extension(session): Extension<SessionHandle>,
) -> Redirect {
    let mut session = session.lock().await;
    state.auth.logout(&mut session);
    Redirect::to(LOGIN_PATH)
}

/// GET /dashboard
pub async fn get_dashboard(
    Extension(session): Extension<SessionHandle>,
) -> Result<Json<DashboardView>, ApiError> {
    let session = session.lock().await;
    let user = AuthGate::require_authenticated(&session)?.clone();
    Ok(Json(DashboardView {
        user: Some(user),
        stats: dashboard_cards(summarize(session.tickets())),
    }))
}

/// GET /tickets
pub async fn get_tickets_page(
    Extension(session): Extension<SessionHandle>,
) -> Result<Json<TicketsView>, ApiError> {
    let session = session.lock().await;
    AuthGate::require_authenticated(&session)?;
    Ok(Json(TicketsView {
        tickets: session.tickets().to_vec(),
        csrf_token: session.csrf_token().to_string(),
    }))
}

/// POST /tickets
///
/// `create` and `delete` mutate the list; any other action is ignored. Every
/// outcome except a rejected token or invalid ticket redirects back to the list.
pub async fn post_tickets_form(
    State(state): State<AppState>,
    Extension(session): Extension<SessionHandle>,
    form: Result<Form<TicketForm>, FormRejection>,
) -> Result<Redirect, ApiError> {
    let form = form_body(form)?;
    let mut session = session.lock().await;
    AuthGate::require_authenticated(&session)?;
    AuthGate::verify_csrf(&session, form.csrf_token.as_deref())?;

    let mut repo = session.repository(state.settings.default_priority);
    match form.action.as_str() {
        "create" => {
            repo.create(TicketDraft {
                title: form.title,
                description: form.description,
                status: form.status,
                priority: form.priority,
            })?;
        }
        "delete" => {
            if let Some(id) = form.id.filter(|id| !id.trim().is_empty()) {
                repo.delete(&TicketId(id.trim().to_string()));
            }
        }
        other => {
            tracing::debug!(action = %other, "ignoring unknown ticket form action");
        }
    }

    Ok(Redirect::to(TICKETS_PATH))
}
