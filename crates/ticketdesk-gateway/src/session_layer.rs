// SPDX-FileCopyrightText: 2026 Ticketdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session cookie middleware.
//!
//! Resolves the session cookie into a [`SessionHandle`] request extension,
//! creating a session on first contact and setting the cookie on the way out.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use ticketdesk_core::SessionId;

use crate::error::ApiError;
use crate::server::{AppState, GatewaySettings};

/// Build the session cookie for `id`.
pub fn session_cookie(settings: &GatewaySettings, id: &SessionId) -> Cookie<'static> {
    Cookie::build((settings.cookie_name.clone(), id.0.clone()))
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(settings.secure_cookie)
        .path("/")
        .build()
}

/// Attach the caller's session to the request.
pub async fn session_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let presented = jar
        .get(&state.settings.cookie_name)
        .map(|cookie| cookie.value().to_string());

    let resolved = match state.sessions.resolve(presented.as_deref()).await {
        Ok(resolved) => resolved,
        Err(e) => return ApiError::from(e).into_response(),
    };

    request.extensions_mut().insert(resolved.handle.clone());
    let response = next.run(request).await;

    if resolved.created {
        let cookie = session_cookie(&state.settings, resolved.handle.id());
        (jar.add(cookie), response).into_response()
    } else {
        response
    }
}
