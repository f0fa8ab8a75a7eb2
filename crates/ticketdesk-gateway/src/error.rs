// SPDX-FileCopyrightText: 2026 Ticketdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mapping from domain errors to HTTP responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use ticketdesk_core::TicketdeskError;

/// Message shown for a failed login.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid credentials. Please try again.";

/// Message shown for an anti-forgery token mismatch.
pub const INVALID_TOKEN_MESSAGE: &str = "Invalid CSRF token.";

/// Message shown when no new session can be created.
pub const SESSION_LIMIT_MESSAGE: &str = "Too many active sessions. Try again later.";

/// `{success, message}` body used by every failure and by bare successes.
#[derive(Debug, Serialize)]
pub struct ActionResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ActionResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}

/// An error returned from a handler.
#[derive(Debug)]
pub enum ApiError {
    /// A domain or infrastructure error.
    Domain(TicketdeskError),
    /// Unparseable request body or form.
    BadRequest(String),
    /// Unsupported method on a known route.
    MethodNotAllowed,
}

impl From<TicketdeskError> for ApiError {
    fn from(err: TicketdeskError) -> Self {
        ApiError::Domain(err)
    }
}

impl ApiError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            ApiError::BadRequest(detail) => (StatusCode::BAD_REQUEST, detail.clone()),
            ApiError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                "Method not allowed".to_string(),
            ),
            ApiError::Domain(err) => match err {
                TicketdeskError::Unauthenticated => (
                    StatusCode::UNAUTHORIZED,
                    "Authentication required".to_string(),
                ),
                TicketdeskError::InvalidCredentials => (
                    StatusCode::UNAUTHORIZED,
                    INVALID_CREDENTIALS_MESSAGE.to_string(),
                ),
                TicketdeskError::Validation { message } => {
                    (StatusCode::UNPROCESSABLE_ENTITY, message.clone())
                }
                TicketdeskError::NotFound { .. } => {
                    (StatusCode::NOT_FOUND, "Ticket not found".to_string())
                }
                TicketdeskError::TokenMismatch => {
                    (StatusCode::FORBIDDEN, INVALID_TOKEN_MESSAGE.to_string())
                }
                TicketdeskError::SessionLimit => (
                    StatusCode::SERVICE_UNAVAILABLE,
                    SESSION_LIMIT_MESSAGE.to_string(),
                ),
                other => {
                    tracing::error!(error = %other, "request failed");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Internal server error".to_string(),
                    )
                }
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        (status, Json(ActionResponse::failure(message))).into_response()
    }
}
