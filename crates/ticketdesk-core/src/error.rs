// SPDX-FileCopyrightText: 2026 Ticketdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for Ticketdesk.

use thiserror::Error;

/// The primary error type shared by the repository, auth gate, and gateway.
///
/// The first six variants are request-level failures that the HTTP layer
/// turns into a user-visible message or redirect. The rest are ambient
/// startup and infrastructure errors.
#[derive(Debug, Error)]
pub enum TicketdeskError {
    /// The session carries no authenticated identity.
    #[error("authentication required")]
    Unauthenticated,

    /// A login attempt failed (unknown email or wrong password).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// A required field is missing or empty.
    #[error("validation error: {message}")]
    Validation { message: String },

    /// The referenced ticket does not exist in this session.
    #[error("ticket not found: {id}")]
    NotFound { id: String },

    /// The submitted anti-forgery token is missing or does not match.
    #[error("anti-forgery token mismatch")]
    TokenMismatch,

    /// The session store is full and no idle session could be evicted.
    #[error("session limit reached")]
    SessionLimit,

    /// Configuration errors found after loading.
    #[error("configuration error: {0}")]
    Config(String),

    /// Password hashing or hash parsing failed.
    #[error("credential error: {0}")]
    Credential(String),

    /// HTTP server errors (bind failure, serve loop failure).
    #[error("server error: {message}")]
    Server {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl TicketdeskError {
    /// Shorthand for a [`TicketdeskError::Validation`] error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_shorthand_carries_message() {
        let err = TicketdeskError::validation("title must not be empty");
        assert_eq!(
            err.to_string(),
            "validation error: title must not be empty"
        );
    }

    #[test]
    fn session_limit_message() {
        assert_eq!(
            TicketdeskError::SessionLimit.to_string(),
            "session limit reached"
        );
    }
}
