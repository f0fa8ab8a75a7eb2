// SPDX-FileCopyrightText: 2026 Ticketdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The auth gate: login, logout, and the authenticated-session check.
//!
//! The gate decides; redirecting to the login page or re-rendering the form
//! is the HTTP layer's job.

use std::sync::Arc;

use ticketdesk_core::{CredentialVerifier, Identity, TicketdeskError};
use ticketdesk_session::Session;
use tracing::{info, warn};

use crate::csrf;

/// Authentication decisions for a session.
#[derive(Clone)]
pub struct AuthGate {
    credentials: Arc<dyn CredentialVerifier>,
    discard_on_logout: bool,
}

impl std::fmt::Debug for AuthGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthGate")
            .field("accounts", &self.credentials.len())
            .field("discard_on_logout", &self.discard_on_logout)
            .finish()
    }
}

impl AuthGate {
    /// `discard_on_logout` controls whether logging out also drops the
    /// session's tickets.
    pub fn new(credentials: Arc<dyn CredentialVerifier>, discard_on_logout: bool) -> Self {
        Self {
            credentials,
            discard_on_logout,
        }
    }

    /// Check credentials against the table.
    pub fn authenticate(&self, email: &str, password: &str) -> Result<Identity, TicketdeskError> {
        match self.credentials.verify(email, password) {
            Ok(identity) => {
                info!(email = %identity.email, "login succeeded");
                Ok(identity)
            }
            Err(e) => {
                warn!(email = %email.trim(), "login failed");
                Err(e)
            }
        }
    }

    /// Authenticate and, on success, store the identity on the session.
    pub fn login(
        &self,
        session: &mut Session,
        email: &str,
        password: &str,
    ) -> Result<Identity, TicketdeskError> {
        let identity = self.authenticate(email, password)?;
        session.set_user(identity.clone());
        Ok(identity)
    }

    /// The session's identity, or [`TicketdeskError::Unauthenticated`].
    pub fn require_authenticated(session: &Session) -> Result<&Identity, TicketdeskError> {
        session.user().ok_or(TicketdeskError::Unauthenticated)
    }

    /// Clear the session's identity; drop its tickets only when configured to.
    pub fn logout(&self, session: &mut Session) -> Option<Identity> {
        let previous = session.clear_user();
        if self.discard_on_logout {
            session.clear_tickets();
        }
        if let Some(identity) = &previous {
            info!(
                email = %identity.email,
                tickets_discarded = self.discard_on_logout,
                "logged out"
            );
        }
        previous
    }

    /// Check a submitted anti-forgery token against the session's token.
    pub fn verify_csrf(session: &Session, submitted: Option<&str>) -> Result<(), TicketdeskError> {
        csrf::verify_token(session.csrf_token(), submitted)
    }
}
