// SPDX-FileCopyrightText: 2026 Ticketdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credential verification trait for the login flow.

use crate::error::TicketdeskError;
use crate::types::Identity;

/// Resolves submitted login credentials to an identity.
///
/// Implementations must return [`TicketdeskError::InvalidCredentials`] for
/// both unknown emails and wrong passwords so callers cannot tell them apart.
pub trait CredentialVerifier: Send + Sync {
    /// Verify `email`/`password` and return the matching identity.
    fn verify(&self, email: &str, password: &str) -> Result<Identity, TicketdeskError>;

    /// Number of known accounts.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
