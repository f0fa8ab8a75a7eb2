// SPDX-FileCopyrightText: 2026 Ticketdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Anti-forgery token verification.

use subtle::ConstantTimeEq;
use ticketdesk_core::TicketdeskError;

/// Check a submitted token against the session's token.
///
/// A missing or empty submission is a mismatch.
pub fn verify_token(expected: &str, submitted: Option<&str>) -> Result<(), TicketdeskError> {
    match submitted {
        Some(token)
            if !token.is_empty() && bool::from(expected.as_bytes().ct_eq(token.as_bytes())) =>
        {
            Ok(())
        }
        _ => Err(TicketdeskError::TokenMismatch),
    }
}
