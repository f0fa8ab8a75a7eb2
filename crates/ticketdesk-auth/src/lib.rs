// SPDX-FileCopyrightText: 2026 Ticketdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authentication for Ticketdesk.
//!
//! - [`credentials`]: Argon2id-hashed credential table built from config.
//! - [`csrf`]: anti-forgery token comparison.
//! - [`gate`]: login, logout, and the authenticated-session check.

pub mod credentials;
pub mod csrf;
pub mod gate;

pub use credentials::{CredentialTable, hash_password};
pub use gate::AuthGate;
