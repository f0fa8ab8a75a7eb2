// SPDX-FileCopyrightText: 2026 Ticketdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for Ticketdesk.
//!
//! This crate provides the domain types, the shared error type, and the trait
//! seams used throughout the workspace.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::TicketdeskError;
pub use traits::CredentialVerifier;
pub use types::{
    Identity, Priority, SessionId, Ticket, TicketDraft, TicketId, TicketPatch, TicketStats,
    TicketStatus,
};
