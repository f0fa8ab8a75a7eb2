// SPDX-FileCopyrightText: 2026 Ticketdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Server-side session storage.
//!
//! Each browser session owns a [`Session`] behind a [`SessionHandle`]. The
//! [`SessionManager`] is the only owner of the id-to-session map; request
//! handlers receive a handle and never look sessions up themselves.

pub mod manager;
pub mod session;

pub use manager::{Resolved, SessionManager};
pub use session::{Session, SessionHandle, generate_token};
