// SPDX-FileCopyrightText: 2026 Ticketdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for Ticketdesk.
//!
//! Every browser session gets a server-side [`Session`](ticketdesk_session::Session)
//! keyed by an opaque cookie. The JSON API under `/api` and the page routes
//! share that session, so tickets created through either surface show up in
//! both.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod pages;
pub mod server;
pub mod session_layer;

pub use error::{ActionResponse, ApiError};
pub use server::{AppState, GatewaySettings, ServerConfig, build_router, start_server};
