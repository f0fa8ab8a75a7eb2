// SPDX-FileCopyrightText: 2026 Ticketdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ticket repository and stats aggregation.
//!
//! Both operate on a single session's ticket list. The repository mutates it;
//! the aggregator only reads it.

pub mod repository;
pub mod stats;

pub use repository::TicketRepository;
pub use stats::{DashboardCard, dashboard_cards, summarize};
