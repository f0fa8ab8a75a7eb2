// SPDX-FileCopyrightText: 2026 Ticketdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read-only aggregation over a ticket list for the dashboard.

use serde::Serialize;
use ticketdesk_core::{Ticket, TicketStats, TicketStatus};

/// Count all, open, and resolved tickets.
pub fn summarize(tickets: &[Ticket]) -> TicketStats {
    tickets
        .iter()
        .fold(TicketStats::default(), |mut stats, ticket| {
            stats.total += 1;
            match ticket.status {
                TicketStatus::Open => stats.open += 1,
                TicketStatus::Resolved => stats.resolved += 1,
            }
            stats
        })
}

/// One summary card on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardCard {
    pub title: &'static str,
    pub value: usize,
    pub icon: &'static str,
    pub color: &'static str,
    pub bg: &'static str,
}

/// The three dashboard cards in display order.
pub fn dashboard_cards(stats: TicketStats) -> [DashboardCard; 3] {
    [
        DashboardCard {
            title: "Total Tickets",
            value: stats.total,
            icon: "ticket",
            color: "text-gray-500",
            bg: "bg-gray-100",
        },
        DashboardCard {
            title: "Open Tickets",
            value: stats.open,
            icon: "alert-circle",
            color: "text-green-600",
            bg: "bg-green-100",
        },
        DashboardCard {
            title: "Resolved Tickets",
            value: stats.resolved,
            icon: "check-circle-2",
            color: "text-gray-600",
            bg: "bg-gray-100",
        },
    ]
}
