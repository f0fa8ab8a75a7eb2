// SPDX-FileCopyrightText: 2026 Ticketdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! CRUD operations over one session's ticket list.
//!
//! A [`TicketRepository`] borrows the list mutably for the duration of a
//! request. The caller holds the session lock while the borrow is alive, so
//! operations on one session are serialized.

use chrono::Utc;
use ticketdesk_core::{
    Priority, Ticket, TicketDraft, TicketId, TicketPatch, TicketStatus, TicketdeskError,
};
use tracing::debug;

/// Repository view over a session's tickets, in insertion order.
#[derive(Debug)]
pub struct TicketRepository<'a> {
    tickets: &'a mut Vec<Ticket>,
    default_priority: Priority,
}

impl<'a> TicketRepository<'a> {
    /// Wrap a ticket list, applying `default_priority` to creates that omit one.
    pub fn new(tickets: &'a mut Vec<Ticket>, default_priority: Priority) -> Self {
        Self {
            tickets,
            default_priority,
        }
    }

    /// All tickets, insertion order, no filtering.
    pub fn list(&self) -> &[Ticket] {
        self.tickets.as_slice()
    }

    pub fn get(&self, id: &TicketId) -> Option<&Ticket> {
        self.tickets.iter().find(|t| &t.id == id)
    }

    /// Create and append a ticket.
    ///
    /// Title and description are trimmed. A title that is missing or trims
    /// to nothing is rejected with [`TicketdeskError::Validation`].
    pub fn create(&mut self, draft: TicketDraft) -> Result<Ticket, TicketdeskError> {
        let title = normalize_title(draft.title.as_deref().unwrap_or_default())?;

        let mut id = TicketId::generate();
        while self.get(&id).is_some() {
            id = TicketId::generate();
        }

        let ticket = Ticket {
            id,
            title,
            description: draft.description.as_deref().unwrap_or_default().trim().to_string(),
            status: draft.status.unwrap_or(TicketStatus::Open),
            priority: draft.priority.unwrap_or(self.default_priority),
            created_at: Utc::now(),
        };

        debug!(ticket_id = %ticket.id, priority = %ticket.priority, "ticket created");
        self.tickets.push(ticket.clone());
        Ok(ticket)
    }

    /// Merge `patch` onto the ticket with `id`.
    ///
    /// Fields absent from the patch keep their values. The id is never
    /// touched. The patch is validated before anything is written, so a
    /// rejected patch leaves the ticket unchanged.
    pub fn update(&mut self, id: &TicketId, patch: TicketPatch) -> Result<(), TicketdeskError> {
        let title = patch.title.as_deref().map(normalize_title).transpose()?;

        let ticket = self
            .tickets
            .iter_mut()
            .find(|t| &t.id == id)
            .ok_or_else(|| TicketdeskError::NotFound { id: id.to_string() })?;

        if let Some(title) = title {
            ticket.title = title;
        }
        if let Some(description) = patch.description {
            ticket.description = description.trim().to_string();
        }
        if let Some(status) = patch.status {
            ticket.status = status;
        }
        if let Some(priority) = patch.priority {
            ticket.priority = priority;
        }

        debug!(ticket_id = %id, status = %ticket.status, "ticket updated");
        Ok(())
    }

    /// Remove the ticket with `id`.
    ///
    /// Deleting an absent id is a successful no-op. Returns whether a ticket
    /// was removed. Survivors keep their relative order.
    pub fn delete(&mut self, id: &TicketId) -> bool {
        let before = self.tickets.len();
        self.tickets.retain(|t| &t.id != id);
        let removed = self.tickets.len() != before;
        debug!(ticket_id = %id, removed, "ticket delete");
        removed
    }
}

fn normalize_title(raw: &str) -> Result<String, TicketdeskError> {
    let title = raw.trim();
    if title.is_empty() {
        return Err(TicketdeskError::validation("title must not be empty"));
    }
    Ok(title.to_string())
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use proptest::prelude::*;

    use super::*;

    fn draft(title: &str) -> TicketDraft {
        TicketDraft {
            title: Some(title.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn create_applies_defaults_and_trims() {
        let mut tickets = Vec::new();
        let mut repo = TicketRepository::new(&mut tickets, Priority::Medium);
        let ticket = repo
            .create(TicketDraft {
                title: Some("  Printer jam \n".into()),
                description: Some("  third floor  ".into()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(ticket.title, "Printer jam");
        assert_eq!(ticket.description, "third floor");
        assert_eq!(ticket.status, TicketStatus::Open);
        assert_eq!(ticket.priority, Priority::Medium);
        assert_eq!(repo.list(), std::slice::from_ref(&ticket));
    }

    #[test]
    fn create_uses_configured_default_priority() {
        let mut tickets = Vec::new();
        let mut repo = TicketRepository::new(&mut tickets, Priority::Low);
        let ticket = repo.create(draft("VPN down")).unwrap();
        assert_eq!(ticket.priority, Priority::Low);
    }

    #[test]
    fn create_honours_explicit_status_and_priority() {
        let mut tickets = Vec::new();
        let mut repo = TicketRepository::new(&mut tickets, Priority::Medium);
        let ticket = repo
            .create(TicketDraft {
                title: Some("Old issue".into()),
                status: Some(TicketStatus::Resolved),
                priority: Some(Priority::High),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(ticket.status, TicketStatus::Resolved);
        assert_eq!(ticket.priority, Priority::High);
    }

    #[test]
    fn create_rejects_missing_or_blank_title() {
        let mut tickets = Vec::new();
        let mut repo = TicketRepository::new(&mut tickets, Priority::Medium);
        assert!(matches!(
            repo.create(TicketDraft::default()),
            Err(TicketdeskError::Validation { .. })
        ));
        assert!(matches!(
            repo.create(draft("   ")),
            Err(TicketdeskError::Validation { .. })
        ));
        assert!(repo.list().is_empty());
    }

    #[test]
    fn update_merges_only_named_fields() {
        let mut tickets = Vec::new();
        let mut repo = TicketRepository::new(&mut tickets, Priority::Medium);
        let original = repo
            .create(TicketDraft {
                title: Some("Printer jam".into()),
                description: Some("tray 2".into()),
                priority: Some(Priority::High),
                ..Default::default()
            })
            .unwrap();

        repo.update(
            &original.id,
            TicketPatch {
                status: Some(TicketStatus::Resolved),
                ..Default::default()
            },
        )
        .unwrap();

        let updated = repo.get(&original.id).unwrap();
        assert_eq!(updated.id, original.id);
        assert_eq!(updated.status, TicketStatus::Resolved);
        assert_eq!(updated.title, original.title);
        assert_eq!(updated.description, original.description);
        assert_eq!(updated.priority, original.priority);
        assert_eq!(updated.created_at, original.created_at);
    }

    #[test]
    fn update_unknown_id_is_not_found() {
        let mut tickets = Vec::new();
        let mut repo = TicketRepository::new(&mut tickets, Priority::Medium);
        let err = repo
            .update(&TicketId::from("missing"), TicketPatch::default())
            .unwrap_err();
        assert!(matches!(err, TicketdeskError::NotFound { id } if id == "missing"));
    }

    #[test]
    fn update_with_blank_title_leaves_ticket_untouched() {
        let mut tickets = Vec::new();
        let mut repo = TicketRepository::new(&mut tickets, Priority::Medium);
        let ticket = repo.create(draft("Printer jam")).unwrap();
        let err = repo
            .update(
                &ticket.id,
                TicketPatch {
                    title: Some(" ".into()),
                    status: Some(TicketStatus::Resolved),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, TicketdeskError::Validation { .. }));
        assert_eq!(repo.get(&ticket.id), Some(&ticket));
    }

    #[test]
    fn delete_absent_id_is_noop() {
        let mut tickets = Vec::new();
        let mut repo = TicketRepository::new(&mut tickets, Priority::Medium);
        repo.create(draft("a")).unwrap();
        let snapshot = repo.list().to_vec();
        assert!(!repo.delete(&TicketId::from("nope")));
        assert_eq!(repo.list(), snapshot.as_slice());
    }

    #[test]
    fn delete_preserves_survivor_order() {
        let mut tickets = Vec::new();
        let mut repo = TicketRepository::new(&mut tickets, Priority::Medium);
        let a = repo.create(draft("a")).unwrap();
        let b = repo.create(draft("b")).unwrap();
        let c = repo.create(draft("c")).unwrap();
        assert!(repo.delete(&b.id));
        let titles: Vec<_> = repo.list().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["a", "c"]);
        assert!(repo.get(&a.id).is_some());
        assert!(repo.get(&c.id).is_some());
    }

    proptest! {
        #[test]
        fn creates_yield_unique_ids_in_creation_order(
            titles in proptest::collection::vec("[a-zA-Z][a-zA-Z0-9 ]{0,20}", 0..40)
        ) {
            let mut tickets = Vec::new();
            let mut repo = TicketRepository::new(&mut tickets, Priority::Medium);
            for title in &titles {
                repo.create(draft(title)).unwrap();
            }

            let ids: HashSet<_> = repo.list().iter().map(|t| t.id.clone()).collect();
            prop_assert_eq!(ids.len(), titles.len());

            let listed: Vec<_> = repo.list().iter().map(|t| t.title.clone()).collect();
            let expected: Vec<_> = titles.iter().map(|t| t.trim().to_string()).collect();
            prop_assert_eq!(listed, expected);
        }
    }
}
