// SPDX-FileCopyrightText: 2026 Ticketdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-session state: identity, anti-forgery token, and the ticket list.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use ring::rand::{SecureRandom, SystemRandom};
use ticketdesk_core::{Identity, Priority, SessionId, Ticket, TicketdeskError};
use ticketdesk_tickets::TicketRepository;
use tokio::sync::{Mutex, MutexGuard};

/// Number of random bytes behind session ids and anti-forgery tokens.
const TOKEN_BYTES: usize = 32;

/// Generate a hex-encoded random token (64 characters).
pub fn generate_token() -> Result<String, TicketdeskError> {
    let rng = SystemRandom::new();
    let mut bytes = [0u8; TOKEN_BYTES];
    rng.fill(&mut bytes)
        .map_err(|_| TicketdeskError::Internal("failed to generate random token".to_string()))?;
    Ok(hex::encode(bytes))
}

/// State owned by one browser session.
///
/// Identity and ticket data have separate lifetimes: clearing the user does
/// not touch the tickets.
pub struct Session {
    id: SessionId,
    user: Option<Identity>,
    tickets: Vec<Ticket>,
    csrf_token: String,
    created_at: DateTime<Utc>,
    last_seen: Instant,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &"[redacted]")
            .field("user", &self.user)
            .field("tickets", &self.tickets.len())
            .field("csrf_token", &"[redacted]")
            .field("created_at", &self.created_at)
            .finish()
    }
}

impl Session {
    /// Create an empty, unauthenticated session with fresh id and token.
    pub fn new() -> Result<Self, TicketdeskError> {
        Ok(Self {
            id: SessionId(generate_token()?),
            user: None,
            tickets: Vec::new(),
            csrf_token: generate_token()?,
            created_at: Utc::now(),
            last_seen: Instant::now(),
        })
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn user(&self) -> Option<&Identity> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn set_user(&mut self, identity: Identity) {
        self.user = Some(identity);
    }

    /// Clear the identity, returning the previous one.
    pub fn clear_user(&mut self) -> Option<Identity> {
        self.user.take()
    }

    pub fn csrf_token(&self) -> &str {
        &self.csrf_token
    }

    pub fn tickets(&self) -> &[Ticket] {
        &self.tickets
    }

    /// Drop every ticket owned by this session.
    pub fn clear_tickets(&mut self) {
        self.tickets.clear();
    }

    /// Repository view over this session's tickets.
    pub fn repository(&mut self, default_priority: Priority) -> TicketRepository<'_> {
        TicketRepository::new(&mut self.tickets, default_priority)
    }

    /// Move identity and tickets out of `old`, leaving it empty.
    pub(crate) fn take_state_from(&mut self, old: &mut Session) {
        self.user = old.user.take();
        self.tickets = std::mem::take(&mut old.tickets);
    }

    pub fn touch(&mut self) {
        self.last_seen = Instant::now();
    }

    pub fn is_expired(&self, idle_timeout: Duration) -> bool {
        self.last_seen.elapsed() >= idle_timeout
    }
}

/// Shared handle to a session's state.
///
/// Cloning is cheap. All access goes through [`SessionHandle::lock`], which
/// serializes concurrent requests against the same session.
#[derive(Clone)]
pub struct SessionHandle {
    id: SessionId,
    inner: Arc<Mutex<Session>>,
}

impl std::fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHandle").finish_non_exhaustive()
    }
}

impl SessionHandle {
    pub(crate) fn new(session: Session) -> Self {
        Self {
            id: session.id.clone(),
            inner: Arc::new(Mutex::new(session)),
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Lock the session for the duration of one operation.
    pub async fn lock(&self) -> MutexGuard<'_, Session> {
        self.inner.lock().await
    }

    pub(crate) fn try_lock(&self) -> Option<MutexGuard<'_, Session>> {
        self.inner.try_lock().ok()
    }
}

#[cfg(test)]
mod tests {
    use ticketdesk_core::TicketDraft;

    use super::*;

    #[test]
    fn token_is_64_hex_chars() {
        let token = generate_token().unwrap();
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(token, generate_token().unwrap());
    }

    #[test]
    fn new_session_is_empty_and_unauthenticated() {
        let session = Session::new().unwrap();
        assert!(!session.is_authenticated());
        assert!(session.tickets().is_empty());
        assert_ne!(session.id().0, session.csrf_token());
    }

    #[test]
    fn clearing_user_keeps_tickets() {
        let mut session = Session::new().unwrap();
        session.set_user(Identity {
            email: "test@ticketapp.dev".into(),
            name: "Test User".into(),
        });
        session
            .repository(Priority::Medium)
            .create(TicketDraft {
                title: Some("Printer jam".into()),
                ..Default::default()
            })
            .unwrap();

        let previous = session.clear_user();
        assert_eq!(previous.map(|u| u.email).as_deref(), Some("test@ticketapp.dev"));
        assert!(!session.is_authenticated());
        assert_eq!(session.tickets().len(), 1);
    }

    #[test]
    fn debug_redacts_token_and_id() {
        let session = Session::new().unwrap();
        let debug = format!("{session:?}");
        assert!(!debug.contains(session.csrf_token()));
        assert!(!debug.contains(&session.id().0));
    }

    #[test]
    fn zero_timeout_is_always_expired() {
        let session = Session::new().unwrap();
        assert!(session.is_expired(Duration::ZERO));
        assert!(!session.is_expired(Duration::from_secs(3600)));
    }
}
