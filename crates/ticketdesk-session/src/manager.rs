// SPDX-FileCopyrightText: 2026 Ticketdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session manager: owns every live session, keyed by session id.
//!
//! Sessions are created on first contact, looked up by the id the browser
//! presents, and evicted after sitting idle past the configured timeout. The
//! number of live sessions is capped; at the cap, idle sessions are swept
//! before a new one is refused.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use ticketdesk_core::{SessionId, TicketdeskError};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::session::{Session, SessionHandle};

/// Result of resolving a presented session id.
#[derive(Debug, Clone)]
pub struct Resolved {
    pub handle: SessionHandle,
    /// `true` when a new session was created and the client must be told its id.
    pub created: bool,
}

/// Owner of all server-side sessions.
#[derive(Clone)]
pub struct SessionManager {
    sessions: Arc<DashMap<SessionId, SessionHandle>>,
    idle_timeout: Duration,
    max_sessions: usize,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("sessions", &self.sessions.len())
            .field("idle_timeout", &self.idle_timeout)
            .field("max_sessions", &self.max_sessions)
            .finish()
    }
}

impl SessionManager {
    pub fn new(idle_timeout: Duration, max_sessions: usize) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            idle_timeout,
            max_sessions,
        }
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Create and register a fresh session.
    ///
    /// Fails with [`TicketdeskError::SessionLimit`] when the store is full
    /// even after evicting idle sessions.
    pub fn create(&self) -> Result<SessionHandle, TicketdeskError> {
        self.ensure_capacity()?;
        Ok(self.register(Session::new()?))
    }

    fn ensure_capacity(&self) -> Result<(), TicketdeskError> {
        if self.sessions.len() < self.max_sessions {
            return Ok(());
        }
        let evicted = self.sweep();
        if self.sessions.len() < self.max_sessions {
            debug!(evicted, "made room for a new session");
            return Ok(());
        }
        warn!(max_sessions = self.max_sessions, "session limit reached");
        Err(TicketdeskError::SessionLimit)
    }

    fn register(&self, session: Session) -> SessionHandle {
        let handle = SessionHandle::new(session);
        self.sessions.insert(handle.id().clone(), handle.clone());
        debug!(sessions = self.sessions.len(), "session created");
        handle
    }

    /// Look up a session without touching it.
    pub fn get(&self, id: &SessionId) -> Option<SessionHandle> {
        self.sessions.get(id).map(|entry| entry.value().clone())
    }

    /// Resolve the id a client presented into a live session.
    ///
    /// Unknown or expired ids get a brand new session; a known id has its idle
    /// clock reset.
    pub async fn resolve(&self, presented: Option<&str>) -> Result<Resolved, TicketdeskError> {
        if let Some(raw) = presented.filter(|raw| !raw.is_empty()) {
            let id = SessionId(raw.to_string());
            if let Some(handle) = self.get(&id) {
                let mut session = handle.lock().await;
                if !session.is_expired(self.idle_timeout) {
                    session.touch();
                    drop(session);
                    return Ok(Resolved {
                        handle,
                        created: false,
                    });
                }
                drop(session);
                self.sessions.remove(&id);
                debug!("expired session presented, issuing a new one");
            }
        }

        Ok(Resolved {
            handle: self.create()?,
            created: true,
        })
    }

    /// Destroy a session and everything it owns.
    pub fn destroy(&self, id: &SessionId) -> bool {
        self.sessions.remove(id).is_some()
    }

    /// Move `session`'s identity and tickets to a fresh id and anti-forgery
    /// token, destroying the old id.
    ///
    /// The caller holds the old session's lock; a request still holding its
    /// handle sees an empty, unauthenticated session.
    pub fn rotate(&self, session: &mut Session) -> Result<SessionHandle, TicketdeskError> {
        let mut fresh = Session::new()?;
        fresh.take_state_from(session);
        self.destroy(session.id());
        let handle = self.register(fresh);
        debug!("session id rotated");
        Ok(handle)
    }

    /// Evict idle sessions. Sessions locked by an in-flight request are kept.
    ///
    /// Returns the number of sessions evicted.
    pub fn sweep(&self) -> usize {
        let before = self.sessions.len();
        let idle_timeout = self.idle_timeout;
        self.sessions.retain(|_, handle| match handle.try_lock() {
            Some(session) => !session.is_expired(idle_timeout),
            None => true,
        });
        before.saturating_sub(self.sessions.len())
    }

    /// Run [`SessionManager::sweep`] every `interval` until `cancel` fires.
    pub fn spawn_sweeper(
        &self,
        interval: Duration,
        cancel: CancellationToken,
    ) -> tokio::task::JoinHandle<()> {
        let manager = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        debug!("session sweeper stopped");
                        break;
                    }
                    _ = ticker.tick() => {
                        let evicted = manager.sweep();
                        if evicted > 0 {
                            info!(evicted, remaining = manager.len(), "evicted idle sessions");
                        }
                    }
                }
            }
        })
    }
}
