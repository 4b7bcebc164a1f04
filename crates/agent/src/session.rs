//! Per-sender session bookkeeping.
//!
//! Session state is advisory: nothing in the agent is gated on it, but it is
//! tracked so callers can observe where a correspondent is in the lifecycle.

use std::{collections::HashMap, sync::Arc, time::Duration, time::Instant};

use serde::Serialize;
use tokio::sync::Mutex;
use tracing::debug;

const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(3_600);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    NoSession,
    Active,
    Ended,
}

#[derive(Debug, Clone, Copy)]
struct SessionEntry {
    state: SessionState,
    last_seen: Instant,
}

impl SessionEntry {
    fn new(now: Instant) -> Self {
        Self {
            state: SessionState::NoSession,
            last_seen: now,
        }
    }
}

/// Sender identity to session state, evicting entries idle for longer than the TTL.
#[derive(Clone)]
pub struct SessionRegistry {
    inner: Arc<Mutex<HashMap<String, SessionEntry>>>,
    ttl: Duration,
}

impl SessionRegistry {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
            ttl,
        }
    }

    /// Registers contact from `sender`, creating a `NoSession` entry on first sight.
    pub async fn touch(&self, sender: &str) -> SessionState {
        self.update(sender, |state| state).await
    }

    /// Opens (or re-opens) the sender's session.
    pub async fn start(&self, sender: &str) -> SessionState {
        self.update(sender, |_| SessionState::Active).await
    }

    /// Closes an active session. Other states are left untouched.
    pub async fn end(&self, sender: &str) -> SessionState {
        self.update(sender, |state| match state {
            SessionState::Active => SessionState::Ended,
            other => other,
        })
        .await
    }

    pub async fn state(&self, sender: &str) -> SessionState {
        let mut guard = self.inner.lock().await;
        Self::prune(&mut guard, self.ttl);
        guard
            .get(sender)
            .map(|entry| entry.state)
            .unwrap_or(SessionState::NoSession)
    }

    pub async fn len(&self) -> usize {
        let mut guard = self.inner.lock().await;
        Self::prune(&mut guard, self.ttl);
        guard.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    async fn update<F>(&self, sender: &str, transition: F) -> SessionState
    where
        F: FnOnce(SessionState) -> SessionState,
    {
        let now = Instant::now();
        let mut guard = self.inner.lock().await;
        Self::prune(&mut guard, self.ttl);

        let entry = guard
            .entry(sender.to_string())
            .or_insert_with(|| SessionEntry::new(now));
        let previous = entry.state;
        entry.state = transition(previous);
        entry.last_seen = now;

        if previous != entry.state {
            debug!(sender, from = ?previous, to = ?entry.state, "session transition");
        }
        entry.state
    }

    fn prune(map: &mut HashMap<String, SessionEntry>, ttl: Duration) {
        let now = Instant::now();
        map.retain(|_, entry| now.duration_since(entry.last_seen) <= ttl);
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_TTL)
    }
}
