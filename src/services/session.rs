//! Per-user conversation sessions.
//!
//! Each user gets an `Arc<Mutex<Session>>` entry; the message handler holds
//! the lock for the whole turn, so messages from one user are processed in
//! arrival order while different users run in parallel.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::sync::Mutex;

use crate::engine::state::SessionState;

#[derive(Clone, Debug)]
pub struct Session {
    pub state: SessionState,
    pub last_seen: DateTime<Utc>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            state: SessionState::default(),
            // counts as activity, so a session is never stale at birth
            last_seen: Utc::now(),
        }
    }
}

#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<DashMap<u64, Arc<Mutex<Session>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the user's session, creating a fresh `Main` one on first
    /// contact.
    pub fn get_or_create(&self, user_id: u64) -> Arc<Mutex<Session>> {
        self.sessions
            .entry(user_id)
            .or_insert_with(|| Arc::new(Mutex::new(Session::default())))
            .clone()
    }

    /// Evicts sessions idle longer than `ttl`. Returns how many were removed.
    pub async fn sweep(&self, ttl: Duration) -> usize {
        let cutoff = Utc::now() - chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::zero());
        let mut stale = Vec::new();

        for entry in self.sessions.iter() {
            if let Ok(session) = entry.value().try_lock() {
                if session.last_seen < cutoff {
                    stale.push(*entry.key());
                }
            }
        }

        let mut removed = 0;
        for user_id in stale {
            // skip entries that became active between the scan and now
            let still_stale = self
                .sessions
                .get(&user_id)
                .and_then(|entry| entry.value().try_lock().ok().map(|s| s.last_seen < cutoff))
                .unwrap_or(false);
            if still_stale && self.sessions.remove(&user_id).is_some() {
                removed += 1;
            }
        }

        if removed > 0 {
            debug!("Evicted {} idle session(s)", removed);
        }
        removed
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }
}
