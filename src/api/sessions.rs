//! Per-session league state.
//!
//! Every session owns an independent [`Store`]. Sessions are looked up by ID
//! and locked individually, so mutations within a session are serialized
//! while separate sessions never share state.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use tracing::{debug, info};

use crate::config::SessionConfig;
use crate::models::SessionId;
use crate::store::Store;

/// Session registry errors.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Unknown session: {0}")]
    NotFound(SessionId),

    #[error("Session limit of {0} reached")]
    Full(usize),
}

/// One operator session.
#[derive(Debug, Clone)]
pub struct Session {
    pub store: Store,
    pub created_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
}

impl Session {
    /// Start a session with the default groups.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            store: Store::new(),
            created_at: now,
            last_active: now,
        }
    }

    /// Record activity.
    pub fn touch(&mut self) {
        self.last_active = Utc::now();
    }

    /// Whether the session has been inactive for longer than `ttl`.
    pub fn is_idle(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        match (now - self.last_active).to_std() {
            Ok(idle) => idle > ttl,
            Err(_) => false,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

pub type SessionHandle = Arc<Mutex<Session>>;

/// All live sessions.
#[derive(Debug)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<SessionId, SessionHandle>>,
    max_sessions: usize,
    ttl: Duration,
}

impl SessionRegistry {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            max_sessions: config.max_sessions,
            ttl: config.ttl(),
        }
    }

    /// Create a seeded session, pruning idle sessions first.
    pub async fn create(&self) -> Result<SessionId, SessionError> {
        let mut sessions = self.sessions.write().await;
        prune_idle(&mut sessions, Utc::now(), self.ttl);

        if sessions.len() >= self.max_sessions {
            return Err(SessionError::Full(self.max_sessions));
        }

        let id = SessionId::generate();
        sessions.insert(id, Arc::new(Mutex::new(Session::new())));
        info!("Created session {} ({} live)", id, sessions.len());
        Ok(id)
    }

    pub async fn get(&self, id: SessionId) -> Result<SessionHandle, SessionError> {
        self.sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(SessionError::NotFound(id))
    }

    /// Lock a session for one request and mark it active.
    ///
    /// The registry read lock is held until the session is locked and
    /// touched, so a concurrent prune cannot drop it in between.
    pub async fn checkout(
        &self,
        id: SessionId,
    ) -> Result<OwnedMutexGuard<Session>, SessionError> {
        let sessions = self.sessions.read().await;
        let handle = sessions.get(&id).cloned().ok_or(SessionError::NotFound(id))?;
        let mut session = handle.lock_owned().await;
        session.touch();
        Ok(session)
    }

    pub async fn remove(&self, id: SessionId) -> Result<(), SessionError> {
        match self.sessions.write().await.remove(&id) {
            Some(_) => {
                info!("Closed session {}", id);
                Ok(())
            }
            None => Err(SessionError::NotFound(id)),
        }
    }

    /// Drop sessions idle for longer than the TTL. Returns how many were removed.
    pub async fn prune(&self, now: DateTime<Utc>) -> usize {
        prune_idle(&mut *self.sessions.write().await, now, self.ttl)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

/// Sessions currently locked by a request are in use and never pruned.
fn prune_idle(
    sessions: &mut HashMap<SessionId, SessionHandle>,
    now: DateTime<Utc>,
    ttl: Duration,
) -> usize {
    let before = sessions.len();
    sessions.retain(|id, handle| match handle.try_lock() {
        Ok(session) if session.is_idle(now, ttl) => {
            debug!("Pruning idle session {}", id);
            false
        }
        _ => true,
    });
    before - sessions.len()
}
