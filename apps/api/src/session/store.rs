//! Keyed registry of interview sessions with idle expiry.
//!
//! Every session sits behind its own async mutex. An interaction acquires a
//! `SessionGuard`, holds it across any model calls, and writes its result back
//! with `SessionGuard::commit`; the next interaction on that session waits for
//! the guard. Expiry is enforced lazily on every access, measured from the last
//! commit; a periodic sweep only reclaims memory.

use std::collections::HashMap;
use std::ops::Deref;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info};
use uuid::Uuid;

use crate::interview::flow::InterviewState;
use crate::llm_client::ChatTurn;
use crate::models::candidate::ResumeAttachment;
use crate::models::interview::InterviewMetrics;

/// Idle time after which a session is dropped.
pub const DEFAULT_SESSION_TIMEOUT: Duration = Duration::from_secs(3600);

/// Everything one candidate's interview accumulates.
#[derive(Debug, Clone)]
pub struct InterviewSession {
    /// Survives resets.
    pub id: Uuid,
    pub state: InterviewState,
    pub history: Vec<ChatTurn>,
    pub started_at: DateTime<Utc>,
    pub resume: Option<ResumeAttachment>,
    /// Built summary document awaiting its one download.
    pub export: Option<Bytes>,
}

impl InterviewSession {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            state: InterviewState::Greeting,
            history: Vec::new(),
            started_at: Utc::now(),
            resume: None,
            export: None,
        }
    }

    /// Drops the conversation, attachments and pending export, and restarts
    /// the clock. The flow state is left to the caller.
    pub fn clear_progress(&mut self) {
        self.history.clear();
        self.resume = None;
        self.export = None;
        self.started_at = Utc::now();
    }

    pub fn metrics(&self) -> InterviewMetrics {
        InterviewMetrics::compute(self.started_at, self.state.responses().len())
    }
}

type SessionSlot = Arc<AsyncMutex<InterviewSession>>;

struct StoredSession {
    slot: SessionSlot,
    last_updated: Instant,
}

/// Cloneable handle to the shared registry.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<Mutex<HashMap<Uuid, StoredSession>>>,
    timeout: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_TIMEOUT)
    }
}

impl SessionStore {
    pub fn new(timeout: Duration) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, StoredSession>> {
        self.sessions.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn is_expired(&self, stored: &StoredSession, now: Instant) -> bool {
        now.duration_since(stored.last_updated) > self.timeout
    }

    /// Looks up the live entry for `id`, dropping it if it has expired.
    /// With `slot` given, the entry must also still be that same session.
    fn live_entry<'a>(
        &self,
        sessions: &'a mut HashMap<Uuid, StoredSession>,
        id: Uuid,
        slot: Option<&SessionSlot>,
    ) -> Option<&'a mut StoredSession> {
        let stored = sessions.get(&id)?;
        if slot.is_some_and(|slot| !Arc::ptr_eq(slot, &stored.slot)) {
            return None;
        }
        if self.is_expired(stored, Instant::now()) {
            sessions.remove(&id);
            info!("Session {id} expired");
            return None;
        }
        sessions.get_mut(&id)
    }

    /// Registers a fresh session in the greeting stage.
    pub fn create(&self) -> InterviewSession {
        let session = InterviewSession::new(Uuid::new_v4());
        self.lock().insert(
            session.id,
            StoredSession {
                slot: Arc::new(AsyncMutex::new(session.clone())),
                last_updated: Instant::now(),
            },
        );
        debug!("Created session {}", session.id);
        session
    }

    /// Waits for exclusive access to a session. Returns `None` if it is unknown,
    /// has expired, or was removed while waiting. Expired entries are removed.
    pub async fn acquire(&self, id: Uuid) -> Option<SessionGuard> {
        let slot = {
            let mut sessions = self.lock();
            Arc::clone(&self.live_entry(&mut sessions, id, None)?.slot)
        };
        let session = Arc::clone(&slot).lock_owned().await;

        let mut sessions = self.lock();
        self.live_entry(&mut sessions, id, Some(&slot))?;
        Some(SessionGuard {
            store: self.clone(),
            id,
            slot,
            session,
        })
    }

    /// A copy of the session, taken once any interaction in progress has finished.
    pub async fn get(&self, id: Uuid) -> Option<InterviewSession> {
        self.acquire(id)
            .await
            .map(|guard| InterviewSession::clone(&guard))
    }

    /// Drops a session immediately.
    pub fn expire(&self, id: Uuid) -> bool {
        self.lock().remove(&id).is_some()
    }

    /// Removes every expired session that is not in use, returning how many
    /// were dropped.
    pub fn purge_expired(&self) -> usize {
        let mut sessions = self.lock();
        let now = Instant::now();
        let before = sessions.len();
        sessions.retain(|_, stored| {
            !self.is_expired(stored, now) || stored.slot.try_lock().is_err()
        });
        before - sessions.len()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }
}

/// Exclusive hold on one session for the length of an interaction.
///
/// Derefs to the stored session. Changes are made on a copy and written with
/// `commit`, so an interaction that fails part-way leaves the session as it was.
pub struct SessionGuard {
    store: SessionStore,
    id: Uuid,
    slot: SessionSlot,
    session: OwnedMutexGuard<InterviewSession>,
}

impl SessionGuard {
    /// Replaces the stored session and refreshes its idle timer.
    /// Returns `false` if the session expired or was removed in the meantime.
    pub fn commit(&mut self, session: InterviewSession) -> bool {
        let mut sessions = self.store.lock();
        let Some(stored) = self.store.live_entry(&mut sessions, self.id, Some(&self.slot)) else {
            return false;
        };
        stored.last_updated = Instant::now();
        *self.session = session;
        true
    }
}

impl Deref for SessionGuard {
    type Target = InterviewSession;

    fn deref(&self) -> &InterviewSession {
        &self.session
    }
}

/// Spawns a task that purges expired sessions every `period`.
pub fn spawn_expiry_sweeper(store: SessionStore, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let purged = store.purge_expired();
            if purged > 0 {
                info!("Purged {purged} expired sessions, {} active", store.len());
            }
        }
    })
}
