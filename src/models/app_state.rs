use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use crate::api::{HttpApi, NetworkApi};
use crate::config::DEFAULT_SESSION_IDLE_SECS;
use crate::services::answer_store::{AnswerStore, JsonFileAnswerStore};
use crate::wizard::{Catalog, WizardSession};

/// One wizard session. The async lock is held for the whole of an advance, so
/// a second request for the same session waits until the first resolves.
pub type SharedSession = Arc<tokio::sync::Mutex<WizardSession>>;

struct SessionEntry {
    session: SharedSession,
    last_seen: Instant,
}

pub struct AppState<A = HttpApi, S = JsonFileAnswerStore> {
    pub api: Arc<A>,
    pub store: Arc<S>,
    pub catalog: Arc<Catalog>,
    sessions: Arc<Mutex<HashMap<String, SessionEntry>>>,
    idle_timeout: Duration,
}

impl<A, S> Clone for AppState<A, S> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            store: self.store.clone(),
            catalog: self.catalog.clone(),
            sessions: self.sessions.clone(),
            idle_timeout: self.idle_timeout,
        }
    }
}

impl<A: NetworkApi, S: AnswerStore> AppState<A, S> {
    pub fn new(api: A, store: S, catalog: Catalog) -> Self {
        Self {
            api: Arc::new(api),
            store: Arc::new(store),
            catalog: Arc::new(catalog),
            sessions: Arc::new(Mutex::new(HashMap::new())),
            idle_timeout: Duration::from_secs(DEFAULT_SESSION_IDLE_SECS),
        }
    }

    /// Sessions untouched for longer than `timeout` are dropped.
    pub fn with_idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }

    fn sessions(&self) -> MutexGuard<'_, HashMap<String, SessionEntry>> {
        self.sessions.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn insert_session(&self, id: String, session: WizardSession) -> SharedSession {
        let shared = Arc::new(tokio::sync::Mutex::new(session));
        let mut sessions = self.sessions();
        evict_idle(&mut sessions, self.idle_timeout);
        sessions.insert(
            id,
            SessionEntry {
                session: shared.clone(),
                last_seen: Instant::now(),
            },
        );
        shared
    }

    /// Look up a session and mark it as in use.
    pub fn session(&self, id: &str) -> Option<SharedSession> {
        let mut sessions = self.sessions();
        let entry = sessions.get_mut(id)?;
        entry.last_seen = Instant::now();
        Some(entry.session.clone())
    }

    pub fn remove_session(&self, id: &str) -> Option<SharedSession> {
        self.sessions().remove(id).map(|e| e.session)
    }

    pub fn session_count(&self) -> usize {
        self.sessions().len()
    }

    /// Drop idle sessions; returns how many went.
    pub fn evict_idle_sessions(&self) -> usize {
        evict_idle(&mut self.sessions(), self.idle_timeout)
    }
}

fn evict_idle(sessions: &mut HashMap<String, SessionEntry>, timeout: Duration) -> usize {
    let before = sessions.len();
    sessions.retain(|_, e| e.last_seen.elapsed() < timeout);
    let evicted = before - sessions.len();
    if evicted > 0 {
        tracing::info!(evicted, remaining = sessions.len(), "Dropped idle wizard sessions");
    }
    evicted
}
