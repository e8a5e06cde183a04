//! Session identity and storage.

use crate::error::{Result, StyreError};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// Mint a new session identifier.
///
/// UUID v4 from the OS CSPRNG; 122 random bits make collisions among
/// active sessions negligible. The server is the only authority that
/// mints ids - a client-supplied value is never accepted as a new one.
pub fn new_session_id() -> String {
    Uuid::new_v4().to_string()
}

/// Server-side state for one client session.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub created_at: DateTime<Utc>,
    /// Client name/version from the initialize handshake, when sent.
    pub client: Option<String>,
    /// Whether a notification stream is currently attached.
    pub stream_attached: bool,
}

impl Session {
    pub fn new(id: String, client: Option<String>) -> Self {
        Self {
            id,
            created_at: Utc::now(),
            client,
            stream_attached: false,
        }
    }
}

/// Concurrent-safe registry of active sessions.
///
/// Cheap to clone; all clones share the same map. Every mutation happens
/// under the lock, so no partially-constructed session is observable.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new session. Fails if the id is already present.
    pub fn insert(&self, session: Session) -> Result<()> {
        let mut sessions = self.sessions.write().unwrap();
        if sessions.contains_key(&session.id) {
            return Err(StyreError::SessionAlreadyExists(session.id.clone()));
        }
        sessions.insert(session.id.clone(), session);
        Ok(())
    }

    /// Snapshot of a session by id.
    pub fn get(&self, id: &str) -> Option<Session> {
        self.sessions.read().unwrap().get(id).cloned()
    }

    /// Remove a session. Removing an absent id is a no-op returning None;
    /// callers distinguish not-found where it matters.
    pub fn remove(&self, id: &str) -> Option<Session> {
        self.sessions.write().unwrap().remove(id)
    }

    /// Number of active sessions.
    pub fn len(&self) -> usize {
        self.sessions.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Atomically claim the session's notification stream slot.
    pub fn try_attach_stream(&self, id: &str) -> Result<()> {
        let mut sessions = self.sessions.write().unwrap();
        match sessions.get_mut(id) {
            None => Err(StyreError::UnknownSession(id.to_string())),
            Some(session) if session.stream_attached => {
                Err(StyreError::StreamAttached(id.to_string()))
            }
            Some(session) => {
                session.stream_attached = true;
                Ok(())
            }
        }
    }

    /// Release the stream slot. Returns false if the session is gone.
    pub fn release_stream(&self, id: &str) -> bool {
        let mut sessions = self.sessions.write().unwrap();
        match sessions.get_mut(id) {
            Some(session) => {
                session.stream_attached = false;
                true
            }
            None => false,
        }
    }
}

/// Scoped handle for a session's notification stream slot.
///
/// Acquired on stream attach. The transport keeps it inside the SSE
/// stream state, so when the connection closes and the stream is
/// dropped, the slot frees with it.
pub struct StreamGuard {
    store: SessionStore,
    session_id: String,
}

impl StreamGuard {
    pub(crate) fn new(store: SessionStore, session_id: String) -> Self {
        Self { store, session_id }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }
}

impl Drop for StreamGuard {
    fn drop(&mut self) {
        self.store.release_stream(&self.session_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_session_ids_are_distinct() {
        let ids: HashSet<String> = (0..10_000).map(|_| new_session_id()).collect();
        assert_eq!(ids.len(), 10_000);
    }

    #[test]
    fn test_session_ids_are_canonical_uuids() {
        let id = new_session_id();
        assert_eq!(id.len(), 36);
        assert!(Uuid::parse_str(&id).is_ok());
    }

    #[test]
    fn test_insert_get_remove() {
        let store = SessionStore::new();
        let id = new_session_id();
        store.insert(Session::new(id.clone(), None)).unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&id).unwrap().id, id);

        assert!(store.remove(&id).is_some());
        assert!(store.get(&id).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_duplicate_insert_fails() {
        let store = SessionStore::new();
        let id = new_session_id();
        store.insert(Session::new(id.clone(), None)).unwrap();

        let result = store.insert(Session::new(id, None));
        assert!(matches!(result, Err(StyreError::SessionAlreadyExists(_))));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let store = SessionStore::new();
        assert!(store.remove("never-created").is_none());
    }

    #[test]
    fn test_stream_slot_claim_and_release() {
        let store = SessionStore::new();
        let id = new_session_id();
        store.insert(Session::new(id.clone(), None)).unwrap();

        store.try_attach_stream(&id).unwrap();
        assert!(store.get(&id).unwrap().stream_attached);

        let second = store.try_attach_stream(&id);
        assert!(matches!(second, Err(StyreError::StreamAttached(_))));

        assert!(store.release_stream(&id));
        assert!(!store.get(&id).unwrap().stream_attached);
        store.try_attach_stream(&id).unwrap();
    }

    #[test]
    fn test_attach_unknown_session() {
        let store = SessionStore::new();
        let result = store.try_attach_stream("never-created");
        assert!(matches!(result, Err(StyreError::UnknownSession(_))));
    }

    #[test]
    fn test_guard_drop_releases_slot() {
        let store = SessionStore::new();
        let id = new_session_id();
        store.insert(Session::new(id.clone(), None)).unwrap();
        store.try_attach_stream(&id).unwrap();

        let guard = StreamGuard::new(store.clone(), id.clone());
        assert_eq!(guard.session_id(), id);
        drop(guard);

        assert!(!store.get(&id).unwrap().stream_attached);
    }

    #[test]
    fn test_guard_drop_after_terminate_is_noop() {
        let store = SessionStore::new();
        let id = new_session_id();
        store.insert(Session::new(id.clone(), None)).unwrap();
        store.try_attach_stream(&id).unwrap();

        let guard = StreamGuard::new(store.clone(), id.clone());
        store.remove(&id);
        drop(guard);

        assert!(store.get(&id).is_none());
    }
}
