use crate::core::ConsoleState;
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Shared handle to one session's console state
pub type SessionHandle = Arc<Mutex<ConsoleState>>;

/// In-memory store of console states keyed by session id.
///
/// Entries expire after the configured idle time; the store is bounded so a
/// flood of cookie-less requests cannot grow it without limit.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Cache<String, SessionHandle>,
}

impl SessionStore {
    /// Create a new session store
    pub fn new(max_sessions: u64, idle_ttl_secs: u64) -> Self {
        let sessions = moka::future::CacheBuilder::new(max_sessions)
            .time_to_idle(Duration::from_secs(idle_ttl_secs))
            .build();

        Self { sessions }
    }

    /// Get the state for a session, creating a fresh one on first use
    pub async fn get_or_create(&self, session_id: &str) -> SessionHandle {
        self.sessions
            .get_with(session_id.to_string(), async {
                tracing::debug!("New console session: {}", session_id);
                Arc::new(Mutex::new(ConsoleState::new()))
            })
            .await
    }

    /// Existing state for a session, if any
    pub async fn get(&self, session_id: &str) -> Option<SessionHandle> {
        self.sessions.get(session_id).await
    }

    /// Drop a session's state (logout)
    pub async fn remove(&self, session_id: &str) {
        self.sessions.invalidate(session_id).await;
    }

    pub fn session_count(&self) -> u64 {
        self.sessions.entry_count()
    }
}

/// Generate a new random session id
pub fn new_session_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Tab;

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let store = SessionStore::new(10, 60);

        let a = store.get_or_create("a").await;
        a.lock().await.switch_tab(Tab::Matching);

        let b = store.get_or_create("b").await;
        assert_eq!(b.lock().await.active_tab, Tab::Approval);

        let a_again = store.get_or_create("a").await;
        assert_eq!(a_again.lock().await.active_tab, Tab::Matching);
    }

    #[tokio::test]
    async fn test_remove_resets_session() {
        let store = SessionStore::new(10, 60);
        store.get_or_create("a").await.lock().await.switch_tab(Tab::MatchingList);
        store.remove("a").await;
        assert!(store.get("a").await.is_none());
        let fresh = store.get_or_create("a").await;
        assert_eq!(fresh.lock().await.active_tab, Tab::Approval);
    }

    #[test]
    fn test_session_ids_are_unique() {
        assert_ne!(new_session_id(), new_session_id());
        assert_eq!(new_session_id().len(), 32);
    }
}
