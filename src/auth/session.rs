//! Session management

use crate::auth::models::SessionUser;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

const DEFAULT_IDLE_TIMEOUT_MINUTES: i64 = 30;

/// Session information
#[derive(Debug, Clone)]
pub struct Session {
    /// Session ID, carried in the session cookie
    pub id: String,
    /// Authenticated user, `None` while anonymous
    pub user: Option<SessionUser>,
    /// One-shot messages shown on the next rendered page
    pub flashes: Vec<String>,
    /// When the session last accessed
    pub last_accessed: chrono::DateTime<chrono::Utc>,
}

impl Session {
    /// Create an anonymous session under the given ID
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            user: None,
            flashes: Vec::new(),
            last_accessed: chrono::Utc::now(),
        }
    }

    /// Check if the session has been idle longer than `idle_timeout`
    pub fn is_expired(&self, idle_timeout: chrono::Duration) -> bool {
        chrono::Utc::now().signed_duration_since(self.last_accessed) > idle_timeout
    }

    /// Update last accessed time
    pub fn touch(&mut self) {
        self.last_accessed = chrono::Utc::now();
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

/// Generate an unguessable session ID
pub fn new_session_id() -> String {
    Uuid::new_v4().to_string()
}

/// Session manager for in-memory session storage.
///
/// Sessions are only stored once something is written to them, so reading
/// from an ID that was never written is the same as reading an empty
/// anonymous session.
pub struct SessionManager {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    idle_timeout: chrono::Duration,
}

impl SessionManager {
    /// Create a new session manager with the default 30 minute idle timeout
    pub fn new() -> Self {
        Self::with_idle_timeout(chrono::Duration::minutes(DEFAULT_IDLE_TIMEOUT_MINUTES))
    }

    pub fn with_idle_timeout(idle_timeout: chrono::Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            idle_timeout,
        }
    }

    /// Get a session by ID, dropping it if it has expired
    pub async fn get_session(&self, session_id: &str) -> Option<Session> {
        let mut sessions = self.sessions.write().await;
        if let Some(session) = sessions.get_mut(session_id) {
            if session.is_expired(self.idle_timeout) {
                sessions.remove(session_id);
                return None;
            }
            session.touch();
            return Some(session.clone());
        }
        None
    }

    /// Whether a session is stored under this ID, without touching it
    pub async fn contains(&self, session_id: &str) -> bool {
        self.sessions.read().await.contains_key(session_id)
    }

    /// The user attached to a session, if any
    pub async fn current_user(&self, session_id: &str) -> Option<SessionUser> {
        self.get_session(session_id).await.and_then(|s| s.user)
    }

    /// Authenticate under a fresh session ID and return it. The old session
    /// is dropped; its pending flashes move to the new one.
    pub async fn login(&self, session_id: &str, user: SessionUser) -> String {
        let mut sessions = self.sessions.write().await;
        let flashes = sessions
            .remove(session_id)
            .map(|old| old.flashes)
            .unwrap_or_default();

        let mut session = Session::with_id(new_session_id());
        session.user = Some(user);
        session.flashes = flashes;

        let new_id = session.id.clone();
        sessions.insert(new_id.clone(), session);
        new_id
    }

    /// Detach the user from a session, returning who was logged in
    pub async fn logout(&self, session_id: &str) -> Option<SessionUser> {
        self.sessions
            .write()
            .await
            .get_mut(session_id)
            .and_then(|session| session.user.take())
    }

    /// Queue a message for the next rendered page, storing the session if
    /// this is the first write to it
    pub async fn flash(&self, session_id: &str, message: impl Into<String>) {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .entry(session_id.to_string())
            .or_insert_with(|| Session::with_id(session_id));
        session.flashes.push(message.into());
        session.touch();
    }

    /// Remove and return all queued messages
    pub async fn take_flashes(&self, session_id: &str) -> Vec<String> {
        self.sessions
            .write()
            .await
            .get_mut(session_id)
            .map(|session| std::mem::take(&mut session.flashes))
            .unwrap_or_default()
    }

    /// Delete a session
    pub async fn delete_session(&self, session_id: &str) {
        self.sessions.write().await.remove(session_id);
    }

    /// Cleanup expired sessions
    pub async fn cleanup_expired(&self) {
        let idle_timeout = self.idle_timeout;
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired(idle_timeout));
        tracing::debug!("Removed {} expired sessions", before - sessions.len());
    }

    /// Get session count
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for SessionManager {
    fn clone(&self) -> Self {
        Self {
            sessions: Arc::clone(&self.sessions),
            idle_timeout: self.idle_timeout,
        }
    }
}
