//! Auth Context
//!
//! Explicit holder of the bearer token and the signed-in user. Cloned
//! handles share the same state; every change is mirrored to the
//! `SessionStore` so the session survives restarts.

use std::sync::Arc;

use parking_lot::RwLock;

use super::storage::{MemorySessionStore, SessionStore, StorageError};
use crate::constants::{TOKEN_KEY, USER_KEY};
use crate::models::AuthUser;

#[derive(Debug, Default)]
struct SessionState {
    token: Option<String>,
    user: Option<AuthUser>,
}

#[derive(Clone)]
pub struct AuthContext {
    state: Arc<RwLock<SessionState>>,
    store: Arc<dyn SessionStore>,
}

impl AuthContext {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self {
            state: Arc::new(RwLock::new(SessionState::default())),
            store,
        }
    }

    /// Context backed by a fresh in-memory store
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemorySessionStore::new()))
    }

    pub fn token(&self) -> Option<String> {
        self.state.read().token.clone()
    }

    pub fn user(&self) -> Option<AuthUser> {
        self.state.read().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.read().token.is_some()
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// Persist token and user, then expose them
    pub fn set_session(&self, token: String, user: AuthUser) -> Result<(), StorageError> {
        let user_json = serde_json::to_string(&user)?;
        self.store.set_many(&[(TOKEN_KEY, token.as_str()), (USER_KEY, user_json.as_str())])?;

        let mut state = self.state.write();
        state.token = Some(token);
        state.user = Some(user);
        Ok(())
    }

    /// Replace the token only (refresh)
    pub fn set_token(&self, token: String) -> Result<(), StorageError> {
        self.store.set(TOKEN_KEY, &token)?;
        self.state.write().token = Some(token);
        Ok(())
    }

    /// Forget token and user, in memory and in the store.
    /// Memory is cleared even when the store fails.
    pub fn clear_token(&self) -> Result<(), StorageError> {
        {
            let mut state = self.state.write();
            state.token = None;
            state.user = None;
        }
        self.store.clear()
    }

    /// Load a persisted session. A half-written or unreadable session is
    /// discarded. Returns whether a session is now active.
    pub fn restore(&self) -> Result<bool, StorageError> {
        let stored = self
            .store
            .get(TOKEN_KEY)
            .and_then(|token| Ok((token, self.store.get(USER_KEY)?)));

        let (token, user_json) = match stored {
            Ok(pair) => pair,
            Err(StorageError::Parse(e)) => {
                tracing::warn!("Stored session is corrupt, discarded: {}", e);
                self.clear_token()?;
                return Ok(false);
            }
            Err(e) => return Err(e),
        };

        let (token, user_json) = match (token, user_json) {
            (Some(token), Some(user_json)) => (token, user_json),
            (None, None) => return Ok(false),
            _ => {
                tracing::warn!("Incomplete stored session discarded");
                self.clear_token()?;
                return Ok(false);
            }
        };

        match serde_json::from_str::<AuthUser>(&user_json) {
            Ok(user) => {
                let mut state = self.state.write();
                state.token = Some(token);
                state.user = Some(user);
                Ok(true)
            }
            Err(e) => {
                tracing::warn!("Stored user is unreadable, session discarded: {}", e);
                self.clear_token()?;
                Ok(false)
            }
        }
    }
}

impl std::fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("AuthContext")
            .field("authenticated", &state.token.is_some())
            .field("user", &state.user.as_ref().map(|u| u.email.as_str()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserRole;

    fn user() -> AuthUser {
        AuthUser {
            id: "u1".to_string(),
            username: "ana".to_string(),
            email: "ana@leterago.com".to_string(),
            role: UserRole::User,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_set_and_clear() {
        let store = Arc::new(MemorySessionStore::new());
        let auth = AuthContext::new(store.clone());

        auth.set_session("tok".to_string(), user()).unwrap();
        assert!(auth.is_authenticated());
        assert_eq!(store.get(TOKEN_KEY).unwrap().as_deref(), Some("tok"));
        assert!(store.get(USER_KEY).unwrap().is_some());

        auth.clear_token().unwrap();
        assert!(!auth.is_authenticated());
        assert!(auth.user().is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_clones_share_state() {
        let auth = AuthContext::in_memory();
        let handle = auth.clone();
        auth.set_session("tok".to_string(), user()).unwrap();
        assert_eq!(handle.token().as_deref(), Some("tok"));
        handle.clear_token().unwrap();
        assert!(!auth.is_authenticated());
    }

    #[test]
    fn test_restore_from_store() {
        let store = Arc::new(MemorySessionStore::new());
        AuthContext::new(store.clone())
            .set_session("tok".to_string(), user())
            .unwrap();

        let restored = AuthContext::new(store);
        assert!(restored.restore().unwrap());
        assert_eq!(restored.token().as_deref(), Some("tok"));
        assert_eq!(restored.user().unwrap().username, "ana");
    }

    #[test]
    fn test_restore_discards_partial_session() {
        let store = Arc::new(MemorySessionStore::new());
        store.set(TOKEN_KEY, "tok").unwrap();

        let auth = AuthContext::new(store.clone());
        assert!(!auth.restore().unwrap());
        assert!(store.is_empty());
    }

    #[test]
    fn test_restore_discards_bad_user_json() {
        let store = Arc::new(MemorySessionStore::new());
        store.set(TOKEN_KEY, "tok").unwrap();
        store.set(USER_KEY, "{not json").unwrap();

        let auth = AuthContext::new(store.clone());
        assert!(!auth.restore().unwrap());
        assert!(!auth.is_authenticated());
        assert!(store.is_empty());
    }

    #[test]
    fn test_restore_discards_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{\"auth_token\": \"tok\", \"user_da").unwrap();

        let auth = AuthContext::new(Arc::new(crate::session::FileSessionStore::new(&path)));
        assert!(!auth.restore().unwrap());
        assert!(!auth.is_authenticated());
        assert!(!path.exists());

        // A new session can be written afterwards
        auth.set_session("tok".to_string(), user()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_set_token_keeps_user() {
        let auth = AuthContext::in_memory();
        auth.set_session("old".to_string(), user()).unwrap();
        auth.set_token("new".to_string()).unwrap();
        assert_eq!(auth.token().as_deref(), Some("new"));
        assert!(auth.user().is_some());
    }
}
