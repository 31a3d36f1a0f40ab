//! Shared authentication state backed by local storage.
//!
//! The context holds the signed-in [`Session`] for the current invocation and
//! mirrors every change to the [`LocalStorage`] port so the next invocation can
//! rehydrate it.

use std::sync::Arc;

use tracing::{info, warn};

use super::auth::{Session, SessionToken};
use super::ports::{LocalStorage, LocalStorageError, SESSION_TOKEN_KEY, USER_KEY};
use super::user::{User, UserId};

/// Process-wide authentication state.
///
/// ## Invariants
/// - A session is present exactly when a token is present; the user is never
///   held without its token.
/// - Every mutation is written through to storage under the `sessionToken`
///   and `user` keys.
pub struct AuthContext {
    storage: Arc<dyn LocalStorage>,
    session: Option<Session>,
}

impl AuthContext {
    /// Create a signed-out context without reading storage.
    pub fn new(storage: Arc<dyn LocalStorage>) -> Self {
        Self {
            storage,
            session: None,
        }
    }

    /// Restore the session persisted by an earlier invocation.
    ///
    /// The session is restored only when both keys hold a non-empty value.
    ///
    /// # Errors
    /// Returns [`LocalStorageError::Io`] when storage cannot be read and
    /// [`LocalStorageError::Corrupt`] when the stored user is not valid JSON
    /// of the expected shape.
    pub fn rehydrate(storage: Arc<dyn LocalStorage>) -> Result<Self, LocalStorageError> {
        let token = storage
            .get(SESSION_TOKEN_KEY)?
            .and_then(|raw| SessionToken::new(raw).ok());
        let stored_user = storage.get(USER_KEY)?.filter(|raw| !raw.is_empty());

        let session = match (token, stored_user) {
            (Some(token), Some(raw)) => {
                let user: User = serde_json::from_str(&raw)
                    .map_err(|err| LocalStorageError::corrupt(USER_KEY, err.to_string()))?;
                Some(Session::new(token, user))
            }
            _ => None,
        };

        Ok(Self { storage, session })
    }

    /// Start a session and persist both keys.
    pub fn login(&mut self, session: Session) -> Result<(), LocalStorageError> {
        let (token, user) = session.into_parts();
        let encoded = encode_user(&user)?;
        info!(user_id = %user.id(), "session started");
        self.storage.set(SESSION_TOKEN_KEY, token.as_ref())?;
        self.storage.set(USER_KEY, &encoded)?;
        self.session = Some(Session::new(token, user));
        Ok(())
    }

    /// End the session and remove both keys.
    ///
    /// Memory is cleared even when storage fails; the first storage error is
    /// returned after both removals were attempted.
    pub fn logout(&mut self) -> Result<(), LocalStorageError> {
        if let Some(session) = self.session.take() {
            info!(user_id = %session.user().id(), "session ended");
        }
        let token_result = self.storage.remove(SESSION_TOKEN_KEY);
        let user_result = self.storage.remove(USER_KEY);
        token_result.and(user_result)
    }

    /// Replace the signed-in user and persist the `user` key. The token is
    /// untouched.
    pub fn update_user(&mut self, user: User) -> Result<(), LocalStorageError> {
        let encoded = encode_user(&user)?;
        self.storage.set(USER_KEY, &encoded)?;
        match self.session.as_mut() {
            Some(session) => session.replace_user(user),
            None => warn!(user_id = %user.id(), "user stored without an active session"),
        }
        Ok(())
    }

    /// Whether a session token is present.
    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    /// Current session, if any.
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Signed-in user, if any.
    pub fn user(&self) -> Option<&User> {
        self.session.as_ref().map(Session::user)
    }

    /// Identity attached to authenticated calls.
    pub fn identity(&self) -> Option<&UserId> {
        self.user().map(User::id)
    }
}

fn encode_user(user: &User) -> Result<String, LocalStorageError> {
    serde_json::to_string(user).map_err(|err| LocalStorageError::io(err.to_string()))
}
