//! Driven port for the remote authentication service.
//!
//! Pages call it to sign in or create an account without knowing how the
//! request reaches the backend, so page tests can substitute a mock.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, Registration, Session, User};

/// Remote authentication calls. Both are anonymous.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Exchange credentials for a session.
    async fn login(&self, credentials: &LoginCredentials) -> Result<Session, Error>;

    /// Create an account. The backend issues no token for it.
    async fn register(&self, registration: &Registration) -> Result<User, Error>;
}
