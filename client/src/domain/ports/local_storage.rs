//! Port abstraction for the key/value store that keeps the session between
//! runs.
//!
//! Values are plain strings keyed by name, mirroring a browser's local
//! storage. Reads are synchronous; adapters are expected to be local.

use super::define_port_error;

/// Key holding the raw session token.
pub const SESSION_TOKEN_KEY: &str = "sessionToken";

/// Key holding the JSON-encoded signed-in user.
pub const USER_KEY: &str = "user";

define_port_error! {
    /// Errors raised by local storage adapters.
    pub enum LocalStorageError {
        /// The backing store could not be read or written.
        Io { message: String } => "local storage I/O failed: {message}",
        /// A stored value exists but cannot be decoded.
        Corrupt { key: String, message: String } => "stored {key} is corrupt: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait LocalStorage: Send + Sync {
    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>, LocalStorageError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), LocalStorageError>;

    /// Remove `key`. Removing an absent key succeeds.
    fn remove(&self, key: &str) -> Result<(), LocalStorageError>;
}
