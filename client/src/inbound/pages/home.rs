//! Landing page.

use std::fmt;

use crate::domain::ports::LocalStorageError;
use crate::domain::{AuthContext, User};

use super::{PageOutcome, Route};

/// Greets the signed-in user, or invites a guest to sign in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomePage {
    user: Option<User>,
}

impl HomePage {
    /// Snapshot the current authentication state.
    pub fn new(auth: &AuthContext) -> Self {
        Self {
            user: auth.user().filter(|_| auth.is_authenticated()).cloned(),
        }
    }

    /// Signed-in user, if any.
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// End the session and stay on the home page as a guest.
    pub fn logout(&mut self, auth: &mut AuthContext) -> Result<PageOutcome, LocalStorageError> {
        self.user = None;
        auth.logout()?;
        Ok(PageOutcome::Navigate(Route::Home))
    }
}

impl fmt::Display for HomePage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "GalleryBlue")?;
        match &self.user {
            Some(user) => {
                let initial = user.avatar_initial().unwrap_or_default();
                let name = if user.display_name().is_empty() {
                    "User"
                } else {
                    user.display_name()
                };
                writeln!(f, "({initial}) {name}")?;
                writeln!(f, "{}", user.email())?;
                writeln!(f, "Update Profile: gallery {}", Route::Update.command())?;
                writeln!(f, "Logout:         gallery logout")
            }
            None => {
                writeln!(f, "Welcome to GalleryBlue")?;
                writeln!(f, "Login:    gallery {}", Route::Login.command())?;
                writeln!(f, "Register: gallery {}", Route::Register.command())
            }
        }
    }
}
