//! Profile settings page.

use std::fmt;

use tracing::info;

use crate::domain::ports::UserApi;
use crate::domain::{AuthContext, ProfileUpdate};
use crate::inbound::components::{FieldKind, FormField};

use super::{PageOutcome, Route, require_identity, write_message};

const KEEP_CURRENT: &str = "Leave blank to keep current";

/// Notice shown after a successful update.
pub const PROFILE_UPDATED: &str = "Profile updated successfully!";

/// Profile update form. The current password is required; blank optional
/// fields keep their stored values.
#[derive(Debug, Clone)]
pub struct UpdatePage {
    current_password: FormField,
    new_display_name: FormField,
    new_email: FormField,
    new_password: FormField,
    error: Option<String>,
    success: Option<String>,
}

impl UpdatePage {
    /// Open the page for the signed-in user.
    ///
    /// # Errors
    /// Returns the login route when nobody is signed in.
    pub fn open(auth: &AuthContext) -> Result<Self, Route> {
        require_identity(auth)?;
        let user = auth.user().ok_or(Route::Login)?;
        let or_keep = |value: &str| {
            if value.is_empty() {
                KEEP_CURRENT.to_owned()
            } else {
                value.to_owned()
            }
        };
        Ok(Self {
            current_password: FormField::new(
                "currentPassword",
                "Current Password",
                FieldKind::Password,
            )
            .with_placeholder("Enter current password to confirm")
            .required(),
            new_display_name: FormField::new("newDisplayName", "New Display Name", FieldKind::Text)
                .with_placeholder(or_keep(user.display_name())),
            new_email: FormField::new("newEmail", "New Email", FieldKind::Email)
                .with_placeholder(or_keep(user.email())),
            new_password: FormField::new("newPassword", "New Password", FieldKind::Password)
                .with_placeholder(KEEP_CURRENT),
            error: None,
            success: None,
        })
    }

    /// Set the current password input.
    pub fn set_current_password(&mut self, value: impl Into<String>) {
        self.current_password.set_value(value);
    }

    /// Set the new display name input.
    pub fn set_new_display_name(&mut self, value: impl Into<String>) {
        self.new_display_name.set_value(value);
    }

    /// Set the new email input.
    pub fn set_new_email(&mut self, value: impl Into<String>) {
        self.new_email.set_value(value);
    }

    /// Set the new password input.
    pub fn set_new_password(&mut self, value: impl Into<String>) {
        self.new_password.set_value(value);
    }

    /// Message from the last failed submission.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Notice from the last successful submission.
    pub fn success(&self) -> Option<&str> {
        self.success.as_deref()
    }

    /// Send the update and replace the signed-in user with the result.
    ///
    /// Password inputs are cleared after a successful update.
    pub async fn submit(&mut self, api: &dyn UserApi, auth: &mut AuthContext) -> PageOutcome {
        self.error = None;
        self.success = None;
        let identity = match require_identity(auth) {
            Ok(identity) => identity,
            Err(route) => return PageOutcome::Navigate(route),
        };

        let update = match ProfileUpdate::try_from_parts(
            self.current_password.value(),
            self.new_display_name.value(),
            self.new_email.value(),
            self.new_password.value(),
        ) {
            Ok(update) => update,
            Err(err) => {
                self.error = Some(err.to_string());
                return PageOutcome::Stay;
            }
        };

        let user = match api.update_user(&identity, &update).await {
            Ok(user) => user,
            Err(err) => {
                self.error = Some(err.message().to_owned());
                return PageOutcome::Stay;
            }
        };

        info!(user_id = %user.id(), "profile updated");
        if let Err(err) = auth.update_user(user) {
            self.error = Some(err.to_string());
            return PageOutcome::Stay;
        }
        self.success = Some(PROFILE_UPDATED.to_owned());
        self.current_password.clear();
        self.new_password.clear();
        PageOutcome::Stay
    }
}

impl fmt::Display for UpdatePage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Update Profile")?;
        write_message(f, self.error())?;
        if let Some(notice) = self.success() {
            writeln!(f, "{notice}")?;
        }
        writeln!(f, "{}", self.current_password)?;
        writeln!(f, "{}", self.new_display_name)?;
        writeln!(f, "{}", self.new_email)?;
        writeln!(f, "{}", self.new_password)?;
        writeln!(f, "Back to Home: gallery {}", Route::Home.command())
    }
}
