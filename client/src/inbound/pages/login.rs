//! Sign-in page.

use std::fmt;

use tracing::debug;

use crate::domain::ports::AuthApi;
use crate::domain::{AuthContext, LoginCredentials};
use crate::inbound::components::{FieldKind, FormField};

use super::{PageOutcome, Route, write_message};

/// Email and password form exchanged for a session.
#[derive(Debug, Clone)]
pub struct LoginPage {
    email: FormField,
    password: FormField,
    error: Option<String>,
}

impl Default for LoginPage {
    fn default() -> Self {
        Self::new()
    }
}

impl LoginPage {
    /// Empty form.
    pub fn new() -> Self {
        Self {
            email: FormField::new("email", "Email", FieldKind::Email)
                .with_placeholder("you@example.com")
                .required(),
            password: FormField::new("password", "Password", FieldKind::Password)
                .with_placeholder("••••••••")
                .required(),
            error: None,
        }
    }

    /// Set the email input.
    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email.set_value(email);
    }

    /// Set the password input.
    pub fn set_password(&mut self, password: impl Into<String>) {
        self.password.set_value(password);
    }

    /// Message from the last failed submission.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Sign in and, on success, start the session and go home.
    pub async fn submit(&mut self, api: &dyn AuthApi, auth: &mut AuthContext) -> PageOutcome {
        self.error = None;
        let credentials =
            match LoginCredentials::try_from_parts(self.email.value(), self.password.value()) {
                Ok(credentials) => credentials,
                Err(err) => {
                    self.error = Some(err.to_string());
                    return PageOutcome::Stay;
                }
            };

        let session = match api.login(&credentials).await {
            Ok(session) => session,
            Err(err) => {
                debug!(code = %err.code(), "login rejected");
                self.error = Some(err.message().to_owned());
                return PageOutcome::Stay;
            }
        };

        if let Err(err) = auth.login(session) {
            self.error = Some(err.to_string());
            return PageOutcome::Stay;
        }
        PageOutcome::Navigate(Route::Home)
    }
}

impl fmt::Display for LoginPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Login")?;
        write_message(f, self.error())?;
        writeln!(f, "{}", self.email)?;
        writeln!(f, "{}", self.password)?;
        writeln!(
            f,
            "Don't have an account? gallery {}",
            Route::Register.command()
        )
    }
}
