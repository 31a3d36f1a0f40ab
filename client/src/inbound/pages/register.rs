//! Account creation page.

use std::fmt;

use crate::domain::ports::AuthApi;
use crate::domain::{AuthContext, Registration, Session, SessionToken};
use crate::inbound::components::{FieldKind, FormField};

use super::{PageOutcome, Route, write_message};

/// Registration form. A successful registration signs the user in with a
/// placeholder token because the backend issues none.
#[derive(Debug, Clone)]
pub struct RegisterPage {
    email: FormField,
    display_name: FormField,
    password: FormField,
    error: Option<String>,
}

impl Default for RegisterPage {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterPage {
    /// Empty form.
    pub fn new() -> Self {
        Self {
            email: FormField::new("email", "Email", FieldKind::Email)
                .with_placeholder("you@example.com")
                .required(),
            display_name: FormField::new("displayName", "Display Name", FieldKind::Text)
                .with_placeholder("Your name"),
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

    /// Set the optional display name input.
    pub fn set_display_name(&mut self, display_name: impl Into<String>) {
        self.display_name.set_value(display_name);
    }

    /// Set the password input.
    pub fn set_password(&mut self, password: impl Into<String>) {
        self.password.set_value(password);
    }

    /// Message from the last failed submission.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Create the account, sign in, and go home.
    pub async fn submit(&mut self, api: &dyn AuthApi, auth: &mut AuthContext) -> PageOutcome {
        self.error = None;
        let registration = match Registration::try_from_parts(
            self.email.value(),
            self.display_name.value(),
            self.password.value(),
        ) {
            Ok(registration) => registration,
            Err(err) => {
                self.error = Some(err.to_string());
                return PageOutcome::Stay;
            }
        };

        let user = match api.register(&registration).await {
            Ok(user) => user,
            Err(err) => {
                self.error = Some(err.message().to_owned());
                return PageOutcome::Stay;
            }
        };

        if let Err(err) = auth.login(Session::new(SessionToken::registered(), user)) {
            self.error = Some(err.to_string());
            return PageOutcome::Stay;
        }
        PageOutcome::Navigate(Route::Home)
    }
}

impl fmt::Display for RegisterPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Register")?;
        write_message(f, self.error())?;
        writeln!(f, "{}", self.email)?;
        writeln!(f, "{}", self.display_name)?;
        writeln!(f, "{}", self.password)?;
        writeln!(
            f,
            "Already have an account? gallery {}",
            Route::Login.command()
        )
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::MockAuthApi;
    use crate::domain::{Error, REGISTERED_TOKEN, User};
    use crate::inbound::pages::test_support::anonymous_auth;
    use rstest::rstest;

    fn filled(display_name: &str) -> RegisterPage {
        let mut page = RegisterPage::new();
        page.set_email("ada@example.com");
        page.set_display_name(display_name);
        page.set_password("pw");
        page
    }

    #[rstest]
    #[case("Ada")]
    #[case("")]
    #[tokio::test]
    async fn registration_signs_in_with_placeholder_token(#[case] display_name: &'static str) {
        let (storage, mut auth) = anonymous_auth();
        let user = User::try_from_strings("u-9", display_name, "ada@example.com").expect("user");
        let mut api = MockAuthApi::new();
        api.expect_register()
            .withf(move |registration| {
                registration.email() == "ada@example.com"
                    && registration.display_name() == display_name
                    && registration.password() == "pw"
            })
            .times(1)
            .return_once(move |_| Ok(user));

        let mut page = filled(display_name);
        let outcome = page.submit(&api, &mut auth).await;

        assert_eq!(outcome, PageOutcome::Navigate(Route::Home));
        let reloaded = AuthContext::rehydrate(storage).expect("rehydrate");
        let session = reloaded.session().expect("session persisted");
        assert_eq!(session.token().as_ref(), REGISTERED_TOKEN);
        assert_eq!(session.user().id().as_ref(), "u-9");
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_accounts_report_the_server_message() {
        let (_storage, mut auth) = anonymous_auth();
        let mut api = MockAuthApi::new();
        api.expect_register().times(1).return_once(|_| {
            Err(Error::new(
                crate::domain::ErrorCode::AlreadyExists,
                "user with this email already exists",
            ))
        });

        let mut page = filled("Ada");
        assert_eq!(page.submit(&api, &mut auth).await, PageOutcome::Stay);
        assert_eq!(page.error(), Some("user with this email already exists"));
        assert!(!auth.is_authenticated());
    }
}
