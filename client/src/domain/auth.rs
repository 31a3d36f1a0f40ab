//! Authentication primitives: credentials, registration and profile forms,
//! and the session token issued by the backend.
//!
//! Form input is validated here so pages can reject a submission inline
//! before any remote call is made.

use std::fmt;

use zeroize::Zeroizing;

use super::user::{EmailAddress, User, UserValidationError};

/// Token issued to a registration, which the backend does not follow with a
/// real session token.
pub const REGISTERED_TOKEN: &str = "registered";

/// Domain error returned when form values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialsValidationError {
    /// Email was missing or malformed.
    Email(UserValidationError),
    /// Password was blank.
    EmptyPassword,
    /// Profile updates must be confirmed with the current password.
    CurrentPasswordRequired,
}

impl fmt::Display for CredentialsValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Email(err) => err.fmt(f),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::CurrentPasswordRequired => write!(f, "Current password is required"),
        }
    }
}

impl std::error::Error for CredentialsValidationError {}

impl From<UserValidationError> for CredentialsValidationError {
    fn from(value: UserValidationError) -> Self {
        Self::Email(value)
    }
}

fn required_password(password: &str) -> Result<Zeroizing<String>, CredentialsValidationError> {
    if password.is_empty() {
        return Err(CredentialsValidationError::EmptyPassword);
    }
    Ok(Zeroizing::new(password.to_owned()))
}

/// Validated login credentials.
///
/// ## Invariants
/// - `email` is a trimmed, well-formed address.
/// - `password` is non-empty but retains caller-provided whitespace.
///
/// # Examples
/// ```
/// use client::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("ada@example.com", "pw").unwrap();
/// assert_eq!(creds.email(), "ada@example.com");
/// assert_eq!(creds.password(), "pw");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, CredentialsValidationError> {
        let email = EmailAddress::new(email)?;
        let password = required_password(password)?;
        Ok(Self { email, password })
    }

    /// Email used to look the account up.
    pub fn email(&self) -> &str {
        self.email.as_ref()
    }

    /// Password provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated account registration form.
///
/// The display name is optional and sent exactly as entered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    email: EmailAddress,
    display_name: String,
    password: Zeroizing<String>,
}

impl Registration {
    /// Construct a registration from raw form inputs.
    pub fn try_from_parts(
        email: &str,
        display_name: &str,
        password: &str,
    ) -> Result<Self, CredentialsValidationError> {
        let email = EmailAddress::new(email)?;
        let password = required_password(password)?;
        Ok(Self {
            email,
            display_name: display_name.to_owned(),
            password,
        })
    }

    /// Email for the new account.
    pub fn email(&self) -> &str {
        self.email.as_ref()
    }

    /// Requested display name, possibly empty.
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }

    /// Password for the new account.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated profile update form.
///
/// ## Invariants
/// - `current_password` is non-empty.
/// - Blank optional inputs become `None` so the backend keeps the stored
///   value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileUpdate {
    current_password: Zeroizing<String>,
    new_display_name: Option<String>,
    new_email: Option<EmailAddress>,
    new_password: Option<Zeroizing<String>>,
}

impl ProfileUpdate {
    /// Construct an update from raw form inputs.
    ///
    /// # Examples
    /// ```
    /// use client::domain::ProfileUpdate;
    ///
    /// let update = ProfileUpdate::try_from_parts("secret", "Ada", "", "").unwrap();
    /// assert_eq!(update.new_display_name(), Some("Ada"));
    /// assert_eq!(update.new_email(), None);
    /// assert_eq!(update.new_password(), None);
    /// ```
    pub fn try_from_parts(
        current_password: &str,
        new_display_name: &str,
        new_email: &str,
        new_password: &str,
    ) -> Result<Self, CredentialsValidationError> {
        if current_password.is_empty() {
            return Err(CredentialsValidationError::CurrentPasswordRequired);
        }

        let new_email = if new_email.is_empty() {
            None
        } else {
            Some(EmailAddress::new(new_email)?)
        };

        Ok(Self {
            current_password: Zeroizing::new(current_password.to_owned()),
            new_display_name: non_empty(new_display_name).map(str::to_owned),
            new_email,
            new_password: non_empty(new_password).map(|value| Zeroizing::new(value.to_owned())),
        })
    }

    /// Password confirming the change.
    pub fn current_password(&self) -> &str {
        self.current_password.as_str()
    }

    /// Replacement display name, when one was entered.
    pub fn new_display_name(&self) -> Option<&str> {
        self.new_display_name.as_deref()
    }

    /// Replacement email, when one was entered.
    pub fn new_email(&self) -> Option<&str> {
        self.new_email.as_ref().map(AsRef::as_ref)
    }

    /// Replacement password, when one was entered.
    pub fn new_password(&self) -> Option<&str> {
        self.new_password.as_ref().map(|value| value.as_str())
    }
}

fn non_empty(value: &str) -> Option<&str> {
    if value.is_empty() { None } else { Some(value) }
}

/// Validation errors for session tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionTokenValidationError {
    Empty,
}

impl fmt::Display for SessionTokenValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "session token must not be empty"),
        }
    }
}

impl std::error::Error for SessionTokenValidationError {}

/// Opaque session token. Its presence is what marks a session as signed in;
/// the client never inspects expiry or integrity.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    /// Validate and wrap a token string.
    pub fn new(token: impl Into<String>) -> Result<Self, SessionTokenValidationError> {
        let token = token.into();
        if token.is_empty() {
            return Err(SessionTokenValidationError::Empty);
        }
        Ok(Self(token))
    }

    /// Placeholder stored after registration.
    pub fn registered() -> Self {
        Self(REGISTERED_TOKEN.to_owned())
    }
}

impl AsRef<str> for SessionToken {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(..)")
    }
}

/// Signed-in user together with the token that authenticates them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    token: SessionToken,
    user: User,
}

impl Session {
    /// Pair a token with its user.
    pub fn new(token: SessionToken, user: User) -> Self {
        Self { token, user }
    }

    /// Session token.
    pub fn token(&self) -> &SessionToken {
        &self.token
    }

    /// Signed-in user.
    pub fn user(&self) -> &User {
        &self.user
    }

    /// Replace the user portion, keeping the token.
    pub fn replace_user(&mut self, user: User) {
        self.user = user;
    }

    /// Split into token and user.
    pub fn into_parts(self) -> (SessionToken, User) {
        (self.token, self.user)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", CredentialsValidationError::Email(UserValidationError::EmptyEmail))]
    #[case("ada", "pw", CredentialsValidationError::Email(UserValidationError::InvalidEmail))]
    #[case("ada@example.com", "", CredentialsValidationError::EmptyPassword)]
    fn invalid_credentials(
        #[case] email: &str,
        #[case] password: &str,
        #[case] expected: CredentialsValidationError,
    ) {
        let err = LoginCredentials::try_from_parts(email, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn login_password_keeps_whitespace() {
        let creds = LoginCredentials::try_from_parts(" ada@example.com ", " pw ")
            .expect("valid inputs should succeed");
        assert_eq!(creds.email(), "ada@example.com");
        assert_eq!(creds.password(), " pw ");
    }

    #[rstest]
    fn registration_allows_blank_display_name() {
        let registration = Registration::try_from_parts("ada@example.com", "", "pw")
            .expect("display name is optional");
        assert_eq!(registration.display_name(), "");
    }

    #[rstest]
    fn profile_update_requires_current_password() {
        let err = ProfileUpdate::try_from_parts("", "Ada", "", "")
            .expect_err("missing current password must fail");
        assert_eq!(err.to_string(), "Current password is required");
    }

    #[rstest]
    #[case("", "", "", None, None, None)]
    #[case("Ada", "", "", Some("Ada"), None, None)]
    #[case("", "ada@example.com", "new", None, Some("ada@example.com"), Some("new"))]
    fn profile_update_maps_blanks_to_absent(
        #[case] display_name: &str,
        #[case] email: &str,
        #[case] password: &str,
        #[case] expected_name: Option<&str>,
        #[case] expected_email: Option<&str>,
        #[case] expected_password: Option<&str>,
    ) {
        let update = ProfileUpdate::try_from_parts("current", display_name, email, password)
            .expect("valid update");
        assert_eq!(update.current_password(), "current");
        assert_eq!(update.new_display_name(), expected_name);
        assert_eq!(update.new_email(), expected_email);
        assert_eq!(update.new_password(), expected_password);
    }

    #[rstest]
    fn profile_update_validates_new_email() {
        let err = ProfileUpdate::try_from_parts("current", "", "not-an-email", "")
            .expect_err("malformed email must fail");
        assert_eq!(
            err,
            CredentialsValidationError::Email(UserValidationError::InvalidEmail)
        );
    }

    #[rstest]
    fn session_token_rejects_empty_values() {
        assert_eq!(
            SessionToken::new(""),
            Err(SessionTokenValidationError::Empty)
        );
        assert_eq!(SessionToken::registered().as_ref(), REGISTERED_TOKEN);
    }

    #[rstest]
    fn session_token_debug_is_redacted() {
        let token = SessionToken::new("abc123").expect("token");
        assert_eq!(format!("{token:?}"), "SessionToken(..)");
    }
}
