//! One page per route.
//!
//! Each page owns its form state and maps a single user action onto one
//! remote call. A submission ends in one of three ways: the page navigates
//! (or updates shared state), validation fails with an inline message and no
//! call is made, or the call fails and the server's message is shown
//! verbatim.
//!
//! Submit methods take `&mut self`, so a page never has two mutations in
//! flight.

mod gallery;
mod home;
mod listing;
mod login;
mod my_images;
mod register;
mod update;
mod upload;

#[cfg(test)]
pub(crate) mod test_support;

use std::fmt;

pub use gallery::GalleryPage;
pub use home::HomePage;
pub use login::LoginPage;
pub use my_images::MyImagesPage;
pub use register::RegisterPage;
pub use update::UpdatePage;
pub use upload::{SelectedFile, UploadPage};

use crate::domain::{AuthContext, UserId};

/// Client routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Login,
    Register,
    Update,
    Upload,
    Gallery,
    MyImages,
}

impl Route {
    /// Path of the route in the web client.
    pub const fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Login => "/login",
            Self::Register => "/register",
            Self::Update => "/update",
            Self::Upload => "/upload",
            Self::Gallery => "/gallery",
            Self::MyImages => "/my-images",
        }
    }

    /// CLI command that opens the route.
    pub const fn command(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Login => "login",
            Self::Register => "register",
            Self::Update => "update",
            Self::Upload => "upload",
            Self::Gallery => "gallery",
            Self::MyImages => "my-images",
        }
    }

    /// Whether the route requires a signed-in user.
    pub const fn is_protected(self) -> bool {
        matches!(self, Self::Update | Self::Upload | Self::MyImages)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// What happened after a page handled an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOutcome {
    /// Stay on the page; it may now show an error or notice.
    Stay,
    /// Leave for another route.
    Navigate(Route),
}

/// Identity for a protected page, or the redirect to take instead.
///
/// # Errors
/// Returns [`Route::Login`] when no user is signed in.
pub fn require_identity(auth: &AuthContext) -> Result<UserId, Route> {
    match auth.identity() {
        Some(identity) if auth.is_authenticated() => Ok(identity.clone()),
        _ => Err(Route::Login),
    }
}

fn write_message(f: &mut fmt::Formatter<'_>, error: Option<&str>) -> fmt::Result {
    match error {
        Some(message) => writeln!(f, "Error: {message}"),
        None => Ok(()),
    }
}
