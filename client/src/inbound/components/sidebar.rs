//! Navigation shell reflecting the authentication state.

use std::fmt;

use crate::domain::AuthContext;
use crate::inbound::pages::Route;

/// Where a navigation entry leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavTarget {
    Route(Route),
    Logout,
}

/// One navigation entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    pub label: &'static str,
    pub target: NavTarget,
    pub enabled: bool,
}

impl NavItem {
    const fn link(label: &'static str, route: Route) -> Self {
        Self {
            label,
            target: NavTarget::Route(route),
            enabled: true,
        }
    }
}

/// Signed-in user summary shown above the navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserBadge {
    pub initial: String,
    pub name: String,
    pub email: String,
}

/// Navigation for the current session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sidebar {
    badge: Option<UserBadge>,
    items: Vec<NavItem>,
}

impl Sidebar {
    /// Build the navigation for `auth`.
    pub fn new(auth: &AuthContext) -> Self {
        let signed_in = auth.is_authenticated();
        let mut items = vec![
            NavItem::link("Home", Route::Home),
            NavItem::link("Gallery", Route::Gallery),
            NavItem {
                enabled: signed_in,
                ..NavItem::link("Upload Image", Route::Upload)
            },
        ];
        if signed_in {
            items.push(NavItem::link("My Images", Route::MyImages));
            items.push(NavItem::link("Profile Settings", Route::Update));
            items.push(NavItem {
                label: "Logout",
                target: NavTarget::Logout,
                enabled: true,
            });
        } else {
            items.push(NavItem::link("Login", Route::Login));
        }

        let badge = auth.user().filter(|_| signed_in).map(|user| UserBadge {
            initial: user.avatar_initial().unwrap_or_default(),
            name: user.label().to_owned(),
            email: user.email().to_owned(),
        });

        Self { badge, items }
    }

    /// User badge, when signed in.
    pub fn badge(&self) -> Option<&UserBadge> {
        self.badge.as_ref()
    }

    /// Navigation entries in display order.
    pub fn items(&self) -> &[NavItem] {
        self.items.as_slice()
    }
}

impl fmt::Display for Sidebar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "GalleryBlue")?;
        if let Some(badge) = &self.badge {
            writeln!(f, "({}) {} <{}>", badge.initial, badge.name, badge.email)?;
        }
        for item in &self.items {
            let hint = match item.target {
                NavTarget::Route(route) => route.command(),
                NavTarget::Logout => "logout",
            };
            if item.enabled {
                writeln!(f, "  {:<18} gallery {hint}", item.label)?;
            } else {
                writeln!(f, "  {:<18} (login required)", item.label)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use std::sync::Arc;

    use crate::domain::{Session, SessionToken, User};
    use crate::outbound::storage::MemoryStorage;
    use rstest::rstest;

    fn labels(sidebar: &Sidebar) -> Vec<(&'static str, bool)> {
        sidebar
            .items()
            .iter()
            .map(|item| (item.label, item.enabled))
            .collect()
    }

    #[rstest]
    fn anonymous_users_see_login_and_disabled_upload() {
        let auth = AuthContext::new(Arc::new(MemoryStorage::default()));
        let sidebar = Sidebar::new(&auth);
        assert_eq!(
            labels(&sidebar),
            vec![
                ("Home", true),
                ("Gallery", true),
                ("Upload Image", false),
                ("Login", true),
            ]
        );
        assert!(sidebar.badge().is_none());
    }

    #[rstest]
    fn signed_in_users_see_account_entries_and_badge() {
        let mut auth = AuthContext::new(Arc::new(MemoryStorage::default()));
        let user = User::try_from_strings("u-1", "", "zed@example.com").expect("user");
        auth.login(Session::new(SessionToken::new("tok").expect("token"), user))
            .expect("login");

        let sidebar = Sidebar::new(&auth);
        assert_eq!(
            labels(&sidebar),
            vec![
                ("Home", true),
                ("Gallery", true),
                ("Upload Image", true),
                ("My Images", true),
                ("Profile Settings", true),
                ("Logout", true),
            ]
        );
        let badge = sidebar.badge().expect("badge");
        assert_eq!(badge.initial, "Z");
        assert_eq!(badge.name, "zed@example.com");
    }
}
