//! Driven port for the remote user profile service.

use async_trait::async_trait;

use crate::domain::{Error, ProfileUpdate, User, UserId, UserProfile};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserApi: Send + Sync {
    /// Look up a public profile by id. Anonymous.
    async fn get_user(&self, id: &UserId) -> Result<UserProfile, Error>;

    /// Update the profile of `identity`, returning the stored user.
    async fn update_user(&self, identity: &UserId, update: &ProfileUpdate) -> Result<User, Error>;
}
