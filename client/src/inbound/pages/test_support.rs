//! Fixtures shared by the page tests.

use std::sync::Arc;

use crate::domain::{AuthContext, ImageId, ImageSummary, Session, SessionToken, User};
use crate::outbound::storage::MemoryStorage;

/// Signed-out context over fresh in-memory storage.
pub(crate) fn anonymous_auth() -> (Arc<MemoryStorage>, AuthContext) {
    let storage = Arc::new(MemoryStorage::default());
    let auth = AuthContext::new(storage.clone());
    (storage, auth)
}

/// Context signed in as `u-1` (Ada Lovelace) with token `tok-1`.
pub(crate) fn signed_in_auth() -> (Arc<MemoryStorage>, AuthContext) {
    let (storage, mut auth) = anonymous_auth();
    let user = User::try_from_strings("u-1", "Ada Lovelace", "ada@example.com").expect("user");
    let token = SessionToken::new("tok-1").expect("token");
    auth.login(Session::new(token, user)).expect("login");
    (storage, auth)
}

/// Untitled JPEG summary owned by `owner`.
pub(crate) fn image(id: &str, owner: &str) -> ImageSummary {
    ImageSummary {
        id: ImageId::new(id).expect("image id"),
        owner_id: owner.to_owned(),
        owner_display_name: "Ada".to_owned(),
        filename: "cat.jpg".to_owned(),
        title: String::new(),
        created_at: "2024-03-01T12:00:00Z".to_owned(),
        thumbnail: vec![0xFF, 0xD8, 0xFF],
    }
}
