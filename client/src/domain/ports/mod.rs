//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod auth_api;
mod image_api;
mod local_storage;
mod user_api;

#[cfg(test)]
pub use auth_api::MockAuthApi;
pub use auth_api::AuthApi;
#[cfg(test)]
pub use image_api::MockImageApi;
pub use image_api::ImageApi;
#[cfg(test)]
pub use local_storage::MockLocalStorage;
pub use local_storage::{LocalStorage, LocalStorageError, SESSION_TOKEN_KEY, USER_KEY};
#[cfg(test)]
pub use user_api::MockUserApi;
pub use user_api::UserApi;
