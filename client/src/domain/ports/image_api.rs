//! Driven port for the remote image service.
//!
//! Calls taking an `identity` are sent on behalf of that user; the rest are
//! anonymous.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{
    Error, ImageDetail, ImageEdit, ImageId, ImageMetadata, ImageSummary, ImageUpload, UserId,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageApi: Send + Sync {
    /// Public gallery, newest first.
    async fn list_images(&self, request: PageRequest) -> Result<Page<ImageSummary>, Error>;

    /// Images owned by `identity`.
    async fn list_my_images(
        &self,
        identity: &UserId,
        request: PageRequest,
    ) -> Result<Page<ImageSummary>, Error>;

    /// Full image including its bytes.
    async fn get_image(&self, id: &ImageId) -> Result<ImageDetail, Error>;

    /// Upload a new image owned by `identity`.
    async fn upload_image(&self, identity: &UserId, upload: &ImageUpload)
    -> Result<ImageId, Error>;

    /// Change title and/or description of an owned image.
    async fn update_image(&self, identity: &UserId, edit: &ImageEdit)
    -> Result<ImageMetadata, Error>;

    /// Delete an owned image.
    async fn delete_image(&self, identity: &UserId, id: &ImageId) -> Result<(), Error>;
}
