//! Public gallery page.

use std::fmt;

use pagination::PageRequest;

use crate::domain::ports::ImageApi;
use crate::domain::{AuthContext, Error, ImageDetail, ImageId};
use crate::inbound::components::ImageCard;

use super::Route;
use super::listing::Listing;

/// Everyone's images, newest first. Cards here never offer delete.
#[derive(Debug, Clone)]
pub struct GalleryPage {
    signed_in: bool,
    listing: Listing,
}

impl GalleryPage {
    /// Fetch one page of the public gallery.
    pub async fn load(api: &dyn ImageApi, auth: &AuthContext, request: PageRequest) -> Self {
        let result = api.list_images(request).await;
        Self {
            signed_in: auth.is_authenticated(),
            listing: Listing::from_result(result, |_| false),
        }
    }

    /// Cards in display order.
    pub fn cards(&self) -> &[ImageCard] {
        self.listing.cards()
    }

    /// Total number of images in the gallery.
    pub fn total(&self) -> u32 {
        self.listing.total()
    }

    /// Message when the list query failed.
    pub fn error(&self) -> Option<&str> {
        self.listing.error()
    }

    /// Open the full-size view of one card.
    pub async fn zoom(&mut self, api: &dyn ImageApi, id: &ImageId) -> Result<&ImageDetail, Error> {
        self.listing.zoom(api, id).await
    }
}

impl fmt::Display for GalleryPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Gallery")?;
        if self.signed_in {
            writeln!(
                f,
                "Upload Image: gallery {} | My Images: gallery {}",
                Route::Upload.command(),
                Route::MyImages.command()
            )?;
        }
        let empty = if self.signed_in {
            "No images yet. Upload the first one!"
        } else {
            "No images yet. Login to upload images."
        };
        self.listing.render(f, empty)
    }
}
