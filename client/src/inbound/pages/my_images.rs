//! The signed-in user's own images.

use std::fmt;

use pagination::PageRequest;

use crate::domain::ports::ImageApi;
use crate::domain::{AuthContext, Error, ErrorCode, ImageDetail, ImageId, UserId};
use crate::inbound::components::ImageCard;

use super::listing::Listing;
use super::{Route, require_identity};

/// Owned images with two-step delete. The list is fetched again after every
/// successful delete.
#[derive(Debug, Clone)]
pub struct MyImagesPage {
    identity: UserId,
    request: PageRequest,
    listing: Listing,
}

impl MyImagesPage {
    /// Open the page and fetch the first page of owned images.
    ///
    /// # Errors
    /// Returns the login route when nobody is signed in.
    pub async fn open(
        api: &dyn ImageApi,
        auth: &AuthContext,
        request: PageRequest,
    ) -> Result<Self, Route> {
        let identity = require_identity(auth)?;
        let listing = fetch(api, &identity, request).await;
        Ok(Self {
            identity,
            request,
            listing,
        })
    }

    /// Fetch the list again.
    pub async fn refetch(&mut self, api: &dyn ImageApi) {
        self.listing = fetch(api, &self.identity, self.request).await;
    }

    /// Cards in display order.
    pub fn cards(&self) -> &[ImageCard] {
        self.listing.cards()
    }

    /// Total number of owned images.
    pub fn total(&self) -> u32 {
        self.listing.total()
    }

    /// Message when the list query failed.
    pub fn error(&self) -> Option<&str> {
        self.listing.error()
    }

    /// First delete step for `id`. Returns `false` when the image is not
    /// listed.
    pub fn request_delete(&mut self, id: &ImageId) -> bool {
        self.listing
            .card_mut(id)
            .is_some_and(ImageCard::request_delete)
    }

    /// Abandon a requested delete.
    pub fn cancel_delete(&mut self, id: &ImageId) {
        if let Some(card) = self.listing.card_mut(id) {
            card.cancel_delete();
        }
    }

    /// Second delete step for `id`, then refetch the list.
    ///
    /// # Errors
    /// Returns [`ErrorCode::NotFound`] when the image is not listed,
    /// [`ErrorCode::FailedPrecondition`] when no delete was requested, or the
    /// remote error.
    pub async fn confirm_delete(&mut self, api: &dyn ImageApi, id: &ImageId) -> Result<(), Error> {
        let card = self.listing.card_mut(id).ok_or_else(|| {
            Error::new(ErrorCode::NotFound, format!("image {id} is not on this page"))
        })?;
        card.confirm_delete(api, &self.identity).await?;
        self.refetch(api).await;
        Ok(())
    }

    /// Open the full-size view of one card.
    pub async fn zoom(&mut self, api: &dyn ImageApi, id: &ImageId) -> Result<&ImageDetail, Error> {
        self.listing.zoom(api, id).await
    }
}

async fn fetch(api: &dyn ImageApi, identity: &UserId, request: PageRequest) -> Listing {
    let result = api.list_my_images(identity, request).await;
    Listing::from_result(result, |_| true)
}

impl fmt::Display for MyImagesPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "My Images")?;
        writeln!(
            f,
            "Upload New: gallery {} | Gallery: gallery {} | Home: gallery {}",
            Route::Upload.command(),
            Route::Gallery.command(),
            Route::Home.command()
        )?;
        self.listing.render(
            f,
            "You haven't uploaded any images yet. Upload your first image!",
        )
    }
}
