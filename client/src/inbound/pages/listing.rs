//! Loaded-or-failed state shared by the image list pages.

use std::fmt;

use pagination::Page;

use crate::domain::{Error, ImageDetail, ImageId, ImageSummary};
use crate::domain::ports::ImageApi;
use crate::inbound::components::ImageCard;

/// Result of the last list query.
#[derive(Debug, Clone)]
pub(super) enum Listing {
    Loaded { cards: Vec<ImageCard>, total: u32 },
    Failed(String),
}

impl Listing {
    pub(super) fn from_result(
        result: Result<Page<ImageSummary>, Error>,
        is_owner: impl Fn(&ImageSummary) -> bool,
    ) -> Self {
        match result {
            Ok(page) => {
                let total = page.total();
                let cards = page
                    .into_items()
                    .into_iter()
                    .map(|image| {
                        let owned = is_owner(&image);
                        ImageCard::new(image, owned)
                    })
                    .collect();
                Self::Loaded { cards, total }
            }
            Err(err) => Self::Failed(err.message().to_owned()),
        }
    }

    pub(super) fn cards(&self) -> &[ImageCard] {
        match self {
            Self::Loaded { cards, .. } => cards.as_slice(),
            Self::Failed(_) => &[],
        }
    }

    pub(super) fn total(&self) -> u32 {
        match self {
            Self::Loaded { total, .. } => *total,
            Self::Failed(_) => 0,
        }
    }

    pub(super) fn error(&self) -> Option<&str> {
        match self {
            Self::Loaded { .. } => None,
            Self::Failed(message) => Some(message.as_str()),
        }
    }

    pub(super) fn card_mut(&mut self, id: &ImageId) -> Option<&mut ImageCard> {
        match self {
            Self::Loaded { cards, .. } => cards.iter_mut().find(|card| &card.image().id == id),
            Self::Failed(_) => None,
        }
    }

    pub(super) async fn zoom(
        &mut self,
        api: &dyn ImageApi,
        id: &ImageId,
    ) -> Result<&ImageDetail, Error> {
        let card = self
            .card_mut(id)
            .ok_or_else(|| Error::not_found(format!("image {id} is not on this page")))?;
        card.zoom(api).await
    }

    /// Cards followed by the total footer; `empty` is written when there are
    /// no images.
    pub(super) fn render(&self, f: &mut fmt::Formatter<'_>, empty: &str) -> fmt::Result {
        if let Self::Failed(message) = self {
            return writeln!(f, "Error: {message}");
        }
        let cards = self.cards();
        if cards.is_empty() {
            writeln!(f, "{empty}")?;
        } else {
            for card in cards {
                write!(f, "{card}")?;
            }
        }
        writeln!(f, "Total: {} images", self.total())
    }
}
