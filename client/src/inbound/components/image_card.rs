//! Image card with zoom and owner-only, two-step delete.

use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Local, NaiveDateTime};
use tracing::debug;

use crate::domain::ports::ImageApi;
use crate::domain::{
    Error, ErrorCode, ImageDetail, ImageSummary, JPEG_CONTENT_TYPE, UserId,
};

/// Where the card is in the delete flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteState {
    /// No delete requested.
    Idle,
    /// Delete requested; waiting for confirmation.
    Confirming,
}

/// Encode bytes as a `data:` URL, or `None` when there are no bytes.
///
/// # Examples
/// ```
/// use client::inbound::components::data_url;
///
/// assert_eq!(data_url(&[0xFF, 0xD8, 0xFF], "image/jpeg").as_deref(), Some("data:image/jpeg;base64,/9j/"));
/// assert_eq!(data_url(&[], "image/jpeg"), None);
/// ```
pub fn data_url(bytes: &[u8], content_type: &str) -> Option<String> {
    if bytes.is_empty() {
        return None;
    }
    Some(format!("data:{content_type};base64,{}", STANDARD.encode(bytes)))
}

/// Format a backend timestamp as a local calendar date, or return it
/// unchanged when it cannot be parsed.
pub fn format_date(raw: &str) -> String {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.with_timezone(&Local).format("%Y-%m-%d").to_string();
    }
    for pattern in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, pattern) {
            return parsed.and_utc().with_timezone(&Local).format("%Y-%m-%d").to_string();
        }
    }
    raw.to_owned()
}

/// One image in a gallery grid.
///
/// The full image is fetched only when the card is zoomed and then kept.
/// Deleting requires [`ImageCard::request_delete`] followed by
/// [`ImageCard::confirm_delete`]; nothing is sent before the second step.
#[derive(Debug, Clone)]
pub struct ImageCard {
    image: ImageSummary,
    is_owner: bool,
    delete_state: DeleteState,
    full_image: Option<ImageDetail>,
}

impl ImageCard {
    /// Card for `image`; `is_owner` enables the delete affordance.
    pub fn new(image: ImageSummary, is_owner: bool) -> Self {
        Self {
            image,
            is_owner,
            delete_state: DeleteState::Idle,
            full_image: None,
        }
    }

    /// Image shown by this card.
    pub fn image(&self) -> &ImageSummary {
        &self.image
    }

    /// Whether delete is offered.
    pub fn is_owner(&self) -> bool {
        self.is_owner
    }

    /// Current step of the delete flow.
    pub fn delete_state(&self) -> DeleteState {
        self.delete_state
    }

    /// Thumbnail as a `data:` URL. Thumbnails are always JPEG.
    pub fn thumbnail_url(&self) -> Option<String> {
        data_url(&self.image.thumbnail, JPEG_CONTENT_TYPE)
    }

    /// Full image as a `data:` URL, once zoomed.
    pub fn full_image_url(&self) -> Option<String> {
        self.full_image
            .as_ref()
            .and_then(|detail| data_url(&detail.data, &detail.content_type))
    }

    /// Full image, once zoomed.
    pub fn full_image(&self) -> Option<&ImageDetail> {
        self.full_image.as_ref()
    }

    /// First delete step. Returns `false` when the viewer does not own the
    /// image.
    pub fn request_delete(&mut self) -> bool {
        if !self.is_owner {
            return false;
        }
        self.delete_state = DeleteState::Confirming;
        true
    }

    /// Abandon a requested delete.
    pub fn cancel_delete(&mut self) {
        self.delete_state = DeleteState::Idle;
    }

    /// Second delete step: send `DeleteImage` on behalf of `identity`.
    ///
    /// On failure the card stays in [`DeleteState::Confirming`] so the user
    /// can retry or cancel.
    ///
    /// # Errors
    /// Returns [`ErrorCode::FailedPrecondition`] when no delete was requested,
    /// otherwise the remote error.
    pub async fn confirm_delete(
        &mut self,
        api: &dyn ImageApi,
        identity: &UserId,
    ) -> Result<(), Error> {
        if self.delete_state != DeleteState::Confirming {
            return Err(Error::new(
                ErrorCode::FailedPrecondition,
                "Delete must be requested before it is confirmed",
            ));
        }
        api.delete_image(identity, &self.image.id).await?;
        debug!(image_id = %self.image.id, "image deleted");
        self.delete_state = DeleteState::Idle;
        Ok(())
    }

    /// Open the full-size view, fetching the image on first use.
    pub async fn zoom(&mut self, api: &dyn ImageApi) -> Result<&ImageDetail, Error> {
        let detail = match self.full_image.take() {
            Some(detail) => detail,
            None => api.get_image(&self.image.id).await?,
        };
        Ok(self.full_image.insert(detail))
    }
}

impl fmt::Display for ImageCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}  [{}]", self.image.display_title(), self.image.id)?;
        writeln!(f, "  By: {}", self.image.owner_display_name)?;
        writeln!(f, "  {}", format_date(&self.image.created_at))?;
        if self.image.thumbnail.is_empty() {
            writeln!(f, "  No preview")?;
        } else {
            writeln!(f, "  Preview: {} bytes", self.image.thumbnail.len())?;
        }
        if self.is_owner {
            match self.delete_state {
                DeleteState::Idle => writeln!(f, "  [Delete]")?,
                DeleteState::Confirming => writeln!(f, "  [Confirm] [Cancel]")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ImageId;
    use crate::domain::ports::MockImageApi;
    use rstest::{fixture, rstest};

    #[fixture]
    fn summary() -> ImageSummary {
        ImageSummary {
            id: ImageId::new("img-1").expect("image id"),
            owner_id: "u-1".to_owned(),
            owner_display_name: "Ada".to_owned(),
            filename: "cat.jpg".to_owned(),
            title: String::new(),
            created_at: "2024-03-01T12:00:00Z".to_owned(),
            thumbnail: vec![0xFF, 0xD8, 0xFF],
        }
    }

    fn detail() -> ImageDetail {
        ImageDetail {
            id: ImageId::new("img-1").expect("image id"),
            owner_id: "u-1".to_owned(),
            owner_display_name: "Ada".to_owned(),
            filename: "cat.jpg".to_owned(),
            content_type: "image/jpeg".to_owned(),
            title: String::new(),
            description: String::new(),
            created_at: "2024-03-01T12:00:00Z".to_owned(),
            data: vec![1, 2, 3],
        }
    }

    fn owner() -> UserId {
        UserId::new("u-1").expect("user id")
    }

    #[rstest]
    #[case("not a date", "not a date")]
    #[case("", "")]
    fn unparsable_dates_are_shown_raw(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(format_date(raw), expected);
    }

    #[rstest]
    fn parsable_dates_are_shown_as_local_dates() {
        let expected = DateTime::parse_from_rfc3339("2024-03-01T12:00:00Z")
            .expect("timestamp")
            .with_timezone(&Local)
            .format("%Y-%m-%d")
            .to_string();
        assert_eq!(format_date("2024-03-01T12:00:00Z"), expected);
        assert_eq!(format_date("2024-03-01 12:00:00.123"), expected);
    }

    #[rstest]
    fn thumbnail_becomes_jpeg_data_url(summary: ImageSummary) {
        let card = ImageCard::new(summary, false);
        assert_eq!(
            card.thumbnail_url().as_deref(),
            Some("data:image/jpeg;base64,/9j/")
        );
    }

    #[rstest]
    fn non_owners_cannot_start_a_delete(summary: ImageSummary) {
        let mut card = ImageCard::new(summary, false);
        assert!(!card.request_delete());
        assert_eq!(card.delete_state(), DeleteState::Idle);
        assert!(!card.to_string().contains("[Delete]"));
    }

    #[rstest]
    #[tokio::test]
    async fn confirm_without_request_sends_nothing(summary: ImageSummary) {
        let mut api = MockImageApi::new();
        api.expect_delete_image().times(0);
        let mut card = ImageCard::new(summary, true);

        let err = card
            .confirm_delete(&api, &owner())
            .await
            .expect_err("confirmation requires a request");
        assert_eq!(err.code(), ErrorCode::FailedPrecondition);
    }

    #[rstest]
    #[tokio::test]
    async fn cancel_returns_to_idle_without_calling(summary: ImageSummary) {
        let mut api = MockImageApi::new();
        api.expect_delete_image().times(0);
        let mut card = ImageCard::new(summary, true);

        assert!(card.request_delete());
        assert_eq!(card.delete_state(), DeleteState::Confirming);
        card.cancel_delete();
        assert_eq!(card.delete_state(), DeleteState::Idle);
        assert!(card.confirm_delete(&api, &owner()).await.is_err());
    }

    #[rstest]
    #[tokio::test]
    async fn request_then_confirm_deletes_once(summary: ImageSummary) {
        let mut api = MockImageApi::new();
        api.expect_delete_image()
            .withf(|identity, id| identity.as_ref() == "u-1" && id.as_ref() == "img-1")
            .times(1)
            .return_once(|_, _| Ok(()));
        let mut card = ImageCard::new(summary, true);

        card.request_delete();
        card.confirm_delete(&api, &owner()).await.expect("delete");
        assert_eq!(card.delete_state(), DeleteState::Idle);
    }

    #[rstest]
    #[tokio::test]
    async fn failed_delete_stays_confirming(summary: ImageSummary) {
        let mut api = MockImageApi::new();
        api.expect_delete_image()
            .times(1)
            .return_once(|_, _| Err(Error::permission_denied("you can only delete your own images")));
        let mut card = ImageCard::new(summary, true);

        card.request_delete();
        let err = card.confirm_delete(&api, &owner()).await.expect_err("delete fails");
        assert_eq!(err.message(), "you can only delete your own images");
        assert_eq!(card.delete_state(), DeleteState::Confirming);
    }

    #[rstest]
    #[tokio::test]
    async fn zoom_fetches_full_image_once(summary: ImageSummary) {
        let mut api = MockImageApi::new();
        api.expect_get_image()
            .times(1)
            .return_once(|_| Ok(detail()));
        let mut card = ImageCard::new(summary, false);
        assert!(card.full_image_url().is_none());

        card.zoom(&api).await.expect("first zoom");
        let second = card.zoom(&api).await.expect("second zoom");
        assert_eq!(second.data, vec![1, 2, 3]);
        assert_eq!(card.full_image_url().as_deref(), Some("data:image/jpeg;base64,AQID"));
    }
}
