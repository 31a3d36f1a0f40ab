//! Image view models and upload validation.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::user::UserId;

/// Only content type accepted for uploads.
pub const JPEG_CONTENT_TYPE: &str = "image/jpeg";

/// Largest upload accepted, in bytes (5 MiB).
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Validation errors for image identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageIdValidationError {
    Empty,
}

impl fmt::Display for ImageIdValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "image id must not be empty"),
        }
    }
}

impl std::error::Error for ImageIdValidationError {}

/// Stable image identifier issued by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ImageId(String);

impl ImageId {
    /// Validate and construct an [`ImageId`].
    pub fn new(id: impl Into<String>) -> Result<Self, ImageIdValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ImageIdValidationError::Empty);
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for ImageId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<ImageId> for String {
    fn from(value: ImageId) -> Self {
        value.0
    }
}

impl TryFrom<String> for ImageId {
    type Error = ImageIdValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

fn display_title<'a>(title: &'a str, filename: &'a str) -> &'a str {
    if title.is_empty() { filename } else { title }
}

/// Gallery entry as returned by the list queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSummary {
    pub id: ImageId,
    pub owner_id: String,
    pub owner_display_name: String,
    pub filename: String,
    pub title: String,
    pub created_at: String,
    pub thumbnail: Vec<u8>,
}

impl ImageSummary {
    /// Title when set, otherwise the original filename.
    pub fn display_title(&self) -> &str {
        display_title(&self.title, &self.filename)
    }

    /// Whether `user` owns this image.
    pub fn is_owned_by(&self, user: &UserId) -> bool {
        self.owner_id == user.as_ref()
    }
}

/// Full image as returned by `GetImage`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageDetail {
    pub id: ImageId,
    pub owner_id: String,
    pub owner_display_name: String,
    pub filename: String,
    pub content_type: String,
    pub title: String,
    pub description: String,
    pub created_at: String,
    pub data: Vec<u8>,
}

impl ImageDetail {
    /// Title when set, otherwise the original filename.
    pub fn display_title(&self) -> &str {
        display_title(&self.title, &self.filename)
    }
}

/// Reasons an upload is refused before it reaches the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadValidationError {
    /// No file was chosen.
    MissingFile,
    /// The file is not a JPEG.
    UnsupportedContentType { content_type: String },
    /// The file exceeds [`MAX_IMAGE_BYTES`].
    TooLarge { size: usize },
}

impl fmt::Display for UploadValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingFile => write!(f, "Please select an image"),
            Self::UnsupportedContentType { .. } => write!(f, "Only JPEG images are supported"),
            Self::TooLarge { .. } => write!(f, "Image too large (max 5MB)"),
        }
    }
}

impl std::error::Error for UploadValidationError {}

/// Content type implied by a filename extension, the way a browser labels a
/// picked file.
///
/// # Examples
/// ```
/// use client::domain::content_type_for;
///
/// assert_eq!(content_type_for("cat.JPG"), Some("image/jpeg"));
/// assert_eq!(content_type_for("cat.png"), Some("image/png"));
/// assert_eq!(content_type_for("notes"), None);
/// ```
pub fn content_type_for(filename: &str) -> Option<&'static str> {
    let (_, extension) = filename.rsplit_once('.')?;
    match extension.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" | "jpe" | "jfif" => Some(JPEG_CONTENT_TYPE),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        "svg" => Some("image/svg+xml"),
        _ => None,
    }
}

/// Check that a picked file may be uploaded.
///
/// The type is checked before the size so a large PNG reports the type.
pub fn check_upload_candidate(
    content_type: Option<&str>,
    size: usize,
) -> Result<(), UploadValidationError> {
    if content_type != Some(JPEG_CONTENT_TYPE) {
        return Err(UploadValidationError::UnsupportedContentType {
            content_type: content_type.unwrap_or_default().to_owned(),
        });
    }
    if size > MAX_IMAGE_BYTES {
        return Err(UploadValidationError::TooLarge { size });
    }
    Ok(())
}

/// Validated upload request.
///
/// ## Invariants
/// - `content_type` is [`JPEG_CONTENT_TYPE`].
/// - `data` holds at most [`MAX_IMAGE_BYTES`] bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    filename: String,
    data: Vec<u8>,
    title: String,
    description: String,
}

impl ImageUpload {
    /// Validate a picked file and the optional metadata entered with it.
    pub fn try_new(
        filename: impl Into<String>,
        content_type: Option<&str>,
        data: Vec<u8>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, UploadValidationError> {
        check_upload_candidate(content_type, data.len())?;
        Ok(Self {
            filename: filename.into(),
            data,
            title: title.into(),
            description: description.into(),
        })
    }

    /// Original filename.
    pub fn filename(&self) -> &str {
        self.filename.as_str()
    }

    /// Content type sent with the upload.
    pub fn content_type(&self) -> &'static str {
        JPEG_CONTENT_TYPE
    }

    /// Raw file bytes.
    pub fn data(&self) -> &[u8] {
        self.data.as_slice()
    }

    /// Optional title, empty when not set.
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// Optional description, empty when not set.
    pub fn description(&self) -> &str {
        self.description.as_str()
    }
}

/// Owner edit of an image's metadata. `None` leaves a field unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageEdit {
    pub id: ImageId,
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Metadata returned after an edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageMetadata {
    pub id: ImageId,
    pub title: String,
    pub description: String,
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    fn summary(title: &str, filename: &str) -> ImageSummary {
        ImageSummary {
            id: ImageId::new("img-1").expect("image id"),
            owner_id: "owner-1".to_owned(),
            owner_display_name: "Ada".to_owned(),
            filename: filename.to_owned(),
            title: title.to_owned(),
            created_at: "2024-03-01T10:00:00Z".to_owned(),
            thumbnail: Vec::new(),
        }
    }

    #[rstest]
    #[case("Sunset", "IMG_001.jpg", "Sunset")]
    #[case("", "IMG_001.jpg", "IMG_001.jpg")]
    fn display_title_falls_back_to_filename(
        #[case] title: &str,
        #[case] filename: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(summary(title, filename).display_title(), expected);
    }

    #[rstest]
    fn ownership_compares_user_ids() {
        let image = summary("", "a.jpg");
        let owner = UserId::new("owner-1").expect("user id");
        let other = UserId::new("owner-2").expect("user id");
        assert!(image.is_owned_by(&owner));
        assert!(!image.is_owned_by(&other));
    }

    #[rstest]
    #[case(Some("image/png"), 10, "Only JPEG images are supported")]
    #[case(None, 10, "Only JPEG images are supported")]
    #[case(Some("image/png"), MAX_IMAGE_BYTES + 1, "Only JPEG images are supported")]
    #[case(Some(JPEG_CONTENT_TYPE), MAX_IMAGE_BYTES + 1, "Image too large (max 5MB)")]
    fn rejects_unsupported_candidates(
        #[case] content_type: Option<&str>,
        #[case] size: usize,
        #[case] message: &str,
    ) {
        let err = check_upload_candidate(content_type, size).expect_err("candidate must fail");
        assert_eq!(err.to_string(), message);
    }

    #[rstest]
    #[case(0)]
    #[case(MAX_IMAGE_BYTES)]
    fn accepts_jpegs_up_to_the_limit(#[case] size: usize) {
        assert!(check_upload_candidate(Some(JPEG_CONTENT_TYPE), size).is_ok());
    }

    #[rstest]
    fn upload_keeps_optional_metadata_empty() {
        let upload = ImageUpload::try_new("cat.jpg", Some(JPEG_CONTENT_TYPE), vec![0xFF, 0xD8], "", "")
            .expect("valid upload");
        assert_eq!(upload.filename(), "cat.jpg");
        assert_eq!(upload.content_type(), JPEG_CONTENT_TYPE);
        assert_eq!(upload.data(), &[0xFF, 0xD8]);
        assert_eq!(upload.title(), "");
    }

    #[rstest]
    #[case("photo.jpeg", Some(JPEG_CONTENT_TYPE))]
    #[case("photo.Jpg", Some(JPEG_CONTENT_TYPE))]
    #[case("photo.tar.gz", None)]
    #[case(".jpg", Some(JPEG_CONTENT_TYPE))]
    fn content_type_follows_extension(#[case] filename: &str, #[case] expected: Option<&str>) {
        assert_eq!(content_type_for(filename), expected);
    }

    #[rstest]
    fn image_id_rejects_blank_values() {
        assert_eq!(ImageId::new(" "), Err(ImageIdValidationError::Empty));
    }
}
