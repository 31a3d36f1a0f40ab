//! Domain primitives, ports, and the shared authentication context.
//!
//! Purpose: Define strongly typed values exchanged between pages and the
//! remote gallery service, and validate form input before any call is made.
//!
//! Public surface:
//! - Error / ErrorCode: failure shown to the user, keyed by Connect code.
//! - User / UserId / EmailAddress: signed-in identity.
//! - LoginCredentials / Registration / ProfileUpdate: validated forms.
//! - Session / SessionToken / AuthContext: authentication state.
//! - ImageSummary / ImageDetail / ImageUpload / ImageEdit: gallery models.

pub mod auth;
pub mod error;
pub mod image;
pub mod ports;
pub mod session;
pub mod user;

pub use self::auth::{
    CredentialsValidationError, LoginCredentials, ProfileUpdate, REGISTERED_TOKEN, Registration,
    Session, SessionToken, SessionTokenValidationError,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::image::{
    ImageDetail, ImageEdit, ImageId, ImageIdValidationError, ImageMetadata, ImageSummary,
    ImageUpload, JPEG_CONTENT_TYPE, MAX_IMAGE_BYTES, UploadValidationError,
    check_upload_candidate, content_type_for,
};
pub use self::session::AuthContext;
pub use self::user::{EmailAddress, User, UserId, UserProfile, UserValidationError};

/// Result of a remote call.
pub type ApiResult<T> = Result<T, Error>;
