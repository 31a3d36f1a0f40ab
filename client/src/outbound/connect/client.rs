//! Connect client for the `users.v1` services.
//!
//! Implements the remote ports on top of [`ConnectTransport`]. Calls made on
//! behalf of a user go through an authenticated variant of the transport.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use super::dto::{
    DeleteImageResponseDto, GetImageResponseDto, GetUserResponseDto, IdRequestDto,
    ListImagesResponseDto, ListRequestDto, LoginRequestDto, LoginResponseDto, RegisterRequestDto,
    UpdateImageRequestDto, UpdateImageResponseDto, UpdateUserRequestDto, UploadImageRequestDto,
    UploadImageResponseDto, UserResponseDto,
};
use super::transport::ConnectTransport;
use crate::domain::ports::{AuthApi, ImageApi, UserApi};
use crate::domain::{
    ApiResult, Error, ImageDetail, ImageEdit, ImageId, ImageMetadata, ImageSummary, ImageUpload,
    LoginCredentials, ProfileUpdate, Registration, Session, User, UserId, UserProfile,
};

/// Fully qualified name of the authentication service.
pub const AUTH_SERVICE: &str = "users.v1.AuthService";
/// Fully qualified name of the user profile service.
pub const USER_SERVICE: &str = "users.v1.UserService";
/// Fully qualified name of the image service.
pub const IMAGE_SERVICE: &str = "users.v1.ImageService";

/// Gallery backend client speaking the Connect protocol.
#[derive(Debug, Clone)]
pub struct ConnectGalleryClient {
    transport: ConnectTransport,
}

impl ConnectGalleryClient {
    /// Wrap an anonymous transport.
    pub fn new(transport: ConnectTransport) -> Self {
        Self { transport }
    }

    /// Underlying anonymous transport.
    pub fn transport(&self) -> &ConnectTransport {
        &self.transport
    }
}

fn list_request(request: PageRequest) -> ApiResult<ListRequestDto> {
    let limit = i32::try_from(request.limit())
        .map_err(|err| Error::invalid_argument(format!("page limit out of range: {err}")))?;
    let offset = i32::try_from(request.offset())
        .map_err(|err| Error::invalid_argument(format!("page offset out of range: {err}")))?;
    Ok(ListRequestDto { limit, offset })
}

#[async_trait]
impl AuthApi for ConnectGalleryClient {
    async fn login(&self, credentials: &LoginCredentials) -> Result<Session, Error> {
        let request = LoginRequestDto {
            email: credentials.email(),
            password: credentials.password(),
        };
        let response: LoginResponseDto = self.transport.unary(AUTH_SERVICE, "Login", &request).await?;
        response.into_session()
    }

    async fn register(&self, registration: &Registration) -> Result<User, Error> {
        let request = RegisterRequestDto {
            email: registration.email(),
            password: registration.password(),
            display_name: registration.display_name(),
        };
        let response: UserResponseDto = self
            .transport
            .unary(AUTH_SERVICE, "Register", &request)
            .await?;
        response.into_user()
    }
}

#[async_trait]
impl UserApi for ConnectGalleryClient {
    async fn get_user(&self, id: &UserId) -> Result<UserProfile, Error> {
        let request = IdRequestDto { id: id.as_ref() };
        let response: GetUserResponseDto = self
            .transport
            .unary(USER_SERVICE, "GetUser", &request)
            .await?;
        response.into_profile()
    }

    async fn update_user(&self, identity: &UserId, update: &ProfileUpdate) -> Result<User, Error> {
        let request = UpdateUserRequestDto {
            current_password: update.current_password(),
            new_display_name: update.new_display_name(),
            new_email: update.new_email(),
            new_password: update.new_password(),
        };
        let response: UserResponseDto = self
            .transport
            .authenticated(identity)
            .unary(USER_SERVICE, "UpdateUser", &request)
            .await?;
        response.into_user()
    }
}

#[async_trait]
impl ImageApi for ConnectGalleryClient {
    async fn list_images(&self, request: PageRequest) -> Result<Page<ImageSummary>, Error> {
        let request = list_request(request)?;
        let response: ListImagesResponseDto = self
            .transport
            .unary(IMAGE_SERVICE, "ListImages", &request)
            .await?;
        response.into_page()
    }

    async fn list_my_images(
        &self,
        identity: &UserId,
        request: PageRequest,
    ) -> Result<Page<ImageSummary>, Error> {
        let request = list_request(request)?;
        let response: ListImagesResponseDto = self
            .transport
            .authenticated(identity)
            .unary(IMAGE_SERVICE, "ListMyImages", &request)
            .await?;
        response.into_page()
    }

    async fn get_image(&self, id: &ImageId) -> Result<ImageDetail, Error> {
        let request = IdRequestDto { id: id.as_ref() };
        let response: GetImageResponseDto = self
            .transport
            .unary(IMAGE_SERVICE, "GetImage", &request)
            .await?;
        response.into_detail()
    }

    async fn upload_image(
        &self,
        identity: &UserId,
        upload: &ImageUpload,
    ) -> Result<ImageId, Error> {
        let request = UploadImageRequestDto {
            filename: upload.filename(),
            content_type: upload.content_type(),
            data: upload.data(),
            title: upload.title(),
            description: upload.description(),
        };
        let response: UploadImageResponseDto = self
            .transport
            .authenticated(identity)
            .unary(IMAGE_SERVICE, "UploadImage", &request)
            .await?;
        response.into_image_id()
    }

    async fn update_image(
        &self,
        identity: &UserId,
        edit: &ImageEdit,
    ) -> Result<ImageMetadata, Error> {
        let request = UpdateImageRequestDto {
            id: edit.id.as_ref(),
            title: edit.title.as_deref(),
            description: edit.description.as_deref(),
        };
        let response: UpdateImageResponseDto = self
            .transport
            .authenticated(identity)
            .unary(IMAGE_SERVICE, "UpdateImage", &request)
            .await?;
        response.into_metadata()
    }

    async fn delete_image(&self, identity: &UserId, id: &ImageId) -> Result<(), Error> {
        let request = IdRequestDto { id: id.as_ref() };
        let _: DeleteImageResponseDto = self
            .transport
            .authenticated(identity)
            .unary(IMAGE_SERVICE, "DeleteImage", &request)
            .await?;
        Ok(())
    }
}
