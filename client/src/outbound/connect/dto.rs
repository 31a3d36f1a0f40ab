//! Wire DTOs for the `users.v1` Connect services.
//!
//! Messages use the proto3 JSON mapping: camelCase fields, default values
//! may be omitted by the server, `bytes` travel as base64 and `int32` as JSON
//! numbers. The adapter decodes into these types first, then maps into domain
//! values in one pass.

use pagination::Page;
use serde::{Deserialize, Serialize};

use crate::domain::{
    Error, ImageDetail, ImageId, ImageMetadata, ImageSummary, Session, SessionToken, User,
    UserProfile,
};

pub(super) mod base64_bytes {
    //! Proto3 `bytes` fields: standard base64 on write; standard or URL-safe,
    //! padded or not, on read.

    use base64::Engine as _;
    use base64::alphabet;
    use base64::engine::general_purpose::STANDARD;
    use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
    use serde::{Deserialize, Deserializer, Serializer, de};

    const LENIENT: GeneralPurposeConfig =
        GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent);
    const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, LENIENT);
    const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, LENIENT);

    pub(crate) fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<u8>, D::Error> {
        let encoded = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        STANDARD_LENIENT
            .decode(&encoded)
            .or_else(|_| URL_SAFE_LENIENT.decode(&encoded))
            .map_err(de::Error::custom)
    }
}

fn invalid_response(what: &str, err: impl std::fmt::Display) -> Error {
    Error::internal(format!("invalid {what} in response: {err}"))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct LoginRequestDto<'a> {
    pub(super) email: &'a str,
    pub(super) password: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct LoginResponseDto {
    #[serde(default)]
    pub(super) session_token: String,
    #[serde(default)]
    pub(super) user_id: String,
    #[serde(default)]
    pub(super) display_name: String,
    #[serde(default)]
    pub(super) email: String,
}

impl LoginResponseDto {
    pub(super) fn into_session(self) -> Result<Session, Error> {
        let token = SessionToken::new(self.session_token)
            .map_err(|err| invalid_response("session token", err))?;
        let user = User::try_from_strings(self.user_id, self.display_name, self.email)
            .map_err(|err| invalid_response("user", err))?;
        Ok(Session::new(token, user))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RegisterRequestDto<'a> {
    pub(super) email: &'a str,
    pub(super) password: &'a str,
    pub(super) display_name: &'a str,
}

/// Shared by `Register` and `UpdateUser`, which answer with the same fields.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct UserResponseDto {
    #[serde(default)]
    pub(super) user_id: String,
    #[serde(default)]
    pub(super) display_name: String,
    #[serde(default)]
    pub(super) email: String,
}

impl UserResponseDto {
    pub(super) fn into_user(self) -> Result<User, Error> {
        User::try_from_strings(self.user_id, self.display_name, self.email)
            .map_err(|err| invalid_response("user", err))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct UpdateUserRequestDto<'a> {
    pub(super) current_password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) new_display_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) new_email: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) new_password: Option<&'a str>,
}

/// Request carrying only an id: `GetUser`, `GetImage`, `DeleteImage`.
#[derive(Debug, Serialize)]
pub(super) struct IdRequestDto<'a> {
    pub(super) id: &'a str,
}

#[derive(Debug, Deserialize)]
pub(super) struct GetUserResponseDto {
    #[serde(default)]
    pub(super) id: String,
    #[serde(default)]
    pub(super) name: String,
    #[serde(default)]
    pub(super) email: String,
}

impl GetUserResponseDto {
    pub(super) fn into_profile(self) -> Result<UserProfile, Error> {
        let user = User::try_from_strings(self.id, self.name, self.email)
            .map_err(|err| invalid_response("user", err))?;
        Ok(UserProfile {
            id: user.id().clone(),
            name: user.display_name().to_owned(),
            email: user.email().to_owned(),
        })
    }
}

#[derive(Debug, Serialize)]
pub(super) struct ListRequestDto {
    pub(super) limit: i32,
    pub(super) offset: i32,
}

#[derive(Debug, Deserialize)]
pub(super) struct ListImagesResponseDto {
    #[serde(default)]
    pub(super) images: Vec<ImageInfoDto>,
    #[serde(default)]
    pub(super) total: i32,
}

impl ListImagesResponseDto {
    pub(super) fn into_page(self) -> Result<Page<ImageSummary>, Error> {
        let total = u32::try_from(self.total).map_err(|err| invalid_response("total", err))?;
        let items = self
            .images
            .into_iter()
            .map(ImageInfoDto::into_summary)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page::new(items, total))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ImageInfoDto {
    #[serde(default)]
    pub(super) id: String,
    #[serde(default)]
    pub(super) owner_id: String,
    #[serde(default)]
    pub(super) owner_display_name: String,
    #[serde(default)]
    pub(super) filename: String,
    #[serde(default)]
    pub(super) title: String,
    #[serde(default)]
    pub(super) created_at: String,
    #[serde(default, with = "base64_bytes")]
    pub(super) thumbnail: Vec<u8>,
}

impl ImageInfoDto {
    fn into_summary(self) -> Result<ImageSummary, Error> {
        Ok(ImageSummary {
            id: ImageId::new(self.id).map_err(|err| invalid_response("image", err))?,
            owner_id: self.owner_id,
            owner_display_name: self.owner_display_name,
            filename: self.filename,
            title: self.title,
            created_at: self.created_at,
            thumbnail: self.thumbnail,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct GetImageResponseDto {
    #[serde(default)]
    pub(super) id: String,
    #[serde(default)]
    pub(super) owner_id: String,
    #[serde(default)]
    pub(super) owner_display_name: String,
    #[serde(default)]
    pub(super) filename: String,
    #[serde(default)]
    pub(super) content_type: String,
    #[serde(default, with = "base64_bytes")]
    pub(super) data: Vec<u8>,
    #[serde(default)]
    pub(super) title: String,
    #[serde(default)]
    pub(super) description: String,
    #[serde(default)]
    pub(super) created_at: String,
}

impl GetImageResponseDto {
    pub(super) fn into_detail(self) -> Result<ImageDetail, Error> {
        Ok(ImageDetail {
            id: ImageId::new(self.id).map_err(|err| invalid_response("image", err))?,
            owner_id: self.owner_id,
            owner_display_name: self.owner_display_name,
            filename: self.filename,
            content_type: self.content_type,
            title: self.title,
            description: self.description,
            created_at: self.created_at,
            data: self.data,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct UploadImageRequestDto<'a> {
    pub(super) filename: &'a str,
    pub(super) content_type: &'a str,
    #[serde(serialize_with = "base64_bytes::serialize")]
    pub(super) data: &'a [u8],
    pub(super) title: &'a str,
    pub(super) description: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct UploadImageResponseDto {
    #[serde(default)]
    pub(super) image_id: String,
}

impl UploadImageResponseDto {
    pub(super) fn into_image_id(self) -> Result<ImageId, Error> {
        ImageId::new(self.image_id).map_err(|err| invalid_response("image id", err))
    }
}

#[derive(Debug, Serialize)]
pub(super) struct UpdateImageRequestDto<'a> {
    pub(super) id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) description: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
pub(super) struct UpdateImageResponseDto {
    #[serde(default)]
    pub(super) id: String,
    #[serde(default)]
    pub(super) title: String,
    #[serde(default)]
    pub(super) description: String,
}

impl UpdateImageResponseDto {
    pub(super) fn into_metadata(self) -> Result<ImageMetadata, Error> {
        Ok(ImageMetadata {
            id: ImageId::new(self.id).map_err(|err| invalid_response("image", err))?,
            title: self.title,
            description: self.description,
        })
    }
}

/// `DeleteImage` answers `{"success": true}`; a 2xx status already says so.
#[derive(Debug, Deserialize)]
pub(super) struct DeleteImageResponseDto {}
