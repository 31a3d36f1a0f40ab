//! Reqwest-backed Connect transport.
//!
//! Owns wire details only: procedure URLs, protocol headers, JSON encoding,
//! and mapping transport and status failures into domain errors. Calls are
//! unary and never retried.

use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderValue};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::domain::ports::define_port_error;
use crate::domain::{ApiResult, Error, ErrorCode, UserId};

/// Header carrying the Connect protocol version.
pub const PROTOCOL_VERSION_HEADER: &str = "Connect-Protocol-Version";

/// Header identifying the user an authenticated call acts for.
pub const USER_ID_HEADER: &str = "X-User-ID";

const JSON_CONTENT_TYPE: &str = "application/json";

define_port_error! {
    /// Errors raised while building a transport.
    pub enum TransportError {
        /// The configured base URL cannot be used.
        InvalidBaseUrl { url: String, message: String } => "invalid base URL {url}: {message}",
        /// The HTTP client could not be constructed.
        Client { message: String } => "HTTP client setup failed: {message}",
    }
}

/// Connect transport bound to one base URL.
///
/// A transport is anonymous unless created through
/// [`ConnectTransport::authenticated`], in which case every call carries the
/// `X-User-ID` header.
#[derive(Debug, Clone)]
pub struct ConnectTransport {
    client: Client,
    base_url: Url,
    identity: Option<UserId>,
}

impl ConnectTransport {
    /// Build an anonymous transport.
    ///
    /// `timeout` bounds each call; `None` waits indefinitely.
    ///
    /// # Errors
    /// Returns [`TransportError::InvalidBaseUrl`] when `base_url` is not an
    /// absolute HTTP(S) URL and [`TransportError::Client`] when the HTTP
    /// client cannot be constructed.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, TransportError> {
        let base_url = normalise_base_url(base_url)?;
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| TransportError::client(err.to_string()))?;
        Ok(Self {
            client,
            base_url,
            identity: None,
        })
    }

    /// Variant of this transport that acts for `identity`.
    pub fn authenticated(&self, identity: &UserId) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            identity: Some(identity.clone()),
        }
    }

    /// Base URL procedures are resolved against, always ending in `/`.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Identity attached to calls, if any.
    pub fn identity(&self) -> Option<&UserId> {
        self.identity.as_ref()
    }

    /// URL of `service`/`method`, e.g. `{base}/users.v1.AuthService/Login`.
    pub fn procedure_url(&self, service: &str, method: &str) -> ApiResult<Url> {
        self.base_url
            .join(&format!("{service}/{method}"))
            .map_err(|err| Error::internal(format!("invalid procedure {service}/{method}: {err}")))
    }

    /// Perform one unary call.
    ///
    /// # Errors
    /// Returns the server's Connect error verbatim for non-2xx responses,
    /// [`ErrorCode::Unavailable`] or [`ErrorCode::DeadlineExceeded`] when the
    /// request cannot complete, and [`ErrorCode::Internal`] when a message
    /// cannot be encoded or decoded.
    pub async fn unary<Req, Resp>(&self, service: &str, method: &str, request: &Req) -> ApiResult<Resp>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let url = self.procedure_url(service, method)?;
        let body = serde_json::to_vec(request)
            .map_err(|err| Error::internal(format!("failed to encode {method} request: {err}")))?;
        debug!(
            service,
            method,
            authenticated = self.identity.is_some(),
            "sending connect request"
        );

        let mut builder = self
            .client
            .post(url)
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .header(PROTOCOL_VERSION_HEADER, "1")
            .body(body);
        if let Some(identity) = &self.identity {
            let value = HeaderValue::from_str(identity.as_ref())
                .map_err(|err| Error::invalid_argument(format!("invalid user id header: {err}")))?;
            builder = builder.header(USER_ID_HEADER, value);
        }

        let response = builder.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            let err = map_status_error(status, body.as_ref());
            debug!(service, method, code = %err.code(), "connect request failed");
            return Err(err);
        }

        serde_json::from_slice(body.as_ref())
            .map_err(|err| Error::internal(format!("invalid {method} response: {err}")))
    }
}

fn normalise_base_url(raw: &str) -> Result<Url, TransportError> {
    let trimmed = raw.trim();
    let mut url = Url::parse(trimmed)
        .map_err(|err| TransportError::invalid_base_url(trimmed, err.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(TransportError::invalid_base_url(
            trimmed,
            "scheme must be http or https",
        ));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(TransportError::invalid_base_url(
            trimmed,
            "must not carry a query or fragment",
        ));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[derive(Debug, Deserialize)]
struct ConnectErrorDto {
    code: Option<String>,
    message: Option<String>,
}

fn map_transport_error(error: reqwest::Error) -> Error {
    if error.is_timeout() {
        Error::deadline_exceeded(error.to_string())
    } else {
        Error::unavailable(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> Error {
    let connect_error = serde_json::from_slice::<ConnectErrorDto>(body)
        .ok()
        .and_then(|dto| {
            let code = dto.code.as_deref().and_then(ErrorCode::from_wire)?;
            Some(Error::from_remote(code, dto.message))
        });
    if let Some(err) = connect_error {
        return err;
    }

    let code = ErrorCode::from_http_status(status.as_u16());
    let preview = body_preview(body);
    let message = if preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {preview}", status.as_u16())
    };
    Error::from_remote(code, Some(message))
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
