//! Client configuration loaded via OrthoConfig.
//!
//! Values come from `GALLERY_*` environment variables and the configuration
//! file; global command line flags override them afterwards.

use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use pagination::{DEFAULT_LIMIT, PageRequest, PageRequestError};
use serde::Deserialize;

/// Backend address used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

const STORAGE_DIR_NAME: &str = "gallery";

fn default_storage_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(STORAGE_DIR_NAME)
}

/// Settings for one client invocation.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "GALLERY")]
pub struct ClientSettings {
    /// Base URL of the gallery backend.
    pub base_url: Option<String>,
    /// Directory holding the persisted session.
    pub storage_dir: Option<PathBuf>,
    /// Number of images requested per list page.
    pub page_limit: Option<u32>,
    /// Upper bound for a single call, in seconds.
    pub request_timeout_secs: Option<u64>,
    /// Emit logs as JSON lines instead of plain text.
    #[ortho_config(default = false)]
    pub json_logs: bool,
}

impl ClientSettings {
    /// Return the configured base URL, falling back to the default.
    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    /// Return the configured storage directory, falling back to the platform
    /// data directory.
    pub fn storage_dir(&self) -> PathBuf {
        self.storage_dir.clone().unwrap_or_else(default_storage_dir)
    }

    /// First list page using the configured limit.
    ///
    /// # Errors
    /// Returns [`PageRequestError`] when the configured limit is out of range.
    pub fn page_request(&self) -> Result<PageRequest, PageRequestError> {
        PageRequest::new(self.page_limit.unwrap_or(DEFAULT_LIMIT), 0)
    }

    /// Per-call timeout, when configured.
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for client configuration parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    fn load_from_empty_args() -> ClientSettings {
        ClientSettings::load_from_iter([OsString::from("gallery")]).expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env([
            ("GALLERY_BASE_URL", None::<String>),
            ("GALLERY_STORAGE_DIR", None::<String>),
            ("GALLERY_PAGE_LIMIT", None::<String>),
            ("GALLERY_REQUEST_TIMEOUT_SECS", None::<String>),
            ("GALLERY_JSON_LOGS", None::<String>),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(settings.base_url(), DEFAULT_BASE_URL);
        assert_eq!(settings.storage_dir(), default_storage_dir());
        assert_eq!(settings.page_request(), Ok(PageRequest::first()));
        assert!(settings.request_timeout().is_none());
        assert!(!settings.json_logs);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("GALLERY_BASE_URL", Some("https://gallery.example.com/api".to_owned())),
            ("GALLERY_STORAGE_DIR", Some("/tmp/gallery-session".to_owned())),
            ("GALLERY_PAGE_LIMIT", Some("20".to_owned())),
            ("GALLERY_REQUEST_TIMEOUT_SECS", Some("7".to_owned())),
            ("GALLERY_JSON_LOGS", Some("true".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(settings.base_url(), "https://gallery.example.com/api");
        assert_eq!(settings.storage_dir(), PathBuf::from("/tmp/gallery-session"));
        assert_eq!(settings.page_request().map(PageRequest::limit), Ok(20));
        assert_eq!(settings.request_timeout(), Some(Duration::from_secs(7)));
        assert!(settings.json_logs);
    }

    #[rstest]
    fn out_of_range_page_limit_is_reported() {
        let settings = ClientSettings {
            base_url: None,
            storage_dir: None,
            page_limit: Some(0),
            request_timeout_secs: None,
            json_logs: false,
        };
        assert_eq!(settings.page_request(), Err(PageRequestError::ZeroLimit));
    }
}
