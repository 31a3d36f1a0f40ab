//! Image upload page.

use std::fmt;

use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs::Dir;

use crate::domain::ports::ImageApi;
use crate::domain::{
    AuthContext, ImageUpload, UploadValidationError, check_upload_candidate, content_type_for,
};

use super::{PageOutcome, Route, require_identity, write_message};

/// File picked for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub filename: String,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

/// Upload form: one JPEG plus optional title and description.
///
/// A picked file is checked immediately; a rejected pick shows the reason and
/// keeps any earlier valid selection.
#[derive(Debug, Clone)]
pub struct UploadPage {
    file: Option<SelectedFile>,
    title: String,
    description: String,
    error: Option<String>,
}

impl UploadPage {
    /// Open the page for the signed-in user.
    ///
    /// # Errors
    /// Returns the login route when nobody is signed in.
    pub fn open(auth: &AuthContext) -> Result<Self, Route> {
        require_identity(auth)?;
        Ok(Self {
            file: None,
            title: String::new(),
            description: String::new(),
            error: None,
        })
    }

    /// Pick an in-memory file. Returns whether it was accepted.
    pub fn select(&mut self, file: SelectedFile) -> bool {
        match check_upload_candidate(file.content_type.as_deref(), file.data.len()) {
            Ok(()) => {
                self.file = Some(file);
                self.error = None;
                true
            }
            Err(err) => {
                self.error = Some(err.to_string());
                false
            }
        }
    }

    /// Pick a file from disk. The content type comes from the extension and
    /// the size is checked before the file is read.
    pub fn select_path(&mut self, path: &Utf8Path) -> bool {
        let Some(filename) = path.file_name() else {
            self.error = Some(format!("{path} is not a file"));
            return false;
        };
        let content_type = content_type_for(filename);

        let parent = match path.parent() {
            Some(parent) if !parent.as_str().is_empty() => parent,
            _ => Utf8Path::new("."),
        };
        let read = Dir::open_ambient_dir(parent, ambient_authority()).and_then(|dir| {
            let size = dir.metadata(filename)?.len();
            Ok((dir, usize::try_from(size).unwrap_or(usize::MAX)))
        });
        let (dir, size) = match read {
            Ok(found) => found,
            Err(err) => {
                self.error = Some(format!("Failed to read {path}: {err}"));
                return false;
            }
        };
        if let Err(err) = check_upload_candidate(content_type, size) {
            self.error = Some(err.to_string());
            return false;
        }

        match dir.read(filename) {
            Ok(data) => self.select(SelectedFile {
                filename: filename.to_owned(),
                content_type: content_type.map(str::to_owned),
                data,
            }),
            Err(err) => {
                self.error = Some(format!("Failed to read {path}: {err}"));
                false
            }
        }
    }

    /// Set the optional title.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Set the optional description.
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Currently accepted file, if any.
    pub fn file(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }

    /// Message from the last rejected pick or failed submission.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Upload the picked file and go to the user's images.
    pub async fn submit(&mut self, api: &dyn ImageApi, auth: &AuthContext) -> PageOutcome {
        self.error = None;
        let identity = match require_identity(auth) {
            Ok(identity) => identity,
            Err(route) => return PageOutcome::Navigate(route),
        };

        let upload = match self.file.as_ref() {
            None => Err(UploadValidationError::MissingFile),
            Some(file) => ImageUpload::try_new(
                file.filename.clone(),
                file.content_type.as_deref(),
                file.data.clone(),
                self.title.clone(),
                self.description.clone(),
            ),
        };
        let upload = match upload {
            Ok(upload) => upload,
            Err(err) => {
                self.error = Some(err.to_string());
                return PageOutcome::Stay;
            }
        };

        match api.upload_image(&identity, &upload).await {
            Ok(image_id) => {
                tracing::info!(%image_id, "image uploaded");
                PageOutcome::Navigate(Route::MyImages)
            }
            Err(err) => {
                self.error = Some(err.message().to_owned());
                PageOutcome::Stay
            }
        }
    }
}

impl fmt::Display for UploadPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Upload Image")?;
        write_message(f, self.error())?;
        match &self.file {
            Some(file) => writeln!(f, "Select JPEG Image: {} ({} bytes)", file.filename, file.data.len())?,
            None => writeln!(f, "Select JPEG Image: (none)")?,
        }
        writeln!(f, "Title (optional): {}", self.title)?;
        writeln!(f, "Description (optional): {}", self.description)?;
        writeln!(
            f,
            "My Images: gallery {} | Home: gallery {}",
            Route::MyImages.command(),
            Route::Home.command()
        )
    }
}
