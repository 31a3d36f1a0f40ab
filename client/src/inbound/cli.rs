//! Command line surface: one subcommand per user action.
//!
//! Each invocation rehydrates the session, drives exactly one page action,
//! and writes the resulting page to the output.

use std::fmt;
use std::io::{self, Write};

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use clap::{Parser, Subcommand};
use color_eyre::eyre::{self, WrapErr};
use pagination::PageRequest;

use crate::domain::ports::{AuthApi, ImageApi, UserApi};
use crate::domain::{AuthContext, ImageDetail, ImageEdit, ImageId, UserId};
use crate::inbound::components::{Sidebar, format_date};
use crate::inbound::pages::{
    GalleryPage, HomePage, LoginPage, MyImagesPage, PageOutcome, RegisterPage, Route, UpdatePage,
    UploadPage, require_identity,
};
use crate::outbound::storage::write_atomic;

/// `gallery` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "gallery",
    about = "Browse, upload, and manage images on a gallery backend",
    version
)]
pub struct Cli {
    /// Backend base URL. Overrides `GALLERY_BASE_URL`.
    #[arg(long = "base-url", value_name = "url", global = true)]
    pub base_url: Option<String>,
    /// Directory holding the persisted session. Overrides
    /// `GALLERY_STORAGE_DIR`.
    #[arg(long = "storage-dir", value_name = "path", global = true)]
    pub storage_dir: Option<Utf8PathBuf>,
    /// Action to perform.
    #[command(subcommand)]
    pub command: Command,
}

/// User actions.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Show the landing page.
    Home,
    /// Sign in with email and password.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account and sign in.
    Register {
        #[arg(long)]
        email: String,
        #[arg(long = "display-name")]
        display_name: String,
        #[arg(long)]
        password: String,
    },
    /// End the session.
    Logout,
    /// Change display name, email, or password.
    Update {
        #[arg(long = "current-password")]
        current_password: String,
        #[arg(long = "display-name")]
        display_name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long = "new-password")]
        new_password: Option<String>,
    },
    /// Upload a JPEG image.
    Upload {
        /// Path of the image to upload.
        file: Utf8PathBuf,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// List everyone's images.
    Gallery(ListArgs),
    /// List your own images.
    MyImages(ListArgs),
    /// Show one image in full.
    View {
        id: String,
        /// Write the image bytes to this file.
        #[arg(long, value_name = "path")]
        save: Option<Utf8PathBuf>,
    },
    /// Delete one of your images. Without `--confirm` the deletion is only
    /// requested.
    Delete {
        id: String,
        #[arg(long)]
        confirm: bool,
    },
    /// Change the title or description of one of your images.
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Look up a user's public profile.
    User { id: String },
    /// Show the navigation for the current session.
    Nav,
}

/// Paging flags shared by the list commands.
#[derive(Debug, Clone, Copy, clap::Args)]
pub struct ListArgs {
    /// Images per page. Defaults to the configured page limit.
    #[arg(long)]
    pub limit: Option<u32>,
    /// Images to skip.
    #[arg(long, default_value_t = 0)]
    pub offset: u32,
}

impl ListArgs {
    fn page_request(self, default: PageRequest) -> Result<PageRequest, pagination::PageRequestError> {
        PageRequest::new(self.limit.unwrap_or(default.limit()), self.offset)
    }
}

/// Remote services a command may call.
#[derive(Clone, Copy)]
pub struct Services<'a> {
    /// Sign-in and registration.
    pub auth: &'a dyn AuthApi,
    /// Profiles.
    pub users: &'a dyn UserApi,
    /// Images.
    pub images: &'a dyn ImageApi,
}

impl<'a> Services<'a> {
    /// Use one client for every service.
    pub fn from_client<C>(client: &'a C) -> Self
    where
        C: AuthApi + UserApi + ImageApi,
    {
        Self {
            auth: client,
            users: client,
            images: client,
        }
    }
}

/// Whether the action succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The action succeeded.
    Done,
    /// The page shows an error or the user was redirected.
    Failed,
}

impl Completion {
    fn from_error(error: Option<&str>) -> Self {
        if error.is_some() { Self::Failed } else { Self::Done }
    }

    /// Whether the process should exit successfully.
    pub fn is_success(self) -> bool {
        self == Self::Done
    }
}

/// Drives one command against the services and the session.
pub struct Runner<'a> {
    services: Services<'a>,
    auth: AuthContext,
    page_request: PageRequest,
}

impl<'a> Runner<'a> {
    /// Runner over `auth`; list commands default to `page_request`.
    pub fn new(services: Services<'a>, auth: AuthContext, page_request: PageRequest) -> Self {
        Self {
            services,
            auth,
            page_request,
        }
    }

    /// Session state after the last command.
    pub fn auth(&self) -> &AuthContext {
        &self.auth
    }

    /// Run `command`, writing the resulting page to `out`.
    ///
    /// Page level failures are written to `out` and reported as
    /// [`Completion::Failed`].
    ///
    /// # Errors
    /// Returns an error when the output cannot be written, when an argument
    /// is malformed, or when local storage fails.
    pub async fn run(&mut self, command: Command, out: &mut dyn Write) -> eyre::Result<Completion> {
        match command {
            Command::Home => self.show(Route::Home, out).await,
            Command::Login { email, password } => {
                let mut page = LoginPage::new();
                page.set_email(email);
                page.set_password(password);
                let outcome = page.submit(self.services.auth, &mut self.auth).await;
                self.follow(outcome, &page, page.error(), out).await
            }
            Command::Register {
                email,
                display_name,
                password,
            } => {
                let mut page = RegisterPage::new();
                page.set_email(email);
                page.set_display_name(display_name);
                page.set_password(password);
                let outcome = page.submit(self.services.auth, &mut self.auth).await;
                self.follow(outcome, &page, page.error(), out).await
            }
            Command::Logout => {
                let mut page = HomePage::new(&self.auth);
                let outcome = page
                    .logout(&mut self.auth)
                    .wrap_err("failed to clear the stored session")?;
                self.follow(outcome, &page, None, out).await
            }
            Command::Update {
                current_password,
                display_name,
                email,
                new_password,
            } => {
                let mut page = match UpdatePage::open(&self.auth) {
                    Ok(page) => page,
                    Err(route) => return redirected(route, out),
                };
                page.set_current_password(current_password);
                page.set_new_display_name(display_name.unwrap_or_default());
                page.set_new_email(email.unwrap_or_default());
                page.set_new_password(new_password.unwrap_or_default());
                let outcome = page.submit(self.services.users, &mut self.auth).await;
                self.follow(outcome, &page, page.error(), out).await
            }
            Command::Upload {
                file,
                title,
                description,
            } => {
                let mut page = match UploadPage::open(&self.auth) {
                    Ok(page) => page,
                    Err(route) => return redirected(route, out),
                };
                if !page.select_path(&file) {
                    write!(out, "{page}")?;
                    return Ok(Completion::Failed);
                }
                page.set_title(title.unwrap_or_default());
                page.set_description(description.unwrap_or_default());
                let outcome = page.submit(self.services.images, &self.auth).await;
                self.follow(outcome, &page, page.error(), out).await
            }
            Command::Gallery(args) => {
                let request = args.page_request(self.page_request)?;
                let page = GalleryPage::load(self.services.images, &self.auth, request).await;
                write!(out, "{page}")?;
                Ok(Completion::from_error(page.error()))
            }
            Command::MyImages(args) => {
                let request = args.page_request(self.page_request)?;
                match MyImagesPage::open(self.services.images, &self.auth, request).await {
                    Ok(page) => {
                        write!(out, "{page}")?;
                        Ok(Completion::from_error(page.error()))
                    }
                    Err(route) => redirected(route, out),
                }
            }
            Command::View { id, save } => self.view(ImageId::new(id)?, save.as_deref(), out).await,
            Command::Delete { id, confirm } => self.delete(ImageId::new(id)?, confirm, out).await,
            Command::Edit {
                id,
                title,
                description,
            } => {
                let edit = ImageEdit {
                    id: ImageId::new(id)?,
                    title,
                    description,
                };
                self.edit(&edit, out).await
            }
            Command::User { id } => self.lookup_user(&UserId::new(id)?, out).await,
            Command::Nav => {
                write!(out, "{}", Sidebar::new(&self.auth))?;
                Ok(Completion::Done)
            }
        }
    }

    async fn follow(
        &self,
        outcome: PageOutcome,
        page: &dyn fmt::Display,
        error: Option<&str>,
        out: &mut dyn Write,
    ) -> eyre::Result<Completion> {
        match outcome {
            PageOutcome::Navigate(route) => self.show(route, out).await,
            PageOutcome::Stay => {
                write!(out, "{page}")?;
                Ok(Completion::from_error(error))
            }
        }
    }

    async fn show(&self, route: Route, out: &mut dyn Write) -> eyre::Result<Completion> {
        match route {
            Route::Home => write!(out, "{}", HomePage::new(&self.auth))?,
            Route::Login => write!(out, "{}", LoginPage::new())?,
            Route::Register => write!(out, "{}", RegisterPage::new())?,
            Route::Update => match UpdatePage::open(&self.auth) {
                Ok(page) => write!(out, "{page}")?,
                Err(redirect) => return redirected(redirect, out),
            },
            Route::Upload => match UploadPage::open(&self.auth) {
                Ok(page) => write!(out, "{page}")?,
                Err(redirect) => return redirected(redirect, out),
            },
            Route::Gallery => {
                let page =
                    GalleryPage::load(self.services.images, &self.auth, self.page_request).await;
                write!(out, "{page}")?;
            }
            Route::MyImages => {
                match MyImagesPage::open(self.services.images, &self.auth, self.page_request).await
                {
                    Ok(page) => write!(out, "{page}")?,
                    Err(redirect) => return redirected(redirect, out),
                }
            }
        }
        Ok(Completion::Done)
    }

    async fn view(
        &self,
        id: ImageId,
        save: Option<&Utf8Path>,
        out: &mut dyn Write,
    ) -> eyre::Result<Completion> {
        let detail = match self.services.images.get_image(&id).await {
            Ok(detail) => detail,
            Err(err) => return failed(err.message(), out),
        };
        write_detail(&detail, out)?;
        if let Some(path) = save {
            save_image(path, &detail.data).wrap_err_with(|| format!("failed to save {path}"))?;
            writeln!(out, "Saved {} bytes to {path}", detail.data.len())?;
        }
        Ok(Completion::Done)
    }

    async fn delete(
        &self,
        id: ImageId,
        confirm: bool,
        out: &mut dyn Write,
    ) -> eyre::Result<Completion> {
        let mut page =
            match MyImagesPage::open(self.services.images, &self.auth, self.page_request).await {
                Ok(page) => page,
                Err(route) => return redirected(route, out),
            };
        if let Some(message) = page.error() {
            return failed(message, out);
        }
        if !page.request_delete(&id) {
            return failed(&format!("Image {id} is not one of your images"), out);
        }
        if !confirm {
            write!(out, "{page}")?;
            writeln!(out, "Delete {id}? Confirm: gallery delete {id} --confirm")?;
            return Ok(Completion::Done);
        }
        if let Err(err) = page.confirm_delete(self.services.images, &id).await {
            return failed(err.message(), out);
        }
        writeln!(out, "Deleted {id}")?;
        write!(out, "{page}")?;
        Ok(Completion::from_error(page.error()))
    }

    async fn edit(&self, edit: &ImageEdit, out: &mut dyn Write) -> eyre::Result<Completion> {
        let identity = match require_identity(&self.auth) {
            Ok(identity) => identity,
            Err(route) => return redirected(route, out),
        };
        if edit.title.is_none() && edit.description.is_none() {
            return failed("Provide a new title or description", out);
        }
        match self.services.images.update_image(&identity, edit).await {
            Ok(metadata) => {
                writeln!(out, "Updated {}", metadata.id)?;
                writeln!(out, "  Title: {}", metadata.title)?;
                writeln!(out, "  Description: {}", metadata.description)?;
                Ok(Completion::Done)
            }
            Err(err) => failed(err.message(), out),
        }
    }

    async fn lookup_user(&self, id: &UserId, out: &mut dyn Write) -> eyre::Result<Completion> {
        match self.services.users.get_user(id).await {
            Ok(profile) => {
                writeln!(out, "{} <{}>  [{}]", profile.name, profile.email, profile.id)?;
                Ok(Completion::Done)
            }
            Err(err) => failed(err.message(), out),
        }
    }
}

fn redirected(route: Route, out: &mut dyn Write) -> eyre::Result<Completion> {
    writeln!(out, "Login required. Run: gallery {}", route.command())?;
    Ok(Completion::Failed)
}

fn failed(message: &str, out: &mut dyn Write) -> eyre::Result<Completion> {
    writeln!(out, "Error: {message}")?;
    Ok(Completion::Failed)
}

fn write_detail(detail: &ImageDetail, out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "{}  [{}]", detail.display_title(), detail.id)?;
    writeln!(out, "  By: {}", detail.owner_display_name)?;
    writeln!(out, "  {}", format_date(&detail.created_at))?;
    if !detail.description.is_empty() {
        writeln!(out, "  {}", detail.description)?;
    }
    writeln!(out, "  {}, {} bytes", detail.content_type, detail.data.len())
}

fn save_image(path: &Utf8Path, data: &[u8]) -> io::Result<()> {
    let file_name = path.file_name().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, format!("{path} has no file name"))
    })?;
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let dir = Dir::open_ambient_dir(parent, ambient_authority())?;
    write_atomic(&dir, Utf8Path::new(file_name), data)
}
