//! `gallery` entry point: loads configuration, restores the session, and runs
//! one command.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;

use camino::Utf8PathBuf;
use clap::Parser;
use color_eyre::eyre::{self, WrapErr, eyre};
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use client::config::ClientSettings;
use client::domain::AuthContext;
use client::inbound::cli::{Cli, Command, Runner, Services};
use client::outbound::connect::{ConnectGalleryClient, ConnectTransport};
use client::outbound::storage::FileStorage;

const DEFAULT_LOG_FILTER: &str = "warn";

fn main() -> eyre::Result<ExitCode> {
    color_eyre::install()?;
    let cli = Cli::parse();
    let settings = ClientSettings::load_from_iter([OsString::from("gallery")])
        .map_err(|err| eyre!("failed to load configuration: {err}"))?;
    init_tracing(settings.json_logs);

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("create Tokio runtime")?;
    runtime.block_on(async_main(cli, settings))
}

fn init_tracing(json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = fmt().with_env_filter(filter).with_writer(io::stderr);
    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if let Err(e) = result {
        warn!(error = %e, "tracing init failed");
    }
}

async fn async_main(cli: Cli, settings: ClientSettings) -> eyre::Result<ExitCode> {
    let Cli {
        base_url,
        storage_dir,
        command,
    } = cli;

    let storage_dir = match storage_dir {
        Some(dir) => dir,
        None => Utf8PathBuf::from_path_buf(settings.storage_dir()).map_err(|path| {
            eyre!("storage directory {} is not valid UTF-8", path.display())
        })?,
    };
    let storage = Arc::new(
        FileStorage::open(&storage_dir)
            .wrap_err_with(|| format!("failed to open session storage at {storage_dir}"))?,
    );
    let auth = match AuthContext::rehydrate(storage.clone()) {
        Ok(auth) => auth,
        Err(err) if matches!(command, Command::Logout) => {
            warn!(error = %err, "discarding unreadable stored session");
            AuthContext::new(storage)
        }
        Err(err) => {
            return Err(err)
                .wrap_err("failed to restore the stored session; `gallery logout` resets it");
        }
    };

    let base_url = base_url.as_deref().unwrap_or_else(|| settings.base_url());
    let transport = ConnectTransport::new(base_url, settings.request_timeout())?;
    let client = ConnectGalleryClient::new(transport);
    let page_request = settings
        .page_request()
        .wrap_err("invalid GALLERY_PAGE_LIMIT")?;

    let mut runner = Runner::new(Services::from_client(&client), auth, page_request);
    let mut stdout = io::stdout().lock();
    let completion = runner.run(command, &mut stdout).await?;
    stdout.flush()?;

    Ok(if completion.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
