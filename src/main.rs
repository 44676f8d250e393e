//! brigterm - terminal dashboard for Brigade
//!
//! This is the binary entry point. All logic lives in the workspace crates.

use std::path::PathBuf;
use std::sync::Arc;

use brigterm_api::{ClientConfig, HttpApiClient};
use brigterm_app::config::{self, Settings};
use brigterm_app::{build_pages, RedrawHandle, Route, Router};
use brigterm_tui::{Chrome, IconSet};
use clap::Parser;
use color_eyre::eyre::{eyre, Result};
use tracing::info;

/// brigterm - browse Brigade projects, events, jobs and logs
#[derive(Parser, Debug)]
#[command(name = "brigterm")]
#[command(about = "Terminal dashboard for Brigade", long_about = None)]
struct Args {
    /// Path to the config file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Brigade API server address
    #[arg(long, value_name = "URL")]
    server: Option<String>,

    /// API bearer token
    #[arg(long)]
    token: Option<String>,

    /// Accept invalid TLS certificates
    #[arg(long)]
    insecure: bool,

    /// Auto-refresh interval in milliseconds
    #[arg(long, value_name = "MS")]
    interval_ms: Option<u64>,

    /// Write a default config file and exit
    #[arg(long)]
    init_config: bool,
}

impl Args {
    /// Command-line flags take precedence over the environment and the file
    fn apply(&self, settings: &mut Settings) {
        if let Some(server) = &self.server {
            settings.api.address = server.clone();
        }
        if let Some(token) = &self.token {
            settings.api.token = token.clone();
        }
        if self.insecure {
            settings.api.insecure_skip_tls_verify = true;
        }
        if let Some(ms) = self.interval_ms {
            settings.refresh.interval_ms = ms;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    let config_path = match args.config.clone().or_else(config::default_config_path) {
        Some(path) => path,
        None => return Err(eyre!("No config directory found; pass --config")),
    };

    if args.init_config {
        config::init_config(&config_path)?;
        eprintln!("Config written to {}", config_path.display());
        return Ok(());
    }

    brigterm_core::logging::init()?;

    // A path given on the command line must exist; the default one may not
    let mut settings = if args.config.is_some() {
        config::load_required_settings(&config_path)?
    } else {
        config::load_settings(&config_path)
    };
    config::apply_env_overrides(&mut settings);
    args.apply(&mut settings);
    info!(
        "Connecting to {} (refresh every {:?})",
        settings.api.address,
        settings.refresh.interval()
    );

    let client = HttpApiClient::new(ClientConfig {
        address: settings.api.address.clone(),
        token: Some(settings.api.token.clone()),
        insecure_skip_tls_verify: settings.api.insecure_skip_tls_verify,
        timeout: settings.api.timeout(),
    })?;

    let redraw = RedrawHandle::new();
    let pages = build_pages(
        Arc::new(client),
        redraw.clone(),
        settings.ui.effective_page_size(),
    )?;
    let router = Arc::new(Router::new(pages, settings.refresh.interval(), redraw));

    let chrome = Chrome {
        icons: IconSet::new(settings.ui.icons),
        server: Some(settings.api.address.clone()),
    };
    brigterm_tui::run(router, Route::Projects, chrome).await?;
    Ok(())
}
