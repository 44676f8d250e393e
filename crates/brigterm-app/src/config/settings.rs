//! Settings loader for `config.toml`

use std::path::{Path, PathBuf};

use brigterm_core::prelude::*;

use super::types::Settings;

const CONFIG_FILENAME: &str = "config.toml";
const APP_DIR: &str = "brigade-term";

/// Environment variable overriding `api.address`
pub const SERVER_ENV_VAR: &str = "BRIGADE_SERVER";
/// Environment variable overriding `api.token`
pub const TOKEN_ENV_VAR: &str = "BRIGADE_TOKEN";

/// `<config_dir>/brigade-term/config.toml`, if the platform has a config dir
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILENAME))
}

/// Load settings from `path`
///
/// Returns defaults if the file doesn't exist. Unreadable or invalid files
/// are logged and also yield defaults.
pub fn load_settings(path: &Path) -> Settings {
    if !path.exists() {
        debug!("No config file at {:?}, using defaults", path);
        return Settings::default();
    }

    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(settings) => {
                debug!("Loaded settings from {:?}", path);
                settings
            }
            Err(e) => {
                warn!("Failed to parse {:?}: {}", path, e);
                Settings::default()
            }
        },
        Err(e) => {
            warn!("Failed to read {:?}: {}", path, e);
            Settings::default()
        }
    }
}

/// Load settings from a path the user named explicitly.
///
/// Unlike [`load_settings`], a missing file is an error.
pub fn load_required_settings(path: &Path) -> Result<Settings> {
    if !path.exists() {
        return Err(Error::config_not_found(path));
    }
    Ok(load_settings(path))
}

/// Apply `BRIGADE_SERVER` / `BRIGADE_TOKEN` on top of file settings
pub fn apply_env_overrides(settings: &mut Settings) {
    if let Some(address) = non_empty_env(SERVER_ENV_VAR) {
        debug!("Using API address from {}", SERVER_ENV_VAR);
        settings.api.address = address;
    }
    if let Some(token) = non_empty_env(TOKEN_ENV_VAR) {
        debug!("Using API token from {}", TOKEN_ENV_VAR);
        settings.api.token = token;
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Write a commented default config file at `path` unless one exists
pub fn init_config(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.exists() {
            std::fs::create_dir_all(dir)
                .map_err(|e| Error::config(format!("Failed to create {:?}: {}", dir, e)))?;
        }
    }

    if path.exists() {
        debug!("Config file {:?} already exists", path);
        return Ok(());
    }

    let default_content = r#"# Brigade terminal dashboard configuration

[api]
address = "https://localhost:8443"
token = ""                       # or set BRIGADE_TOKEN
insecure_skip_tls_verify = false
timeout_secs = 10

[refresh]
interval_ms = 2000               # minimum 250

[ui]
page_size = 20                   # events per page, 1-100
icons = "unicode"                # "unicode" | "nerd_fonts"
"#;

    std::fs::write(path, default_content)
        .map_err(|e| Error::config(format!("Failed to write {:?}: {}", path, e)))?;
    info!("Created default config at {:?}", path);
    Ok(())
}
