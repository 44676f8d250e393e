//! Configuration types

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Lowest accepted refresh interval
pub const MIN_REFRESH_INTERVAL_MS: u64 = 250;

/// Largest accepted event page size
pub const MAX_PAGE_SIZE: u32 = 100;

/// Dashboard settings (`config.toml`)
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub refresh: RefreshSettings,

    #[serde(default)]
    pub ui: UiSettings,
}

/// Connection to the Brigade API server
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ApiSettings {
    /// Server address, e.g. `https://brigade.example.com`
    #[serde(default = "default_address")]
    pub address: String,

    /// Bearer token; empty sends unauthenticated requests
    #[serde(default)]
    pub token: String,

    #[serde(default)]
    pub insecure_skip_tls_verify: bool,

    /// Timeout for request/response calls, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            address: default_address(),
            token: String::new(),
            insecure_skip_tls_verify: false,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ApiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

fn default_address() -> String {
    "https://localhost:8443".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

/// Auto-refresh behaviour
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RefreshSettings {
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

impl Default for RefreshSettings {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
        }
    }
}

impl RefreshSettings {
    /// Refresh period, never below [`MIN_REFRESH_INTERVAL_MS`]
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms.max(MIN_REFRESH_INTERVAL_MS))
    }
}

fn default_interval_ms() -> u64 {
    2000
}

/// UI settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct UiSettings {
    /// Events shown per page on the project page
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    #[serde(default)]
    pub icons: IconMode,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            icons: IconMode::default(),
        }
    }
}

impl UiSettings {
    /// Page size clamped to `1..=MAX_PAGE_SIZE`
    pub fn effective_page_size(&self) -> u32 {
        self.page_size.clamp(1, MAX_PAGE_SIZE)
    }
}

fn default_page_size() -> u32 {
    20
}

/// Icon rendering mode for the TUI.
///
/// Unicode symbols work in every terminal; Nerd Font glyphs need a patched font.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IconMode {
    #[default]
    Unicode,
    NerdFonts,
}

impl std::fmt::Display for IconMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IconMode::Unicode => write!(f, "unicode"),
            IconMode::NerdFonts => write!(f, "nerd_fonts"),
        }
    }
}
