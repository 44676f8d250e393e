//! Configuration file parsing for the dashboard
//!
//! Supports `<config_dir>/brigade-term/config.toml` with environment
//! overrides for the server address and token.

pub mod settings;
pub mod types;

pub use settings::{
    apply_env_overrides, default_config_path, init_config, load_required_settings,
    load_settings, SERVER_ENV_VAR, TOKEN_ENV_VAR,
};
pub use types::*;
