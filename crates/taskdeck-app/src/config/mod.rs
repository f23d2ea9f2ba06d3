//! Configuration file parsing for taskdeck
//!
//! Supports:
//! - `.taskdeck/config.toml` - Global settings
//! - `TASKDECK_BASE_URL` / `TASKDECK_API_KEY` - Environment overrides

pub mod settings;
pub mod types;

pub use settings::{
    apply_env_overrides, init_config_dir, load_settings, load_settings_from, API_KEY_ENV,
    BASE_URL_ENV,
};
pub use types::*;
