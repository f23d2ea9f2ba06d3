//! Settings parser for .taskdeck/config.toml

use super::types::Settings;
use std::path::Path;
use taskdeck_core::prelude::*;

const CONFIG_FILENAME: &str = "config.toml";
const TASKDECK_DIR: &str = ".taskdeck";

/// Overrides `api.base_url`.
pub const BASE_URL_ENV: &str = "TASKDECK_BASE_URL";
/// Overrides `api.api_key`.
pub const API_KEY_ENV: &str = "TASKDECK_API_KEY";

/// Load settings from `.taskdeck/config.toml` under `project_path`.
///
/// Returns defaults when the file is missing or cannot be parsed.
pub fn load_settings(project_path: &Path) -> Settings {
    let config_path = project_path.join(TASKDECK_DIR).join(CONFIG_FILENAME);

    if !config_path.exists() {
        debug!("No config file at {:?}, using defaults", config_path);
        return Settings::default();
    }

    load_settings_from(&config_path).unwrap_or_else(|e| {
        warn!("{}; using defaults", e);
        Settings::default()
    })
}

/// Load settings from an explicit file. Unlike [`load_settings`], a missing
/// or malformed file is an error: the user asked for this file.
pub fn load_settings_from(config_path: &Path) -> Result<Settings> {
    if !config_path.exists() {
        return Err(Error::ConfigNotFound {
            path: config_path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(config_path)
        .map_err(|e| Error::config(format!("Failed to read {:?}: {}", config_path, e)))?;
    let settings = toml::from_str(&content)
        .map_err(|e| Error::config(format!("Failed to parse {:?}: {}", config_path, e)))?;

    debug!("Loaded settings from {:?}", config_path);
    Ok(settings)
}

/// Apply `TASKDECK_BASE_URL` / `TASKDECK_API_KEY` on top of file settings.
pub fn apply_env_overrides(settings: &mut Settings) {
    if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
        if !base_url.trim().is_empty() {
            debug!("{} overrides api.base_url", BASE_URL_ENV);
            settings.api.base_url = base_url.trim().to_string();
        }
    }

    if let Ok(api_key) = std::env::var(API_KEY_ENV) {
        if !api_key.trim().is_empty() {
            debug!("{} overrides api.api_key", API_KEY_ENV);
            settings.api.api_key = Some(api_key.trim().to_string());
        }
    }
}

/// Create a default config file in the .taskdeck/ directory
pub fn init_config_dir(project_path: &Path) -> Result<()> {
    let taskdeck_dir = project_path.join(TASKDECK_DIR);

    if !taskdeck_dir.exists() {
        std::fs::create_dir_all(&taskdeck_dir)
            .map_err(|e| Error::config(format!("Failed to create .taskdeck dir: {}", e)))?;
    }

    let config_path = taskdeck_dir.join(CONFIG_FILENAME);
    if !config_path.exists() {
        let default_content = r#"# taskdeck configuration

[api]
# Base URL of the todo-list backend
base_url = "http://localhost:8080/api"

# Sent as the API-KEY header on every request
# api_key = ""

# Keep the session cookie between requests
cookies = true

# Per-request timeout in seconds (no timeout when unset)
# timeout_secs = 30

[console]
# Verify the session before accepting commands
check_session_on_start = true

# Emit a "command" event for every line read
echo_commands = false
"#;
        std::fs::write(&config_path, default_content)
            .map_err(|e| Error::config(format!("Failed to write config.toml: {}", e)))?;
        info!("Created default config at {:?}", config_path);
    }

    Ok(())
}
