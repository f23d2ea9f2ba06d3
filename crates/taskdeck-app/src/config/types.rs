//! Configuration types for taskdeck
//!
//! Defines:
//! - `Settings` - Global application settings (`.taskdeck/config.toml`)
//! - `ApiSettings` - Backend location and connection options
//! - `ConsoleSettings` - Headless console behaviour

use std::time::Duration;

use serde::{Deserialize, Serialize};
use taskdeck_api::{normalize_base_url, TransportOptions};
use taskdeck_core::prelude::*;

/// Base URL used when neither the config file nor the environment sets one.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

/// Application settings (.taskdeck/config.toml)
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub console: ConsoleSettings,
}

impl Settings {
    /// Check values that would only fail later, at the first request.
    pub fn validate(&self) -> Result<()> {
        normalize_base_url(&self.api.base_url)
            .map_err(|e| Error::config_invalid(format!("api.base_url: {e}")))?;
        if self.api.timeout_secs == Some(0) {
            return Err(Error::config_invalid(
                "api.timeout_secs must be greater than zero",
            ));
        }
        Ok(())
    }
}

/// Backend connection settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ApiSettings {
    /// Base URL every REST path is appended to
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Sent as the `API-KEY` header when set
    #[serde(default)]
    pub api_key: Option<String>,

    /// Keep the session cookie between requests
    #[serde(default = "default_true")]
    pub cookies: bool,

    /// Per-request timeout; requests never time out when unset
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            cookies: true,
            timeout_secs: None,
        }
    }
}

impl ApiSettings {
    pub fn transport_options(&self) -> TransportOptions {
        TransportOptions {
            api_key: self.api_key.clone().filter(|key| !key.is_empty()),
            cookies: self.cookies,
            timeout: self.timeout_secs.map(Duration::from_secs),
        }
    }
}

/// Headless console settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ConsoleSettings {
    /// Verify the session before accepting commands
    #[serde(default = "default_true")]
    pub check_session_on_start: bool,

    /// Emit a `command` event for every line read
    #[serde(default)]
    pub echo_commands: bool,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            check_session_on_start: true,
            echo_commands: false,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_true() -> bool {
    true
}
