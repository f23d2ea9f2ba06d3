//! Application error types with rich context

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Fallback shown to the user when the server rejects a request without a message.
pub const DEFAULT_DOMAIN_MESSAGE: &str = "Some error occurred";

/// Application error types organized by layer/domain
#[derive(Debug, Error)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Common/Infrastructure Errors
    // ─────────────────────────────────────────────────────────────
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    // ─────────────────────────────────────────────────────────────
    // Transport Errors (network / HTTP status)
    // ─────────────────────────────────────────────────────────────
    #[error("Request failed: {message}")]
    Transport { message: String },

    #[error("Http failure response ({status}): {message}")]
    Http { status: u16, message: String },

    // ─────────────────────────────────────────────────────────────
    // Domain Errors (resultCode != Success on a 2xx response)
    // ─────────────────────────────────────────────────────────────
    #[error("Server rejected the request (code {code}): {}", join_messages(.messages))]
    Domain { code: i64, messages: Vec<String> },

    #[error("{kind} '{id}' is not loaded")]
    NotFound { kind: &'static str, id: String },

    // ─────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("Invalid configuration: {message}")]
    ConfigInvalid { message: String },

    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    // ─────────────────────────────────────────────────────────────
    // Channel/Communication Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Channel closed unexpectedly")]
    ChannelClosed,
}

fn join_messages(messages: &[String]) -> String {
    if messages.is_empty() {
        DEFAULT_DOMAIN_MESSAGE.to_string()
    } else {
        messages.join("; ")
    }
}

// ─────────────────────────────────────────────────────────────────
// Convenience Constructors
// ─────────────────────────────────────────────────────────────────

impl Error {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    pub fn domain(code: i64, messages: Vec<String>) -> Self {
        Self::Domain { code, messages }
    }

    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn config_invalid(message: impl Into<String>) -> Self {
        Self::ConfigInvalid {
            message: message.into(),
        }
    }

    pub fn invalid_url(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Network, HTTP status and body decoding failures.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Error::Transport { .. } | Error::Http { .. } | Error::Json(_)
        )
    }

    /// The server answered, but refused the operation.
    pub fn is_domain(&self) -> bool {
        matches!(self, Error::Domain { .. })
    }

    /// Text suitable for a user-facing notification.
    ///
    /// Domain failures surface the first server message, everything else its
    /// display form.
    pub fn user_message(&self) -> String {
        match self {
            Error::Domain { messages, .. } => messages
                .first()
                .cloned()
                .unwrap_or_else(|| DEFAULT_DOMAIN_MESSAGE.to_string()),
            other => other.to_string(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Error Context Extensions
// ─────────────────────────────────────────────────────────────────

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", context.into(), err);
            err
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", f(), err);
            err
        })
    }
}
