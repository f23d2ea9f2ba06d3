//! Source-tagged leveled logger used by the services.
//!
//! Every line is rendered as `"{source}--{message}"` and forwarded to
//! `tracing` with a `source` field, so the file log can be grepped per
//! service. The logger holds no mutable state and never affects control flow.

/// Severity accepted by [`Logger`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum LogLevel {
    #[default]
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, Copy)]
pub struct Logger {
    source: &'static str,
    level: LogLevel,
}

impl Logger {
    pub const fn new(source: &'static str) -> Self {
        Self {
            source,
            level: LogLevel::Info,
        }
    }

    /// Drop messages below `level`.
    pub const fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn source(&self) -> &'static str {
        self.source
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn info(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Info, message.as_ref());
    }

    pub fn warn(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Warn, message.as_ref());
    }

    pub fn error(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Error, message.as_ref());
    }

    pub fn format_line(&self, message: &str) -> String {
        format!("{}--{}", self.source, message)
    }

    fn log(&self, level: LogLevel, message: &str) {
        if level < self.level {
            return;
        }
        let line = self.format_line(message);
        match level {
            LogLevel::Info => tracing::info!(source = self.source, "{}", line),
            LogLevel::Warn => tracing::warn!(source = self.source, "{}", line),
            LogLevel::Error => tracing::error!(source = self.source, "{}", line),
        }
    }
}
