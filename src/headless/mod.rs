//! Headless mode - NDJSON event output over a line-command console
//!
//! Commands are read from stdin one per line (see [`command::Command`]).
//! Everything the user would see (mirrors, notifications, navigation,
//! session changes) is written to stdout as structured JSON events, so the
//! client can be driven from scripts and tests.
//!
//! # Event Format
//!
//! Events are output as NDJSON (newline-delimited JSON), one event per line.
//! Each event has an "event" field indicating its type, along with event-specific data.
//!
//! # Example Output
//!
//! ```json
//! {"event":"session","authenticated":false,"user":null,"timestamp":1704700001000}
//! {"event":"ready","timestamp":1704700001002}
//! {"event":"navigated","path":"/","timestamp":1704700003000}
//! ```

pub mod command;
pub mod runner;

use chrono::Utc;
use serde::Serialize;
use std::io::Write;
use tracing::error;

use taskdeck_app::{Route, SessionState, TaskMap};
use taskdeck_core::{DomainTodo, FilterType, Notification, Severity, Task};

/// Events emitted in headless mode
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HeadlessEvent {
    /// Startup finished; commands are accepted from now on
    Ready { timestamp: i64 },

    /// A stdin line, echoed when `console.echo_commands` is set
    Command { line: String, timestamp: i64 },

    /// Session state changed
    Session {
        authenticated: bool,
        user: Option<String>,
        timestamp: i64,
    },

    /// Todo-list mirror changed
    Todos {
        todos: Vec<DomainTodo>,
        timestamp: i64,
    },

    /// Task mirror changed
    Tasks { tasks: TaskMap, timestamp: i64 },

    /// Tasks of one list under its current filter
    VisibleTasks {
        todo_id: String,
        filter: FilterType,
        tasks: Vec<Task>,
        timestamp: i64,
    },

    /// Notification shown or cleared (`severity` and `message` are null)
    Notification {
        severity: Option<Severity>,
        message: Option<String>,
        timestamp: i64,
    },

    /// Navigation happened
    Navigated { path: String, timestamp: i64 },

    /// Error occurred
    Error {
        message: String,
        fatal: bool,
        timestamp: i64,
    },
}

impl HeadlessEvent {
    /// Write this event as one NDJSON line and flush
    pub fn write_to<W: Write>(&self, out: &mut W) {
        let json = match serde_json::to_string(self) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize headless event: {}", e);
                return;
            }
        };

        if let Err(e) = writeln!(out, "{}", json) {
            error!("Failed to write headless event: {}", e);
            return;
        }

        if let Err(e) = out.flush() {
            error!("Failed to flush headless output: {}", e);
        }
    }

    /// Get current timestamp in milliseconds
    fn now() -> i64 {
        Utc::now().timestamp_millis()
    }

    // ─────────────────────────────────────────────────────────
    // Convenience constructors
    // ─────────────────────────────────────────────────────────

    pub fn ready() -> Self {
        Self::Ready {
            timestamp: Self::now(),
        }
    }

    pub fn command(line: &str) -> Self {
        Self::Command {
            line: line.to_string(),
            timestamp: Self::now(),
        }
    }

    pub fn session(state: &SessionState) -> Self {
        Self::Session {
            authenticated: state.authenticated,
            user: state.user.as_ref().map(|user| user.login.clone()),
            timestamp: Self::now(),
        }
    }

    pub fn todos(todos: Vec<DomainTodo>) -> Self {
        Self::Todos {
            todos,
            timestamp: Self::now(),
        }
    }

    pub fn tasks(tasks: TaskMap) -> Self {
        Self::Tasks {
            tasks,
            timestamp: Self::now(),
        }
    }

    pub fn visible_tasks(todo_id: &str, filter: FilterType, tasks: Vec<Task>) -> Self {
        Self::VisibleTasks {
            todo_id: todo_id.to_string(),
            filter,
            tasks,
            timestamp: Self::now(),
        }
    }

    pub fn notification(current: Option<&Notification>) -> Self {
        Self::Notification {
            severity: current.map(|n| n.severity),
            message: current.map(|n| n.message.clone()),
            timestamp: Self::now(),
        }
    }

    pub fn navigated(route: Route) -> Self {
        Self::Navigated {
            path: route.path().to_string(),
            timestamp: Self::now(),
        }
    }

    pub fn error(message: String, fatal: bool) -> Self {
        Self::Error {
            message,
            fatal,
            timestamp: Self::now(),
        }
    }
}
