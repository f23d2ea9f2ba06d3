//! taskdeck-app - Services, stores and configuration for taskdeck
//!
//! This crate keeps a client-side mirror of the user's todo-lists and tasks in
//! sync with the backend, owns the session state, and surfaces failures as
//! notifications. [`App`] wires everything together.

pub mod config;
pub mod engine;
pub mod latch;
pub mod logger;
pub mod navigation;
pub mod notification;
pub mod sequencer;
pub mod services;
pub mod store;

// Re-export primary types
pub use engine::App;
pub use latch::StartupLatch;
pub use logger::{LogLevel, Logger};
pub use navigation::{Navigator, Route, RouteTracker};
pub use notification::NotificationService;
pub use sequencer::{RequestSequencer, Ticket};
pub use services::{AuthService, SessionState, TasksService, TodosService};
pub use store::{TaskMap, TaskStore, TodoStore};
