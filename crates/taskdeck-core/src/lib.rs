//! # taskdeck-core - Core Domain Types
//!
//! Foundation crate for taskdeck. Provides domain types, the backend's
//! response envelope, error handling and logging setup.
//!
//! This crate has **zero internal dependencies** -- it only depends on external
//! crates (serde, chrono, thiserror, tracing).
//!
//! ## Public API
//!
//! ### Domain Types (`types`)
//! - [`Todo`], [`DomainTodo`] - A todo-list, and its mirror form with a client-side [`FilterType`]
//! - [`Task`], [`TaskStatus`], [`TaskPriority`] - A task and its integer-coded enums
//! - [`UpdateTaskRequest`] - The writable task model sent on update
//! - [`LoginRequest`], [`CurrentUser`] - Authentication payloads
//! - [`Notification`], [`Severity`] - A transient user-facing message
//!
//! ### Envelope (`envelope`)
//! - [`ResponseEnvelope`] - `{ data, messages, fieldsErrors, resultCode }`
//! - [`ResultCode`] - Domain outcome of a 2xx response
//! - [`TaskPage`], [`ItemPayload`] - Collection and item payloads
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Error enum with `transport` vs `domain` classification
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//! - [`ResultExt`] - Extension trait for adding error context
//!
//! ## Prelude
//!
//! Import commonly used types with:
//! ```rust
//! use taskdeck_core::prelude::*;
//! ```

pub mod envelope;
pub mod error;
pub mod logging;
pub mod prelude;
pub mod types;

// Re-export commonly used types at crate root for convenience
pub use envelope::{FieldError, ItemPayload, ResponseEnvelope, ResultCode, TaskPage};
pub use error::{Error, Result, ResultExt};
pub use types::{
    CurrentUser, DomainTodo, FilterType, LoginData, LoginRequest, Notification, Severity, Task,
    TaskPriority, TaskStatus, Todo, UpdateTaskRequest,
};
