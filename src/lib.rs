//! taskdeck Library
//!
//! Headless console client for a todo-list REST backend. The domain logic
//! lives in the `taskdeck-*` workspace crates; this crate holds the console.

pub mod headless;

// Re-export main entry points
pub use headless::runner::run_headless;
