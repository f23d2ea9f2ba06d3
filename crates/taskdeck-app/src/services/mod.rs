//! Services that talk to the backend and keep the mirrors in sync.
//!
//! Every network operation follows the same contract: log the request, and on
//! failure notify the user, log at error level, leave the mirrors untouched and
//! return the error to the caller.

pub mod auth;
pub mod tasks;
pub mod todos;

pub use auth::{AuthService, SessionState};
pub use tasks::TasksService;
pub use todos::TodosService;

use taskdeck_core::Error;

use crate::logger::Logger;
use crate::notification::NotificationService;

/// Report a failed operation to the user and to the log.
pub(crate) fn report_failure(
    log: &Logger,
    notifications: &NotificationService,
    action: &str,
    err: &Error,
) {
    notifications.report_error(err.user_message());
    log.error(format!("{action} failed: {err}"));
}
