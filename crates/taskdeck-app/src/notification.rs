//! Single-slot notification sink.
//!
//! Holds at most one [`Notification`]. Each call publishes a new value (or
//! `None` on [`NotificationService::clear`]) to every subscriber; a later
//! message overwrites the current one, nothing is queued.

use tokio::sync::watch;

use taskdeck_core::Notification;

use crate::logger::Logger;

const LOG: Logger = Logger::new("NotificationLog");

#[derive(Debug)]
pub struct NotificationService {
    slot: watch::Sender<Option<Notification>>,
}

impl Default for NotificationService {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationService {
    pub fn new() -> Self {
        let (slot, _) = watch::channel(None);
        LOG.info("Notification service initialized");
        Self { slot }
    }

    pub fn report_error(&self, message: impl Into<String>) {
        self.slot.send_replace(Some(Notification::error(message)));
        LOG.warn("error notification sent to the user");
    }

    pub fn report_success(&self, message: impl Into<String>) {
        self.slot.send_replace(Some(Notification::success(message)));
        LOG.info("success notification sent to the user");
    }

    pub fn clear(&self) {
        self.slot.send_replace(None);
        LOG.info("notifications were cleared");
    }

    pub fn current(&self) -> Option<Notification> {
        self.slot.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Notification>> {
        self.slot.subscribe()
    }
}
