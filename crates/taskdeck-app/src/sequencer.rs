//! Per-key request tokens for collection reloads.
//!
//! A reload takes a [`Ticket`] before it is sent. When its response arrives it
//! is applied only if no newer reload of the same key has been applied yet.
//! An older response can still land while a newer reload is in flight, and it
//! is kept if that newer reload fails.

use std::collections::HashMap;
use std::sync::Mutex;

/// Token identifying one reload of one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    key: String,
    seq: u64,
}

impl Ticket {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct KeyState {
    issued: u64,
    applied: u64,
}

#[derive(Debug, Default)]
pub struct RequestSequencer {
    keys: Mutex<HashMap<String, KeyState>>,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request for `key`.
    pub fn begin(&self, key: &str) -> Ticket {
        let mut keys = self.keys.lock().unwrap_or_else(|e| e.into_inner());
        let state = keys.entry(key.to_string()).or_default();
        state.issued += 1;
        Ticket {
            key: key.to_string(),
            seq: state.issued,
        }
    }

    /// Whether a response for `ticket` may still be applied.
    pub fn is_fresh(&self, ticket: &Ticket) -> bool {
        self.keys
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&ticket.key)
            .is_some_and(|state| ticket.seq <= state.issued && ticket.seq > state.applied)
    }

    /// Run `apply` if `ticket` is fresh and mark it as the applied watermark.
    ///
    /// The check and `apply` happen under one lock, so two responses for the
    /// same key never interleave. Returns `false` when the response is stale.
    pub fn apply_if_fresh(&self, ticket: &Ticket, apply: impl FnOnce()) -> bool {
        let mut keys = self.keys.lock().unwrap_or_else(|e| e.into_inner());
        let Some(state) = keys.get_mut(&ticket.key) else {
            return false;
        };
        if ticket.seq > state.issued || ticket.seq <= state.applied {
            return false;
        }
        state.applied = ticket.seq;
        apply();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newer_applied_response_wins() {
        let sequencer = RequestSequencer::new();
        let first = sequencer.begin("todo-lists");
        let second = sequencer.begin("todo-lists");
        assert!(second.seq() > first.seq());

        assert!(sequencer.apply_if_fresh(&second, || {}));
        assert!(!sequencer.is_fresh(&first));
        assert!(!sequencer.apply_if_fresh(&first, || panic!("stale response applied")));
    }

    #[test]
    fn test_older_response_applies_while_newer_pending() {
        let sequencer = RequestSequencer::new();
        let first = sequencer.begin("todo-lists");
        let second = sequencer.begin("todo-lists");

        // The newer reload may fail and never apply; the older one still lands
        let mut applied = Vec::new();
        assert!(sequencer.apply_if_fresh(&first, || applied.push(first.seq())));
        assert!(sequencer.is_fresh(&second));
        assert!(sequencer.apply_if_fresh(&second, || applied.push(second.seq())));
        assert_eq!(applied, [1, 2]);
    }

    #[test]
    fn test_ticket_applies_once() {
        let sequencer = RequestSequencer::new();
        let ticket = sequencer.begin("x");
        assert!(sequencer.apply_if_fresh(&ticket, || {}));
        assert!(!sequencer.apply_if_fresh(&ticket, || {}));
    }

    #[test]
    fn test_keys_are_independent() {
        let sequencer = RequestSequencer::new();
        let a = sequencer.begin("a");
        let b = sequencer.begin("b");
        let a2 = sequencer.begin("a");
        assert!(sequencer.apply_if_fresh(&a2, || {}));

        assert!(!sequencer.is_fresh(&a));
        assert!(sequencer.is_fresh(&b));
        assert_eq!(b.key(), "b");
    }

    #[test]
    fn test_foreign_ticket_is_not_fresh() {
        let one = RequestSequencer::new();
        let other = RequestSequencer::new();
        let ticket = one.begin("x");
        assert!(!other.is_fresh(&ticket));
        assert!(!other.apply_if_fresh(&ticket, || {}));
    }
}
