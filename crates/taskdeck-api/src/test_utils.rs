//! Test utilities for the HTTP layer
//!
//! [`FakeTransport`] replays queued responses in order and records every
//! request it receives, standing in for the backend in unit and integration
//! tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use serde_json::Value;
use taskdeck_core::prelude::*;

use crate::transport::{ApiRequest, ApiResponse, HttpTransport};

enum Canned {
    Response(ApiResponse),
    Failure(String),
}

/// Scripted [`HttpTransport`].
///
/// An empty queue answers with [`Error::Transport`], so a test that forgets to
/// script a response sees a failed request rather than a hang.
#[derive(Default)]
pub struct FakeTransport {
    queue: Mutex<VecDeque<Canned>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response with the given status and JSON body.
    pub fn respond(&self, status: u16, body: Value) -> &Self {
        self.push(Canned::Response(ApiResponse::new(status, body)));
        self
    }

    /// Queue a network-level failure.
    pub fn fail(&self, message: impl Into<String>) -> &Self {
        self.push(Canned::Failure(message.into()));
        self
    }

    /// Every request received so far, oldest first.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn last_request(&self) -> Option<ApiRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .last()
            .cloned()
    }

    /// Number of queued outcomes not yet consumed.
    pub fn pending(&self) -> usize {
        self.queue.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    fn push(&self, canned: Canned) {
        self.queue
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(canned);
    }
}

impl HttpTransport for FakeTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let label = request.to_string();
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request);

        let next = self
            .queue
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();

        match next {
            Some(Canned::Response(response)) => Ok(response),
            Some(Canned::Failure(message)) => Err(Error::transport(message)),
            None => Err(Error::transport(format!("no response scripted for {label}"))),
        }
    }
}
