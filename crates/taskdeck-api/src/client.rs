//! Typed client over an [`HttpTransport`].
//!
//! Turns raw responses into the two failure classes the services care about:
//!
//! - **transport**: the transport failed, or the status was not 2xx
//!   ([`Error::Transport`], [`Error::Http`], [`Error::Json`])
//! - **domain**: a 2xx envelope whose `resultCode` is not `Success`
//!   ([`Error::Domain`])

use serde::de::DeserializeOwned;
use serde_json::Value;
use taskdeck_core::envelope::ResponseEnvelope;
use taskdeck_core::prelude::*;

use crate::transport::{ApiRequest, ApiResponse, HttpTransport};

/// Typed access to the backend.
#[derive(Debug)]
pub struct ApiClient<T> {
    transport: T,
}

impl<T> ApiClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}

impl<T: HttpTransport + Sync> ApiClient<T> {
    /// Decode a bare (envelope-less) body, as returned by collection endpoints.
    pub async fn fetch<D: DeserializeOwned>(&self, request: ApiRequest) -> Result<D> {
        let body = self.exchange(request).await?;
        Ok(serde_json::from_value(body)?)
    }

    /// Decode an envelope and return its `data` when the result code is `Success`.
    pub async fn envelope<D: DeserializeOwned>(&self, request: ApiRequest) -> Result<D> {
        let body = self.exchange(request).await?;
        let envelope: ResponseEnvelope = serde_json::from_value(body)?;
        envelope.into_data()
    }

    /// Like [`Self::envelope`] but discards `data`. An empty 2xx body counts
    /// as success.
    pub async fn command(&self, request: ApiRequest) -> Result<()> {
        let body = self.exchange(request).await?;
        if body.is_null() {
            return Ok(());
        }
        let envelope: ResponseEnvelope = serde_json::from_value(body)?;
        envelope.into_unit()
    }

    async fn exchange(&self, request: ApiRequest) -> Result<Value> {
        debug!("→ {}", request);
        let label = request.to_string();
        let response = self.transport.send(request).await?;
        debug!("← {} {}", response.status, label);
        check_status(response)
    }
}

/// Map non-2xx responses to [`Error::Http`].
fn check_status(response: ApiResponse) -> Result<Value> {
    if response.is_success() {
        return Ok(response.body);
    }
    let message = failure_message(response.status, &response.body);
    Err(Error::http(response.status, message))
}

/// Prefer the server's own message, then its text body, then the reason phrase.
fn failure_message(status: u16, body: &Value) -> String {
    if let Some(first) = body
        .get("messages")
        .and_then(Value::as_array)
        .and_then(|messages| messages.first())
        .and_then(Value::as_str)
    {
        return first.to_string();
    }
    if let Some(text) = body.as_str().filter(|text| !text.trim().is_empty()) {
        return text.trim().to_string();
    }
    reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason())
        .unwrap_or("Unknown status")
        .to_string()
}
