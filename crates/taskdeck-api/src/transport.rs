//! Transport seam between the typed client and the network.
//!
//! Everything above this trait deals in [`ApiRequest`] / [`ApiResponse`];
//! the reqwest implementation lives in [`crate::http`] and tests substitute
//! [`crate::test_utils::FakeTransport`].

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use taskdeck_core::prelude::*;

/// HTTP verbs used by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request relative to the configured base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            body: None,
        }
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            method: Method::Delete,
            path: path.into(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: &impl Serialize) -> Result<Self> {
        Ok(Self {
            method: Method::Post,
            path: path.into(),
            body: Some(serde_json::to_value(body)?),
        })
    }

    pub fn put(path: impl Into<String>, body: &impl Serialize) -> Result<Self> {
        Ok(Self {
            method: Method::Put,
            path: path.into(),
            body: Some(serde_json::to_value(body)?),
        })
    }
}

impl fmt::Display for ApiRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

/// Raw response: status code plus decoded JSON body (`Null` when empty).
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one request and returns the raw response.
///
/// Implementations report network-level problems as [`Error::Transport`];
/// status codes are interpreted by [`crate::ApiClient`].
#[trait_variant::make(HttpTransport: Send)]
pub trait LocalHttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse>;
}

impl<T: HttpTransport + Sync> HttpTransport for Arc<T> {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        HttpTransport::send(&**self, request).await
    }
}
