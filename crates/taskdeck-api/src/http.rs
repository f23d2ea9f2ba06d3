//! reqwest-backed [`HttpTransport`].

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;
use taskdeck_core::prelude::*;
use url::Url;

use crate::transport::{ApiRequest, ApiResponse, HttpTransport, Method};

/// Header carrying the backend API key (`API-KEY`; header names are case-insensitive).
pub const API_KEY_HEADER: &str = "api-key";

/// Connection options for [`ReqwestTransport`].
#[derive(Debug, Clone, Default)]
pub struct TransportOptions {
    /// Sent as the `API-KEY` header on every request.
    pub api_key: Option<String>,
    /// Keep the backend's session cookie between requests.
    pub cookies: bool,
    /// No timeout when `None`.
    pub timeout: Option<Duration>,
}

/// Sends requests with a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: String,
}

impl ReqwestTransport {
    pub fn new(base_url: &str, options: &TransportOptions) -> Result<Self> {
        let base_url = normalize_base_url(base_url)?;

        let mut headers = HeaderMap::new();
        if let Some(key) = &options.api_key {
            let value = HeaderValue::from_str(key)
                .map_err(|e| Error::config_invalid(format!("api_key: {e}")))?;
            headers.insert(HeaderName::from_static(API_KEY_HEADER), value);
        }

        let mut builder = reqwest::Client::builder()
            .cookie_store(options.cookies)
            .default_headers(headers);
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {e}")))?;

        debug!("HTTP transport ready for {}", base_url);
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, path: &str) -> Result<Url> {
        let joined = format!("{}{}", self.base_url, path);
        Url::parse(&joined).map_err(|e| Error::invalid_url(joined, e.to_string()))
    }
}

impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let url = self.url_for(&request.path)?;

        let mut builder = self.client.request(to_reqwest(request.method), url);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Error::transport(e.to_string()))?;
        let status = response.status().as_u16();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::transport(format!("failed to read response body: {e}")))?;

        trace!("{} -> {} ({} bytes)", request, status, bytes.len());
        Ok(ApiResponse::new(status, decode_body(status, &bytes)?))
    }
}

fn to_reqwest(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
    }
}

/// Validate an absolute http(s) base URL and strip its trailing slash.
pub fn normalize_base_url(raw: &str) -> Result<String> {
    let url = Url::parse(raw.trim()).map_err(|e| Error::invalid_url(raw, e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::invalid_url(raw, "scheme must be http or https"));
    }
    Ok(url.as_str().trim_end_matches('/').to_string())
}

/// Empty bodies become `Null`. Non-JSON bodies are an error on 2xx and are
/// kept as text otherwise, so the status is not masked by a parse failure.
fn decode_body(status: u16, bytes: &[u8]) -> Result<Value> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    match serde_json::from_slice(bytes) {
        Ok(value) => Ok(value),
        Err(e) if (200..300).contains(&status) => Err(e.into()),
        Err(_) => Ok(Value::String(String::from_utf8_lossy(bytes).into_owned())),
    }
}
