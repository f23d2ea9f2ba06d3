//! taskdeck-api - HTTP layer for taskdeck
//!
//! - [`HttpTransport`] - the transport seam (`send(ApiRequest) -> ApiResponse`)
//! - [`ReqwestTransport`] - reqwest implementation with cookie store and API key header
//! - [`ApiClient`] - status / envelope interpretation on top of any transport
//! - [`endpoints`] - REST paths
//!
//! With the `test-helpers` feature, [`test_utils::FakeTransport`] scripts
//! responses for tests in downstream crates.

pub mod client;
pub mod endpoints;
pub mod http;
pub mod transport;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_utils;

pub use client::ApiClient;
pub use http::{normalize_base_url, ReqwestTransport, TransportOptions};
pub use transport::{ApiRequest, ApiResponse, HttpTransport, LocalHttpTransport, Method};
