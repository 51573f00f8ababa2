pub mod http;

use async_trait::async_trait;
use bytes::Bytes;

use crate::errors::Result;

pub use http::HttpTransport;
pub use reqwest::Method;

/// One request against the admin API.
///
/// `path` is relative to the API host and already carries any query string.
/// Implementations must surface a non-2xx response as an error rather than
/// return its body: 404 as `NotFound`, anything else as `RemoteRejected`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, method: Method, path: &str, body: Option<Vec<u8>>) -> Result<Bytes>;
}

/// Percent-encode one path segment or query value.
pub(crate) fn encode(segment: &str) -> std::borrow::Cow<'_, str> {
    urlencoding::encode(segment)
}
