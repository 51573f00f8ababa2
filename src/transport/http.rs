//! HTTP transport for the admin API.
//! A single attempt per call: no retry middleware, no response caching.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, StatusCode};
use std::time::Duration;
use tracing::{debug, warn};

use super::Transport;
use crate::config::Config;
use crate::errors::{AdminError, Result};
use crate::secret::Secret;

const API_KEY_HEADER: &str = "X-Api-Key";
const REQUEST_ID_HEADER: &str = "X-Request-Id";

pub struct HttpTransport {
    base_url: String,
    api_key: Secret,
    http: Client,
}

impl HttpTransport {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Secret,
        timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self> {
        let http = Client::builder()
            .use_rustls_tls()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .user_agent(concat!("warden/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let base_url: String = base_url.into();
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            http,
        })
    }

    pub fn from_config(cfg: &Config) -> Result<Self> {
        Self::new(
            cfg.api_url.clone(),
            cfg.api_key.clone(),
            Duration::from_secs(cfg.timeout_secs),
            Duration::from_secs(cfg.connect_timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, method: Method, path: &str, body: Option<Vec<u8>>) -> Result<Bytes> {
        let url = format!("{}{}", self.base_url, path);
        let request_id = uuid::Uuid::new_v4().to_string();

        let mut req = self
            .http
            .request(method.clone(), &url)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .header(API_KEY_HEADER, self.api_key.expose())
            .header(REQUEST_ID_HEADER, request_id.as_str());

        if let Some(body) = body {
            req = req
                .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
                .body(body);
        }

        debug!(%method, %path, %request_id, "admin request");

        let resp = req.send().await.map_err(|e| {
            warn!(%method, %path, %request_id, "admin request failed: {}", e);
            AdminError::from(e)
        })?;

        let status = resp.status();
        let bytes = resp.bytes().await?;

        if status.is_success() {
            debug!(%method, %path, %request_id, status = status.as_u16(), "admin response");
            return Ok(bytes);
        }

        let body = String::from_utf8_lossy(&bytes).into_owned();
        warn!(%method, %path, %request_id, status = status.as_u16(), "admin API returned an error");

        if status == StatusCode::NOT_FOUND {
            return Err(AdminError::NotFound { body });
        }
        Err(AdminError::RemoteRejected {
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transport(base: &str) -> HttpTransport {
        HttpTransport::new(
            base,
            Secret::new("sk-test"),
            Duration::from_secs(5),
            Duration::from_secs(1),
        )
        .unwrap()
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        assert_eq!(transport("http://localhost:4000/").base_url(), "http://localhost:4000");
        assert_eq!(transport("http://localhost:4000").base_url(), "http://localhost:4000");
    }

    #[tokio::test]
    async fn test_connection_failure_is_transport_error() {
        // Port 9 (discard) is not listening on CI hosts.
        let t = transport("http://127.0.0.1:9");
        let err = t.send(Method::GET, "/admin/policies/p1", None).await.unwrap_err();
        assert!(matches!(err, AdminError::Transport(_)), "got {:?}", err);
        assert!(err.is_transient());
    }
}
