#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use wiremock::MockServer;

use warden::transport::{HttpTransport, Method, Transport};
use warden::{AdminClient, AdminError, Result, Secret};

pub const API_KEY: &str = "sk-test-key";

pub fn client_for(server: &MockServer) -> AdminClient {
    let transport = HttpTransport::new(
        server.uri(),
        Secret::new(API_KEY),
        Duration::from_secs(5),
        Duration::from_secs(1),
    )
    .unwrap();
    AdminClient::new(Arc::new(transport))
}

/// Transport that counts calls and never reaches a network.
#[derive(Default)]
pub struct RecordingTransport {
    pub calls: AtomicUsize,
}

impl RecordingTransport {
    pub fn count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, _method: Method, path: &str, _body: Option<Vec<u8>>) -> Result<Bytes> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(AdminError::Transport(format!("unexpected call to {}", path)))
    }
}
