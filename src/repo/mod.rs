//! Entity repositories.
//!
//! One repository per entity kind. Each owns an [`Endpoint`] that knows how
//! to issue a request and run the body through the envelope codec; the
//! repository itself only contributes paths and envelope keys.

pub mod datastore;
pub mod encryption;
pub mod identity;
pub mod infra;
pub mod policy;

use std::sync::Arc;

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use crate::envelope::{self, Envelope};
use crate::errors::Result;
use crate::models::EntityKind;
use crate::transport::{Method, Transport};

pub use datastore::{DatastoreRepo, NativeRoleLinkRepo, NativeRoleRepo};
pub use encryption::{DefaultFieldEncryptionRepo, FieldEncryptionRepo, KeyRepo};
pub use identity::{GroupMembershipRepo, GroupRepo, RoleRepo};
pub use infra::{CloudAccountRepo, DataplaneRepo, DataplaneRouteRepo, SidecarRepo};
pub use policy::PolicyRepo;

/// Base path of every admin route.
pub(crate) const ADMIN: &str = "/admin";

/// Request plumbing shared by the repositories and the link resolver.
#[derive(Clone)]
pub(crate) struct Endpoint {
    transport: Arc<dyn Transport>,
    kind: EntityKind,
}

impl Endpoint {
    pub fn new(transport: Arc<dyn Transport>, kind: EntityKind) -> Self {
        Self { transport, kind }
    }

    pub async fn send(&self, method: Method, path: &str, body: Option<Vec<u8>>) -> Result<Bytes> {
        debug!(kind = %self.kind, %method, path, "admin request");
        self.transport.send(method, path, body).await
    }

    /// Send `payload` wrapped per `request` and decode one entity per `response`.
    pub async fn create<P, T>(
        &self,
        method: Method,
        path: &str,
        payload: &P,
        request: Envelope<'_>,
        response: Envelope<'_>,
    ) -> Result<T>
    where
        P: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let body = envelope::encode(payload, request)?;
        let bytes = self.send(method, path, Some(body)).await?;
        let created = envelope::decode(&bytes, response)?;
        info!(kind = %self.kind, path, "created");
        Ok(created)
    }

    pub async fn fetch<T: DeserializeOwned>(&self, path: &str, response: Envelope<'_>) -> Result<T> {
        let bytes = self.send(Method::GET, path, None).await?;
        envelope::decode(&bytes, response)
    }

    pub async fn fetch_all<T: DeserializeOwned>(
        &self,
        path: &str,
        response: Envelope<'_>,
    ) -> Result<Vec<T>> {
        let bytes = self.send(Method::GET, path, None).await?;
        envelope::decode_all(&bytes, response)
    }

    /// Field-scoped update with a JSON body; returns the remote's message.
    pub async fn update<P>(&self, method: Method, path: &str, payload: &P) -> Result<Option<String>>
    where
        P: Serialize + ?Sized + Sync,
    {
        let body = envelope::encode(payload, Envelope::None)?;
        let bytes = self.send(method, path, Some(body)).await?;
        let message = envelope::decode_ack(&bytes)?;
        info!(kind = %self.kind, path, "updated");
        Ok(message)
    }

    /// Bodiless call whose only answer is an acknowledgement.
    pub async fn command(&self, method: Method, path: &str) -> Result<Option<String>> {
        let bytes = self.send(method, path, None).await?;
        envelope::decode_ack(&bytes)
    }

    pub async fn delete(&self, path: &str) -> Result<()> {
        let bytes = self.send(Method::DELETE, path, None).await?;
        envelope::decode_ack(&bytes)?;
        info!(kind = %self.kind, path, "deleted");
        Ok(())
    }

    /// DELETE carrying a JSON body, as membership removal requires.
    pub async fn delete_with<P>(&self, path: &str, payload: &P) -> Result<()>
    where
        P: Serialize + ?Sized + Sync,
    {
        let body = envelope::encode(payload, Envelope::None)?;
        let bytes = self.send(Method::DELETE, path, Some(body)).await?;
        envelope::decode_ack(&bytes)?;
        info!(kind = %self.kind, path, "deleted");
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use bytes::Bytes;

    use crate::errors::Result;
    use crate::transport::{Method, Transport};

    /// Transport double answering every call with a fixed result and
    /// recording what it was asked.
    pub struct Canned {
        reply: Box<dyn Fn() -> Result<Bytes> + Send + Sync>,
        pub calls: Mutex<Vec<(Method, String, Option<serde_json::Value>)>>,
    }

    impl Canned {
        pub fn ok(body: &'static str) -> Self {
            Self::with(move || Ok(Bytes::from_static(body.as_bytes())))
        }

        pub fn with(reply: impl Fn() -> Result<Bytes> + Send + Sync + 'static) -> Self {
            Self {
                reply: Box::new(reply),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn last(&self) -> (Method, String, Option<serde_json::Value>) {
            self.calls.lock().unwrap().last().cloned().expect("no call recorded")
        }

        pub fn count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Transport for Canned {
        async fn send(&self, method: Method, path: &str, body: Option<Vec<u8>>) -> Result<Bytes> {
            let body = body.map(|b| serde_json::from_slice(&b).unwrap());
            self.calls.lock().unwrap().push((method, path.to_string(), body));
            (self.reply)()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::Canned;
    use super::*;
    use crate::errors::AdminError;
    use serde_json::json;

    fn endpoint(t: &Arc<Canned>) -> Endpoint {
        Endpoint::new(t.clone(), EntityKind::Group)
    }

    #[tokio::test]
    async fn test_create_wraps_and_unwraps() {
        let t = Arc::new(Canned::ok(r#"{"group": {"id": "grp_1"}}"#));
        let out: serde_json::Value = endpoint(&t)
            .create(
                Method::POST,
                "/admin/identities/groups",
                &json!({"name": "eng"}),
                Envelope::Single("group"),
                Envelope::Single("group"),
            )
            .await
            .unwrap();
        assert_eq!(out, json!({"id": "grp_1"}));
        let (method, path, body) = t.last();
        assert_eq!(method, Method::POST);
        assert_eq!(path, "/admin/identities/groups");
        assert_eq!(body, Some(json!({"group": {"name": "eng"}})));
    }

    #[tokio::test]
    async fn test_transport_error_passes_through_untouched() {
        let t = Arc::new(Canned::with(|| {
            Err(AdminError::RemoteRejected { status: 409, body: "conflict".into() })
        }));
        let err = endpoint(&t).delete("/admin/identities/groups/grp_1").await.unwrap_err();
        assert!(matches!(err, AdminError::RemoteRejected { status: 409, .. }));
        assert_eq!(t.count(), 1);
    }

    #[tokio::test]
    async fn test_command_sends_no_body() {
        let t = Arc::new(Canned::ok(r#"{"message": "ok"}"#));
        let msg = endpoint(&t)
            .command(Method::PUT, "/admin/sidecars/sc_1/version/1.2.0")
            .await
            .unwrap();
        assert_eq!(msg.as_deref(), Some("ok"));
        assert_eq!(t.last().2, None);
    }
}
