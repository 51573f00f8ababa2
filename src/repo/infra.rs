use std::sync::Arc;

use serde::Serialize;

use super::{Endpoint, ADMIN};
use crate::envelope::Envelope;
use crate::errors::{AdminError, Result};
use crate::models::infra::{
    CloudAccount, Dataplane, DataplaneRoute, NewCloudAccount, NewDataplane, NewDataplaneRoute, Sidecar,
};
use crate::models::EntityKind;
use crate::secret::Secret;
use crate::transport::{encode, Method, Transport};

// ── Sidecars ─────────────────────────────────────────────────

#[derive(Serialize)]
struct NameUpdate<'a> {
    name: &'a str,
}

#[derive(Clone)]
pub struct SidecarRepo {
    endpoint: Endpoint,
}

impl SidecarRepo {
    pub(crate) fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            endpoint: Endpoint::new(transport, EntityKind::Sidecar),
        }
    }

    pub async fn create(&self, sidecar: &Sidecar) -> Result<Sidecar> {
        let path = format!("{}/sidecars", ADMIN);
        self.endpoint
            .create(Method::POST, &path, sidecar, Envelope::None, Envelope::Single("sidecar"))
            .await
    }

    pub async fn get(&self, id: &str) -> Result<Sidecar> {
        self.endpoint.fetch(&sidecar_path(id), Envelope::Single("sidecar")).await
    }

    pub async fn update_name(&self, id: &str, name: &str) -> Result<Option<String>> {
        let path = format!("{}/name", sidecar_path(id));
        self.endpoint.update(Method::PUT, &path, &NameUpdate { name }).await
    }

    pub async fn update_version(&self, id: &str, version: &str) -> Result<Option<String>> {
        let path = format!("{}/version/{}", sidecar_path(id), encode(version));
        self.endpoint.command(Method::PUT, &path).await
    }

    pub async fn update_hostname(&self, id: &str, hostname: &str) -> Result<Option<String>> {
        let path = format!("{}/sidecar-hostname?hostname={}", sidecar_path(id), encode(hostname));
        self.endpoint.command(Method::PUT, &path).await
    }

    pub async fn enable_global_kms_decrypt(&self, id: &str) -> Result<Option<String>> {
        let path = format!("{}/kms-decrypt-policy?enable=true", sidecar_path(id));
        self.endpoint.command(Method::PUT, &path).await
    }

    pub async fn tls_cert(&self, id: &str) -> Result<Secret> {
        let path = format!("{}/tlscert", sidecar_path(id));
        self.endpoint.fetch(&path, Envelope::Single("secret")).await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.endpoint.delete(&sidecar_path(id)).await
    }
}

fn sidecar_path(id: &str) -> String {
    format!("{}/sidecars/{}", ADMIN, encode(id))
}

// ── Dataplanes ───────────────────────────────────────────────

/// Managed network stacks. Creation only starts provisioning; `status` on
/// later reads reports progress.
#[derive(Clone)]
pub struct DataplaneRepo {
    endpoint: Endpoint,
}

impl DataplaneRepo {
    pub(crate) fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            endpoint: Endpoint::new(transport, EntityKind::Dataplane),
        }
    }

    pub async fn create(&self, dataplane: &NewDataplane) -> Result<Dataplane> {
        let path = format!("{}/new-dataplane", stacks_path());
        self.endpoint
            .create(Method::POST, &path, dataplane, Envelope::None, Envelope::None)
            .await
    }

    pub async fn get(&self, id: &str) -> Result<Dataplane> {
        self.endpoint.fetch(&dataplane_path(id)?, Envelope::None).await
    }

    /// An empty id would address the collection itself.
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.endpoint.delete(&dataplane_path(id)?).await
    }
}

fn stacks_path() -> String {
    format!("{}/integrations/cloud/stacks", ADMIN)
}

fn dataplane_path(id: &str) -> Result<String> {
    if id.is_empty() {
        return Err(AdminError::InvalidRequest("dataplane id must not be empty".into()));
    }
    Ok(format!("{}/{}", stacks_path(), encode(id)))
}

#[derive(Clone)]
pub struct DataplaneRouteRepo {
    endpoint: Endpoint,
}

impl DataplaneRouteRepo {
    pub(crate) fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            endpoint: Endpoint::new(transport, EntityKind::DataplaneRoute),
        }
    }

    pub async fn create(&self, route: &NewDataplaneRoute) -> Result<DataplaneRoute> {
        let path = format!("{}/routes", stacks_path());
        self.endpoint
            .create(Method::POST, &path, route, Envelope::None, Envelope::Single("dataplane_routes"))
            .await
    }

    pub async fn get(&self, id: &str) -> Result<DataplaneRoute> {
        self.endpoint
            .fetch(&route_path(id), Envelope::Single("dataplane_routes"))
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.endpoint.delete(&route_path(id)).await
    }
}

fn route_path(id: &str) -> String {
    format!("{}/routes/{}", stacks_path(), encode(id))
}

// ── Cloud accounts ───────────────────────────────────────────

#[derive(Clone)]
pub struct CloudAccountRepo {
    endpoint: Endpoint,
}

impl CloudAccountRepo {
    pub(crate) fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            endpoint: Endpoint::new(transport, EntityKind::CloudAccount),
        }
    }

    /// The create response is flat; reads wrap the account in `integration`.
    pub async fn create(&self, account: &NewCloudAccount) -> Result<CloudAccount> {
        let path = format!("{}/integrations/cloud/aws/new", ADMIN);
        self.endpoint
            .create(Method::POST, &path, account, Envelope::None, Envelope::None)
            .await
    }

    pub async fn get(&self, id: &str) -> Result<CloudAccount> {
        self.endpoint
            .fetch(&account_path(id), Envelope::Single("integration"))
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.endpoint.delete(&account_path(id)).await
    }
}

fn account_path(id: &str) -> String {
    format!("{}/integrations/cloud/aws/{}", ADMIN, encode(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::testing::Canned;

    #[tokio::test]
    async fn test_empty_dataplane_id_makes_no_call() {
        let t = Arc::new(Canned::ok(""));
        let err = DataplaneRepo::new(t.clone()).delete("").await.unwrap_err();
        assert!(matches!(err, AdminError::InvalidRequest(_)));
        assert_eq!(t.count(), 0);
    }

    #[tokio::test]
    async fn test_sidecar_hostname_is_query_encoded() {
        let t = Arc::new(Canned::ok(r#"{"message": "ok"}"#));
        SidecarRepo::new(t.clone())
            .update_hostname("sc_1", "db.internal:5432")
            .await
            .unwrap();
        let (method, path, body) = t.last();
        assert_eq!(method, Method::PUT);
        assert_eq!(path, "/admin/sidecars/sc_1/sidecar-hostname?hostname=db.internal%3A5432");
        assert_eq!(body, None);
    }
}
