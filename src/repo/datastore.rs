use std::sync::Arc;

use serde::Serialize;

use super::{Endpoint, ADMIN};
use crate::envelope::Envelope;
use crate::errors::Result;
use crate::models::datastore::{
    AccessBehavior, Datastore, IdentityKind, NativeRole, NativeRoleLink, NewDatastore, NewNativeRole,
};
use crate::models::EntityKind;
use crate::secret::Secret;
use crate::transport::{encode, Method, Transport};

// ── Field groups ─────────────────────────────────────────────

#[derive(Serialize)]
struct NameUpdate<'a> {
    name: &'a str,
}

#[derive(Serialize)]
struct HealthCheckUpdate<'a> {
    health_check_db_name: &'a str,
}

#[derive(Serialize)]
struct AccessBehaviorUpdate {
    default_access_behavior: AccessBehavior,
}

#[derive(Serialize)]
struct CredentialsUpdate<'a> {
    username: &'a str,
    password: &'a Secret,
}

// ── Datastores ───────────────────────────────────────────────

#[derive(Clone)]
pub struct DatastoreRepo {
    endpoint: Endpoint,
}

impl DatastoreRepo {
    pub(crate) fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            endpoint: Endpoint::new(transport, EntityKind::Datastore),
        }
    }

    pub async fn create(&self, datastore: &NewDatastore) -> Result<Datastore> {
        let path = format!("{}/stores", ADMIN);
        self.endpoint
            .create(Method::POST, &path, datastore, Envelope::None, Envelope::Single("data_store"))
            .await
    }

    /// Reads the infra view, which carries connection and cloud fields.
    pub async fn get(&self, id: &str) -> Result<Datastore> {
        let path = format!("{}/infra", store_path(id));
        self.endpoint.fetch(&path, Envelope::Single("data_store")).await
    }

    pub async fn update_name(&self, id: &str, name: &str) -> Result<Option<String>> {
        let path = format!("{}/name", store_path(id));
        self.endpoint.update(Method::PUT, &path, &NameUpdate { name }).await
    }

    pub async fn update_health_check_db_name(&self, id: &str, db_name: &str) -> Result<Option<String>> {
        let path = format!("{}/health-check-db-name", store_path(id));
        let body = HealthCheckUpdate { health_check_db_name: db_name };
        self.endpoint.update(Method::PUT, &path, &body).await
    }

    pub async fn update_default_access_behavior(
        &self,
        id: &str,
        behavior: AccessBehavior,
    ) -> Result<Option<String>> {
        let path = format!("{}/default-access-behavior", store_path(id));
        let body = AccessBehaviorUpdate { default_access_behavior: behavior };
        self.endpoint.update(Method::PUT, &path, &body).await
    }

    pub async fn update_credentials(
        &self,
        id: &str,
        username: &str,
        password: &Secret,
    ) -> Result<Option<String>> {
        let path = format!("{}/credentials", store_path(id));
        let body = CredentialsUpdate { username, password };
        self.endpoint.update(Method::PUT, &path, &body).await
    }

    /// One-way switch; the API has no call to disable it again.
    pub async fn enable_global_kms_decrypt(&self, id: &str) -> Result<Option<String>> {
        let path = format!("{}/kms-decrypt-policy?enable=true", store_path(id));
        self.endpoint.command(Method::PUT, &path).await
    }

    pub async fn tls_cert(&self, id: &str) -> Result<Secret> {
        let path = format!("{}/tlscert", store_path(id));
        self.endpoint.fetch(&path, Envelope::Single("secret")).await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.endpoint.delete(&store_path(id)).await
    }
}

fn store_path(id: &str) -> String {
    format!("{}/stores/{}", ADMIN, encode(id))
}

// ── Native roles ─────────────────────────────────────────────

#[derive(Serialize)]
struct SecretUpdate<'a> {
    secret: &'a Secret,
}

#[derive(Clone)]
pub struct NativeRoleRepo {
    endpoint: Endpoint,
}

impl NativeRoleRepo {
    pub(crate) fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            endpoint: Endpoint::new(transport, EntityKind::NativeRole),
        }
    }

    pub async fn create(&self, role: &NewNativeRole) -> Result<NativeRole> {
        let path = format!("{}/native-roles", store_path(&role.datastore_id));
        self.endpoint
            .create(Method::POST, &path, role, Envelope::None, Envelope::Single("native_role"))
            .await
    }

    pub async fn get(&self, datastore_id: &str, native_role_id: &str) -> Result<NativeRole> {
        self.endpoint
            .fetch(&native_role_path(datastore_id, native_role_id), Envelope::Single("native_role"))
            .await
    }

    pub async fn update_secret(
        &self,
        datastore_id: &str,
        native_role_id: &str,
        secret: &Secret,
    ) -> Result<Option<String>> {
        let path = format!("{}/secret", native_role_path(datastore_id, native_role_id));
        self.endpoint.update(Method::PUT, &path, &SecretUpdate { secret }).await
    }

    /// Make this native role the datastore's default.
    pub async fn set_default(&self, datastore_id: &str, native_role_id: &str) -> Result<Option<String>> {
        let path = format!("{}/default", native_role_path(datastore_id, native_role_id));
        self.endpoint.command(Method::POST, &path).await
    }

    pub async fn delete(&self, datastore_id: &str, native_role_id: &str) -> Result<()> {
        self.endpoint
            .delete(&native_role_path(datastore_id, native_role_id))
            .await
    }
}

fn native_role_path(datastore_id: &str, native_role_id: &str) -> String {
    format!("{}/native-roles/{}", store_path(datastore_id), encode(native_role_id))
}

// ── Native role links ────────────────────────────────────────

#[derive(Serialize)]
struct IdentityKindBody {
    identity_type: IdentityKind,
}

/// Links between platform identities and native roles. A link is keyed by
/// `(datastore_id, identity_id)`; an identity maps to at most one native
/// role per datastore.
#[derive(Clone)]
pub struct NativeRoleLinkRepo {
    endpoint: Endpoint,
}

impl NativeRoleLinkRepo {
    pub(crate) fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            endpoint: Endpoint::new(transport, EntityKind::NativeRoleLink),
        }
    }

    pub async fn create(
        &self,
        datastore_id: &str,
        native_role_id: &str,
        identity_id: &str,
        identity_kind: IdentityKind,
    ) -> Result<NativeRoleLink> {
        let path = format!(
            "{}/link/{}",
            native_role_path(datastore_id, native_role_id),
            encode(identity_id)
        );
        let body = IdentityKindBody { identity_type: identity_kind };
        self.endpoint
            .create(Method::PUT, &path, &body, Envelope::None, Envelope::Single("link"))
            .await
    }

    pub async fn get(&self, datastore_id: &str, identity_id: &str) -> Result<NativeRoleLink> {
        let path = format!(
            "{}/native-roles/identity-links/{}",
            store_path(datastore_id),
            encode(identity_id)
        );
        self.endpoint.fetch(&path, Envelope::Single("link")).await
    }

    /// The native role segment of the route is not consulted by the remote.
    pub async fn delete(&self, datastore_id: &str, identity_id: &str) -> Result<()> {
        let path = format!(
            "{}/native-roles/ignored/link/{}",
            store_path(datastore_id),
            encode(identity_id)
        );
        self.endpoint.delete(&path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::testing::Canned;
    use serde_json::json;

    #[tokio::test]
    async fn test_credentials_update_body() {
        let t = Arc::new(Canned::ok(r#"{"message": "updated"}"#));
        let repo = DatastoreRepo::new(t.clone());
        repo.update_credentials("ds_1", "svc", &Secret::new("hunter2"))
            .await
            .unwrap();
        let (method, path, body) = t.last();
        assert_eq!(method, Method::PUT);
        assert_eq!(path, "/admin/stores/ds_1/credentials");
        assert_eq!(body, Some(json!({"username": "svc", "password": "hunter2"})));
    }

    #[tokio::test]
    async fn test_tls_cert_is_secret() {
        let t = Arc::new(Canned::ok(r#"{"secret": "-----BEGIN CERTIFICATE-----"}"#));
        let cert = DatastoreRepo::new(t).tls_cert("ds_1").await.unwrap();
        assert!(cert.expose().starts_with("-----BEGIN"));
        assert!(!format!("{:?}", cert).contains("BEGIN"));
    }

    #[tokio::test]
    async fn test_native_role_link_create_route() {
        let t = Arc::new(Canned::ok(
            r#"{"link": {"datastore_id": "ds_1", "native_role_id": "analyst", "identity_id": "grp_1", "identity_type": "group"}}"#,
        ));
        let repo = NativeRoleLinkRepo::new(t.clone());
        let link = repo
            .create("ds_1", "analyst", "grp_1", IdentityKind::Group)
            .await
            .unwrap();
        assert_eq!(link.identity_kind, IdentityKind::Group);
        let (method, path, body) = t.last();
        assert_eq!(method, Method::PUT);
        assert_eq!(path, "/admin/stores/ds_1/native-roles/analyst/link/grp_1");
        assert_eq!(body, Some(json!({"identity_type": "group"})));
    }

    #[tokio::test]
    async fn test_enable_kms_decrypt_query() {
        let t = Arc::new(Canned::ok(""));
        DatastoreRepo::new(t.clone())
            .enable_global_kms_decrypt("ds 1")
            .await
            .unwrap();
        assert_eq!(t.last().1, "/admin/stores/ds%201/kms-decrypt-policy?enable=true");
    }
}
