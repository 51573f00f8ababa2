use std::sync::Arc;

use super::{Endpoint, ADMIN};
use crate::envelope::Envelope;
use crate::errors::{AdminError, Result};
use crate::models::encryption::{DefaultFieldEncryption, FieldEncryption, Key, NewKey};
use crate::models::EntityKind;
use crate::transport::{encode, Method, Transport};

#[derive(Clone)]
pub struct KeyRepo {
    endpoint: Endpoint,
}

impl KeyRepo {
    pub(crate) fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            endpoint: Endpoint::new(transport, EntityKind::Key),
        }
    }

    pub async fn create(&self, key: &NewKey) -> Result<Key> {
        let path = format!("{}/integrations/encryption", ADMIN);
        self.endpoint
            .create(Method::POST, &path, key, Envelope::None, Envelope::Single("key"))
            .await
    }

    pub async fn get(&self, id: &str) -> Result<Key> {
        self.endpoint.fetch(&key_path(id), Envelope::Single("key")).await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.endpoint.delete(&key_path(id)).await
    }
}

fn key_path(id: &str) -> String {
    format!("{}/integrations/encryption/{}", ADMIN, encode(id))
}

// ── Field encryption ─────────────────────────────────────────

/// Per-field encryption rules, identified by `(datastore_id, path)`.
#[derive(Clone)]
pub struct FieldEncryptionRepo {
    endpoint: Endpoint,
}

impl FieldEncryptionRepo {
    pub(crate) fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            endpoint: Endpoint::new(transport, EntityKind::FieldEncryption),
        }
    }

    pub async fn create(&self, field: &FieldEncryption) -> Result<FieldEncryption> {
        self.endpoint
            .create(
                Method::POST,
                &fields_path(&field.datastore_id),
                field,
                Envelope::None,
                Envelope::Single("field"),
            )
            .await
    }

    pub async fn list(&self, datastore_id: &str) -> Result<Vec<FieldEncryption>> {
        self.endpoint
            .fetch_all(&fields_path(datastore_id), Envelope::Single("fields"))
            .await
    }

    /// The remote only lists a datastore's rules; a missing path maps to
    /// `NotFound` like any other absent entity.
    pub async fn get(&self, datastore_id: &str, path: &str) -> Result<FieldEncryption> {
        self.list(datastore_id)
            .await?
            .into_iter()
            .find(|f| f.path == path)
            .ok_or_else(|| AdminError::NotFound {
                body: format!("no field encryption for '{}' on datastore '{}'", path, datastore_id),
            })
    }

    pub async fn delete(&self, datastore_id: &str, path: &str) -> Result<()> {
        let route = format!("{}/{}", fields_path(datastore_id), encode(path));
        self.endpoint.delete(&route).await
    }
}

fn fields_path(datastore_id: &str) -> String {
    format!("{}/stores/{}/encryption/field", ADMIN, encode(datastore_id))
}

// ── Default field encryption ─────────────────────────────────

/// The organization-wide default. Writing it again replaces it.
#[derive(Clone)]
pub struct DefaultFieldEncryptionRepo {
    endpoint: Endpoint,
}

const DEFAULT_POLICY_KEY: &str = "default_field_encryption_policy";

impl DefaultFieldEncryptionRepo {
    pub(crate) fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            endpoint: Endpoint::new(transport, EntityKind::DefaultFieldEncryption),
        }
    }

    pub async fn put(&self, policy: &DefaultFieldEncryption) -> Result<DefaultFieldEncryption> {
        self.endpoint
            .create(
                Method::POST,
                &default_path(),
                policy,
                Envelope::None,
                Envelope::Single(DEFAULT_POLICY_KEY),
            )
            .await
    }

    pub async fn get(&self) -> Result<DefaultFieldEncryption> {
        self.endpoint
            .fetch(&default_path(), Envelope::Single(DEFAULT_POLICY_KEY))
            .await
    }

    pub async fn delete(&self) -> Result<()> {
        self.endpoint.delete(&default_path()).await
    }
}

fn default_path() -> String {
    format!("{}/encryption/default-policy", ADMIN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::testing::Canned;

    const FIELDS: &str = r#"{"fields": [
        {"datastore_id": "ds_1", "path": "public.users.email", "key_storage": "control_plane_only", "key_id": "k1", "alg": "aes_random"},
        {"datastore_id": "ds_1", "path": "public.users.ssn", "key_storage": "control_plane_only", "key_id": "k1", "alg": "aes_deterministic"}
    ]}"#;

    #[tokio::test]
    async fn test_field_lookup_by_path() {
        let t = Arc::new(Canned::ok(FIELDS));
        let repo = FieldEncryptionRepo::new(t.clone());
        let field = repo.get("ds_1", "public.users.ssn").await.unwrap();
        assert_eq!(field.key_id, "k1");
        assert_eq!(t.last().1, "/admin/stores/ds_1/encryption/field");
    }

    #[tokio::test]
    async fn test_field_lookup_missing_path_is_not_found() {
        let t = Arc::new(Canned::ok(FIELDS));
        let err = FieldEncryptionRepo::new(t)
            .get("ds_1", "public.orders.card")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
