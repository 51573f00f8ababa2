use std::sync::Arc;

use super::{Endpoint, ADMIN};
use crate::envelope::Envelope;
use crate::errors::Result;
use crate::models::policy::{NewPolicy, Policy};
use crate::models::EntityKind;
use crate::transport::{encode, Method, Transport};

/// Access policies. There is no update: a policy is replaced by deleting
/// and recreating it.
#[derive(Clone)]
pub struct PolicyRepo {
    endpoint: Endpoint,
}

impl PolicyRepo {
    pub(crate) fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            endpoint: Endpoint::new(transport, EntityKind::Policy),
        }
    }

    /// The create response is the bare policy object.
    pub async fn create(&self, policy: &NewPolicy) -> Result<Policy> {
        let path = format!("{}/policies", ADMIN);
        self.endpoint
            .create(Method::POST, &path, policy, Envelope::None, Envelope::None)
            .await
    }

    pub async fn get(&self, id: &str) -> Result<Policy> {
        let path = format!("{}/policies/{}", ADMIN, encode(id));
        self.endpoint.fetch(&path, Envelope::Single("policy")).await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let path = format!("{}/policies/{}", ADMIN, encode(id));
        self.endpoint.delete(&path).await
    }
}
