//! Policy link resolver.
//!
//! A policy can be attached to a group, a role or a datastore, and each kind
//! has its own routes and response shape. [`LinkRoute`] computes those from
//! the target; the resolver issues the calls.
//!
//! Deleting by link id is two-phase: the link is read back to learn its
//! target ([`LinkResolver::resolve`]) and then removed through the
//! kind-specific route ([`LinkResolver::delete_resolved`]). Nothing holds the
//! link between the two calls; a concurrent removal shows up as `NotFound`
//! from the second.

mod route;

use std::sync::Arc;

use tracing::{debug, info};

use crate::envelope::{self, Envelope};
use crate::errors::{AdminError, Result};
use crate::models::link::{LinkTarget, NewPolicyLink, PolicyLink, PolicyLinkRecord};
use crate::models::EntityKind;
use crate::repo::Endpoint;
use crate::transport::{Method, Transport};

pub(crate) use route::LinkRoute;

#[derive(Clone)]
pub struct LinkResolver {
    endpoint: Endpoint,
}

impl LinkResolver {
    pub(crate) fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            endpoint: Endpoint::new(transport, EntityKind::PolicyLink),
        }
    }

    /// Attach a policy to the target named by `link`.
    ///
    /// An unknown target kind is rejected before any request is made.
    pub async fn create(&self, link: &NewPolicyLink) -> Result<PolicyLink> {
        let target = link.target()?;
        self.attach(&link.policy_id, &target).await
    }

    pub async fn attach(&self, policy_id: &str, target: &LinkTarget) -> Result<PolicyLink> {
        let route = LinkRoute::new(policy_id, target);
        let body = match &route.create_body {
            Some(list) => Some(envelope::encode(list, Envelope::None)?),
            None => None,
        };
        let bytes = self.endpoint.send(Method::POST, &route.create_path, body).await?;

        let record: PolicyLinkRecord = match route.response {
            Envelope::Array(key) => {
                let mut items = envelope::elements(&bytes, route.response)?;
                if items.len() != 1 {
                    return Err(AdminError::RemoteInvariantViolation {
                        key,
                        found: items.len(),
                    });
                }
                envelope::decode_element(items.remove(0), route.response)?
            }
            other => envelope::decode(&bytes, other)?,
        };

        let link = PolicyLink::try_from(record.fill_from(policy_id, target))?;
        info!(link_id = %link.id, policy_id, target_kind = %target.kind(), "policy link created");
        Ok(link)
    }

    pub async fn get(&self, link_id: &str) -> Result<PolicyLink> {
        let record: PolicyLinkRecord = self
            .endpoint
            .fetch(&LinkRoute::read_path(link_id), Envelope::Single("policy_link"))
            .await?;
        PolicyLink::try_from(record)
    }

    /// First phase of a delete: read the link to learn its target.
    pub async fn resolve(&self, link_id: &str) -> Result<PolicyLink> {
        let link = self.get(link_id).await?;
        debug!(link_id, target_kind = %link.target.kind(), "resolved policy link");
        Ok(link)
    }

    /// Second phase of a delete: remove a link whose target is known.
    pub async fn delete_resolved(&self, link: &PolicyLink) -> Result<()> {
        let route = LinkRoute::new(&link.policy_id, &link.target);
        self.endpoint.delete(&route.delete_path).await?;
        info!(link_id = %link.id, target_kind = %link.target.kind(), "policy link deleted");
        Ok(())
    }

    /// Resolve then delete; returns the link that was removed.
    pub async fn delete(&self, link_id: &str) -> Result<PolicyLink> {
        let link = self.resolve(link_id).await?;
        self.delete_resolved(&link).await?;
        Ok(link)
    }
}
