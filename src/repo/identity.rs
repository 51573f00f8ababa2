use std::sync::Arc;

use serde::Serialize;

use super::{Endpoint, ADMIN};
use crate::envelope::Envelope;
use crate::errors::Result;
use crate::models::identity::{Group, NewGroup, NewRole, Role, RoleNames};
use crate::models::EntityKind;
use crate::transport::{encode, Method, Transport};

// ── Roles ────────────────────────────────────────────────────

#[derive(Clone)]
pub struct RoleRepo {
    endpoint: Endpoint,
}

impl RoleRepo {
    pub(crate) fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            endpoint: Endpoint::new(transport, EntityKind::Role),
        }
    }

    /// For machine roles the returned `machine_access_token` is the only
    /// chance to see the token.
    pub async fn create(&self, role: &NewRole) -> Result<Role> {
        let path = format!("{}/identities/roles", ADMIN);
        self.endpoint
            .create(Method::POST, &path, role, Envelope::Single("role"), Envelope::Single("role"))
            .await
    }

    pub async fn get(&self, id: &str) -> Result<Role> {
        self.endpoint.fetch(&role_path(id), Envelope::Single("role")).await
    }

    pub async fn update_names(&self, id: &str, names: &RoleNames) -> Result<Option<String>> {
        self.endpoint.update(Method::PUT, &role_path(id), names).await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.endpoint.delete(&role_path(id)).await
    }
}

fn role_path(id: &str) -> String {
    format!("{}/identities/roles/{}", ADMIN, encode(id))
}

// ── Groups ───────────────────────────────────────────────────

#[derive(Clone)]
pub struct GroupRepo {
    endpoint: Endpoint,
}

impl GroupRepo {
    pub(crate) fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            endpoint: Endpoint::new(transport, EntityKind::Group),
        }
    }

    pub async fn create(&self, group: &NewGroup) -> Result<Group> {
        let path = format!("{}/identities/groups", ADMIN);
        self.endpoint
            .create(Method::POST, &path, group, Envelope::None, Envelope::Single("group"))
            .await
    }

    pub async fn get(&self, id: &str) -> Result<Group> {
        self.endpoint.fetch(&group_path(id), Envelope::Single("group")).await
    }

    /// Replace name and description. The remote takes this as a POST.
    pub async fn update_details(&self, id: &str, details: &NewGroup) -> Result<Option<String>> {
        self.endpoint.update(Method::POST, &group_path(id), details).await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.endpoint.delete(&group_path(id)).await
    }
}

fn group_path(id: &str) -> String {
    format!("{}/identities/groups/{}", ADMIN, encode(id))
}

// ── Group membership ─────────────────────────────────────────

#[derive(Serialize)]
struct Members<'a> {
    roles: [&'a str; 1],
}

/// Membership of roles in groups. Membership has no identity of its own;
/// it is read back through the group.
#[derive(Clone)]
pub struct GroupMembershipRepo {
    endpoint: Endpoint,
}

impl GroupMembershipRepo {
    pub(crate) fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            endpoint: Endpoint::new(transport, EntityKind::GroupMembership),
        }
    }

    pub async fn add(&self, group_id: &str, role_id: &str) -> Result<Option<String>> {
        let members = Members { roles: [role_id] };
        self.endpoint
            .update(Method::POST, &members_path(group_id), &members)
            .await
    }

    /// Whether `role_id` is currently listed among the group's members.
    pub async fn contains(&self, group_id: &str, role_id: &str) -> Result<bool> {
        let group: Group = self
            .endpoint
            .fetch(&group_path(group_id), Envelope::Single("group"))
            .await?;
        Ok(group.role_ids.iter().any(|id| id == role_id))
    }

    pub async fn remove(&self, group_id: &str, role_id: &str) -> Result<()> {
        let members = Members { roles: [role_id] };
        self.endpoint.delete_with(&members_path(group_id), &members).await
    }
}

fn members_path(group_id: &str) -> String {
    format!("{}/identities/groups/{}/link/users", ADMIN, encode(group_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::testing::Canned;
    use serde_json::json;

    #[tokio::test]
    async fn test_membership_add_sends_single_role() {
        let t = Arc::new(Canned::ok(r#"{"message": "linked"}"#));
        let repo = GroupMembershipRepo::new(t.clone());
        repo.add("grp_1", "role_1").await.unwrap();
        let (method, path, body) = t.last();
        assert_eq!(method, Method::POST);
        assert_eq!(path, "/admin/identities/groups/grp_1/link/users");
        assert_eq!(body, Some(json!({"roles": ["role_1"]})));
    }

    #[tokio::test]
    async fn test_membership_contains_reads_group() {
        let t = Arc::new(Canned::ok(
            r#"{"group": {"id": "grp_1", "name": "eng", "user_ids": ["role_2", "role_1"]}}"#,
        ));
        let repo = GroupMembershipRepo::new(t.clone());
        assert!(repo.contains("grp_1", "role_1").await.unwrap());
        assert!(!repo.contains("grp_1", "role_9").await.unwrap());
        assert_eq!(t.last().0, Method::GET);
    }

    #[tokio::test]
    async fn test_role_update_sends_only_names() {
        let t = Arc::new(Canned::ok(""));
        let repo = RoleRepo::new(t.clone());
        let names = RoleNames {
            first_name: "Grace".into(),
            last_name: "Hopper".into(),
            ..Default::default()
        };
        assert_eq!(repo.update_names("role_1", &names).await.unwrap(), None);
        assert_eq!(
            t.last().2,
            Some(json!({"name": "", "first_name": "Grace", "last_name": "Hopper"}))
        );
    }
}
