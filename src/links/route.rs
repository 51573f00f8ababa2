use serde::Serialize;

use crate::envelope::Envelope;
use crate::models::link::LinkTarget;
use crate::repo::ADMIN;
use crate::transport::encode;

/// Body of a group link create: the policies to attach.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct PolicyList {
    pub policies: Vec<String>,
}

/// Wire shape of the link operations for one `(policy, target)` pair.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct LinkRoute {
    pub create_path: String,
    pub create_body: Option<PolicyList>,
    pub response: Envelope<'static>,
    pub delete_path: String,
}

impl LinkRoute {
    /// The only place that branches on the target kind.
    pub fn new(policy_id: &str, target: &LinkTarget) -> Self {
        let policy = encode(policy_id);
        match target {
            LinkTarget::Group(id) => {
                let group = format!("{}/identities/groups/{}/link/policies", ADMIN, encode(id));
                LinkRoute {
                    delete_path: format!("{}/{}", group, policy),
                    create_path: group,
                    create_body: Some(PolicyList {
                        policies: vec![policy_id.to_string()],
                    }),
                    response: Envelope::Array("policy_links"),
                }
            }
            LinkTarget::Role(id) => LinkRoute {
                create_path: format!(
                    "{}/identities/roles/link/{}?policy_id={}",
                    ADMIN,
                    encode(id),
                    policy
                ),
                create_body: None,
                response: Envelope::Single("policy_link"),
                delete_path: format!("{}/identities/roles/link/{}/link/{}", ADMIN, encode(id), policy),
            },
            LinkTarget::Datastore(id) => LinkRoute {
                create_path: format!("{}/stores/{}/link?policy_id={}", ADMIN, encode(id), policy),
                create_body: None,
                response: Envelope::Single("policy_link"),
                delete_path: format!("{}/stores/{}/link/{}", ADMIN, encode(id), policy),
            },
        }
    }

    /// Kind-agnostic read of a link by id.
    pub fn read_path(link_id: &str) -> String {
        format!("{}/policies/links/{}", ADMIN, encode(link_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_route() {
        let route = LinkRoute::new("pol_1", &LinkTarget::Group("grp_1".into()));
        assert_eq!(route.create_path, "/admin/identities/groups/grp_1/link/policies");
        assert_eq!(
            route.create_body,
            Some(PolicyList { policies: vec!["pol_1".into()] })
        );
        assert_eq!(route.response, Envelope::Array("policy_links"));
        assert_eq!(route.delete_path, "/admin/identities/groups/grp_1/link/policies/pol_1");
    }

    #[test]
    fn test_role_route() {
        let route = LinkRoute::new("pol_1", &LinkTarget::Role("role_1".into()));
        assert_eq!(route.create_path, "/admin/identities/roles/link/role_1?policy_id=pol_1");
        assert_eq!(route.create_body, None);
        assert_eq!(route.response, Envelope::Single("policy_link"));
        assert_eq!(route.delete_path, "/admin/identities/roles/link/role_1/link/pol_1");
    }

    #[test]
    fn test_datastore_route() {
        let route = LinkRoute::new("pol_1", &LinkTarget::Datastore("ds_1".into()));
        assert_eq!(route.create_path, "/admin/stores/ds_1/link?policy_id=pol_1");
        assert_eq!(route.delete_path, "/admin/stores/ds_1/link/pol_1");
    }

    #[test]
    fn test_ids_are_percent_encoded() {
        let route = LinkRoute::new("pol&1", &LinkTarget::Datastore("ds/1".into()));
        assert_eq!(route.create_path, "/admin/stores/ds%2F1/link?policy_id=pol%261");
        assert_eq!(LinkRoute::read_path("lnk 1"), "/admin/policies/links/lnk%201");
    }
}
