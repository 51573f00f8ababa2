pub mod datastore;
pub mod encryption;
pub mod identity;
pub mod infra;
pub mod link;
pub mod policy;

use std::fmt;

use serde::{Deserialize, Deserializer};

/// Entity kinds served by the admin API, used to label logs and errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Policy,
    PolicyLink,
    Role,
    Group,
    GroupMembership,
    Datastore,
    NativeRole,
    NativeRoleLink,
    Key,
    FieldEncryption,
    DefaultFieldEncryption,
    Sidecar,
    Dataplane,
    DataplaneRoute,
    CloudAccount,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Policy => "policy",
            EntityKind::PolicyLink => "policy_link",
            EntityKind::Role => "role",
            EntityKind::Group => "group",
            EntityKind::GroupMembership => "group_membership",
            EntityKind::Datastore => "datastore",
            EntityKind::NativeRole => "native_role",
            EntityKind::NativeRoleLink => "native_role_link",
            EntityKind::Key => "key",
            EntityKind::FieldEncryption => "field_encryption",
            EntityKind::DefaultFieldEncryption => "default_field_encryption",
            EntityKind::Sidecar => "sidecar",
            EntityKind::Dataplane => "dataplane",
            EntityKind::DataplaneRoute => "dataplane_route",
            EntityKind::CloudAccount => "cloud_account",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// List fields the remote may omit or send as `null`; both mean empty.
pub(crate) fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}
