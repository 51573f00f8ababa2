use serde::{Deserialize, Serialize};

use crate::secret::Secret;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Technology {
    Snowflake,
    Postgres,
    Redshift,
    Mysql,
    Mariadb,
    S3,
    Http,
    Ssh,
}

/// What happens to a query no policy decides on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessBehavior {
    Allow,
    Block,
}

/// A datastore as the infra endpoint reports it. `datastore_id` is the
/// identifier every other datastore endpoint takes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Datastore {
    #[serde(default)]
    pub id: String,
    pub datastore_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub hostname: String,
    #[serde(default)]
    pub port: u16,
    pub technology: Technology,
    #[serde(default)]
    pub health_check_db_name: String,
    #[serde(default)]
    pub default_access_behavior: Option<AccessBehavior>,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub cloud_provider: String,
    #[serde(default)]
    pub cloud_region: String,
    #[serde(default)]
    pub deployment_type: String,
    #[serde(default)]
    pub cloud_account_id: String,
    #[serde(default)]
    pub dataplane_id: String,
    #[serde(default)]
    pub fail_open: bool,
    #[serde(default)]
    pub global_kms_decrypt: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewDatastore {
    pub name: String,
    pub hostname: String,
    pub port: u16,
    pub technology: Technology,
    pub username: String,
    pub password: Secret,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub health_check_db_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_access_behavior: Option<AccessBehavior>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub cloud_provider: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub cloud_region: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub deployment_type: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub cloud_account_id: String,
    pub fail_open: bool,
}

// ── Native roles ─────────────────────────────────────────────

/// A database-native account. The secret is write-only and never appears
/// in responses.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NativeRole {
    pub datastore_id: String,
    pub native_role_id: String,
    #[serde(default)]
    pub use_as_default: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewNativeRole {
    pub datastore_id: String,
    pub native_role_id: String,
    pub native_role_secret: Secret,
    pub use_as_default: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentityKind {
    Role,
    Group,
}

/// Maps a platform identity onto a native role of one datastore.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NativeRoleLink {
    pub datastore_id: String,
    pub native_role_id: String,
    pub identity_id: String,
    #[serde(rename = "identity_type")]
    pub identity_kind: IdentityKind,
}
