use serde::{Deserialize, Serialize};

use crate::secret::Secret;

// ── Role ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleKind {
    Human,
    Machine,
}

/// An identity: a person (name + email) or a machine (app name).
#[derive(Debug, Clone, Deserialize)]
pub struct Role {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: RoleKind,
    #[serde(default)]
    pub db_username: String,

    // Human
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,

    // Machine
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub app_type: String,
    /// Only carried by create and get responses for machine roles. Never
    /// sent back to the API; the type is not `Serialize`.
    #[serde(default, rename = "machine_role_access_token")]
    pub machine_access_token: Option<Secret>,
}

/// Create payload; sent wrapped as `{"role": {...}}`.
#[derive(Debug, Clone, Serialize)]
pub struct NewRole {
    #[serde(rename = "type")]
    pub kind: RoleKind,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub first_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub last_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub email: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub app_type: String,
}

impl NewRole {
    pub fn human(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            kind: RoleKind::Human,
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            name: String::new(),
            app_type: String::new(),
        }
    }

    pub fn machine(name: impl Into<String>, app_type: impl Into<String>) -> Self {
        Self {
            kind: RoleKind::Machine,
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            name: name.into(),
            app_type: app_type.into(),
        }
    }
}

/// Name fields of a role, the only group the API lets callers change.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RoleNames {
    pub name: String,
    pub first_name: String,
    pub last_name: String,
}

// ── Group ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Member role ids as returned; duplicates are kept.
    #[serde(rename = "user_ids", default, deserialize_with = "super::null_as_empty")]
    pub role_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct NewGroup {
    pub name: String,
    pub description: String,
}

impl NewGroup {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_machine_role_token_is_redacted_in_debug() {
        let role: Role = serde_json::from_value(json!({
            "id": "role_1", "type": "machine", "name": "etl", "app_type": "metabase",
            "machine_role_access_token": "mrt_live_abc"
        }))
        .unwrap();
        let token = role.machine_access_token.as_ref().unwrap();
        assert_eq!(token.expose(), "mrt_live_abc");
        assert!(!format!("{:?}", role).contains("mrt_live_abc"));
    }

    #[test]
    fn test_human_role_payload_omits_machine_fields() {
        let payload = serde_json::to_value(NewRole::human("Ada", "Lovelace", "ada@x.io")).unwrap();
        assert_eq!(
            payload,
            json!({"type": "human", "first_name": "Ada", "last_name": "Lovelace", "email": "ada@x.io"})
        );
    }

    #[test]
    fn test_group_members_keep_duplicates() {
        let g: Group = serde_json::from_value(json!({
            "id": "grp_1", "name": "eng", "user_ids": ["r1", "r2", "r1"]
        }))
        .unwrap();
        assert_eq!(g.role_ids, vec!["r1", "r2", "r1"]);
    }
}
