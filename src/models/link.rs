use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::envelope::Envelope;
use crate::errors::AdminError;

// ── Target kind ──────────────────────────────────────────────

/// The kinds of entity a policy can be attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    Group,
    Role,
    Datastore,
}

impl TargetKind {
    pub const ALL: [TargetKind; 3] = [TargetKind::Group, TargetKind::Role, TargetKind::Datastore];

    pub fn as_str(&self) -> &'static str {
        match self {
            TargetKind::Group => "group",
            TargetKind::Role => "role",
            TargetKind::Datastore => "datastore",
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetKind {
    type Err = AdminError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "group" => Ok(TargetKind::Group),
            "role" => Ok(TargetKind::Role),
            "datastore" => Ok(TargetKind::Datastore),
            other => Err(AdminError::UnsupportedTargetKind(other.to_string())),
        }
    }
}

// ── Link target ──────────────────────────────────────────────

/// The entity on the far side of a policy link, tagged by kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LinkTarget {
    Group(String),
    Role(String),
    Datastore(String),
}

impl LinkTarget {
    pub fn new(kind: TargetKind, id: impl Into<String>) -> Self {
        let id = id.into();
        match kind {
            TargetKind::Group => LinkTarget::Group(id),
            TargetKind::Role => LinkTarget::Role(id),
            TargetKind::Datastore => LinkTarget::Datastore(id),
        }
    }

    /// Resolve an untyped `(kind, id)` pair, failing closed on unknown kinds.
    pub fn parse(kind: &str, id: impl Into<String>) -> Result<Self, AdminError> {
        Ok(Self::new(kind.parse()?, id))
    }

    pub fn kind(&self) -> TargetKind {
        match self {
            LinkTarget::Group(_) => TargetKind::Group,
            LinkTarget::Role(_) => TargetKind::Role,
            LinkTarget::Datastore(_) => TargetKind::Datastore,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            LinkTarget::Group(id) | LinkTarget::Role(id) | LinkTarget::Datastore(id) => id,
        }
    }
}

impl fmt::Display for LinkTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind(), self.id())
    }
}

// ── Policy link ──────────────────────────────────────────────

/// An attachment of one policy to one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyLink {
    pub id: String,
    pub policy_id: String,
    pub target: LinkTarget,
    pub expire_at: Option<String>,
}

/// A link to be created. The target kind stays a plain string until the
/// resolver dispatches on it, so unknown kinds are rejected there and not
/// at argument parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPolicyLink {
    pub policy_id: String,
    pub target_kind: String,
    pub target_id: String,
}

impl NewPolicyLink {
    pub fn new(
        policy_id: impl Into<String>,
        target_kind: impl Into<String>,
        target_id: impl Into<String>,
    ) -> Self {
        Self {
            policy_id: policy_id.into(),
            target_kind: target_kind.into(),
            target_id: target_id.into(),
        }
    }

    pub fn for_target(policy_id: impl Into<String>, target: &LinkTarget) -> Self {
        Self::new(policy_id, target.kind().as_str(), target.id())
    }

    pub fn target(&self) -> Result<LinkTarget, AdminError> {
        LinkTarget::parse(&self.target_kind, self.target_id.clone())
    }
}

/// Wire form of a policy link as the API returns it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct PolicyLinkRecord {
    pub id: String,
    #[serde(default)]
    pub policy_id: String,
    #[serde(default)]
    pub item_id: String,
    #[serde(rename = "type", default)]
    pub target_kind: String,
    #[serde(default)]
    pub expire_at: Option<String>,
}

impl PolicyLinkRecord {
    /// Fill fields a create response left blank from the request.
    pub fn fill_from(mut self, policy_id: &str, target: &LinkTarget) -> Self {
        if self.policy_id.is_empty() {
            self.policy_id = policy_id.to_string();
        }
        if self.item_id.is_empty() {
            self.item_id = target.id().to_string();
        }
        if self.target_kind.is_empty() {
            self.target_kind = target.kind().as_str().to_string();
        }
        self
    }
}

impl TryFrom<PolicyLinkRecord> for PolicyLink {
    type Error = AdminError;

    fn try_from(record: PolicyLinkRecord) -> Result<Self, Self::Error> {
        if record.target_kind.is_empty() {
            return Err(AdminError::malformed(
                Envelope::Single("policy_link"),
                "missing key 'type'",
            ));
        }
        Ok(PolicyLink {
            target: LinkTarget::parse(&record.target_kind, record.item_id)?,
            id: record.id,
            policy_id: record.policy_id,
            expire_at: record.expire_at.filter(|v| !v.is_empty()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_target_kind_parse() {
        for kind in TargetKind::ALL {
            assert_eq!(kind.as_str().parse::<TargetKind>().unwrap(), kind);
        }
        let err = "user".parse::<TargetKind>().unwrap_err();
        assert!(matches!(err, AdminError::UnsupportedTargetKind(ref k) if k == "user"));
    }

    #[test]
    fn test_target_kind_is_case_sensitive() {
        assert!("Group".parse::<TargetKind>().is_err());
        assert!("".parse::<TargetKind>().is_err());
    }

    #[test]
    fn test_link_target_accessors() {
        let t = LinkTarget::new(TargetKind::Datastore, "ds_9");
        assert_eq!(t.kind(), TargetKind::Datastore);
        assert_eq!(t.id(), "ds_9");
        assert_eq!(t.to_string(), "datastore:ds_9");
    }

    #[test]
    fn test_record_to_link() {
        let record: PolicyLinkRecord = serde_json::from_value(json!({
            "id": "lnk_1", "policy_id": "pol_1", "item_id": "role_7", "type": "role", "expire_at": ""
        }))
        .unwrap();
        let link = PolicyLink::try_from(record).unwrap();
        assert_eq!(link.target, LinkTarget::Role("role_7".into()));
        assert_eq!(link.expire_at, None);
    }

    #[test]
    fn test_record_with_unknown_type_fails_closed() {
        let record: PolicyLinkRecord = serde_json::from_value(json!({
            "id": "lnk_1", "policy_id": "pol_1", "item_id": "u_1", "type": "user"
        }))
        .unwrap();
        assert!(matches!(
            PolicyLink::try_from(record),
            Err(AdminError::UnsupportedTargetKind(_))
        ));
    }

    #[test]
    fn test_record_without_type_is_malformed() {
        let record: PolicyLinkRecord = serde_json::from_value(json!({
            "id": "lnk_1", "policy_id": "pol_1", "item_id": "grp_1"
        }))
        .unwrap();
        let err = PolicyLink::try_from(record).unwrap_err();
        assert_eq!(err.code(), "malformed_envelope");
    }

    #[test]
    fn test_fill_from_keeps_remote_values() {
        let record = PolicyLinkRecord {
            id: "lnk_1".into(),
            policy_id: "pol_remote".into(),
            ..Default::default()
        };
        let filled = record.fill_from("pol_local", &LinkTarget::Group("grp_1".into()));
        assert_eq!(filled.policy_id, "pol_remote");
        assert_eq!(filled.item_id, "grp_1");
        assert_eq!(filled.target_kind, "group");
    }
}
