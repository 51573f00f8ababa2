use serde::{Deserialize, Serialize};

/// An access policy.
///
/// `module` and `source_type` are fixed at creation; the API offers no
/// update for them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub module: String,
    #[serde(default)]
    pub source_type: String,
    #[serde(default)]
    pub active: bool,
    /// Owner identifiers, in the order the remote returns them.
    #[serde(default, deserialize_with = "super::null_as_empty")]
    pub owners: Vec<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub expire_at: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct NewPolicy {
    pub name: String,
    pub description: String,
    pub module: String,
    pub source_type: String,
    pub active: bool,
    pub owners: Vec<String>,
}

impl NewPolicy {
    pub fn new(name: impl Into<String>, module: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            module: module.into(),
            source_type: "rego".to_string(),
            active: true,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_policy_tolerates_sparse_body() {
        let p: Policy = serde_json::from_value(json!({"id": "pol_1", "name": "pci", "owners": null})).unwrap();
        assert_eq!(p.name, "pci");
        assert!(p.owners.is_empty());
        assert!(!p.active);
    }

    #[test]
    fn test_owners_keep_order() {
        let p: Policy = serde_json::from_value(json!({
            "id": "pol_1", "name": "pci", "owners": ["b@x.io", "a@x.io"]
        }))
        .unwrap();
        assert_eq!(p.owners, vec!["b@x.io", "a@x.io"]);
    }
}
