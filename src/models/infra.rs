use serde::{Deserialize, Serialize};

// ── Sidecar ──────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sidecar {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub datastore_id: String,
    #[serde(default)]
    pub dataplane_id: String,
    #[serde(default)]
    pub cloud_provider: String,
    #[serde(default)]
    pub cloud_region: String,
    #[serde(default)]
    pub cloud_account_id: String,
    #[serde(default)]
    pub deployment_type: String,
    #[serde(default)]
    pub network_type: String,
    #[serde(default)]
    pub fail_open: bool,
    #[serde(default)]
    pub global_kms_decrypt: bool,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub technology: String,
    #[serde(default)]
    pub hostname: String,
}

// ── Dataplane ────────────────────────────────────────────────

/// A managed network stack. List fields are ordered; absent or `null`
/// decodes as empty. Wire names carry the remote's `formal_vpc_` prefix.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Dataplane {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub cloud_account_id: String,
    #[serde(default)]
    pub availability_zone: u32,
    #[serde(default)]
    pub vpc_peering_connection_id: String,
    #[serde(default)]
    pub customer_vpc_id: String,
    #[serde(rename = "formal_vpc_id", default)]
    pub vpc_id: String,
    #[serde(
        rename = "formal_vpc_private_subnets_ids",
        default,
        deserialize_with = "super::null_as_empty"
    )]
    pub private_subnet_ids: Vec<String>,
    #[serde(
        rename = "formal_vpc_public_subnets_ids",
        default,
        deserialize_with = "super::null_as_empty"
    )]
    pub public_subnet_ids: Vec<String>,
    #[serde(
        rename = "formal_vpc_natg_ids",
        default,
        deserialize_with = "super::null_as_empty"
    )]
    pub nat_gateway_ids: Vec<String>,
    #[serde(
        rename = "formal_vpc_natg_eips",
        default,
        deserialize_with = "super::null_as_empty"
    )]
    pub nat_gateway_eips: Vec<String>,
    #[serde(
        rename = "formal_vpc_private_route_table_routes",
        default,
        deserialize_with = "super::null_as_empty"
    )]
    pub private_route_tables: Vec<String>,
    #[serde(default, deserialize_with = "super::null_as_empty")]
    pub customer_vpc_route_tables: Vec<String>,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewDataplane {
    pub name: String,
    pub cloud_account_id: String,
    pub region: String,
    pub availability_zone: u32,
    pub vpc_peering: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DataplaneRoute {
    pub id: String,
    pub dataplane_id: String,
    pub destination_cidr_block: String,
    #[serde(default)]
    pub transit_gateway_id: Option<String>,
    #[serde(default)]
    pub vpc_peering_connection_id: Option<String>,
    #[serde(default)]
    pub deployed: bool,
}

/// Exactly one of `transit_gateway_id` / `vpc_peering_connection_id` is
/// expected by the remote; this layer does not check it.
#[derive(Debug, Clone, Serialize)]
pub struct NewDataplaneRoute {
    pub dataplane_id: String,
    pub destination_cidr_block: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transit_gateway_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vpc_peering_connection_id: Option<String>,
}

// ── Cloud account ────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CloudAccount {
    pub id: String,
    #[serde(default)]
    pub cloud_account_name: String,
    #[serde(default)]
    pub cloud_provider: String,
    #[serde(default)]
    pub aws_cloud_region: String,
    #[serde(rename = "aws_formal_iam_role", default)]
    pub aws_iam_role: String,
    #[serde(rename = "aws_formal_handshake_id", default)]
    pub aws_handshake_id: String,
    #[serde(rename = "aws_formal_stack_name", default)]
    pub aws_stack_name: String,
    #[serde(default)]
    pub aws_template_body: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewCloudAccount {
    pub cloud_account_name: String,
    pub aws_cloud_region: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_dataplane_null_lists_decode_empty() {
        let dp: Dataplane = serde_json::from_value(json!({
            "id": "dp_1",
            "formal_vpc_private_subnets_ids": null,
            "formal_vpc_public_subnets_ids": ["subnet-b", "subnet-a"]
        }))
        .unwrap();
        assert!(dp.private_subnet_ids.is_empty());
        assert!(dp.nat_gateway_ids.is_empty());
        assert_eq!(dp.public_subnet_ids, vec!["subnet-b", "subnet-a"]);
    }

    #[test]
    fn test_dataplane_reads_remote_field_names() {
        let dp: Dataplane = serde_json::from_value(json!({
            "id": "dp_1",
            "formal_vpc_id": "vpc-1",
            "formal_vpc_private_subnets_ids": ["subnet-a"],
            "formal_vpc_natg_ids": ["nat-1"],
            "formal_vpc_natg_eips": ["1.2.3.4"],
            "formal_vpc_private_route_table_routes": ["rtb-1"],
            "vpc_peering_connection_id": "pcx-1"
        }))
        .unwrap();
        assert_eq!(dp.vpc_id, "vpc-1");
        assert_eq!(dp.private_subnet_ids, vec!["subnet-a"]);
        assert_eq!(dp.nat_gateway_ids, vec!["nat-1"]);
        assert_eq!(dp.nat_gateway_eips, vec!["1.2.3.4"]);
        assert_eq!(dp.private_route_tables, vec!["rtb-1"]);
        assert_eq!(dp.vpc_peering_connection_id, "pcx-1");
    }

    #[test]
    fn test_dataplane_rejects_untyped_list_entries() {
        let res: Result<Dataplane, _> = serde_json::from_value(json!({
            "id": "dp_1", "formal_vpc_natg_eips": [{"ip": "1.2.3.4"}]
        }));
        assert!(res.is_err());
    }

    #[test]
    fn test_cloud_account_reads_remote_field_names() {
        let ca: CloudAccount = serde_json::from_value(json!({
            "id": "ca_1",
            "aws_formal_iam_role": "arn:role",
            "aws_formal_handshake_id": "hs-1",
            "aws_formal_stack_name": "stk"
        }))
        .unwrap();
        assert_eq!(ca.aws_iam_role, "arn:role");
        assert_eq!(ca.aws_handshake_id, "hs-1");
        assert_eq!(ca.aws_stack_name, "stk");
    }

    #[test]
    fn test_route_payload_skips_absent_gateway() {
        let route = NewDataplaneRoute {
            dataplane_id: "dp_1".into(),
            destination_cidr_block: "10.0.0.0/16".into(),
            transit_gateway_id: Some("tgw-1".into()),
            vpc_peering_connection_id: None,
        };
        let v = serde_json::to_value(&route).unwrap();
        assert!(v.get("vpc_peering_connection_id").is_none());
        assert_eq!(v["transit_gateway_id"], "tgw-1");
    }
}
