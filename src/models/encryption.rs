use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyType {
    AwsKms,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyManagedBy {
    SaasManaged,
    ManagedCloud,
    CustomerManaged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyStorage {
    ControlPlaneAndWithData,
    ControlPlaneOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncryptionAlg {
    AesRandom,
    AesDeterministic,
}

/// An organization-scoped encryption key registered with the platform.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Key {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub key_id: String,
    #[serde(default)]
    pub cloud_region: String,
    #[serde(default)]
    pub arn: String,
    #[serde(default)]
    pub active: bool,
    pub key_type: KeyType,
    pub managed_by: KeyManagedBy,
    #[serde(default)]
    pub cloud_account_id: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewKey {
    pub name: String,
    pub key_id: String,
    pub cloud_region: String,
    pub key_type: KeyType,
    pub managed_by: KeyManagedBy,
    pub cloud_account_id: String,
}

/// Encryption of one field path of one datastore.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldEncryption {
    pub datastore_id: String,
    #[serde(default)]
    pub name: String,
    pub path: String,
    pub key_storage: KeyStorage,
    pub key_id: String,
    pub alg: EncryptionAlg,
}

/// Organization-wide default applied to fields without their own rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultFieldEncryption {
    pub data_key_storage: KeyStorage,
    pub kms_key_id: String,
    pub encryption_alg: EncryptionAlg,
}
