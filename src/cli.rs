use clap::{Parser, Subcommand, ValueEnum};

use warden::models::datastore::{AccessBehavior, Technology};
use warden::models::encryption::{KeyManagedBy, KeyType};

/// Warden: admin client for the data-access-control platform
#[derive(Parser)]
#[command(name = "warden", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage access policies
    Policy {
        #[command(subcommand)]
        command: PolicyCommands,
    },

    /// Attach policies to groups, roles and datastores
    Link {
        #[command(subcommand)]
        command: LinkCommands,
    },

    /// Manage groups and their members
    Group {
        #[command(subcommand)]
        command: GroupCommands,
    },

    /// Manage human and machine roles
    Role {
        #[command(subcommand)]
        command: RoleCommands,
    },

    /// Manage datastores
    Datastore {
        #[command(subcommand)]
        command: DatastoreCommands,
    },

    /// Manage sidecars
    Sidecar {
        #[command(subcommand)]
        command: SidecarCommands,
    },

    /// Manage encryption keys
    Key {
        #[command(subcommand)]
        command: KeyCommands,
    },
}

#[derive(Subcommand)]
pub enum PolicyCommands {
    /// Create a new policy
    Create {
        #[arg(long)]
        name: String,
        /// Path to the policy module source
        #[arg(long)]
        module: std::path::PathBuf,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, value_delimiter = ',')]
        owners: Vec<String>,
        /// Create the policy inactive
        #[arg(long)]
        inactive: bool,
    },
    /// Show a policy
    Get { id: String },
    /// Delete a policy
    Delete { id: String },
}

#[derive(Subcommand)]
pub enum LinkCommands {
    /// Attach a policy to a target
    Create {
        #[arg(long)]
        policy_id: String,
        /// Target kind: group, role or datastore
        #[arg(long)]
        target_kind: String,
        #[arg(long)]
        target_id: String,
    },
    /// Show a policy link
    Get { id: String },
    /// Detach a policy link
    Delete { id: String },
}

#[derive(Subcommand)]
pub enum GroupCommands {
    Create {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    Get { id: String },
    /// Replace name and description
    Update {
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    Delete { id: String },
    /// Add a role to a group
    AddMember {
        #[arg(long)]
        group_id: String,
        #[arg(long)]
        role_id: String,
    },
    /// Remove a role from a group
    RemoveMember {
        #[arg(long)]
        group_id: String,
        #[arg(long)]
        role_id: String,
    },
}

#[derive(Subcommand)]
pub enum RoleCommands {
    /// Create a role for a person
    CreateHuman {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
    },
    /// Create a role for an application; prints its access token once
    CreateMachine {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        app_type: String,
    },
    Get { id: String },
    /// Change the role's name fields
    Rename {
        id: String,
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        first_name: String,
        #[arg(long, default_value = "")]
        last_name: String,
    },
    Delete { id: String },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum TechnologyArg {
    Snowflake,
    Postgres,
    Redshift,
    Mysql,
    Mariadb,
    S3,
    Http,
    Ssh,
}

impl From<TechnologyArg> for Technology {
    fn from(arg: TechnologyArg) -> Self {
        match arg {
            TechnologyArg::Snowflake => Technology::Snowflake,
            TechnologyArg::Postgres => Technology::Postgres,
            TechnologyArg::Redshift => Technology::Redshift,
            TechnologyArg::Mysql => Technology::Mysql,
            TechnologyArg::Mariadb => Technology::Mariadb,
            TechnologyArg::S3 => Technology::S3,
            TechnologyArg::Http => Technology::Http,
            TechnologyArg::Ssh => Technology::Ssh,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum AccessBehaviorArg {
    Allow,
    Block,
}

impl From<AccessBehaviorArg> for AccessBehavior {
    fn from(arg: AccessBehaviorArg) -> Self {
        match arg {
            AccessBehaviorArg::Allow => AccessBehavior::Allow,
            AccessBehaviorArg::Block => AccessBehavior::Block,
        }
    }
}

#[derive(Subcommand)]
pub enum DatastoreCommands {
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        hostname: String,
        #[arg(long)]
        port: u16,
        #[arg(long, value_enum)]
        technology: TechnologyArg,
        #[arg(long)]
        username: String,
        /// Read from the environment so it stays out of shell history
        #[arg(long, env = "WARDEN_DATASTORE_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long, default_value = "")]
        health_check_db_name: String,
        #[arg(long, value_enum)]
        default_access_behavior: Option<AccessBehaviorArg>,
        #[arg(long)]
        fail_open: bool,
    },
    Get { id: String },
    Rename {
        id: String,
        #[arg(long)]
        name: String,
    },
    SetHealthCheckDb {
        id: String,
        #[arg(long)]
        db_name: String,
    },
    SetDefaultAccess {
        id: String,
        #[arg(long, value_enum)]
        behavior: AccessBehaviorArg,
    },
    SetCredentials {
        id: String,
        #[arg(long)]
        username: String,
        #[arg(long, env = "WARDEN_DATASTORE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Turn on global KMS decryption (cannot be turned off)
    EnableKmsDecrypt { id: String },
    /// Print the datastore's TLS certificate
    TlsCert { id: String },
    Delete { id: String },
}

#[derive(Subcommand)]
pub enum SidecarCommands {
    Create {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        datastore_id: String,
        #[arg(long, default_value = "")]
        technology: String,
        #[arg(long, default_value = "")]
        deployment_type: String,
        #[arg(long, default_value = "")]
        hostname: String,
        #[arg(long)]
        fail_open: bool,
    },
    Get { id: String },
    Rename {
        id: String,
        #[arg(long)]
        name: String,
    },
    SetVersion {
        id: String,
        #[arg(long)]
        version: String,
    },
    SetHostname {
        id: String,
        #[arg(long)]
        hostname: String,
    },
    EnableKmsDecrypt { id: String },
    TlsCert { id: String },
    Delete { id: String },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ManagedByArg {
    SaasManaged,
    ManagedCloud,
    CustomerManaged,
}

impl From<ManagedByArg> for KeyManagedBy {
    fn from(arg: ManagedByArg) -> Self {
        match arg {
            ManagedByArg::SaasManaged => KeyManagedBy::SaasManaged,
            ManagedByArg::ManagedCloud => KeyManagedBy::ManagedCloud,
            ManagedByArg::CustomerManaged => KeyManagedBy::CustomerManaged,
        }
    }
}

#[derive(Subcommand)]
pub enum KeyCommands {
    /// Register an AWS KMS key
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        key_id: String,
        #[arg(long)]
        cloud_region: String,
        #[arg(long, value_enum, default_value = "saas-managed")]
        managed_by: ManagedByArg,
        #[arg(long, default_value = "")]
        cloud_account_id: String,
    },
    Get { id: String },
    Delete { id: String },
}

/// Only AWS KMS keys are supported by the remote today.
pub const KEY_TYPE: KeyType = KeyType::AwsKms;
