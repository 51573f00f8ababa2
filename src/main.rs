use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use warden::config;
use warden::models::datastore::NewDatastore;
use warden::models::encryption::NewKey;
use warden::models::identity::{NewGroup, NewRole, RoleNames};
use warden::models::infra::Sidecar;
use warden::models::policy::NewPolicy;
use warden::{AdminClient, NewPolicyLink, Secret};

mod cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warden=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = cli::Cli::parse();
    let result = run(args).await;

    if let Err(ref e) = result {
        eprintln!("Error: {:?}", e);
    }
    result
}

async fn run(args: cli::Cli) -> anyhow::Result<()> {
    let cfg = config::load()?;
    let client = AdminClient::from_config(&cfg).context("Failed to build admin client")?;
    tracing::debug!(api_url = %cfg.api_url, "admin client ready");

    match args.command {
        cli::Commands::Policy { command } => handle_policy_command(&client, command).await,
        cli::Commands::Link { command } => handle_link_command(&client, command).await,
        cli::Commands::Group { command } => handle_group_command(&client, command).await,
        cli::Commands::Role { command } => handle_role_command(&client, command).await,
        cli::Commands::Datastore { command } => handle_datastore_command(&client, command).await,
        cli::Commands::Sidecar { command } => handle_sidecar_command(&client, command).await,
        cli::Commands::Key { command } => handle_key_command(&client, command).await,
    }
}

fn print_ack(message: Option<String>, fallback: &str) {
    println!("{}", message.unwrap_or_else(|| fallback.to_string()));
}

async fn handle_policy_command(client: &AdminClient, cmd: cli::PolicyCommands) -> anyhow::Result<()> {
    let policies = client.policies();
    match cmd {
        cli::PolicyCommands::Create {
            name,
            module,
            description,
            owners,
            inactive,
        } => {
            let source = std::fs::read_to_string(&module)
                .with_context(|| format!("Failed to read policy module {}", module.display()))?;
            let mut payload = NewPolicy::new(name, source);
            payload.description = description;
            payload.owners = owners;
            payload.active = !inactive;

            let policy = policies
                .create(&payload)
                .await
                .with_context(|| format!("create policy '{}'", payload.name))?;
            println!("Policy created:");
            println!("  ID:     {}", policy.id);
            println!("  Name:   {}", policy.name);
            println!("  Active: {}", policy.active);
        }
        cli::PolicyCommands::Get { id } => {
            let p = policies
                .get(&id)
                .await
                .with_context(|| format!("get policy {}", id))?;
            println!("{:<38} {:<24} {:<8} OWNERS", "ID", "NAME", "ACTIVE");
            println!("{:<38} {:<24} {:<8} {}", p.id, p.name, p.active, p.owners.join(","));
        }
        cli::PolicyCommands::Delete { id } => {
            policies
                .delete(&id)
                .await
                .with_context(|| format!("delete policy {}", id))?;
            println!("Policy deleted.");
        }
    }
    Ok(())
}

async fn handle_link_command(client: &AdminClient, cmd: cli::LinkCommands) -> anyhow::Result<()> {
    let links = client.links();
    match cmd {
        cli::LinkCommands::Create {
            policy_id,
            target_kind,
            target_id,
        } => {
            let link = links
                .create(&NewPolicyLink::new(&policy_id, &target_kind, &target_id))
                .await
                .with_context(|| {
                    format!("link policy {} to {} {}", policy_id, target_kind, target_id)
                })?;
            println!("Policy link created: {}", link.id);
        }
        cli::LinkCommands::Get { id } => {
            let link = links
                .get(&id)
                .await
                .with_context(|| format!("get policy link {}", id))?;
            println!("{:<38} {:<38} {:<10} TARGET", "ID", "POLICY", "KIND");
            println!(
                "{:<38} {:<38} {:<10} {}",
                link.id,
                link.policy_id,
                link.target.kind(),
                link.target.id()
            );
        }
        cli::LinkCommands::Delete { id } => match links.delete(&id).await {
            Ok(link) => println!("Policy link {} ({}) deleted.", link.id, link.target),
            Err(e) if e.is_not_found() => {
                tracing::warn!(link_id = %id, "policy link already gone");
                println!("Policy link not found or already deleted.");
            }
            Err(e) => return Err(e).with_context(|| format!("delete policy link {}", id)),
        },
    }
    Ok(())
}

async fn handle_group_command(client: &AdminClient, cmd: cli::GroupCommands) -> anyhow::Result<()> {
    let groups = client.groups();
    match cmd {
        cli::GroupCommands::Create { name, description } => {
            let group = groups
                .create(&NewGroup::new(&name, description))
                .await
                .with_context(|| format!("create group '{}'", name))?;
            println!("Group created: {}", group.id);
        }
        cli::GroupCommands::Get { id } => {
            let g = groups
                .get(&id)
                .await
                .with_context(|| format!("get group {}", id))?;
            println!("{:<38} {:<24} MEMBERS", "ID", "NAME");
            println!("{:<38} {:<24} {}", g.id, g.name, g.role_ids.len());
            for role_id in &g.role_ids {
                println!("  - {}", role_id);
            }
        }
        cli::GroupCommands::Update { id, name, description } => {
            let msg = groups
                .update_details(&id, &NewGroup::new(name, description))
                .await
                .with_context(|| format!("update group {}", id))?;
            print_ack(msg, "Group updated.");
        }
        cli::GroupCommands::Delete { id } => {
            groups
                .delete(&id)
                .await
                .with_context(|| format!("delete group {}", id))?;
            println!("Group deleted.");
        }
        cli::GroupCommands::AddMember { group_id, role_id } => {
            let msg = client
                .memberships()
                .add(&group_id, &role_id)
                .await
                .with_context(|| format!("add role {} to group {}", role_id, group_id))?;
            print_ack(msg, "Member added.");
        }
        cli::GroupCommands::RemoveMember { group_id, role_id } => {
            client
                .memberships()
                .remove(&group_id, &role_id)
                .await
                .with_context(|| format!("remove role {} from group {}", role_id, group_id))?;
            println!("Member removed.");
        }
    }
    Ok(())
}

async fn handle_role_command(client: &AdminClient, cmd: cli::RoleCommands) -> anyhow::Result<()> {
    let roles = client.roles();
    match cmd {
        cli::RoleCommands::CreateHuman {
            first_name,
            last_name,
            email,
        } => {
            let role = roles
                .create(&NewRole::human(first_name, last_name, &email))
                .await
                .with_context(|| format!("create human role for {}", email))?;
            println!("Role created: {}", role.id);
        }
        cli::RoleCommands::CreateMachine { name, app_type } => {
            let role = roles
                .create(&NewRole::machine(&name, app_type))
                .await
                .with_context(|| format!("create machine role '{}'", name))?;
            println!("Role created: {}", role.id);
            if let Some(token) = &role.machine_access_token {
                println!("Access token (shown once): {}", token.expose());
            }
        }
        cli::RoleCommands::Get { id } => {
            let r = roles
                .get(&id)
                .await
                .with_context(|| format!("get role {}", id))?;
            let display = match r.kind {
                warden::models::identity::RoleKind::Human => {
                    format!("{} {} <{}>", r.first_name, r.last_name, r.email)
                }
                warden::models::identity::RoleKind::Machine => r.name.clone(),
            };
            println!("{:<38} {:<8} {:<24} NAME", "ID", "TYPE", "DB USER");
            println!(
                "{:<38} {:<8} {:<24} {}",
                r.id,
                format!("{:?}", r.kind).to_lowercase(),
                r.db_username,
                display
            );
        }
        cli::RoleCommands::Rename {
            id,
            name,
            first_name,
            last_name,
        } => {
            let names = RoleNames {
                name,
                first_name,
                last_name,
            };
            let msg = roles
                .update_names(&id, &names)
                .await
                .with_context(|| format!("rename role {}", id))?;
            print_ack(msg, "Role updated.");
        }
        cli::RoleCommands::Delete { id } => {
            roles
                .delete(&id)
                .await
                .with_context(|| format!("delete role {}", id))?;
            println!("Role deleted.");
        }
    }
    Ok(())
}

async fn handle_datastore_command(
    client: &AdminClient,
    cmd: cli::DatastoreCommands,
) -> anyhow::Result<()> {
    let stores = client.datastores();
    match cmd {
        cli::DatastoreCommands::Create {
            name,
            hostname,
            port,
            technology,
            username,
            password,
            health_check_db_name,
            default_access_behavior,
            fail_open,
        } => {
            let payload = NewDatastore {
                name,
                hostname,
                port,
                technology: technology.into(),
                username,
                password: Secret::new(password),
                health_check_db_name,
                default_access_behavior: default_access_behavior.map(Into::into),
                cloud_provider: String::new(),
                cloud_region: String::new(),
                deployment_type: String::new(),
                cloud_account_id: String::new(),
                fail_open,
            };
            let ds = stores
                .create(&payload)
                .await
                .with_context(|| format!("create datastore '{}'", payload.name))?;
            println!("Datastore created: {}", ds.datastore_id);
        }
        cli::DatastoreCommands::Get { id } => {
            let ds = stores
                .get(&id)
                .await
                .with_context(|| format!("get datastore {}", id))?;
            println!("{:<38} {:<20} {:<10} ENDPOINT", "ID", "NAME", "TECH");
            println!(
                "{:<38} {:<20} {:<10} {}:{}",
                ds.datastore_id,
                ds.name,
                format!("{:?}", ds.technology).to_lowercase(),
                ds.hostname,
                ds.port
            );
        }
        cli::DatastoreCommands::Rename { id, name } => {
            let msg = stores
                .update_name(&id, &name)
                .await
                .with_context(|| format!("rename datastore {}", id))?;
            print_ack(msg, "Datastore renamed.");
        }
        cli::DatastoreCommands::SetHealthCheckDb { id, db_name } => {
            let msg = stores
                .update_health_check_db_name(&id, &db_name)
                .await
                .with_context(|| format!("set health check db of datastore {}", id))?;
            print_ack(msg, "Health check database updated.");
        }
        cli::DatastoreCommands::SetDefaultAccess { id, behavior } => {
            let msg = stores
                .update_default_access_behavior(&id, behavior.into())
                .await
                .with_context(|| format!("set default access of datastore {}", id))?;
            print_ack(msg, "Default access behavior updated.");
        }
        cli::DatastoreCommands::SetCredentials {
            id,
            username,
            password,
        } => {
            let msg = stores
                .update_credentials(&id, &username, &Secret::new(password))
                .await
                .with_context(|| format!("set credentials of datastore {}", id))?;
            print_ack(msg, "Credentials updated.");
        }
        cli::DatastoreCommands::EnableKmsDecrypt { id } => {
            let msg = stores
                .enable_global_kms_decrypt(&id)
                .await
                .with_context(|| format!("enable kms decrypt on datastore {}", id))?;
            print_ack(msg, "Global KMS decrypt enabled.");
        }
        cli::DatastoreCommands::TlsCert { id } => {
            let cert = stores
                .tls_cert(&id)
                .await
                .with_context(|| format!("get tls cert of datastore {}", id))?;
            println!("{}", cert.expose());
        }
        cli::DatastoreCommands::Delete { id } => {
            stores
                .delete(&id)
                .await
                .with_context(|| format!("delete datastore {}", id))?;
            println!("Datastore deleted.");
        }
    }
    Ok(())
}

async fn handle_sidecar_command(client: &AdminClient, cmd: cli::SidecarCommands) -> anyhow::Result<()> {
    let sidecars = client.sidecars();
    match cmd {
        cli::SidecarCommands::Create {
            name,
            datastore_id,
            technology,
            deployment_type,
            hostname,
            fail_open,
        } => {
            let payload = Sidecar {
                id: String::new(),
                name,
                datastore_id,
                dataplane_id: String::new(),
                cloud_provider: String::new(),
                cloud_region: String::new(),
                cloud_account_id: String::new(),
                deployment_type,
                network_type: String::new(),
                fail_open,
                global_kms_decrypt: false,
                version: String::new(),
                technology,
                hostname,
            };
            let sc = sidecars
                .create(&payload)
                .await
                .with_context(|| format!("create sidecar '{}'", payload.name))?;
            println!("Sidecar created: {}", sc.id);
        }
        cli::SidecarCommands::Get { id } => {
            let sc = sidecars
                .get(&id)
                .await
                .with_context(|| format!("get sidecar {}", id))?;
            println!("{:<38} {:<20} {:<10} HOSTNAME", "ID", "NAME", "VERSION");
            println!("{:<38} {:<20} {:<10} {}", sc.id, sc.name, sc.version, sc.hostname);
        }
        cli::SidecarCommands::Rename { id, name } => {
            let msg = sidecars
                .update_name(&id, &name)
                .await
                .with_context(|| format!("rename sidecar {}", id))?;
            print_ack(msg, "Sidecar renamed.");
        }
        cli::SidecarCommands::SetVersion { id, version } => {
            let msg = sidecars
                .update_version(&id, &version)
                .await
                .with_context(|| format!("set version of sidecar {}", id))?;
            print_ack(msg, "Sidecar version updated.");
        }
        cli::SidecarCommands::SetHostname { id, hostname } => {
            let msg = sidecars
                .update_hostname(&id, &hostname)
                .await
                .with_context(|| format!("set hostname of sidecar {}", id))?;
            print_ack(msg, "Sidecar hostname updated.");
        }
        cli::SidecarCommands::EnableKmsDecrypt { id } => {
            let msg = sidecars
                .enable_global_kms_decrypt(&id)
                .await
                .with_context(|| format!("enable kms decrypt on sidecar {}", id))?;
            print_ack(msg, "Global KMS decrypt enabled.");
        }
        cli::SidecarCommands::TlsCert { id } => {
            let cert = sidecars
                .tls_cert(&id)
                .await
                .with_context(|| format!("get tls cert of sidecar {}", id))?;
            println!("{}", cert.expose());
        }
        cli::SidecarCommands::Delete { id } => {
            sidecars
                .delete(&id)
                .await
                .with_context(|| format!("delete sidecar {}", id))?;
            println!("Sidecar deleted.");
        }
    }
    Ok(())
}

async fn handle_key_command(client: &AdminClient, cmd: cli::KeyCommands) -> anyhow::Result<()> {
    let keys = client.keys();
    match cmd {
        cli::KeyCommands::Create {
            name,
            key_id,
            cloud_region,
            managed_by,
            cloud_account_id,
        } => {
            let payload = NewKey {
                name,
                key_id,
                cloud_region,
                key_type: cli::KEY_TYPE,
                managed_by: managed_by.into(),
                cloud_account_id,
            };
            let key = keys
                .create(&payload)
                .await
                .with_context(|| format!("create key '{}'", payload.name))?;
            println!("Key created: {}", key.id);
        }
        cli::KeyCommands::Get { id } => {
            let k = keys
                .get(&id)
                .await
                .with_context(|| format!("get key {}", id))?;
            println!("{:<38} {:<20} {:<12} ARN", "ID", "NAME", "REGION");
            println!("{:<38} {:<20} {:<12} {}", k.id, k.name, k.cloud_region, k.arn);
        }
        cli::KeyCommands::Delete { id } => {
            keys.delete(&id)
                .await
                .with_context(|| format!("delete key {}", id))?;
            println!("Key deleted.");
        }
    }
    Ok(())
}
