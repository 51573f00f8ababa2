use std::sync::Arc;

use crate::config::Config;
use crate::errors::Result;
use crate::links::LinkResolver;
use crate::repo::{
    CloudAccountRepo, DataplaneRepo, DataplaneRouteRepo, DatastoreRepo, DefaultFieldEncryptionRepo,
    FieldEncryptionRepo, GroupMembershipRepo, GroupRepo, KeyRepo, NativeRoleLinkRepo, NativeRoleRepo,
    PolicyRepo, RoleRepo, SidecarRepo,
};
use crate::transport::{HttpTransport, Transport};

/// Entry point to the admin API.
///
/// Cheap to clone; every clone shares one transport. Repositories are built
/// on demand and hold nothing but a handle to it.
#[derive(Clone)]
pub struct AdminClient {
    transport: Arc<dyn Transport>,
}

impl AdminClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let transport = HttpTransport::from_config(config)?;
        Ok(Self::new(Arc::new(transport)))
    }

    pub fn policies(&self) -> PolicyRepo {
        PolicyRepo::new(self.transport.clone())
    }

    pub fn links(&self) -> LinkResolver {
        LinkResolver::new(self.transport.clone())
    }

    pub fn roles(&self) -> RoleRepo {
        RoleRepo::new(self.transport.clone())
    }

    pub fn groups(&self) -> GroupRepo {
        GroupRepo::new(self.transport.clone())
    }

    pub fn memberships(&self) -> GroupMembershipRepo {
        GroupMembershipRepo::new(self.transport.clone())
    }

    pub fn datastores(&self) -> DatastoreRepo {
        DatastoreRepo::new(self.transport.clone())
    }

    pub fn native_roles(&self) -> NativeRoleRepo {
        NativeRoleRepo::new(self.transport.clone())
    }

    pub fn native_role_links(&self) -> NativeRoleLinkRepo {
        NativeRoleLinkRepo::new(self.transport.clone())
    }

    pub fn keys(&self) -> KeyRepo {
        KeyRepo::new(self.transport.clone())
    }

    pub fn field_encryptions(&self) -> FieldEncryptionRepo {
        FieldEncryptionRepo::new(self.transport.clone())
    }

    pub fn default_field_encryption(&self) -> DefaultFieldEncryptionRepo {
        DefaultFieldEncryptionRepo::new(self.transport.clone())
    }

    pub fn sidecars(&self) -> SidecarRepo {
        SidecarRepo::new(self.transport.clone())
    }

    pub fn dataplanes(&self) -> DataplaneRepo {
        DataplaneRepo::new(self.transport.clone())
    }

    pub fn dataplane_routes(&self) -> DataplaneRouteRepo {
        DataplaneRouteRepo::new(self.transport.clone())
    }

    pub fn cloud_accounts(&self) -> CloudAccountRepo {
        CloudAccountRepo::new(self.transport.clone())
    }
}
