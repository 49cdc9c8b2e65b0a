//! Depot helper extensions.

use std::any::Any;

use salvo::prelude::{Depot, StatusError};

use tessera_app::domain::tenants::records::TenantUuid;

/// Depot key the tenant middleware stores the resolved tenant under.
const TENANT_UUID_KEY: &str = "tessera::tenant_uuid";

/// Helpers for mapping depot extraction failures to HTTP errors.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError>;

    fn insert_tenant_uuid(&mut self, tenant: TenantUuid);

    /// The tenant set by the scoping middleware; 401 when a handler is
    /// reached without one.
    fn tenant_uuid_or_401(&self) -> Result<TenantUuid, StatusError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError> {
        self.obtain::<T>()
            .map_err(|_ignored| StatusError::internal_server_error())
    }

    fn insert_tenant_uuid(&mut self, tenant: TenantUuid) {
        self.insert(TENANT_UUID_KEY, tenant);
    }

    fn tenant_uuid_or_401(&self) -> Result<TenantUuid, StatusError> {
        self.get::<TenantUuid>(TENANT_UUID_KEY)
            .copied()
            .map_err(|_ignored| StatusError::unauthorized().brief("Missing tenant context"))
    }
}
