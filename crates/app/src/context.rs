//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    database::{self, Db},
    domain::{
        campaigns::{CampaignsService, PgCampaignsService},
        codes::{CodesService, PgCodesService},
        redemptions::{PgRedemptionsService, RedemptionsService},
        validation::{PgValidationService, ValidationService},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),
}

/// Service handles shared by every caller of the coupon engine.
///
/// Handlers depend on the trait objects, so tests can swap any service for a
/// mock without touching the database.
#[derive(Clone)]
pub struct AppContext {
    pub campaigns: Arc<dyn CampaignsService>,
    pub codes: Arc<dyn CodesService>,
    pub validation: Arc<dyn ValidationService>,
    pub redemptions: Arc<dyn RedemptionsService>,
}

impl AppContext {
    /// Build application context from a database URL.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails, or
    /// when the connected role would bypass row-level security.
    pub async fn from_database_url(url: &str) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        database::ensure_rls_enforced_role(&pool)
            .await
            .map_err(AppInitError::Database)?;

        let db = Db::new(pool);

        Ok(Self {
            campaigns: Arc::new(PgCampaignsService::new(db.clone())),
            codes: Arc::new(PgCodesService::new(db.clone())),
            validation: Arc::new(PgValidationService::new(db.clone())),
            redemptions: Arc::new(PgRedemptionsService::new(db)),
        })
    }
}
