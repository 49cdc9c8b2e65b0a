//! Get Generation Job Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tessera_app::domain::codes::records::{GenerationJobRecord, GenerationJobUuid};

use crate::{codes::errors::into_status_error, extensions::*, state::State};

/// Generation Job Response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub(crate) struct GenerationJobResponse {
    pub uuid: Uuid,
    pub campaign_uuid: Uuid,
    pub quantity_requested: u64,
    pub quantity_generated: u64,
    pub status: String,
    pub error: Option<String>,
    pub started_at: Option<String>,
    pub completed_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<GenerationJobRecord> for GenerationJobResponse {
    fn from(job: GenerationJobRecord) -> Self {
        Self {
            uuid: job.uuid.into_uuid(),
            campaign_uuid: job.campaign_uuid.into_uuid(),
            quantity_requested: job.quantity_requested,
            quantity_generated: job.quantity_generated,
            status: job.status.to_string(),
            error: job.error,
            started_at: job.started_at.map(|at| at.to_string()),
            completed_at: job.completed_at.map(|at| at.to_string()),
            created_at: job.created_at.to_string(),
            updated_at: job.updated_at.to_string(),
        }
    }
}

/// Get Generation Job Handler
#[endpoint(
    tags("generation-jobs"),
    summary = "Get Generation Job",
    security(("tenant_id" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Job found"),
        (status_code = StatusCode::NOT_FOUND, description = "Job not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    uuid: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<GenerationJobResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;

    let job = state
        .app
        .codes
        .get_generation_job(tenant, GenerationJobUuid::from_uuid(uuid.into_inner()))
        .await
        .map_err(into_status_error)?;

    Ok(Json(job.into()))
}
