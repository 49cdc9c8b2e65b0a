//! Resume Generation Job Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use tessera_app::domain::codes::records::GenerationJobUuid;

use crate::{
    codes::{errors::into_status_error, jobs::get::GenerationJobResponse},
    extensions::*,
    state::State,
};

/// Resume Generation Job Handler
///
/// Picks up a job stranded in `processing`, for example after a crash
/// mid-run, and generates the remaining codes.
#[endpoint(
    tags("generation-jobs"),
    summary = "Resume Generation Job",
    security(("tenant_id" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Job resumed and finished"),
        (status_code = StatusCode::CONFLICT, description = "Job not resumable"),
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
        .resume_generation_job(tenant, GenerationJobUuid::from_uuid(uuid.into_inner()))
        .await
        .map_err(into_status_error)?;

    Ok(Json(job.into()))
}
