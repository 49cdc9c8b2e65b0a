//! Generate Codes Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tessera_app::domain::campaigns::records::CampaignUuid;

use crate::{
    codes::{errors::into_status_error, jobs::get::GenerationJobResponse},
    extensions::*,
    state::State,
};

/// Generate Codes Request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub(crate) struct GenerateCodesRequest {
    /// Number of unique codes to mint
    pub quantity: u64,
}

/// Generate Codes Handler
///
/// Bulk-generates unique codes for a campaign and returns the finished job.
/// A partially filled campaign comes back as a failed job with its progress
/// count, not as an HTTP error.
#[endpoint(
    tags("codes"),
    summary = "Generate Codes",
    security(("tenant_id" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Generation job finished"),
        (status_code = StatusCode::NOT_FOUND, description = "Campaign not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    campaign: PathParam<Uuid>,
    json: JsonBody<GenerateCodesRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<GenerationJobResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;

    let job = state
        .app
        .codes
        .generate_codes(
            tenant,
            CampaignUuid::from_uuid(campaign.into_inner()),
            json.into_inner().quantity,
        )
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/generation-jobs/{}", job.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(job.into()))
}
