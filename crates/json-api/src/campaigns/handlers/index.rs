//! Campaign Index Handler

use std::sync::Arc;

use salvo::{oapi::extract::QueryParam, prelude::*};
use serde::{Deserialize, Serialize};

use tessera_app::domain::campaigns::records::CampaignStatus;

use crate::{
    campaigns::{errors::into_status_error, responses::CampaignResponse},
    extensions::*,
    state::State,
};

/// Campaigns Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CampaignsResponse {
    /// The list of campaigns
    pub campaigns: Vec<CampaignResponse>,
}

/// Campaign Index Handler
///
/// Returns campaigns newest first, optionally narrowed to one lifecycle
/// status via `?status=`.
#[endpoint(
    tags("campaigns"),
    summary = "List Campaigns",
    security(("tenant_id" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Campaigns"),
        (status_code = StatusCode::BAD_REQUEST, description = "Unknown status filter"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    status: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<CampaignsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;
    let status = status.into_inner().as_deref().map(parse_status).transpose()?;

    let campaigns = state
        .app
        .campaigns
        .list_campaigns(tenant, status)
        .await
        .map_err(into_status_error)?;

    Ok(Json(CampaignsResponse {
        campaigns: campaigns.into_iter().map(Into::into).collect(),
    }))
}

pub(super) fn parse_status(value: &str) -> Result<CampaignStatus, StatusError> {
    match value {
        "draft" => Ok(CampaignStatus::Draft),
        "active" => Ok(CampaignStatus::Active),
        "paused" => Ok(CampaignStatus::Paused),
        "expired" => Ok(CampaignStatus::Expired),
        other => {
            Err(StatusError::bad_request().brief(format!("Unknown campaign status: {other}")))
        }
    }
}
