//! Create Campaign Handler

use std::sync::Arc;

use salvo::{Depot, http::header::LOCATION, oapi::extract::JsonBody, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    campaigns::{errors::into_status_error, requests::CreateCampaignRequest},
    extensions::*,
    state::State,
};

/// Campaign Created Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CampaignCreatedResponse {
    /// Created campaign UUID
    pub uuid: Uuid,
}

/// Create Campaign Handler
///
/// New campaigns always start in draft status.
#[endpoint(
    tags("campaigns"),
    summary = "Create Campaign",
    security(("tenant_id" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Campaign created"),
        (status_code = StatusCode::CONFLICT, description = "Campaign already exists"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateCampaignRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<CampaignCreatedResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;

    let uuid = state
        .app
        .campaigns
        .create_campaign(tenant, json.into_inner().try_into()?)
        .await
        .map_err(into_status_error)?
        .uuid;

    res.add_header(LOCATION, format!("/campaigns/{uuid}"), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(CampaignCreatedResponse { uuid: uuid.into() }))
}
