//! Campaign Transition Handlers
//!
//! One endpoint per lifecycle edge. Illegal moves, expired being terminal
//! among them, come back as 409 with the offending states named.

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use tessera_app::domain::campaigns::records::CampaignUuid;

use crate::{
    campaigns::{errors::into_status_error, responses::CampaignResponse},
    extensions::*,
    state::State,
};

/// Activate Campaign Handler
#[endpoint(
    tags("campaigns"),
    summary = "Activate Campaign",
    security(("tenant_id" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Campaign activated"),
        (status_code = StatusCode::CONFLICT, description = "Transition not allowed"),
        (status_code = StatusCode::NOT_FOUND, description = "Campaign not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn activate(
    uuid: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<CampaignResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;

    let campaign = state
        .app
        .campaigns
        .activate_campaign(tenant, CampaignUuid::from_uuid(uuid.into_inner()))
        .await
        .map_err(into_status_error)?;

    Ok(Json(campaign.into()))
}

/// Pause Campaign Handler
#[endpoint(
    tags("campaigns"),
    summary = "Pause Campaign",
    security(("tenant_id" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Campaign paused"),
        (status_code = StatusCode::CONFLICT, description = "Transition not allowed"),
        (status_code = StatusCode::NOT_FOUND, description = "Campaign not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn pause(
    uuid: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<CampaignResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;

    let campaign = state
        .app
        .campaigns
        .pause_campaign(tenant, CampaignUuid::from_uuid(uuid.into_inner()))
        .await
        .map_err(into_status_error)?;

    Ok(Json(campaign.into()))
}

/// Expire Campaign Handler
#[endpoint(
    tags("campaigns"),
    summary = "Expire Campaign",
    security(("tenant_id" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Campaign expired"),
        (status_code = StatusCode::CONFLICT, description = "Transition not allowed"),
        (status_code = StatusCode::NOT_FOUND, description = "Campaign not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn expire(
    uuid: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<CampaignResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;

    let campaign = state
        .app
        .campaigns
        .expire_campaign(tenant, CampaignUuid::from_uuid(uuid.into_inner()))
        .await
        .map_err(into_status_error)?;

    Ok(Json(campaign.into()))
}
