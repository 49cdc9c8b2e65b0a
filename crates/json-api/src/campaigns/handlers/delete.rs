//! Delete Campaign Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use tessera_app::domain::campaigns::records::CampaignUuid;

use crate::{campaigns::errors::into_status_error, extensions::*, state::State};

/// Delete Campaign Handler
///
/// Soft-deletes the campaign; its codes and redemption history survive for
/// reporting.
#[endpoint(
    tags("campaigns"),
    summary = "Delete Campaign",
    security(("tenant_id" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Campaign deleted"),
        (status_code = StatusCode::NOT_FOUND, description = "Campaign not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    uuid: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<StatusCode, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;

    state
        .app
        .campaigns
        .delete_campaign(tenant, CampaignUuid::from_uuid(uuid.into_inner()))
        .await
        .map_err(into_status_error)?;

    Ok(StatusCode::OK)
}
