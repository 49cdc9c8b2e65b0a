//! Export Codes Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use tessera_app::domain::campaigns::records::CampaignUuid;

use crate::{codes::errors::into_status_error, extensions::*, state::State};

/// Export Codes Handler
///
/// Renders every code of a campaign as CSV, one line per code, including
/// per-code redemption totals.
#[endpoint(
    tags("codes"),
    summary = "Export Codes as CSV",
    security(("tenant_id" = [])),
    responses(
        (status_code = StatusCode::OK, description = "CSV export"),
        (status_code = StatusCode::NOT_FOUND, description = "Campaign not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    campaign: PathParam<Uuid>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<StatusCode, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;

    let csv = state
        .app
        .codes
        .export_codes_csv(tenant, CampaignUuid::from_uuid(campaign.into_inner()))
        .await
        .map_err(into_status_error)?;

    res.render(Text::Csv(csv));

    Ok(StatusCode::OK)
}
