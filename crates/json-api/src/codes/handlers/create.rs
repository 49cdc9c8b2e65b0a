//! Create Code Handler

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
    codes::{errors::into_status_error, responses::CodeResponse},
    extensions::*,
    state::State,
};

/// Create Code Request
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateCodeRequest {
    /// Caller-chosen code text; trimmed and uppercased. Omitted means a
    /// random draw from the campaign's alphabet.
    pub code: Option<String>,
}

/// Create Code Handler
///
/// Mints a single code in a campaign.
#[endpoint(
    tags("codes"),
    summary = "Create Code",
    security(("tenant_id" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Code created"),
        (status_code = StatusCode::CONFLICT, description = "Code already exists"),
        (status_code = StatusCode::NOT_FOUND, description = "Campaign not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    campaign: PathParam<Uuid>,
    json: JsonBody<CreateCodeRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<CodeResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;

    let code = state
        .app
        .codes
        .create_single_code(
            tenant,
            CampaignUuid::from_uuid(campaign.into_inner()),
            json.into_inner().code,
        )
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/codes/{}", code.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(code.into()))
}
