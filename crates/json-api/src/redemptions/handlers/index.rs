//! Redemption Index Handler

use std::sync::Arc;

use salvo::{oapi::extract::QueryParam, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tessera_app::domain::{
    campaigns::records::CampaignUuid, redemptions::data::RedemptionFilter,
};

use crate::{
    extensions::*,
    redemptions::{errors::into_status_error, responses::RedemptionResponse},
    state::State,
};

const DEFAULT_LIMIT: u32 = 50;

/// Redemptions Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct RedemptionsResponse {
    /// The list of redemptions
    pub redemptions: Vec<RedemptionResponse>,
}

/// Redemption Index Handler
///
/// Pages through the ledger newest first. `?campaign=` and `?user=` narrow
/// it; reversed rows stay hidden unless `?include_reversed=true`.
#[endpoint(
    tags("redemptions"),
    summary = "List Redemptions",
    security(("tenant_id" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Redemptions"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    campaign: QueryParam<Uuid, false>,
    user: QueryParam<Uuid, false>,
    include_reversed: QueryParam<bool, false>,
    limit: QueryParam<u32, false>,
    offset: QueryParam<u32, false>,
    depot: &mut Depot,
) -> Result<Json<RedemptionsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;

    let filter = RedemptionFilter {
        campaign_uuid: campaign.into_inner().map(CampaignUuid::from_uuid),
        user_uuid: user.into_inner(),
        include_reversed: include_reversed.into_inner().unwrap_or(false),
    };

    let redemptions = state
        .app
        .redemptions
        .list_redemptions(
            tenant,
            filter,
            limit.into_inner().unwrap_or(DEFAULT_LIMIT),
            offset.into_inner().unwrap_or(0),
        )
        .await
        .map_err(into_status_error)?;

    Ok(Json(RedemptionsResponse {
        redemptions: redemptions.into_iter().map(Into::into).collect(),
    }))
}
