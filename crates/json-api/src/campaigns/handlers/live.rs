//! Live Campaign Index Handler

use std::sync::Arc;

use jiff::Timestamp;
use salvo::prelude::*;

use crate::{
    campaigns::{errors::into_status_error, index::CampaignsResponse},
    extensions::*,
    state::State,
};

/// Live Campaign Index Handler
///
/// Returns the campaigns that are active and inside their scheduled window
/// right now, the set a storefront banner would show.
#[endpoint(
    tags("campaigns"),
    summary = "List Live Campaigns",
    security(("tenant_id" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Live campaigns"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CampaignsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;

    let campaigns = state
        .app
        .campaigns
        .list_live_campaigns(tenant, Timestamp::now())
        .await
        .map_err(into_status_error)?;

    Ok(Json(CampaignsResponse {
        campaigns: campaigns.into_iter().map(Into::into).collect(),
    }))
}
