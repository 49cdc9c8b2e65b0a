//! Redeem Code Handler

use std::sync::Arc;

use salvo::{http::header::LOCATION, oapi::extract::JsonBody, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tessera_app::domain::redemptions::records::RedemptionOutcome;

use crate::{
    extensions::*,
    redemptions::errors::into_status_error,
    state::State,
    validation::{requests::ValidationContextBody, responses::ValidationResultResponse},
};

/// Redeem Code Request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub(crate) struct RedeemCodeRequest {
    /// Code text as entered; matching is case-insensitive.
    pub code: String,

    /// Order the discount applies to; opaque to this engine.
    pub order_uuid: Option<Uuid>,

    #[serde(default)]
    pub context: ValidationContextBody,
}

/// Code Redeemed Response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub(crate) struct CodeRedeemedResponse {
    pub redemption_uuid: Uuid,

    /// Discount granted in minor units.
    pub discount_amount: u64,
}

/// Redeem Code Handler
///
/// Spends one use of a code and writes the ledger row, re-checking the full
/// chain under a row lock. A failing check is 422 with the same rejection
/// shape the validate endpoint returns, so storefronts render both paths
/// with one component.
#[endpoint(
    tags("redemptions"),
    summary = "Redeem Code",
    security(("tenant_id" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Code redeemed"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Code rejected"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<RedeemCodeRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<StatusCode, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;

    let request = json.into_inner();

    let outcome = state
        .app
        .redemptions
        .redeem_code(
            tenant,
            request.code,
            request.order_uuid,
            request.context.into(),
        )
        .await
        .map_err(into_status_error)?;

    match outcome {
        RedemptionOutcome::Redeemed(redemption) => {
            res.add_header(LOCATION, format!("/redemptions/{}", redemption.uuid), true)
                .or_500("failed to set location header")?;

            res.render(Json(CodeRedeemedResponse {
                redemption_uuid: redemption.uuid.into_uuid(),
                discount_amount: redemption.discount_amount,
            }));

            Ok(StatusCode::CREATED)
        }
        RedemptionOutcome::Rejected(rejection) => {
            res.render(Json(ValidationResultResponse::rejected(rejection)));

            Ok(StatusCode::UNPROCESSABLE_ENTITY)
        }
    }
}
