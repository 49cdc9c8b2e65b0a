//! Validate Code Handler

use std::sync::Arc;

use salvo::{oapi::extract::JsonBody, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{
    extensions::*,
    state::State,
    validation::{
        errors::into_status_error, requests::ValidationContextBody,
        responses::ValidationResultResponse,
    },
};

/// Validate Code Request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub(crate) struct ValidateCodeRequest {
    /// Code text as entered; matching is case-insensitive.
    pub code: String,

    #[serde(default)]
    pub context: ValidationContextBody,
}

/// Validate Code Handler
///
/// Quotes what a code is worth against the presented cart without spending
/// it. Rejections come back as 200 with `valid: false`; the status line is
/// reserved for transport problems.
#[endpoint(
    tags("validation"),
    summary = "Validate Code",
    security(("tenant_id" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Validation outcome"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<ValidateCodeRequest>,
    depot: &mut Depot,
) -> Result<Json<ValidationResultResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;

    let request = json.into_inner();

    let outcome = state
        .app
        .validation
        .validate_code(tenant, request.code, request.context.into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(outcome.into()))
}
