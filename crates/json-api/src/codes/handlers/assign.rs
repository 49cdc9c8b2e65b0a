//! Assign Code Handler

use std::sync::Arc;

use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tessera_app::domain::codes::records::CodeUuid;

use crate::{
    codes::{errors::into_status_error, responses::CodeResponse},
    extensions::*,
    state::State,
};

/// Assign Code Request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub(crate) struct AssignCodeRequest {
    /// User the code becomes exclusive to.
    pub user_uuid: Uuid,
}

/// Assign Code Handler
///
/// Pins a code to a single user. Validation rejects anyone else with
/// `not_assigned_to_user` from then on.
#[endpoint(
    tags("codes"),
    summary = "Assign Code to User",
    security(("tenant_id" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Code assigned"),
        (status_code = StatusCode::NOT_FOUND, description = "Code not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    uuid: PathParam<Uuid>,
    json: JsonBody<AssignCodeRequest>,
    depot: &mut Depot,
) -> Result<Json<CodeResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;

    let code = state
        .app
        .codes
        .assign_code(
            tenant,
            CodeUuid::from_uuid(uuid.into_inner()),
            json.into_inner().user_uuid,
        )
        .await
        .map_err(into_status_error)?;

    Ok(Json(code.into()))
}
