//! Get Code Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use tessera_app::domain::codes::records::CodeUuid;

use crate::{
    codes::{errors::into_status_error, responses::CodeResponse},
    extensions::*,
    state::State,
};

/// Get Code Handler
#[endpoint(
    tags("codes"),
    summary = "Get Code",
    security(("tenant_id" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Code found"),
        (status_code = StatusCode::NOT_FOUND, description = "Code not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    uuid: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<CodeResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;

    let code = state
        .app
        .codes
        .get_code(tenant, CodeUuid::from_uuid(uuid.into_inner()))
        .await
        .map_err(into_status_error)?;

    Ok(Json(code.into()))
}
