//! Deactivate Code Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use tessera_app::domain::codes::records::CodeUuid;

use crate::{
    codes::{errors::into_status_error, responses::CodeResponse},
    extensions::*,
    state::State,
};

/// Deactivate Code Handler
///
/// Takes a code out of circulation without deleting it. Validation reports
/// `code_inactive` until it is reactivated.
#[endpoint(
    tags("codes"),
    summary = "Deactivate Code",
    security(("tenant_id" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Code deactivated"),
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
        .deactivate_code(tenant, CodeUuid::from_uuid(uuid.into_inner()))
        .await
        .map_err(into_status_error)?;

    Ok(Json(code.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use tessera_app::domain::{
        campaigns::records::CampaignUuid,
        codes::{CodesServiceError, records::CodeStatus, service::MockCodesService},
    };

    use crate::test_helpers::{TEST_TENANT_UUID, codes_service, make_code};

    use super::*;

    fn make_service(codes: MockCodesService) -> Service {
        codes_service(
            codes,
            Router::with_path("codes/{uuid}/deactivate").post(handler),
        )
    }

    #[tokio::test]
    async fn test_deactivate_code_success() -> TestResult {
        let code_uuid = CodeUuid::new();

        let mut parked = make_code(code_uuid, CampaignUuid::new());
        parked.status = CodeStatus::Inactive;

        let mut mock = MockCodesService::new();

        mock.expect_deactivate_code()
            .once()
            .withf(move |tenant, uuid| *tenant == TEST_TENANT_UUID && *uuid == code_uuid)
            .return_once(move |_, _| Ok(parked));

        let mut res = TestClient::post(format!(
            "http://example.com/codes/{code_uuid}/deactivate"
        ))
        .send(&make_service(mock))
        .await;

        let body: CodeResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.status, "inactive");

        Ok(())
    }

    #[tokio::test]
    async fn test_deactivate_unknown_code_returns_404() -> TestResult {
        let mut mock = MockCodesService::new();

        mock.expect_deactivate_code()
            .once()
            .return_once(|_, _| Err(CodesServiceError::NotFound));

        let res = TestClient::post(format!(
            "http://example.com/codes/{}/deactivate",
            CodeUuid::new()
        ))
        .send(&make_service(mock))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
