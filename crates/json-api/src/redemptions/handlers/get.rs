//! Get Redemption Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use tessera_app::domain::redemptions::records::RedemptionUuid;

use crate::{
    extensions::*,
    redemptions::{errors::into_status_error, responses::RedemptionResponse},
    state::State,
};

/// Get Redemption Handler
#[endpoint(
    tags("redemptions"),
    summary = "Get Redemption",
    security(("tenant_id" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Redemption found"),
        (status_code = StatusCode::NOT_FOUND, description = "Redemption not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    uuid: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<RedemptionResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;

    let redemption = state
        .app
        .redemptions
        .get_redemption(tenant, RedemptionUuid::from_uuid(uuid.into_inner()))
        .await
        .map_err(into_status_error)?;

    Ok(Json(redemption.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use tessera_app::domain::{
        codes::records::CodeUuid,
        redemptions::{RedemptionsServiceError, service::MockRedemptionsService},
    };

    use crate::test_helpers::{TEST_TENANT_UUID, make_redemption, redemptions_service};

    use super::*;

    fn make_service(redemptions: MockRedemptionsService) -> Service {
        redemptions_service(redemptions, Router::with_path("redemptions/{uuid}").get(handler))
    }

    #[tokio::test]
    async fn test_get_redemption_success() -> TestResult {
        let redemption_uuid = RedemptionUuid::new();
        let record = make_redemption(redemption_uuid, CodeUuid::new());

        let mut mock = MockRedemptionsService::new();

        mock.expect_get_redemption()
            .once()
            .withf(move |tenant, uuid| *tenant == TEST_TENANT_UUID && *uuid == redemption_uuid)
            .return_once(move |_, _| Ok(record));

        let mut res = TestClient::get(format!(
            "http://example.com/redemptions/{redemption_uuid}"
        ))
        .send(&make_service(mock))
        .await;

        let body: RedemptionResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.uuid, redemption_uuid.into_uuid());
        assert_eq!(body.discount_amount, 10_00);
        assert!(body.reversed_at.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_get_unknown_redemption_returns_404() -> TestResult {
        let mut mock = MockRedemptionsService::new();

        mock.expect_get_redemption()
            .once()
            .return_once(|_, _| Err(RedemptionsServiceError::NotFound));

        let res = TestClient::get(format!(
            "http://example.com/redemptions/{}",
            RedemptionUuid::new()
        ))
        .send(&make_service(mock))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
