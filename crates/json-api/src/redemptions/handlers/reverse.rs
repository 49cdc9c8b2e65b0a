//! Reverse Redemption Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tessera_app::domain::redemptions::records::RedemptionUuid;

use crate::{extensions::*, redemptions::errors::into_status_error, state::State};

/// Reversal Response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub(crate) struct ReversalResponse {
    pub success: bool,
}

/// Reverse Redemption Handler
///
/// Undoes a redemption exactly once: restores the spent use and reactivates
/// an exhausted code. A second reversal of the same row is 409.
#[endpoint(
    tags("redemptions"),
    summary = "Reverse Redemption",
    security(("tenant_id" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Redemption reversed"),
        (status_code = StatusCode::CONFLICT, description = "Already reversed"),
        (status_code = StatusCode::NOT_FOUND, description = "Redemption not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    uuid: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<ReversalResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;

    state
        .app
        .redemptions
        .reverse_redemption(tenant, RedemptionUuid::from_uuid(uuid.into_inner()))
        .await
        .map_err(into_status_error)?;

    Ok(Json(ReversalResponse { success: true }))
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use tessera_app::domain::{
        codes::records::CodeUuid,
        redemptions::{RedemptionsServiceError, service::MockRedemptionsService},
    };

    use crate::test_helpers::{TEST_TENANT_UUID, make_redemption, redemptions_service};

    use super::*;

    fn make_service(redemptions: MockRedemptionsService) -> Service {
        redemptions_service(
            redemptions,
            Router::with_path("redemptions/{uuid}/reverse").post(handler),
        )
    }

    #[tokio::test]
    async fn test_reverse_redemption_success() -> TestResult {
        let redemption_uuid = RedemptionUuid::new();

        let mut reversed = make_redemption(redemption_uuid, CodeUuid::new());
        reversed.reversed_at = Some(Timestamp::UNIX_EPOCH);

        let mut mock = MockRedemptionsService::new();

        mock.expect_reverse_redemption()
            .once()
            .withf(move |tenant, uuid| *tenant == TEST_TENANT_UUID && *uuid == redemption_uuid)
            .return_once(move |_, _| Ok(reversed));

        let mut res = TestClient::post(format!(
            "http://example.com/redemptions/{redemption_uuid}/reverse"
        ))
        .send(&make_service(mock))
        .await;

        let body: ReversalResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert!(body.success);

        Ok(())
    }

    #[tokio::test]
    async fn test_double_reversal_returns_409() -> TestResult {
        let mut mock = MockRedemptionsService::new();

        mock.expect_reverse_redemption()
            .once()
            .return_once(|_, _| Err(RedemptionsServiceError::AlreadyReversed));

        let res = TestClient::post(format!(
            "http://example.com/redemptions/{}/reverse",
            RedemptionUuid::new()
        ))
        .send(&make_service(mock))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }

    #[tokio::test]
    async fn test_reverse_unknown_redemption_returns_404() -> TestResult {
        let mut mock = MockRedemptionsService::new();

        mock.expect_reverse_redemption()
            .once()
            .return_once(|_, _| Err(RedemptionsServiceError::NotFound));

        let res = TestClient::post(format!(
            "http://example.com/redemptions/{}/reverse",
            RedemptionUuid::new()
        ))
        .send(&make_service(mock))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
