//! Get Campaign Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use tessera_app::domain::campaigns::records::CampaignUuid;

use crate::{
    campaigns::{errors::into_status_error, responses::CampaignResponse},
    extensions::*,
    state::State,
};

/// Get Campaign Handler
///
/// Returns a campaign that has not been soft-deleted.
#[endpoint(
    tags("campaigns"),
    summary = "Get Campaign",
    security(("tenant_id" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Campaign"),
        (status_code = StatusCode::NOT_FOUND, description = "Campaign not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    uuid: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<CampaignResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;

    let campaign = state
        .app
        .campaigns
        .get_campaign(tenant, CampaignUuid::from_uuid(uuid.into_inner()))
        .await
        .map_err(into_status_error)?;

    Ok(Json(campaign.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use tessera_app::domain::campaigns::{
        CampaignsServiceError, records::CampaignUuid, service::MockCampaignsService,
    };

    use crate::test_helpers::{TEST_TENANT_UUID, campaigns_service, make_campaign};

    use super::*;

    fn make_service(campaigns: MockCampaignsService) -> Service {
        campaigns_service(campaigns, Router::with_path("campaigns/{uuid}").get(handler))
    }

    #[tokio::test]
    async fn test_get_campaign_returns_200() -> TestResult {
        let uuid = CampaignUuid::new();
        let campaign = make_campaign(uuid);

        let mut mock = MockCampaignsService::new();

        mock.expect_get_campaign()
            .once()
            .withf(move |tenant, u| *tenant == TEST_TENANT_UUID && *u == uuid)
            .return_once(move |_, _| Ok(campaign));

        let mut res = TestClient::get(format!("http://example.com/campaigns/{uuid}"))
            .send(&make_service(mock))
            .await;

        let body: CampaignResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.uuid, uuid.into_uuid());
        assert_eq!(body.status, "draft");

        Ok(())
    }

    #[tokio::test]
    async fn test_get_campaign_not_found_returns_404() -> TestResult {
        let uuid = CampaignUuid::new();

        let mut mock = MockCampaignsService::new();

        mock.expect_get_campaign()
            .once()
            .return_once(|_, _| Err(CampaignsServiceError::NotFound));

        let res = TestClient::get(format!("http://example.com/campaigns/{uuid}"))
            .send(&make_service(mock))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }

    #[tokio::test]
    async fn test_get_campaign_invalid_uuid_returns_400() -> TestResult {
        let res = TestClient::get("http://example.com/campaigns/not-a-uuid")
            .send(&make_service(MockCampaignsService::new()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
