//! Update Campaign Handler

use std::sync::Arc;

use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use uuid::Uuid;

use tessera_app::domain::campaigns::records::CampaignUuid;

use crate::{
    campaigns::{
        errors::into_status_error, requests::UpdateCampaignRequest, responses::CampaignResponse,
    },
    extensions::*,
    state::State,
};

/// Update Campaign Handler
///
/// Merges the provided fields into the campaign; status moves through the
/// dedicated transition endpoints instead.
#[endpoint(
    tags("campaigns"),
    summary = "Update Campaign",
    security(("tenant_id" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Campaign updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Campaign not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    uuid: PathParam<Uuid>,
    json: JsonBody<UpdateCampaignRequest>,
    depot: &mut Depot,
) -> Result<Json<CampaignResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;

    let campaign = state
        .app
        .campaigns
        .update_campaign(
            tenant,
            CampaignUuid::from_uuid(uuid.into_inner()),
            json.into_inner().try_into()?,
        )
        .await
        .map_err(into_status_error)?;

    Ok(Json(campaign.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use tessera_app::domain::campaigns::{
        CampaignsServiceError, data::CampaignUpdate, records::CampaignUuid,
        service::MockCampaignsService,
    };

    use crate::test_helpers::{TEST_TENANT_UUID, campaigns_service, make_campaign};

    use super::*;

    fn make_service(campaigns: MockCampaignsService) -> Service {
        campaigns_service(campaigns, Router::with_path("campaigns/{uuid}").put(handler))
    }

    #[tokio::test]
    async fn test_update_campaign_success() -> TestResult {
        let uuid = CampaignUuid::new();

        let mut updated = make_campaign(uuid);
        updated.name = "Renamed".to_string();

        let mut mock = MockCampaignsService::new();

        mock.expect_update_campaign()
            .once()
            .withf(move |tenant, u, update: &CampaignUpdate| {
                *tenant == TEST_TENANT_UUID
                    && *u == uuid
                    && update.name.as_deref() == Some("Renamed")
                    && update.minimum_purchase == Some(25_00)
            })
            .return_once(move |_, _, _| Ok(updated));

        let mut res = TestClient::put(format!("http://example.com/campaigns/{uuid}"))
            .json(&json!({
                "name": "Renamed",
                "minimum_purchase": 2500
            }))
            .send(&make_service(mock))
            .await;

        let body: CampaignResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.name, "Renamed");

        Ok(())
    }

    #[tokio::test]
    async fn test_update_campaign_not_found_returns_404() -> TestResult {
        let uuid = CampaignUuid::new();

        let mut mock = MockCampaignsService::new();

        mock.expect_update_campaign()
            .once()
            .return_once(|_, _, _| Err(CampaignsServiceError::NotFound));

        let res = TestClient::put(format!("http://example.com/campaigns/{uuid}"))
            .json(&json!({ "name": "Ghost" }))
            .send(&make_service(mock))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
