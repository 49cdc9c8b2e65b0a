//! Campaign Stats Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tessera_app::domain::campaigns::records::{CampaignStats, CampaignUuid};

use crate::{campaigns::errors::into_status_error, extensions::*, state::State};

/// Campaign Stats Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CampaignStatsResponse {
    /// Codes minted for the campaign
    pub total_codes: u64,

    /// Codes currently redeemable
    pub active_codes: u64,

    /// Codes that exhausted their use budget
    pub used_codes: u64,

    /// Non-reversed redemptions recorded
    pub total_redemptions: u64,

    /// Sum of discount granted, in minor units
    pub total_discount_given: u64,

    /// Sum of order totals at redemption time, in minor units
    pub total_order_value: u64,
}

impl From<CampaignStats> for CampaignStatsResponse {
    fn from(stats: CampaignStats) -> Self {
        CampaignStatsResponse {
            total_codes: stats.total_codes,
            active_codes: stats.active_codes,
            used_codes: stats.used_codes,
            total_redemptions: stats.total_redemptions,
            total_discount_given: stats.total_discount_given,
            total_order_value: stats.total_order_value,
        }
    }
}

/// Campaign Stats Handler
///
/// Returns aggregated code and redemption counters for one campaign.
#[endpoint(
    tags("campaigns"),
    summary = "Campaign Stats",
    security(("tenant_id" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Campaign stats"),
        (status_code = StatusCode::NOT_FOUND, description = "Campaign not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    uuid: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<CampaignStatsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;

    let stats = state
        .app
        .campaigns
        .campaign_stats(tenant, CampaignUuid::from_uuid(uuid.into_inner()))
        .await
        .map_err(into_status_error)?;

    Ok(Json(stats.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use tessera_app::domain::campaigns::{
        CampaignsServiceError, records::CampaignUuid, service::MockCampaignsService,
    };

    use crate::test_helpers::{TEST_TENANT_UUID, campaigns_service};

    use super::*;

    fn make_service(campaigns: MockCampaignsService) -> Service {
        campaigns_service(
            campaigns,
            Router::with_path("campaigns/{uuid}/stats").get(handler),
        )
    }

    #[tokio::test]
    async fn test_stats_returns_counters() -> TestResult {
        let uuid = CampaignUuid::new();

        let mut mock = MockCampaignsService::new();

        mock.expect_campaign_stats()
            .once()
            .withf(move |tenant, u| *tenant == TEST_TENANT_UUID && *u == uuid)
            .return_once(|_, _| {
                Ok(CampaignStats {
                    total_codes: 50,
                    active_codes: 40,
                    used_codes: 10,
                    total_redemptions: 12,
                    total_discount_given: 340_00,
                    total_order_value: 4_100_00,
                })
            });

        let response: CampaignStatsResponse =
            TestClient::get(format!("http://example.com/campaigns/{uuid}/stats"))
                .send(&make_service(mock))
                .await
                .take_json()
                .await?;

        assert_eq!(response.total_codes, 50);
        assert_eq!(response.used_codes, 10);
        assert_eq!(response.total_discount_given, 340_00);

        Ok(())
    }

    #[tokio::test]
    async fn test_stats_unknown_campaign_returns_404() -> TestResult {
        let uuid = CampaignUuid::new();

        let mut mock = MockCampaignsService::new();

        mock.expect_campaign_stats()
            .once()
            .return_once(|_, _| Err(CampaignsServiceError::NotFound));

        let res = TestClient::get(format!("http://example.com/campaigns/{uuid}/stats"))
            .send(&make_service(mock))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
