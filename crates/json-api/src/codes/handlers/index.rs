//! Code Index Handler

use std::sync::Arc;

use salvo::{
    oapi::extract::{PathParam, QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tessera_app::domain::{
    campaigns::records::CampaignUuid,
    codes::{data::CodeFilter, records::CodeStatus},
};

use crate::{
    codes::{errors::into_status_error, responses::CodeResponse},
    extensions::*,
    state::State,
};

const DEFAULT_LIMIT: u32 = 50;

/// Codes Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CodesResponse {
    /// The list of codes
    pub codes: Vec<CodeResponse>,
}

/// Code Index Handler
///
/// Returns a campaign's codes newest first. `?status=` and `?assigned_to=`
/// narrow the page; `?limit=`/`?offset=` page through it.
#[endpoint(
    tags("codes"),
    summary = "List Codes",
    security(("tenant_id" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Codes"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    campaign: PathParam<Uuid>,
    status: QueryParam<String, false>,
    assigned_to: QueryParam<Uuid, false>,
    limit: QueryParam<u32, false>,
    offset: QueryParam<u32, false>,
    depot: &mut Depot,
) -> Result<Json<CodesResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;

    let filter = CodeFilter {
        status: status.into_inner().as_deref().map(parse_status).transpose()?,
        assigned_to: assigned_to.into_inner(),
    };

    let codes = state
        .app
        .codes
        .list_codes(
            tenant,
            CampaignUuid::from_uuid(campaign.into_inner()),
            filter,
            limit.into_inner().unwrap_or(DEFAULT_LIMIT),
            offset.into_inner().unwrap_or(0),
        )
        .await
        .map_err(into_status_error)?;

    Ok(Json(CodesResponse {
        codes: codes.into_iter().map(Into::into).collect(),
    }))
}

fn parse_status(value: &str) -> Result<CodeStatus, StatusError> {
    match value {
        "active" => Ok(CodeStatus::Active),
        "inactive" => Ok(CodeStatus::Inactive),
        "used" => Ok(CodeStatus::Used),
        other => Err(StatusError::bad_request().brief(format!("Unknown code status: {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use tessera_app::domain::codes::{records::CodeUuid, service::MockCodesService};

    use crate::test_helpers::{TEST_TENANT_UUID, codes_service, make_code};

    use super::*;

    fn make_service(codes: MockCodesService) -> Service {
        codes_service(
            codes,
            Router::with_path("campaigns/{campaign}/codes").get(handler),
        )
    }

    #[tokio::test]
    async fn test_index_returns_codes_with_default_paging() -> TestResult {
        let campaign_uuid = CampaignUuid::new();
        let code = make_code(CodeUuid::new(), campaign_uuid);

        let mut mock = MockCodesService::new();

        mock.expect_list_codes()
            .once()
            .withf(move |tenant, campaign, filter, limit, offset| {
                *tenant == TEST_TENANT_UUID
                    && *campaign == campaign_uuid
                    && filter.status.is_none()
                    && filter.assigned_to.is_none()
                    && *limit == DEFAULT_LIMIT
                    && *offset == 0
            })
            .return_once(move |_, _, _, _, _| Ok(vec![code]));

        let response: CodesResponse =
            TestClient::get(format!("http://example.com/campaigns/{campaign_uuid}/codes"))
                .send(&make_service(mock))
                .await
                .take_json()
                .await?;

        assert_eq!(response.codes.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_index_passes_filters_and_paging() -> TestResult {
        let campaign_uuid = CampaignUuid::new();
        let user = Uuid::now_v7();

        let mut mock = MockCodesService::new();

        mock.expect_list_codes()
            .once()
            .withf(move |_, _, filter, limit, offset| {
                filter.status == Some(CodeStatus::Used)
                    && filter.assigned_to == Some(user)
                    && *limit == 10
                    && *offset == 20
            })
            .return_once(|_, _, _, _, _| Ok(vec![]));

        let res = TestClient::get(format!(
            "http://example.com/campaigns/{campaign_uuid}/codes?status=used&assigned_to={user}&limit=10&offset=20"
        ))
        .send(&make_service(mock))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_index_unknown_status_returns_400() -> TestResult {
        let campaign_uuid = CampaignUuid::new();

        let mut mock = MockCodesService::new();

        mock.expect_list_codes().never();

        let res = TestClient::get(format!(
            "http://example.com/campaigns/{campaign_uuid}/codes?status=revoked"
        ))
        .send(&make_service(mock))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
