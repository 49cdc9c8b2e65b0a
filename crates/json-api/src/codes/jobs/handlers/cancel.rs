//! Cancel Generation Job Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use tessera_app::domain::codes::records::GenerationJobUuid;

use crate::{
    codes::{errors::into_status_error, jobs::get::GenerationJobResponse},
    extensions::*,
    state::State,
};

/// Cancel Generation Job Handler
///
/// Stops a pending or processing job. Already generated codes stay in the
/// campaign.
#[endpoint(
    tags("generation-jobs"),
    summary = "Cancel Generation Job",
    security(("tenant_id" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Job cancelled"),
        (status_code = StatusCode::CONFLICT, description = "Job already finished"),
        (status_code = StatusCode::NOT_FOUND, description = "Job not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    uuid: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<GenerationJobResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;

    let job = state
        .app
        .codes
        .cancel_generation_job(tenant, GenerationJobUuid::from_uuid(uuid.into_inner()))
        .await
        .map_err(into_status_error)?;

    Ok(Json(job.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use tessera_app::domain::{
        campaigns::records::CampaignUuid,
        codes::{CodesServiceError, records::JobStatus, service::MockCodesService},
    };

    use crate::test_helpers::{TEST_TENANT_UUID, codes_service, make_job};

    use super::*;

    fn make_service(codes: MockCodesService) -> Service {
        codes_service(
            codes,
            Router::with_path("generation-jobs/{uuid}/cancel").post(handler),
        )
    }

    #[tokio::test]
    async fn test_cancel_job_success() -> TestResult {
        let job_uuid = GenerationJobUuid::new();

        let mut job = make_job(job_uuid, CampaignUuid::new());
        job.status = JobStatus::Failed;
        job.error = Some("cancelled by operator".to_string());

        let mut mock = MockCodesService::new();

        mock.expect_cancel_generation_job()
            .once()
            .withf(move |tenant, uuid| *tenant == TEST_TENANT_UUID && *uuid == job_uuid)
            .return_once(move |_, _| Ok(job));

        let mut res = TestClient::post(format!(
            "http://example.com/generation-jobs/{job_uuid}/cancel"
        ))
        .send(&make_service(mock))
        .await;

        let body: GenerationJobResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.status, "failed");
        assert!(body.error.is_some(), "expected a cancellation reason");

        Ok(())
    }

    #[tokio::test]
    async fn test_cancel_completed_job_returns_409() -> TestResult {
        let mut mock = MockCodesService::new();

        mock.expect_cancel_generation_job().once().return_once(|_, _| {
            Err(CodesServiceError::JobNotCancellable {
                status: JobStatus::Completed,
            })
        });

        let res = TestClient::post(format!(
            "http://example.com/generation-jobs/{}/cancel",
            GenerationJobUuid::new()
        ))
        .send(&make_service(mock))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }
}
