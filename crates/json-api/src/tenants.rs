//! Tenant scoping middleware.
//!
//! The upstream gateway authenticates callers and forwards the tenant in the
//! `X-Tenant-Id` header; every route behind this middleware is scoped to it.

use salvo::prelude::*;
use uuid::Uuid;

use tessera_app::domain::tenants::records::TenantUuid;

use crate::extensions::*;

/// Header carrying the authenticated tenant.
pub(crate) const TENANT_HEADER: &str = "x-tenant-id";

#[salvo::handler]
pub(crate) async fn middleware(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let Some(tenant) = extract_tenant_uuid(req) else {
        res.render(StatusError::unauthorized().brief("Missing or invalid X-Tenant-Id header"));

        return;
    };

    depot.insert_tenant_uuid(tenant);

    ctrl.call_next(req, depot, res).await;
}

fn extract_tenant_uuid(req: &Request) -> Option<TenantUuid> {
    let value = req.headers().get(TENANT_HEADER)?.to_str().ok()?;

    Uuid::parse_str(value.trim())
        .ok()
        .map(TenantUuid::from_uuid)
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use super::*;

    #[salvo::handler]
    async fn echo_tenant(depot: &mut Depot, res: &mut Response) {
        let tenant = depot.tenant_uuid_or_401().ok().map_or_else(
            || "missing".to_string(),
            |uuid: TenantUuid| uuid.to_string(),
        );

        res.render(tenant);
    }

    fn make_service() -> Service {
        let router = Router::new()
            .hoop(middleware)
            .push(Router::new().get(echo_tenant));

        Service::new(router)
    }

    #[tokio::test]
    async fn test_missing_tenant_header_returns_401() -> TestResult {
        let res = TestClient::get("http://example.com")
            .send(&make_service())
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }

    #[tokio::test]
    async fn test_malformed_tenant_header_returns_401() -> TestResult {
        let res = TestClient::get("http://example.com")
            .add_header(TENANT_HEADER, "not-a-uuid", true)
            .send(&make_service())
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }

    #[tokio::test]
    async fn test_empty_tenant_header_returns_401() -> TestResult {
        let res = TestClient::get("http://example.com")
            .add_header(TENANT_HEADER, "", true)
            .send(&make_service())
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }

    #[tokio::test]
    async fn test_valid_tenant_header_injects_tenant_uuid() -> TestResult {
        let tenant = Uuid::now_v7();

        let mut res = TestClient::get("http://example.com")
            .add_header(TENANT_HEADER, tenant.to_string(), true)
            .send(&make_service())
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(res.take_string().await?, tenant.to_string());

        Ok(())
    }

    #[tokio::test]
    async fn test_surrounding_whitespace_is_tolerated() -> TestResult {
        let tenant = Uuid::now_v7();

        let mut res = TestClient::get("http://example.com")
            .add_header(TENANT_HEADER, format!(" {tenant} "), true)
            .send(&make_service())
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(res.take_string().await?, tenant.to_string());

        Ok(())
    }
}
