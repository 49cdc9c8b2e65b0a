//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use rust_decimal::Decimal;
use salvo::{affix_state::inject, prelude::*};
use uuid::Uuid;

use tessera_app::{
    context::AppContext,
    domain::{
        campaigns::{
            MockCampaignsService,
            data::{applicability::Applicability, codes::CodeSettings, discounts::DiscountRule},
            records::{CampaignRecord, CampaignStatus, CampaignUuid},
        },
        codes::{
            MockCodesService,
            records::{
                CodeRecord, CodeStatus, CodeUuid, GenerationJobRecord, GenerationJobUuid,
                JobStatus,
            },
        },
        redemptions::{
            MockRedemptionsService,
            records::{RedemptionRecord, RedemptionUuid},
        },
        tenants::records::TenantUuid,
        validation::MockValidationService,
    },
};

use crate::{extensions::*, state::State};

pub(crate) const TEST_TENANT_UUID: TenantUuid = TenantUuid::from_uuid(Uuid::nil());

/// A draft ten-percent campaign with no schedule or limits. Tests mutate
/// the fields they care about.
pub(crate) fn make_campaign(uuid: CampaignUuid) -> CampaignRecord {
    CampaignRecord {
        uuid,
        name: "Spring Sale".to_string(),
        description: None,
        discount: DiscountRule::Percentage {
            percent: Decimal::TEN,
        },
        minimum_purchase: None,
        maximum_discount: None,
        applicability: Applicability::default(),
        code_settings: CodeSettings::default(),
        starts_at: None,
        expires_at: None,
        max_uses_total: None,
        max_uses_per_user: 1,
        is_combinable: false,
        is_first_purchase_only: false,
        status: CampaignStatus::Draft,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
        deleted_at: None,
    }
}

/// An active, unlimited, unassigned code.
pub(crate) fn make_code(uuid: CodeUuid, campaign_uuid: CampaignUuid) -> CodeRecord {
    CodeRecord {
        uuid,
        campaign_uuid,
        code: "SPRING10".to_string(),
        status: CodeStatus::Active,
        uses_remaining: None,
        assigned_to: None,
        assigned_at: None,
        first_used_at: None,
        last_used_at: None,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

/// A freshly queued generation job for 100 codes.
pub(crate) fn make_job(uuid: GenerationJobUuid, campaign_uuid: CampaignUuid) -> GenerationJobRecord {
    GenerationJobRecord {
        uuid,
        campaign_uuid,
        quantity_requested: 100,
        quantity_generated: 0,
        status: JobStatus::Pending,
        error: None,
        started_at: None,
        completed_at: None,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

/// A committed, non-reversed redemption of ten percent off a 100.00 order.
pub(crate) fn make_redemption(uuid: RedemptionUuid, code_uuid: CodeUuid) -> RedemptionRecord {
    RedemptionRecord {
        uuid,
        code_uuid,
        user_uuid: None,
        order_uuid: None,
        order_total: 100_00,
        discount_amount: 10_00,
        redeemed_at: Timestamp::UNIX_EPOCH,
        reversed_at: None,
    }
}

#[salvo::handler]
pub(crate) async fn inject_tenant(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_tenant_uuid(TEST_TENANT_UUID);
    ctrl.call_next(req, depot, res).await;
}

fn strict_campaigns_mock() -> MockCampaignsService {
    let mut campaigns = MockCampaignsService::new();

    campaigns.expect_create_campaign().never();
    campaigns.expect_get_campaign().never();
    campaigns.expect_list_campaigns().never();
    campaigns.expect_list_live_campaigns().never();
    campaigns.expect_update_campaign().never();
    campaigns.expect_activate_campaign().never();
    campaigns.expect_pause_campaign().never();
    campaigns.expect_expire_campaign().never();
    campaigns.expect_delete_campaign().never();
    campaigns.expect_campaign_stats().never();

    campaigns
}

fn strict_codes_mock() -> MockCodesService {
    let mut codes = MockCodesService::new();

    codes.expect_generate_codes().never();
    codes.expect_resume_generation_job().never();
    codes.expect_cancel_generation_job().never();
    codes.expect_get_generation_job().never();
    codes.expect_create_single_code().never();
    codes.expect_assign_code().never();
    codes.expect_deactivate_code().never();
    codes.expect_reactivate_code().never();
    codes.expect_get_code().never();
    codes.expect_list_codes().never();
    codes.expect_export_codes_csv().never();

    codes
}

fn strict_validation_mock() -> MockValidationService {
    let mut validation = MockValidationService::new();

    validation.expect_validate_code().never();

    validation
}

fn strict_redemptions_mock() -> MockRedemptionsService {
    let mut redemptions = MockRedemptionsService::new();

    redemptions.expect_redeem_code().never();
    redemptions.expect_reverse_redemption().never();
    redemptions.expect_get_redemption().never();
    redemptions.expect_list_redemptions().never();

    redemptions
}

pub(crate) fn state_with_campaigns(campaigns: MockCampaignsService) -> Arc<State> {
    Arc::new(State::new(AppContext {
        campaigns: Arc::new(campaigns),
        codes: Arc::new(strict_codes_mock()),
        validation: Arc::new(strict_validation_mock()),
        redemptions: Arc::new(strict_redemptions_mock()),
    }))
}

pub(crate) fn state_with_codes(codes: MockCodesService) -> Arc<State> {
    Arc::new(State::new(AppContext {
        campaigns: Arc::new(strict_campaigns_mock()),
        codes: Arc::new(codes),
        validation: Arc::new(strict_validation_mock()),
        redemptions: Arc::new(strict_redemptions_mock()),
    }))
}

pub(crate) fn state_with_validation(validation: MockValidationService) -> Arc<State> {
    Arc::new(State::new(AppContext {
        campaigns: Arc::new(strict_campaigns_mock()),
        codes: Arc::new(strict_codes_mock()),
        validation: Arc::new(validation),
        redemptions: Arc::new(strict_redemptions_mock()),
    }))
}

pub(crate) fn state_with_redemptions(redemptions: MockRedemptionsService) -> Arc<State> {
    Arc::new(State::new(AppContext {
        campaigns: Arc::new(strict_campaigns_mock()),
        codes: Arc::new(strict_codes_mock()),
        validation: Arc::new(strict_validation_mock()),
        redemptions: Arc::new(redemptions),
    }))
}

pub(crate) fn campaigns_service(campaigns: MockCampaignsService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state_with_campaigns(campaigns)))
            .hoop(inject_tenant)
            .push(route),
    )
}

pub(crate) fn codes_service(codes: MockCodesService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state_with_codes(codes)))
            .hoop(inject_tenant)
            .push(route),
    )
}

pub(crate) fn validation_service(validation: MockValidationService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state_with_validation(validation)))
            .hoop(inject_tenant)
            .push(route),
    )
}

pub(crate) fn redemptions_service(redemptions: MockRedemptionsService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state_with_redemptions(redemptions)))
            .hoop(inject_tenant)
            .push(route),
    )
}
