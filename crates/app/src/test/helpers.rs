//! Test Helpers

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    domain::{
        campaigns::{
            CampaignsService,
            data::{
                NewCampaign, applicability::Applicability, codes::CodeSettings,
                discounts::DiscountRule,
            },
            records::CampaignUuid,
        },
        codes::{CodesService, records::CodeRecord},
        validation::data::ValidationContext,
    },
    test::TestContext,
};

/// A draft percentage-off campaign with no schedule or limits beyond one use
/// per user.
pub(crate) fn percent_campaign(name: &str, percent: u32) -> NewCampaign {
    NewCampaign {
        uuid: CampaignUuid::new(),
        name: name.to_string(),
        description: None,
        discount: DiscountRule::Percentage {
            percent: Decimal::from(percent),
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
    }
}

/// Creates and activates a percentage campaign, returning its uuid.
pub(crate) async fn live_campaign(ctx: &TestContext, name: &str, percent: u32) -> CampaignUuid {
    let campaign = ctx
        .campaigns
        .create_campaign(ctx.tenant_uuid, percent_campaign(name, percent))
        .await
        .expect("Failed to create campaign");

    ctx.campaigns
        .activate_campaign(ctx.tenant_uuid, campaign.uuid)
        .await
        .expect("Failed to activate campaign");

    campaign.uuid
}

/// Mints one code with caller-chosen text in a campaign.
pub(crate) async fn custom_code(
    ctx: &TestContext,
    campaign_uuid: CampaignUuid,
    code: &str,
) -> CodeRecord {
    ctx.codes
        .create_single_code(ctx.tenant_uuid, campaign_uuid, Some(code.to_string()))
        .await
        .expect("Failed to create code")
}

/// A minimal validation context: a signed-in or anonymous user with a cart
/// total and nothing else.
pub(crate) fn carted(user_uuid: Option<Uuid>, cart_total: u64) -> ValidationContext {
    ValidationContext {
        user_uuid,
        cart_total,
        ..ValidationContext::default()
    }
}
