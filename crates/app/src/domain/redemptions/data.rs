//! Redemption Inputs

use uuid::Uuid;

use crate::domain::{
    campaigns::records::CampaignUuid, codes::records::CodeUuid,
    redemptions::records::RedemptionUuid,
};

/// Data for one ledger row.
#[derive(Debug, Clone)]
pub struct NewRedemption {
    pub uuid: RedemptionUuid,
    pub code_uuid: CodeUuid,
    pub user_uuid: Option<Uuid>,
    pub order_uuid: Option<Uuid>,
    pub order_total: u64,
    pub discount_amount: u64,
}

/// Optional narrowing for redemption listings.
///
/// Reversed rows are hidden unless `include_reversed` is set.
#[derive(Debug, Clone, Default)]
pub struct RedemptionFilter {
    pub campaign_uuid: Option<CampaignUuid>,
    pub user_uuid: Option<Uuid>,
    pub include_reversed: bool,
}
