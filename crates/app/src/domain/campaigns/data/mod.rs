//! Campaigns Data

use jiff::Timestamp;

use crate::domain::campaigns::{
    data::{applicability::Applicability, codes::CodeSettings, discounts::DiscountRule},
    records::CampaignUuid,
};

pub mod applicability;
pub mod codes;
pub mod discounts;

/// Payload for creating a campaign.
///
/// Campaigns always start in draft; the state machine owns every later
/// transition.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCampaign {
    pub uuid: CampaignUuid,
    pub name: String,
    pub description: Option<String>,
    pub discount: DiscountRule,
    pub minimum_purchase: Option<u64>,
    pub maximum_discount: Option<u64>,
    pub applicability: Applicability,
    pub code_settings: CodeSettings,
    pub starts_at: Option<Timestamp>,
    pub expires_at: Option<Timestamp>,
    pub max_uses_total: Option<u64>,
    pub max_uses_per_user: u32,
    pub is_combinable: bool,
    pub is_first_purchase_only: bool,
}

/// Attribute merge for an existing campaign.
///
/// `None` leaves the stored value untouched. Status and the discount rule are
/// deliberately absent: transitions go through the state machine, and the rule
/// is fixed once codes exist against it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CampaignUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub minimum_purchase: Option<u64>,
    pub maximum_discount: Option<u64>,
    pub starts_at: Option<Timestamp>,
    pub expires_at: Option<Timestamp>,
    pub max_uses_per_user: Option<u32>,
    pub is_combinable: Option<bool>,
    pub is_first_purchase_only: Option<bool>,
}
