//! Campaign Responses

use std::string::ToString;

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tessera_app::domain::campaigns::records::CampaignRecord;

use crate::campaigns::requests::{
    applicability::ApplicabilityBody, codes::CodeSettingsBody, discounts::DiscountRuleBody,
};

/// Campaign Response
///
/// Timestamps are RFC 3339 strings; money fields are integer minor units.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CampaignResponse {
    /// The unique identifier of the campaign
    pub uuid: Uuid,

    /// Display name
    pub name: String,

    /// Optional free-text description
    pub description: Option<String>,

    /// The discount the campaign's codes grant
    pub discount: DiscountRuleBody,

    /// Minimum cart total required to redeem, if any
    pub minimum_purchase: Option<u64>,

    /// Cap on the computed discount, if any
    pub maximum_discount: Option<u64>,

    /// Which cart items the campaign applies to
    pub applicability: ApplicabilityBody,

    /// How codes for this campaign are shaped
    pub code_settings: CodeSettingsBody,

    /// Schedule start, if scheduled
    pub starts_at: Option<String>,

    /// Schedule end (exclusive), if scheduled
    pub expires_at: Option<String>,

    /// Per-code use budget copied onto generated codes
    pub max_uses_total: Option<u64>,

    /// Maximum non-reversed redemptions per user per code
    pub max_uses_per_user: u32,

    /// Whether the discount may stack with other promotions
    pub is_combinable: bool,

    /// Restrict redemption to first-time purchasers
    pub is_first_purchase_only: bool,

    /// Lifecycle state (draft, active, paused, expired)
    pub status: String,

    /// The date and time the campaign was created
    pub created_at: String,

    /// The date and time the campaign was last updated
    pub updated_at: String,

    /// The date and time the campaign was deleted
    pub deleted_at: Option<String>,
}

impl From<CampaignRecord> for CampaignResponse {
    fn from(campaign: CampaignRecord) -> Self {
        CampaignResponse {
            uuid: campaign.uuid.into(),
            name: campaign.name,
            description: campaign.description,
            discount: campaign.discount.into(),
            minimum_purchase: campaign.minimum_purchase,
            maximum_discount: campaign.maximum_discount,
            applicability: campaign.applicability.into(),
            code_settings: campaign.code_settings.into(),
            starts_at: campaign.starts_at.as_ref().map(ToString::to_string),
            expires_at: campaign.expires_at.as_ref().map(ToString::to_string),
            max_uses_total: campaign.max_uses_total,
            max_uses_per_user: campaign.max_uses_per_user,
            is_combinable: campaign.is_combinable,
            is_first_purchase_only: campaign.is_first_purchase_only,
            status: campaign.status.to_string(),
            created_at: campaign.created_at.to_string(),
            updated_at: campaign.updated_at.to_string(),
            deleted_at: campaign.deleted_at.as_ref().map(ToString::to_string),
        }
    }
}
