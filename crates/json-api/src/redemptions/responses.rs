//! Redemption Bodies

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tessera_app::domain::redemptions::records::RedemptionRecord;

/// One ledger row.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub(crate) struct RedemptionResponse {
    pub uuid: Uuid,
    pub code_uuid: Uuid,
    pub user_uuid: Option<Uuid>,
    pub order_uuid: Option<Uuid>,

    /// Order total in minor units at redemption time.
    pub order_total: u64,

    /// Discount granted in minor units.
    pub discount_amount: u64,

    pub redeemed_at: String,
    pub reversed_at: Option<String>,
}

impl From<RedemptionRecord> for RedemptionResponse {
    fn from(redemption: RedemptionRecord) -> Self {
        Self {
            uuid: redemption.uuid.into_uuid(),
            code_uuid: redemption.code_uuid.into_uuid(),
            user_uuid: redemption.user_uuid,
            order_uuid: redemption.order_uuid,
            order_total: redemption.order_total,
            discount_amount: redemption.discount_amount,
            redeemed_at: redemption.redeemed_at.to_string(),
            reversed_at: redemption.reversed_at.map(|at| at.to_string()),
        }
    }
}
