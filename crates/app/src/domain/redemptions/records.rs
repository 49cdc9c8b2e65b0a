//! Redemption Records

use jiff::Timestamp;
use uuid::Uuid;

use crate::{
    domain::{codes::records::CodeUuid, validation::checks::Rejection},
    uuids::TypedUuid,
};

/// Redemption UUID
pub type RedemptionUuid = TypedUuid<RedemptionRecord>;

/// One committed redemption in the ledger.
///
/// Rows are never hard-deleted; a reversal stamps `reversed_at` and restores
/// the code's counter instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedemptionRecord {
    /// Unique identifier of the redemption.
    pub uuid: RedemptionUuid,

    /// The code that was redeemed.
    pub code_uuid: CodeUuid,

    /// User who redeemed, if known.
    pub user_uuid: Option<Uuid>,

    /// Order the discount was applied to; opaque to this engine.
    pub order_uuid: Option<Uuid>,

    /// Order total (minor units) at redemption time.
    pub order_total: u64,

    /// Discount granted (minor units), never above `order_total`.
    pub discount_amount: u64,

    /// When the redemption was committed.
    pub redeemed_at: Timestamp,

    /// When the redemption was reversed, if it was.
    pub reversed_at: Option<Timestamp>,
}

/// What came out of a redemption attempt.
///
/// A failing check is a normal outcome for the caller to render, not a
/// service error.
#[derive(Debug, Clone, PartialEq)]
pub enum RedemptionOutcome {
    Redeemed(RedemptionRecord),
    Rejected(Rejection),
}

impl RedemptionOutcome {
    #[must_use]
    pub const fn is_redeemed(&self) -> bool {
        matches!(self, Self::Redeemed(_))
    }
}
