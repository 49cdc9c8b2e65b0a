//! Validation Records

use jiff::Timestamp;
use uuid::Uuid;

use crate::{
    domain::{
        campaigns::records::CampaignRecord,
        codes::records::{CodeRecord, CodeUuid},
    },
    uuids::TypedUuid,
};

/// Validation Attempt UUID
pub type ValidationAttemptUuid = TypedUuid<ValidationAttemptRecord>;

/// A submitted code string resolved to its code row and owning campaign.
///
/// When the same text exists in more than one campaign of a tenant, the
/// lookup prefers a code whose campaign is active, then the newest code.
#[derive(Debug, Clone)]
pub struct ResolvedCode {
    pub code: CodeRecord,
    pub campaign: CampaignRecord,
}

/// One audit row per validation call, successful or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationAttemptRecord {
    /// Unique identifier of the attempt.
    pub uuid: ValidationAttemptUuid,

    /// The matched code; absent when the entered text resolved to nothing.
    pub code_uuid: Option<CodeUuid>,

    /// What the caller submitted, normalised.
    pub code_entered: String,

    /// User the attempt was made for, if known.
    pub user_uuid: Option<Uuid>,

    /// Cart total (minor units) at attempt time.
    pub cart_total: Option<u64>,

    /// Whether the chain accepted the code.
    pub is_valid: bool,

    /// Machine rejection code when invalid.
    pub rejection: Option<String>,

    /// When the attempt was logged.
    pub attempted_at: Timestamp,
}
