//! Code Responses

use std::string::ToString;

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tessera_app::domain::codes::records::CodeRecord;

/// Code Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CodeResponse {
    /// The unique identifier of the code
    pub uuid: Uuid,

    /// Campaign the code belongs to
    pub campaign_uuid: Uuid,

    /// The code text as stored, always uppercase
    pub code: String,

    /// Redeemability state (active, inactive, used)
    pub status: String,

    /// Remaining redemptions; omitted means unlimited
    pub uses_remaining: Option<u64>,

    /// User the code is reserved for, if any
    pub assigned_to: Option<Uuid>,

    /// When the assignment was stamped
    pub assigned_at: Option<String>,

    /// First successful redemption
    pub first_used_at: Option<String>,

    /// Most recent successful redemption
    pub last_used_at: Option<String>,

    /// The date and time the code was created
    pub created_at: String,

    /// The date and time the code was last updated
    pub updated_at: String,
}

impl From<CodeRecord> for CodeResponse {
    fn from(code: CodeRecord) -> Self {
        CodeResponse {
            uuid: code.uuid.into(),
            campaign_uuid: code.campaign_uuid.into(),
            code: code.code,
            status: code.status.to_string(),
            uses_remaining: code.uses_remaining,
            assigned_to: code.assigned_to,
            assigned_at: code.assigned_at.as_ref().map(ToString::to_string),
            first_used_at: code.first_used_at.as_ref().map(ToString::to_string),
            last_used_at: code.last_used_at.as_ref().map(ToString::to_string),
            created_at: code.created_at.to_string(),
            updated_at: code.updated_at.to_string(),
        }
    }
}
