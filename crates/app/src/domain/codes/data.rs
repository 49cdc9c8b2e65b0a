//! Codes Data

use uuid::Uuid;

use crate::domain::{
    campaigns::records::CampaignUuid,
    codes::records::{CodeStatus, CodeUuid, GenerationJobUuid},
};

/// Payload for inserting one code row.
///
/// Insertion is guarded by the `(campaign_uuid, code)` uniqueness constraint;
/// the repository reports a conflict instead of failing so the generator can
/// count collisions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCode {
    pub uuid: CodeUuid,
    pub campaign_uuid: CampaignUuid,
    pub code: String,
    pub uses_remaining: Option<u64>,
}

/// Payload for creating a bulk generation job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewGenerationJob {
    pub uuid: GenerationJobUuid,
    pub campaign_uuid: CampaignUuid,
    pub quantity_requested: u64,
}

/// Narrowing filters for code listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CodeFilter {
    pub status: Option<CodeStatus>,
    pub assigned_to: Option<Uuid>,
}
