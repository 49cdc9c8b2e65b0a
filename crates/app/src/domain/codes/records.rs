//! Code Records

use jiff::Timestamp;
use uuid::Uuid;

use crate::{domain::campaigns::records::CampaignUuid, uuids::TypedUuid};

/// Code UUID
pub type CodeUuid = TypedUuid<CodeRecord>;

/// Generation Job UUID
pub type GenerationJobUuid = TypedUuid<GenerationJobRecord>;

/// Redeemability state of a single code.
///
/// `Used` is set automatically when a limited counter reaches zero;
/// `Inactive` is an operator action and can be undone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "code_status", rename_all = "snake_case")]
pub enum CodeStatus {
    Active,
    Inactive,
    Used,
}

impl CodeStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Used => "used",
        }
    }
}

impl std::fmt::Display for CodeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of a bulk generation job.
///
/// There is no separate cancelled state; cancellation marks the job `Failed`
/// with a descriptive reason, which the generator loop observes at the next
/// batch boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "generation_job_status", rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single coupon code belonging to a campaign.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeRecord {
    /// Unique identifier of the code.
    pub uuid: CodeUuid,

    /// Campaign the code belongs to.
    pub campaign_uuid: CampaignUuid,

    /// The code text as stored, always uppercase.
    pub code: String,

    /// Current redeemability state.
    pub status: CodeStatus,

    /// Remaining redemptions; `None` means unlimited.
    pub uses_remaining: Option<u64>,

    /// User the code is reserved for, if any.
    pub assigned_to: Option<Uuid>,

    /// When the assignment was stamped.
    pub assigned_at: Option<Timestamp>,

    /// First successful redemption.
    pub first_used_at: Option<Timestamp>,

    /// Most recent successful redemption.
    pub last_used_at: Option<Timestamp>,

    /// Creation timestamp.
    pub created_at: Timestamp,

    /// Last update timestamp.
    pub updated_at: Timestamp,
}

/// One row of a campaign code export.
///
/// `total_redemptions` counts every recorded redemption including reversed
/// ones, so the export doubles as an audit trail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeExportRow {
    pub code: String,
    pub status: CodeStatus,
    pub uses_remaining: Option<u64>,
    pub assigned_to: Option<Uuid>,
    pub first_used_at: Option<Timestamp>,
    pub last_used_at: Option<Timestamp>,
    pub total_redemptions: u64,
}

/// Progress record for one bulk code generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationJobRecord {
    /// Unique identifier of the job.
    pub uuid: GenerationJobUuid,

    /// Campaign codes are generated for.
    pub campaign_uuid: CampaignUuid,

    /// Number of codes asked for.
    pub quantity_requested: u64,

    /// Number of codes inserted so far, committed per batch.
    pub quantity_generated: u64,

    /// Current job state.
    pub status: JobStatus,

    /// Failure reason when the job ended `Failed`.
    pub error: Option<String>,

    /// When processing began.
    pub started_at: Option<Timestamp>,

    /// When the job reached a terminal state.
    pub completed_at: Option<Timestamp>,

    /// Creation timestamp.
    pub created_at: Timestamp,

    /// Last update timestamp.
    pub updated_at: Timestamp,
}
