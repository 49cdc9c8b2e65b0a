//! Codes Service

use async_trait::async_trait;
use mockall::automock;
use tracing::{Span, info};
use uuid::Uuid;

use crate::{
    database::Db,
    domain::{
        campaigns::{
            PgCampaignsRepository,
            records::{CampaignRecord, CampaignUuid},
        },
        codes::{
            CodesServiceError, PgCodesRepository, PgJobsRepository,
            data::{CodeFilter, NewCode, NewGenerationJob},
            generator,
            records::{
                CodeRecord, CodeStatus, CodeUuid, GenerationJobRecord, GenerationJobUuid,
                JobStatus,
            },
        },
        tenants::records::TenantUuid,
    },
};

/// Inserts per progress commit during bulk generation.
const GENERATION_BATCH_SIZE: u64 = 100;

/// Insert attempts allowed per requested code. Collisions against the
/// `(campaign_uuid, code)` constraint burn attempts without producing codes,
/// so a too-small code space exhausts the budget instead of looping forever.
const ATTEMPTS_PER_CODE: u64 = 3;

/// Draw attempts for a single ad-hoc code.
const SINGLE_CODE_ATTEMPTS: u32 = 3;

const CANCELLED_REASON: &str = "cancelled by operator";

#[derive(Debug, Clone)]
pub struct PgCodesService {
    db: Db,
    campaigns: PgCampaignsRepository,
    codes: PgCodesRepository,
    jobs: PgJobsRepository,
}

impl PgCodesService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            campaigns: PgCampaignsRepository::new(),
            codes: PgCodesRepository::new(),
            jobs: PgJobsRepository::new(),
        }
    }

    async fn load_job(
        &self,
        tenant: TenantUuid,
        uuid: GenerationJobUuid,
    ) -> Result<GenerationJobRecord, CodesServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let record = self.jobs.get_job(&mut tx, uuid).await?;

        tx.commit().await?;

        Ok(record)
    }

    /// Drives a generation job to a terminal state.
    ///
    /// Each batch runs in its own transaction and commits its progress, so a
    /// crash mid-run loses at most one uncommitted batch and leaves the job
    /// `Processing` for [`CodesService::resume_generation_job`]. The job
    /// status is re-read at every batch boundary; a concurrent cancel wins by
    /// flipping it away from `Processing`.
    async fn run_generation(
        &self,
        tenant: TenantUuid,
        job_uuid: GenerationJobUuid,
        campaign: &CampaignRecord,
    ) -> Result<GenerationJobRecord, CodesServiceError> {
        let settings = &campaign.code_settings;

        let Some(alphabet) = generator::alphabet_for(settings) else {
            let mut tx = self.db.begin_tenant_transaction(tenant).await?;
            self.jobs
                .cancel_job(&mut tx, job_uuid, "campaign has no usable code alphabet")
                .await?;
            tx.commit().await?;

            return self.load_job(tenant, job_uuid).await;
        };

        let mut tx = self.db.begin_tenant_transaction(tenant).await?;
        let job = self.jobs.start_job(&mut tx, job_uuid).await?;
        tx.commit().await?;

        let requested = job.quantity_requested;
        let mut generated = job.quantity_generated;

        let mut attempts: u64 = 0;
        let max_attempts = requested
            .saturating_sub(generated)
            .saturating_mul(ATTEMPTS_PER_CODE);

        while generated < requested && attempts < max_attempts {
            let mut tx = self.db.begin_tenant_transaction(tenant).await?;

            let status = self.jobs.get_job_status(&mut tx, job_uuid).await?;
            if status != JobStatus::Processing {
                info!(job_uuid = %job_uuid, %status, generated, "generation stopped by concurrent cancel");
                return self.load_job(tenant, job_uuid).await;
            }

            let draw_count = (requested - generated)
                .min(GENERATION_BATCH_SIZE)
                .min(max_attempts - attempts);

            for code in generator::draw_codes(settings, alphabet, draw_count) {
                attempts += 1;

                let inserted = self
                    .codes
                    .insert_code(
                        &mut tx,
                        NewCode {
                            uuid: CodeUuid::new(),
                            campaign_uuid: campaign.uuid,
                            code,
                            uses_remaining: campaign.max_uses_total,
                        },
                    )
                    .await?;

                if inserted.is_some() {
                    generated += 1;
                }
            }

            self.jobs
                .update_job_progress(&mut tx, job_uuid, generated)
                .await?;

            tx.commit().await?;
        }

        let (status, error) = if generated >= requested {
            (JobStatus::Completed, None)
        } else {
            (
                JobStatus::Failed,
                Some(format!(
                    "drew {attempts} candidates but only {generated} of {requested} were unique; \
                     the campaign's code space may be too small"
                )),
            )
        };

        let mut tx = self.db.begin_tenant_transaction(tenant).await?;
        let finished = self
            .jobs
            .finish_job(&mut tx, job_uuid, status, generated, error)
            .await?;
        tx.commit().await?;

        match finished {
            Some(record) => {
                info!(
                    job_uuid = %job_uuid,
                    status = %record.status,
                    generated = record.quantity_generated,
                    requested = record.quantity_requested,
                    "generation job finished"
                );
                Ok(record)
            }
            // A cancel landed after the last batch; its terminal state stands.
            None => self.load_job(tenant, job_uuid).await,
        }
    }
}

#[async_trait]
impl CodesService for PgCodesService {
    #[tracing::instrument(
        name = "codes.service.generate_codes",
        skip(self),
        fields(tenant_uuid = %tenant, campaign_uuid = %campaign_uuid, job_uuid = tracing::field::Empty),
        err
    )]
    async fn generate_codes(
        &self,
        tenant: TenantUuid,
        campaign_uuid: CampaignUuid,
        quantity: u64,
    ) -> Result<GenerationJobRecord, CodesServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let campaign = self.campaigns.get_campaign(&mut tx, campaign_uuid).await?;

        let job = self
            .jobs
            .create_job(
                &mut tx,
                NewGenerationJob {
                    uuid: GenerationJobUuid::new(),
                    campaign_uuid,
                    quantity_requested: quantity,
                },
            )
            .await?;

        tx.commit().await?;

        Span::current().record("job_uuid", tracing::field::display(job.uuid));
        info!(job_uuid = %job.uuid, quantity, "created generation job");

        self.run_generation(tenant, job.uuid, &campaign).await
    }

    #[tracing::instrument(
        name = "codes.service.resume_generation_job",
        skip(self),
        fields(tenant_uuid = %tenant, job_uuid = %uuid),
        err
    )]
    async fn resume_generation_job(
        &self,
        tenant: TenantUuid,
        uuid: GenerationJobUuid,
    ) -> Result<GenerationJobRecord, CodesServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let job = self.jobs.get_job(&mut tx, uuid).await?;

        if job.status != JobStatus::Processing {
            return Err(CodesServiceError::JobNotResumable { status: job.status });
        }

        let campaign = self.campaigns.get_campaign(&mut tx, job.campaign_uuid).await?;

        tx.commit().await?;

        info!(job_uuid = %uuid, generated = job.quantity_generated, "resuming generation job");

        self.run_generation(tenant, uuid, &campaign).await
    }

    #[tracing::instrument(
        name = "codes.service.cancel_generation_job",
        skip(self),
        fields(tenant_uuid = %tenant, job_uuid = %uuid),
        err
    )]
    async fn cancel_generation_job(
        &self,
        tenant: TenantUuid,
        uuid: GenerationJobUuid,
    ) -> Result<GenerationJobRecord, CodesServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let cancelled = self.jobs.cancel_job(&mut tx, uuid, CANCELLED_REASON).await?;

        let Some(record) = cancelled else {
            // Either the job does not exist or it already reached a terminal
            // state; look again to tell the two apart.
            let job = self.jobs.get_job(&mut tx, uuid).await?;
            return Err(CodesServiceError::JobNotCancellable { status: job.status });
        };

        tx.commit().await?;

        info!(job_uuid = %uuid, "cancelled generation job");

        Ok(record)
    }

    #[tracing::instrument(
        name = "codes.service.get_generation_job",
        skip(self),
        fields(tenant_uuid = %tenant, job_uuid = %uuid),
        err
    )]
    async fn get_generation_job(
        &self,
        tenant: TenantUuid,
        uuid: GenerationJobUuid,
    ) -> Result<GenerationJobRecord, CodesServiceError> {
        self.load_job(tenant, uuid).await
    }

    #[tracing::instrument(
        name = "codes.service.create_single_code",
        skip(self, custom_code),
        fields(tenant_uuid = %tenant, campaign_uuid = %campaign_uuid),
        err
    )]
    async fn create_single_code(
        &self,
        tenant: TenantUuid,
        campaign_uuid: CampaignUuid,
        custom_code: Option<String>,
    ) -> Result<CodeRecord, CodesServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let campaign = self.campaigns.get_campaign(&mut tx, campaign_uuid).await?;

        let record = if let Some(custom) = custom_code {
            let code = generator::normalize_code(&custom);

            self.codes
                .insert_code(
                    &mut tx,
                    NewCode {
                        uuid: CodeUuid::new(),
                        campaign_uuid,
                        code: code.clone(),
                        uses_remaining: campaign.max_uses_total,
                    },
                )
                .await?
                .ok_or(CodesServiceError::CodeAlreadyExists { code })?
        } else {
            let settings = &campaign.code_settings;
            let Some(alphabet) = generator::alphabet_for(settings) else {
                return Err(CodesServiceError::InvalidData);
            };

            let mut inserted = None;
            for _ in 0..SINGLE_CODE_ATTEMPTS {
                let drawn = self
                    .codes
                    .insert_code(
                        &mut tx,
                        NewCode {
                            uuid: CodeUuid::new(),
                            campaign_uuid,
                            code: generator::draw_code(settings, alphabet),
                            uses_remaining: campaign.max_uses_total,
                        },
                    )
                    .await?;

                if let Some(record) = drawn {
                    inserted = Some(record);
                    break;
                }
            }

            inserted.ok_or(CodesServiceError::AttemptsExhausted {
                attempts: SINGLE_CODE_ATTEMPTS,
            })?
        };

        tx.commit().await?;

        info!(code_uuid = %record.uuid, code = %record.code, "created code");

        Ok(record)
    }

    #[tracing::instrument(
        name = "codes.service.assign_code",
        skip(self),
        fields(tenant_uuid = %tenant, code_uuid = %uuid, user_uuid = %user_uuid),
        err
    )]
    async fn assign_code(
        &self,
        tenant: TenantUuid,
        uuid: CodeUuid,
        user_uuid: Uuid,
    ) -> Result<CodeRecord, CodesServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let record = self.codes.assign_code(&mut tx, uuid, user_uuid).await?;

        tx.commit().await?;

        info!(code_uuid = %uuid, "assigned code");

        Ok(record)
    }

    #[tracing::instrument(
        name = "codes.service.deactivate_code",
        skip(self),
        fields(tenant_uuid = %tenant, code_uuid = %uuid),
        err
    )]
    async fn deactivate_code(
        &self,
        tenant: TenantUuid,
        uuid: CodeUuid,
    ) -> Result<CodeRecord, CodesServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let record = self
            .codes
            .set_code_status(&mut tx, uuid, CodeStatus::Inactive)
            .await?;

        tx.commit().await?;

        info!(code_uuid = %uuid, "deactivated code");

        Ok(record)
    }

    #[tracing::instrument(
        name = "codes.service.reactivate_code",
        skip(self),
        fields(tenant_uuid = %tenant, code_uuid = %uuid),
        err
    )]
    async fn reactivate_code(
        &self,
        tenant: TenantUuid,
        uuid: CodeUuid,
    ) -> Result<CodeRecord, CodesServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let record = self
            .codes
            .set_code_status(&mut tx, uuid, CodeStatus::Active)
            .await?;

        tx.commit().await?;

        info!(code_uuid = %uuid, "reactivated code");

        Ok(record)
    }

    #[tracing::instrument(
        name = "codes.service.get_code",
        skip(self),
        fields(tenant_uuid = %tenant, code_uuid = %uuid),
        err
    )]
    async fn get_code(
        &self,
        tenant: TenantUuid,
        uuid: CodeUuid,
    ) -> Result<CodeRecord, CodesServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let record = self.codes.get_code(&mut tx, uuid).await?;

        tx.commit().await?;

        Ok(record)
    }

    #[tracing::instrument(
        name = "codes.service.list_codes",
        skip(self),
        fields(tenant_uuid = %tenant, campaign_uuid = %campaign_uuid),
        err
    )]
    async fn list_codes(
        &self,
        tenant: TenantUuid,
        campaign_uuid: CampaignUuid,
        filter: CodeFilter,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<CodeRecord>, CodesServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let records = self
            .codes
            .list_codes(
                &mut tx,
                campaign_uuid,
                filter,
                i64::from(limit),
                i64::from(offset),
            )
            .await?;

        tx.commit().await?;

        Ok(records)
    }

    #[tracing::instrument(
        name = "codes.service.export_codes_csv",
        skip(self),
        fields(tenant_uuid = %tenant, campaign_uuid = %campaign_uuid),
        err
    )]
    async fn export_codes_csv(
        &self,
        tenant: TenantUuid,
        campaign_uuid: CampaignUuid,
    ) -> Result<String, CodesServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        // Unknown campaigns surface NotFound rather than an empty document.
        self.campaigns.get_campaign(&mut tx, campaign_uuid).await?;

        let rows = self.codes.export_codes(&mut tx, campaign_uuid).await?;

        tx.commit().await?;

        let mut csv = String::from(CSV_HEADER);
        csv.push('\n');

        for row in rows {
            let uses_remaining = row
                .uses_remaining
                .map_or_else(|| "unlimited".to_string(), |n| n.to_string());
            let assigned_to = row.assigned_to.map(|u| u.to_string()).unwrap_or_default();
            let first_used_at = row.first_used_at.map(|t| t.to_string()).unwrap_or_default();
            let last_used_at = row.last_used_at.map(|t| t.to_string()).unwrap_or_default();

            csv.push_str(&format!(
                "{},{},{uses_remaining},{assigned_to},{first_used_at},{last_used_at},{}\n",
                csv_field(&row.code),
                row.status,
                row.total_redemptions,
            ));
        }

        Ok(csv)
    }
}

const CSV_HEADER: &str =
    "code,status,uses_remaining,assigned_to,first_used_at,last_used_at,total_redemptions";

/// Quotes a field when it contains a delimiter, quote or line break. Only the
/// code column can need this, via custom alphabets or prefixes.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[automock]
#[async_trait]
/// Code minting, bulk generation jobs and exports.
pub trait CodesService: Send + Sync {
    /// Generates `quantity` unique codes for a campaign, driving the job to a
    /// terminal state before returning it. A partially filled campaign is
    /// reported through the job record, not as an error.
    async fn generate_codes(
        &self,
        tenant: TenantUuid,
        campaign_uuid: CampaignUuid,
        quantity: u64,
    ) -> Result<GenerationJobRecord, CodesServiceError>;

    /// Continues a `Processing` job from its committed progress count.
    async fn resume_generation_job(
        &self,
        tenant: TenantUuid,
        uuid: GenerationJobUuid,
    ) -> Result<GenerationJobRecord, CodesServiceError>;

    /// Marks a pending or processing job failed with a cancellation reason.
    async fn cancel_generation_job(
        &self,
        tenant: TenantUuid,
        uuid: GenerationJobUuid,
    ) -> Result<GenerationJobRecord, CodesServiceError>;

    /// Fetches one generation job.
    async fn get_generation_job(
        &self,
        tenant: TenantUuid,
        uuid: GenerationJobUuid,
    ) -> Result<GenerationJobRecord, CodesServiceError>;

    /// Mints one code, either caller-supplied (normalised, must be unique in
    /// the campaign) or drawn from the campaign's alphabet.
    async fn create_single_code(
        &self,
        tenant: TenantUuid,
        campaign_uuid: CampaignUuid,
        custom_code: Option<String>,
    ) -> Result<CodeRecord, CodesServiceError>;

    /// Reserves a code for one user.
    async fn assign_code(
        &self,
        tenant: TenantUuid,
        uuid: CodeUuid,
        user_uuid: Uuid,
    ) -> Result<CodeRecord, CodesServiceError>;

    /// Flips a code to `Inactive`.
    async fn deactivate_code(
        &self,
        tenant: TenantUuid,
        uuid: CodeUuid,
    ) -> Result<CodeRecord, CodesServiceError>;

    /// Flips a code back to `Active`.
    async fn reactivate_code(
        &self,
        tenant: TenantUuid,
        uuid: CodeUuid,
    ) -> Result<CodeRecord, CodesServiceError>;

    /// Fetches one code by identifier.
    async fn get_code(
        &self,
        tenant: TenantUuid,
        uuid: CodeUuid,
    ) -> Result<CodeRecord, CodesServiceError>;

    /// Lists a campaign's codes, newest first.
    async fn list_codes(
        &self,
        tenant: TenantUuid,
        campaign_uuid: CampaignUuid,
        filter: CodeFilter,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<CodeRecord>, CodesServiceError>;

    /// Renders every code of a campaign as CSV, one line per code.
    async fn export_codes_csv(
        &self,
        tenant: TenantUuid,
        campaign_uuid: CampaignUuid,
    ) -> Result<String, CodesServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;
    use uuid::Uuid;

    use crate::{
        domain::campaigns::{
            CampaignsService,
            data::codes::{CodeFormat, CodeSettings},
        },
        test::{TestContext, helpers::percent_campaign},
    };

    use super::*;

    const AMBIGUOUS_CHARS: &str = "0O1IL";

    async fn code_count(ctx: &TestContext, campaign_uuid: CampaignUuid) -> (i64, i64) {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM coupon_codes WHERE campaign_uuid = $1")
                .bind(campaign_uuid.into_uuid())
                .fetch_one(ctx.db.pool())
                .await
                .unwrap();

        let distinct: i64 = sqlx::query_scalar(
            "SELECT COUNT(DISTINCT code) FROM coupon_codes WHERE campaign_uuid = $1",
        )
        .bind(campaign_uuid.into_uuid())
        .fetch_one(ctx.db.pool())
        .await
        .unwrap();

        (total, distinct)
    }

    #[tokio::test]
    async fn generate_codes_creates_requested_quantity() -> TestResult {
        let ctx = TestContext::new().await;

        let campaign = ctx
            .campaigns
            .create_campaign(ctx.tenant_uuid, percent_campaign("Bulk", 10))
            .await?;

        // More than one progress batch.
        let job = ctx
            .codes
            .generate_codes(ctx.tenant_uuid, campaign.uuid, 150)
            .await?;

        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.quantity_requested, 150);
        assert_eq!(job.quantity_generated, 150);
        assert!(job.error.is_none());
        assert!(job.started_at.is_some());
        assert!(job.completed_at.is_some());

        let (total, distinct) = code_count(&ctx, campaign.uuid).await;
        assert_eq!(total, 150);
        assert_eq!(distinct, 150, "every generated code is unique");

        Ok(())
    }

    #[tokio::test]
    async fn generated_codes_follow_campaign_settings() -> TestResult {
        let ctx = TestContext::new().await;

        let mut new = percent_campaign("Shaped", 10);
        new.code_settings = CodeSettings {
            prefix: Some("SUMMER-".to_string()),
            suffix: Some("-24".to_string()),
            length: 6,
            ..CodeSettings::default()
        };

        let campaign = ctx.campaigns.create_campaign(ctx.tenant_uuid, new).await?;

        ctx.codes
            .generate_codes(ctx.tenant_uuid, campaign.uuid, 5)
            .await?;

        let codes = ctx
            .codes
            .list_codes(ctx.tenant_uuid, campaign.uuid, CodeFilter::default(), 50, 0)
            .await?;

        assert_eq!(codes.len(), 5);

        for record in codes {
            assert!(
                record.code.starts_with("SUMMER-"),
                "code {} misses the prefix",
                record.code
            );
            assert!(
                record.code.ends_with("-24"),
                "code {} misses the suffix",
                record.code
            );

            let body = record
                .code
                .strip_prefix("SUMMER-")
                .and_then(|c| c.strip_suffix("-24"))
                .unwrap();

            assert_eq!(body.chars().count(), 6);
            assert!(
                body.chars().all(|c| !AMBIGUOUS_CHARS.contains(c)),
                "code body {body} contains an ambiguous character"
            );
        }

        Ok(())
    }

    #[tokio::test]
    async fn generate_codes_copies_campaign_use_budget() -> TestResult {
        let ctx = TestContext::new().await;

        let mut new = percent_campaign("Budgeted", 10);
        new.max_uses_total = Some(3);

        let campaign = ctx.campaigns.create_campaign(ctx.tenant_uuid, new).await?;

        ctx.codes
            .generate_codes(ctx.tenant_uuid, campaign.uuid, 2)
            .await?;

        let codes = ctx
            .codes
            .list_codes(ctx.tenant_uuid, campaign.uuid, CodeFilter::default(), 50, 0)
            .await?;

        assert!(
            codes.iter().all(|c| c.uses_remaining == Some(3)),
            "codes inherit the campaign's per-code budget"
        );

        Ok(())
    }

    #[tokio::test]
    async fn generate_codes_exhausting_code_space_fails_with_partial_count() -> TestResult {
        let ctx = TestContext::new().await;

        // A one-letter alphabet of length one has exactly one possible code.
        let mut new = percent_campaign("Tiny Space", 10);
        new.code_settings = CodeSettings {
            format: CodeFormat::Custom,
            custom_alphabet: Some("A".to_string()),
            length: 1,
            ..CodeSettings::default()
        };

        let campaign = ctx.campaigns.create_campaign(ctx.tenant_uuid, new).await?;

        let job = ctx
            .codes
            .generate_codes(ctx.tenant_uuid, campaign.uuid, 3)
            .await?;

        assert_eq!(job.status, JobStatus::Failed);
        assert_eq!(job.quantity_generated, 1);
        assert!(
            job.error.as_deref().is_some_and(|e| e.contains("unique")),
            "failure reason should mention uniqueness, got {:?}",
            job.error
        );

        let (total, _) = code_count(&ctx, campaign.uuid).await;
        assert_eq!(total, 1);

        Ok(())
    }

    #[tokio::test]
    async fn concurrent_generation_jobs_yield_distinct_codes() -> TestResult {
        let ctx = TestContext::new().await;

        let campaign = ctx
            .campaigns
            .create_campaign(ctx.tenant_uuid, percent_campaign("Contended", 10))
            .await?;

        let (a, b) = tokio::join!(
            ctx.codes.generate_codes(ctx.tenant_uuid, campaign.uuid, 40),
            ctx.codes.generate_codes(ctx.tenant_uuid, campaign.uuid, 40),
        );

        assert_eq!(a?.status, JobStatus::Completed);
        assert_eq!(b?.status, JobStatus::Completed);

        let (total, distinct) = code_count(&ctx, campaign.uuid).await;
        assert_eq!(total, 80);
        assert_eq!(distinct, 80, "concurrent jobs never mint the same code");

        Ok(())
    }

    #[tokio::test]
    async fn cancel_pending_job_marks_it_failed() -> TestResult {
        let ctx = TestContext::new().await;

        let campaign = ctx
            .campaigns
            .create_campaign(ctx.tenant_uuid, percent_campaign("Cancelled", 10))
            .await?;

        // A pending job as left behind by a scheduler crash.
        let job_uuid = GenerationJobUuid::new();
        sqlx::query(
            "INSERT INTO code_generation_jobs \
                 (uuid, tenant_uuid, campaign_uuid, quantity_requested) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(job_uuid.into_uuid())
        .bind(ctx.tenant_uuid.into_uuid())
        .bind(campaign.uuid.into_uuid())
        .bind(25_i64)
        .execute(ctx.db.pool())
        .await?;

        let job = ctx
            .codes
            .cancel_generation_job(ctx.tenant_uuid, job_uuid)
            .await?;

        assert_eq!(job.status, JobStatus::Failed);
        assert_eq!(job.error.as_deref(), Some("cancelled by operator"));
        assert!(job.completed_at.is_some());

        Ok(())
    }

    #[tokio::test]
    async fn cancel_completed_job_returns_not_cancellable() -> TestResult {
        let ctx = TestContext::new().await;

        let campaign = ctx
            .campaigns
            .create_campaign(ctx.tenant_uuid, percent_campaign("Done", 10))
            .await?;

        let job = ctx
            .codes
            .generate_codes(ctx.tenant_uuid, campaign.uuid, 2)
            .await?;

        let result = ctx
            .codes
            .cancel_generation_job(ctx.tenant_uuid, job.uuid)
            .await;

        assert!(
            matches!(
                result,
                Err(CodesServiceError::JobNotCancellable {
                    status: JobStatus::Completed,
                })
            ),
            "expected JobNotCancellable, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn cancel_unknown_job_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx
            .codes
            .cancel_generation_job(ctx.tenant_uuid, GenerationJobUuid::new())
            .await;

        assert!(
            matches!(result, Err(CodesServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn resume_continues_processing_job_from_committed_count() -> TestResult {
        let ctx = TestContext::new().await;

        let campaign = ctx
            .campaigns
            .create_campaign(ctx.tenant_uuid, percent_campaign("Crashed", 10))
            .await?;

        // A processing job whose run died after committing 4 of 10 codes.
        // The codes themselves were lost with the uncommitted batch.
        let job_uuid = GenerationJobUuid::new();
        sqlx::query(
            "INSERT INTO code_generation_jobs \
                 (uuid, tenant_uuid, campaign_uuid, quantity_requested, quantity_generated, \
                  status, started_at) \
             VALUES ($1, $2, $3, $4, $5, 'processing', now())",
        )
        .bind(job_uuid.into_uuid())
        .bind(ctx.tenant_uuid.into_uuid())
        .bind(campaign.uuid.into_uuid())
        .bind(10_i64)
        .bind(4_i64)
        .execute(ctx.db.pool())
        .await?;

        let job = ctx
            .codes
            .resume_generation_job(ctx.tenant_uuid, job_uuid)
            .await?;

        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.quantity_generated, 10);

        let (total, _) = code_count(&ctx, campaign.uuid).await;
        assert_eq!(total, 6, "resume generates only the missing codes");

        Ok(())
    }

    #[tokio::test]
    async fn resume_completed_job_returns_not_resumable() -> TestResult {
        let ctx = TestContext::new().await;

        let campaign = ctx
            .campaigns
            .create_campaign(ctx.tenant_uuid, percent_campaign("Settled", 10))
            .await?;

        let job = ctx
            .codes
            .generate_codes(ctx.tenant_uuid, campaign.uuid, 2)
            .await?;

        let result = ctx
            .codes
            .resume_generation_job(ctx.tenant_uuid, job.uuid)
            .await;

        assert!(
            matches!(
                result,
                Err(CodesServiceError::JobNotResumable {
                    status: JobStatus::Completed,
                })
            ),
            "expected JobNotResumable, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn get_generation_job_returns_record() -> TestResult {
        let ctx = TestContext::new().await;

        let campaign = ctx
            .campaigns
            .create_campaign(ctx.tenant_uuid, percent_campaign("Lookup", 10))
            .await?;

        let job = ctx
            .codes
            .generate_codes(ctx.tenant_uuid, campaign.uuid, 3)
            .await?;

        let fetched = ctx
            .codes
            .get_generation_job(ctx.tenant_uuid, job.uuid)
            .await?;

        assert_eq!(fetched, job);

        Ok(())
    }

    #[tokio::test]
    async fn create_single_code_normalises_custom_codes() -> TestResult {
        let ctx = TestContext::new().await;

        let campaign = ctx
            .campaigns
            .create_campaign(ctx.tenant_uuid, percent_campaign("Custom Code", 10))
            .await?;

        let code = ctx
            .codes
            .create_single_code(
                ctx.tenant_uuid,
                campaign.uuid,
                Some("  welcome10  ".to_string()),
            )
            .await?;

        assert_eq!(code.code, "WELCOME10");
        assert_eq!(code.status, CodeStatus::Active);
        assert_eq!(code.uses_remaining, None);

        Ok(())
    }

    #[tokio::test]
    async fn create_single_code_duplicate_custom_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;

        let campaign = ctx
            .campaigns
            .create_campaign(ctx.tenant_uuid, percent_campaign("Duplicate", 10))
            .await?;

        ctx.codes
            .create_single_code(ctx.tenant_uuid, campaign.uuid, Some("VIP".to_string()))
            .await?;

        // Normalisation makes the lowercase spelling collide too.
        let result = ctx
            .codes
            .create_single_code(ctx.tenant_uuid, campaign.uuid, Some("vip".to_string()))
            .await;

        assert!(
            matches!(
                result,
                Err(CodesServiceError::CodeAlreadyExists { ref code }) if code == "VIP"
            ),
            "expected CodeAlreadyExists, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn create_single_code_draws_from_campaign_alphabet() -> TestResult {
        let ctx = TestContext::new().await;

        let mut new = percent_campaign("Drawn", 10);
        new.code_settings = CodeSettings {
            format: CodeFormat::Numeric,
            length: 10,
            ..CodeSettings::default()
        };

        let campaign = ctx.campaigns.create_campaign(ctx.tenant_uuid, new).await?;

        let code = ctx
            .codes
            .create_single_code(ctx.tenant_uuid, campaign.uuid, None)
            .await?;

        assert_eq!(code.code.chars().count(), 10);
        assert!(
            code.code.chars().all(|c| c.is_ascii_digit()),
            "numeric campaign drew non-digit code {}",
            code.code
        );

        Ok(())
    }

    #[tokio::test]
    async fn assign_code_stamps_user_and_time() -> TestResult {
        let ctx = TestContext::new().await;

        let campaign = ctx
            .campaigns
            .create_campaign(ctx.tenant_uuid, percent_campaign("Assign", 10))
            .await?;

        let code = ctx
            .codes
            .create_single_code(ctx.tenant_uuid, campaign.uuid, None)
            .await?;

        let user_uuid = Uuid::now_v7();

        let assigned = ctx
            .codes
            .assign_code(ctx.tenant_uuid, code.uuid, user_uuid)
            .await?;

        assert_eq!(assigned.assigned_to, Some(user_uuid));
        assert!(assigned.assigned_at.is_some());

        Ok(())
    }

    #[tokio::test]
    async fn deactivate_then_reactivate_code() -> TestResult {
        let ctx = TestContext::new().await;

        let campaign = ctx
            .campaigns
            .create_campaign(ctx.tenant_uuid, percent_campaign("Toggle", 10))
            .await?;

        let code = ctx
            .codes
            .create_single_code(ctx.tenant_uuid, campaign.uuid, None)
            .await?;

        let inactive = ctx
            .codes
            .deactivate_code(ctx.tenant_uuid, code.uuid)
            .await?;
        assert_eq!(inactive.status, CodeStatus::Inactive);

        let active = ctx
            .codes
            .reactivate_code(ctx.tenant_uuid, code.uuid)
            .await?;
        assert_eq!(active.status, CodeStatus::Active);

        Ok(())
    }

    #[tokio::test]
    async fn list_codes_filters_by_status_and_assignment() -> TestResult {
        let ctx = TestContext::new().await;

        let campaign = ctx
            .campaigns
            .create_campaign(ctx.tenant_uuid, percent_campaign("Filtered", 10))
            .await?;

        let first = ctx
            .codes
            .create_single_code(ctx.tenant_uuid, campaign.uuid, Some("FIRST".to_string()))
            .await?;
        let second = ctx
            .codes
            .create_single_code(ctx.tenant_uuid, campaign.uuid, Some("SECOND".to_string()))
            .await?;
        ctx.codes
            .create_single_code(ctx.tenant_uuid, campaign.uuid, Some("THIRD".to_string()))
            .await?;

        ctx.codes
            .deactivate_code(ctx.tenant_uuid, first.uuid)
            .await?;

        let user_uuid = Uuid::now_v7();
        ctx.codes
            .assign_code(ctx.tenant_uuid, second.uuid, user_uuid)
            .await?;

        let all = ctx
            .codes
            .list_codes(ctx.tenant_uuid, campaign.uuid, CodeFilter::default(), 50, 0)
            .await?;
        assert_eq!(all.len(), 3);

        let inactive = ctx
            .codes
            .list_codes(
                ctx.tenant_uuid,
                campaign.uuid,
                CodeFilter {
                    status: Some(CodeStatus::Inactive),
                    ..CodeFilter::default()
                },
                50,
                0,
            )
            .await?;
        assert_eq!(
            inactive.iter().map(|c| c.uuid).collect::<Vec<_>>(),
            vec![first.uuid]
        );

        let assigned = ctx
            .codes
            .list_codes(
                ctx.tenant_uuid,
                campaign.uuid,
                CodeFilter {
                    assigned_to: Some(user_uuid),
                    ..CodeFilter::default()
                },
                50,
                0,
            )
            .await?;
        assert_eq!(
            assigned.iter().map(|c| c.uuid).collect::<Vec<_>>(),
            vec![second.uuid]
        );

        Ok(())
    }

    #[tokio::test]
    async fn export_codes_csv_renders_unlimited_counters() -> TestResult {
        let ctx = TestContext::new().await;

        let campaign = ctx
            .campaigns
            .create_campaign(ctx.tenant_uuid, percent_campaign("Export", 10))
            .await?;

        ctx.codes
            .create_single_code(ctx.tenant_uuid, campaign.uuid, Some("EXPORTME".to_string()))
            .await?;

        let csv = ctx
            .codes
            .export_codes_csv(ctx.tenant_uuid, campaign.uuid)
            .await?;

        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("code,status,uses_remaining,assigned_to,first_used_at,last_used_at,total_redemptions")
        );
        assert_eq!(lines.next(), Some("EXPORTME,active,unlimited,,,,0"));
        assert_eq!(lines.next(), None);

        Ok(())
    }

    #[tokio::test]
    async fn export_codes_csv_renders_remaining_uses() -> TestResult {
        let ctx = TestContext::new().await;

        let mut new = percent_campaign("Limited Export", 10);
        new.max_uses_total = Some(5);

        let campaign = ctx.campaigns.create_campaign(ctx.tenant_uuid, new).await?;

        ctx.codes
            .create_single_code(ctx.tenant_uuid, campaign.uuid, Some("FIVELEFT".to_string()))
            .await?;

        let csv = ctx
            .codes
            .export_codes_csv(ctx.tenant_uuid, campaign.uuid)
            .await?;

        assert!(
            csv.lines().any(|l| l == "FIVELEFT,active,5,,,,0"),
            "expected a line with 5 remaining uses, got:\n{csv}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn export_codes_csv_unknown_campaign_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx
            .codes
            .export_codes_csv(ctx.tenant_uuid, CampaignUuid::new())
            .await;

        assert!(
            matches!(result, Err(CodesServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn codes_are_isolated_per_tenant() -> TestResult {
        let ctx = TestContext::new().await;

        let campaign = ctx
            .campaigns
            .create_campaign(ctx.tenant_uuid, percent_campaign("Tenant A Codes", 10))
            .await?;

        let code = ctx
            .codes
            .create_single_code(ctx.tenant_uuid, campaign.uuid, Some("SECRET".to_string()))
            .await?;

        let other_tenant = ctx.create_tenant("Other Stores").await;

        let listed = ctx
            .codes
            .list_codes(other_tenant, campaign.uuid, CodeFilter::default(), 50, 0)
            .await?;
        assert!(listed.is_empty(), "other tenant sees no codes");

        let result = ctx.codes.get_code(other_tenant, code.uuid).await;
        assert!(
            matches!(result, Err(CodesServiceError::NotFound)),
            "expected NotFound across tenants, got {result:?}"
        );

        Ok(())
    }
}
