//! Generation Jobs Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::domain::{
    campaigns::records::CampaignUuid,
    codes::{
        data::NewGenerationJob,
        records::{GenerationJobRecord, GenerationJobUuid, JobStatus},
    },
};

const COLUMN_QUANTITY_REQUESTED: &str = "quantity_requested";
const COLUMN_QUANTITY_GENERATED: &str = "quantity_generated";

const CREATE_JOB_SQL: &str = include_str!("../sql/create_job.sql");
const GET_JOB_SQL: &str = include_str!("../sql/get_job.sql");
const GET_JOB_STATUS_SQL: &str = include_str!("../sql/get_job_status.sql");
const START_JOB_SQL: &str = include_str!("../sql/start_job.sql");
const UPDATE_JOB_PROGRESS_SQL: &str = include_str!("../sql/update_job_progress.sql");
const FINISH_JOB_SQL: &str = include_str!("../sql/finish_job.sql");
const CANCEL_JOB_SQL: &str = include_str!("../sql/cancel_job.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgJobsRepository;

impl PgJobsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_job(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        job: NewGenerationJob,
    ) -> Result<GenerationJobRecord, sqlx::Error> {
        let quantity_requested =
            try_i64_from_u64(job.quantity_requested, COLUMN_QUANTITY_REQUESTED)?;

        query_as::<Postgres, GenerationJobRecord>(CREATE_JOB_SQL)
            .bind(job.uuid.into_uuid())
            .bind(job.campaign_uuid.into_uuid())
            .bind(quantity_requested)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_job(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: GenerationJobUuid,
    ) -> Result<GenerationJobRecord, sqlx::Error> {
        query_as::<Postgres, GenerationJobRecord>(GET_JOB_SQL)
            .bind(uuid.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_job_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: GenerationJobUuid,
    ) -> Result<JobStatus, sqlx::Error> {
        let (status,): (JobStatus,) = query_as(GET_JOB_STATUS_SQL)
            .bind(uuid.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        Ok(status)
    }

    pub(crate) async fn start_job(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: GenerationJobUuid,
    ) -> Result<GenerationJobRecord, sqlx::Error> {
        query_as::<Postgres, GenerationJobRecord>(START_JOB_SQL)
            .bind(uuid.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_job_progress(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: GenerationJobUuid,
        quantity_generated: u64,
    ) -> Result<(), sqlx::Error> {
        let quantity_generated =
            try_i64_from_u64(quantity_generated, COLUMN_QUANTITY_GENERATED)?;

        query(UPDATE_JOB_PROGRESS_SQL)
            .bind(uuid.into_uuid())
            .bind(quantity_generated)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    /// Moves a `Processing` job to a terminal state. Returns `None` when the
    /// job is no longer `Processing`, which happens when a cancellation won
    /// the race.
    pub(crate) async fn finish_job(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: GenerationJobUuid,
        status: JobStatus,
        quantity_generated: u64,
        error: Option<String>,
    ) -> Result<Option<GenerationJobRecord>, sqlx::Error> {
        let quantity_generated =
            try_i64_from_u64(quantity_generated, COLUMN_QUANTITY_GENERATED)?;

        query_as::<Postgres, GenerationJobRecord>(FINISH_JOB_SQL)
            .bind(uuid.into_uuid())
            .bind(status)
            .bind(quantity_generated)
            .bind(error)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Fails a `Pending` or `Processing` job. Returns `None` when the job is
    /// already terminal.
    pub(crate) async fn cancel_job(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: GenerationJobUuid,
        reason: &str,
    ) -> Result<Option<GenerationJobRecord>, sqlx::Error> {
        query_as::<Postgres, GenerationJobRecord>(CANCEL_JOB_SQL)
            .bind(uuid.into_uuid())
            .bind(reason)
            .fetch_optional(&mut **tx)
            .await
    }
}

fn try_i64_from_u64(value: u64, column: &'static str) -> Result<i64, sqlx::Error> {
    i64::try_from(value).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

fn try_u64_from_i64(value: i64, column: &'static str) -> Result<u64, sqlx::Error> {
    u64::try_from(value).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

impl<'r> FromRow<'r, PgRow> for GenerationJobRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: GenerationJobUuid::from_uuid(row.try_get("uuid")?),
            campaign_uuid: CampaignUuid::from_uuid(row.try_get("campaign_uuid")?),
            quantity_requested: try_u64_from_i64(
                row.try_get(COLUMN_QUANTITY_REQUESTED)?,
                COLUMN_QUANTITY_REQUESTED,
            )?,
            quantity_generated: try_u64_from_i64(
                row.try_get(COLUMN_QUANTITY_GENERATED)?,
                COLUMN_QUANTITY_GENERATED,
            )?,
            status: row.try_get("status")?,
            error: row.try_get("error")?,
            started_at: row
                .try_get::<Option<SqlxTimestamp>, _>("started_at")?
                .map(SqlxTimestamp::to_jiff),
            completed_at: row
                .try_get::<Option<SqlxTimestamp>, _>("completed_at")?
                .map(SqlxTimestamp::to_jiff),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
