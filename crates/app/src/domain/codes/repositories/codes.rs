//! Codes Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};
use uuid::Uuid;

use crate::domain::{
    campaigns::records::CampaignUuid,
    codes::{
        data::{CodeFilter, NewCode},
        records::{CodeExportRow, CodeRecord, CodeStatus, CodeUuid},
    },
};

const COLUMN_USES_REMAINING: &str = "uses_remaining";
const COLUMN_TOTAL_REDEMPTIONS: &str = "total_redemptions";

const INSERT_CODE_SQL: &str = include_str!("../sql/insert_code.sql");
const GET_CODE_SQL: &str = include_str!("../sql/get_code.sql");
const LIST_CODES_SQL: &str = include_str!("../sql/list_codes.sql");
const ASSIGN_CODE_SQL: &str = include_str!("../sql/assign_code.sql");
const SET_CODE_STATUS_SQL: &str = include_str!("../sql/set_code_status.sql");
const EXPORT_CODES_SQL: &str = include_str!("../sql/export_codes.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCodesRepository;

impl PgCodesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Inserts a code, returning `None` when the code text already exists in
    /// the campaign. Collisions are absorbed by `ON CONFLICT DO NOTHING` so
    /// concurrent generators never abort each other's transactions.
    pub(crate) async fn insert_code(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: NewCode,
    ) -> Result<Option<CodeRecord>, sqlx::Error> {
        let uses_remaining =
            try_optional_i64_from_u64(code.uses_remaining, COLUMN_USES_REMAINING)?;

        query_as::<Postgres, CodeRecord>(INSERT_CODE_SQL)
            .bind(code.uuid.into_uuid())
            .bind(code.campaign_uuid.into_uuid())
            .bind(code.code)
            .bind(uses_remaining)
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn get_code(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: CodeUuid,
    ) -> Result<CodeRecord, sqlx::Error> {
        query_as::<Postgres, CodeRecord>(GET_CODE_SQL)
            .bind(uuid.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_codes(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        campaign_uuid: CampaignUuid,
        filter: CodeFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<CodeRecord>, sqlx::Error> {
        query_as::<Postgres, CodeRecord>(LIST_CODES_SQL)
            .bind(campaign_uuid.into_uuid())
            .bind(filter.status)
            .bind(filter.assigned_to)
            .bind(limit)
            .bind(offset)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn assign_code(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: CodeUuid,
        user_uuid: Uuid,
    ) -> Result<CodeRecord, sqlx::Error> {
        query_as::<Postgres, CodeRecord>(ASSIGN_CODE_SQL)
            .bind(uuid.into_uuid())
            .bind(user_uuid)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn set_code_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: CodeUuid,
        status: CodeStatus,
    ) -> Result<CodeRecord, sqlx::Error> {
        query_as::<Postgres, CodeRecord>(SET_CODE_STATUS_SQL)
            .bind(uuid.into_uuid())
            .bind(status)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn export_codes(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        campaign_uuid: CampaignUuid,
    ) -> Result<Vec<CodeExportRow>, sqlx::Error> {
        query_as::<Postgres, CodeExportRow>(EXPORT_CODES_SQL)
            .bind(campaign_uuid.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }
}

fn try_optional_i64_from_u64(
    value: Option<u64>,
    column: &'static str,
) -> Result<Option<i64>, sqlx::Error> {
    value
        .map(|v| {
            i64::try_from(v).map_err(|e| sqlx::Error::ColumnDecode {
                index: column.to_string(),
                source: Box::new(e),
            })
        })
        .transpose()
}

fn try_optional_u64_from_i64(
    value: Option<i64>,
    column: &'static str,
) -> Result<Option<u64>, sqlx::Error> {
    value.map(|v| try_u64_from_i64(v, column)).transpose()
}

fn try_u64_from_i64(value: i64, column: &'static str) -> Result<u64, sqlx::Error> {
    u64::try_from(value).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

impl<'r> FromRow<'r, PgRow> for CodeRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: CodeUuid::from_uuid(row.try_get("uuid")?),
            campaign_uuid: CampaignUuid::from_uuid(row.try_get("campaign_uuid")?),
            code: row.try_get("code")?,
            status: row.try_get("status")?,
            uses_remaining: try_optional_u64_from_i64(
                row.try_get(COLUMN_USES_REMAINING)?,
                COLUMN_USES_REMAINING,
            )?,
            assigned_to: row.try_get("assigned_to")?,
            assigned_at: row
                .try_get::<Option<SqlxTimestamp>, _>("assigned_at")?
                .map(SqlxTimestamp::to_jiff),
            first_used_at: row
                .try_get::<Option<SqlxTimestamp>, _>("first_used_at")?
                .map(SqlxTimestamp::to_jiff),
            last_used_at: row
                .try_get::<Option<SqlxTimestamp>, _>("last_used_at")?
                .map(SqlxTimestamp::to_jiff),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for CodeExportRow {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            code: row.try_get("code")?,
            status: row.try_get("status")?,
            uses_remaining: try_optional_u64_from_i64(
                row.try_get(COLUMN_USES_REMAINING)?,
                COLUMN_USES_REMAINING,
            )?,
            assigned_to: row.try_get("assigned_to")?,
            first_used_at: row
                .try_get::<Option<SqlxTimestamp>, _>("first_used_at")?
                .map(SqlxTimestamp::to_jiff),
            last_used_at: row
                .try_get::<Option<SqlxTimestamp>, _>("last_used_at")?
                .map(SqlxTimestamp::to_jiff),
            total_redemptions: try_u64_from_i64(
                row.try_get(COLUMN_TOTAL_REDEMPTIONS)?,
                COLUMN_TOTAL_REDEMPTIONS,
            )?,
        })
    }
}
