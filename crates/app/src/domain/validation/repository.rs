//! Validation Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as, query_scalar};
use uuid::Uuid;

use crate::domain::{
    codes::records::{CodeRecord, CodeUuid},
    validation::{
        data::NewValidationAttempt,
        records::{ValidationAttemptRecord, ValidationAttemptUuid},
    },
};

const COLUMN_CART_TOTAL: &str = "cart_total";

const GET_CODE_BY_TEXT_SQL: &str = include_str!("sql/get_code_by_text.sql");
const COUNT_USER_REDEMPTIONS_SQL: &str = include_str!("sql/count_user_redemptions.sql");
const INSERT_ATTEMPT_SQL: &str = include_str!("sql/insert_attempt.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgValidationRepository;

impl PgValidationRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Resolves entered code text to a code row, skipping codes whose
    /// campaign was soft-deleted. When the same text exists in several
    /// campaigns the lookup prefers one whose campaign is active, then the
    /// newest code.
    pub(crate) async fn get_code_by_text(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: &str,
    ) -> Result<Option<CodeRecord>, sqlx::Error> {
        query_as::<Postgres, CodeRecord>(GET_CODE_BY_TEXT_SQL)
            .bind(code)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Non-reversed redemptions of one code by one user.
    pub(crate) async fn count_user_redemptions(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code_uuid: CodeUuid,
        user_uuid: Uuid,
    ) -> Result<u64, sqlx::Error> {
        let count: i64 = query_scalar(COUNT_USER_REDEMPTIONS_SQL)
            .bind(code_uuid.into_uuid())
            .bind(user_uuid)
            .fetch_one(&mut **tx)
            .await?;

        try_u64_from_i64(count, "count")
    }

    pub(crate) async fn insert_attempt(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        attempt: NewValidationAttempt,
    ) -> Result<ValidationAttemptRecord, sqlx::Error> {
        let cart_total = try_optional_i64_from_u64(attempt.cart_total, COLUMN_CART_TOTAL)?;

        query_as::<Postgres, ValidationAttemptRecord>(INSERT_ATTEMPT_SQL)
            .bind(attempt.uuid.into_uuid())
            .bind(attempt.code_uuid.map(CodeUuid::into_uuid))
            .bind(attempt.code_entered)
            .bind(attempt.user_uuid)
            .bind(cart_total)
            .bind(attempt.is_valid)
            .bind(attempt.rejection)
            .fetch_one(&mut **tx)
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

impl<'r> FromRow<'r, PgRow> for ValidationAttemptRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: ValidationAttemptUuid::from_uuid(row.try_get("uuid")?),
            code_uuid: row
                .try_get::<Option<Uuid>, _>("code_uuid")?
                .map(CodeUuid::from_uuid),
            code_entered: row.try_get("code_entered")?,
            user_uuid: row.try_get("user_uuid")?,
            cart_total: try_optional_u64_from_i64(
                row.try_get(COLUMN_CART_TOTAL)?,
                COLUMN_CART_TOTAL,
            )?,
            is_valid: row.try_get("is_valid")?,
            rejection: row.try_get("rejection")?,
            attempted_at: row.try_get::<SqlxTimestamp, _>("attempted_at")?.to_jiff(),
        })
    }
}
