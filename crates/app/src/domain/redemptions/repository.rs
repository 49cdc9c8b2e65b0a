//! Redemptions Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};
use uuid::Uuid;

use crate::domain::{
    campaigns::records::CampaignUuid,
    codes::records::{CodeRecord, CodeUuid},
    redemptions::{
        data::{NewRedemption, RedemptionFilter},
        records::{RedemptionRecord, RedemptionUuid},
    },
};

const COLUMN_ORDER_TOTAL: &str = "order_total";
const COLUMN_DISCOUNT_AMOUNT: &str = "discount_amount";

const GET_CODE_BY_TEXT_FOR_UPDATE_SQL: &str = include_str!("sql/get_code_by_text_for_update.sql");
const DECREMENT_CODE_USE_SQL: &str = include_str!("sql/decrement_code_use.sql");
const RESTORE_CODE_USE_SQL: &str = include_str!("sql/restore_code_use.sql");
const INSERT_REDEMPTION_SQL: &str = include_str!("sql/insert_redemption.sql");
const GET_REDEMPTION_SQL: &str = include_str!("sql/get_redemption.sql");
const REVERSE_REDEMPTION_SQL: &str = include_str!("sql/reverse_redemption.sql");
const LIST_REDEMPTIONS_SQL: &str = include_str!("sql/list_redemptions.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgRedemptionsRepository;

impl PgRedemptionsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Same lookup as validation's, but row-locks the code so concurrent
    /// redemptions of one code serialise for the rest of the transaction.
    pub(crate) async fn get_code_by_text_for_update(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: &str,
    ) -> Result<Option<CodeRecord>, sqlx::Error> {
        query_as::<Postgres, CodeRecord>(GET_CODE_BY_TEXT_FOR_UPDATE_SQL)
            .bind(code)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Spends one use of a code, returning `None` when the counter is
    /// already at zero. Unlimited codes pass through unchanged apart from
    /// the use timestamps. Exhausting the counter flips the code to `used`.
    pub(crate) async fn decrement_code_use(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: CodeUuid,
    ) -> Result<Option<CodeRecord>, sqlx::Error> {
        query_as::<Postgres, CodeRecord>(DECREMENT_CODE_USE_SQL)
            .bind(uuid.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    /// Gives one use back after a reversal, reactivating a `used` code.
    pub(crate) async fn restore_code_use(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: CodeUuid,
    ) -> Result<CodeRecord, sqlx::Error> {
        query_as::<Postgres, CodeRecord>(RESTORE_CODE_USE_SQL)
            .bind(uuid.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn insert_redemption(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        redemption: NewRedemption,
    ) -> Result<RedemptionRecord, sqlx::Error> {
        let order_total = try_i64_from_u64(redemption.order_total, COLUMN_ORDER_TOTAL)?;
        let discount_amount =
            try_i64_from_u64(redemption.discount_amount, COLUMN_DISCOUNT_AMOUNT)?;

        query_as::<Postgres, RedemptionRecord>(INSERT_REDEMPTION_SQL)
            .bind(redemption.uuid.into_uuid())
            .bind(redemption.code_uuid.into_uuid())
            .bind(redemption.user_uuid)
            .bind(redemption.order_uuid)
            .bind(order_total)
            .bind(discount_amount)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_redemption(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: RedemptionUuid,
    ) -> Result<RedemptionRecord, sqlx::Error> {
        query_as::<Postgres, RedemptionRecord>(GET_REDEMPTION_SQL)
            .bind(uuid.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Stamps `reversed_at`, returning `None` when the row is missing or was
    /// already reversed. The condition makes reversal exactly-once under
    /// concurrent calls.
    pub(crate) async fn reverse_redemption(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: RedemptionUuid,
    ) -> Result<Option<RedemptionRecord>, sqlx::Error> {
        query_as::<Postgres, RedemptionRecord>(REVERSE_REDEMPTION_SQL)
            .bind(uuid.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn list_redemptions(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        filter: RedemptionFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<RedemptionRecord>, sqlx::Error> {
        query_as::<Postgres, RedemptionRecord>(LIST_REDEMPTIONS_SQL)
            .bind(filter.campaign_uuid.map(CampaignUuid::into_uuid))
            .bind(filter.user_uuid)
            .bind(filter.include_reversed)
            .bind(limit)
            .bind(offset)
            .fetch_all(&mut **tx)
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

impl<'r> FromRow<'r, PgRow> for RedemptionRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: RedemptionUuid::from_uuid(row.try_get("uuid")?),
            code_uuid: CodeUuid::from_uuid(row.try_get("code_uuid")?),
            user_uuid: row.try_get("user_uuid")?,
            order_uuid: row.try_get::<Option<Uuid>, _>("order_uuid")?,
            order_total: try_u64_from_i64(row.try_get(COLUMN_ORDER_TOTAL)?, COLUMN_ORDER_TOTAL)?,
            discount_amount: try_u64_from_i64(
                row.try_get(COLUMN_DISCOUNT_AMOUNT)?,
                COLUMN_DISCOUNT_AMOUNT,
            )?,
            redeemed_at: row.try_get::<SqlxTimestamp, _>("redeemed_at")?.to_jiff(),
            reversed_at: row
                .try_get::<Option<SqlxTimestamp>, _>("reversed_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}
