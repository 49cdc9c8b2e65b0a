//! Campaigns Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use rust_decimal::Decimal;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::domain::campaigns::{
    data::{
        CampaignUpdate, NewCampaign,
        applicability::Applicability,
        codes::CodeSettings,
        discounts::{DiscountKind, DiscountRule},
    },
    records::{CampaignRecord, CampaignStats, CampaignStatus, CampaignUuid},
};

const COLUMN_DISCOUNT_PERCENT: &str = "discount_percent";
const COLUMN_DISCOUNT_AMOUNT: &str = "discount_amount";
const COLUMN_BXGY_BUY_QUANTITY: &str = "bxgy_buy_quantity";
const COLUMN_BXGY_GET_QUANTITY: &str = "bxgy_get_quantity";
const COLUMN_BXGY_PERCENT_OFF: &str = "bxgy_percent_off";
const COLUMN_MINIMUM_PURCHASE: &str = "minimum_purchase";
const COLUMN_MAXIMUM_DISCOUNT: &str = "maximum_discount";
const COLUMN_CODE_LENGTH: &str = "code_length";
const COLUMN_MAX_USES_TOTAL: &str = "max_uses_total";
const COLUMN_MAX_USES_PER_USER: &str = "max_uses_per_user";
const COLUMN_TOTAL_CODES: &str = "total_codes";
const COLUMN_ACTIVE_CODES: &str = "active_codes";
const COLUMN_USED_CODES: &str = "used_codes";
const COLUMN_TOTAL_REDEMPTIONS: &str = "total_redemptions";
const COLUMN_TOTAL_DISCOUNT_GIVEN: &str = "total_discount_given";
const COLUMN_TOTAL_ORDER_VALUE: &str = "total_order_value";

const CREATE_CAMPAIGN_SQL: &str = include_str!("sql/create_campaign.sql");
const GET_CAMPAIGN_SQL: &str = include_str!("sql/get_campaign.sql");
const LIST_CAMPAIGNS_SQL: &str = include_str!("sql/list_campaigns.sql");
const LIST_LIVE_CAMPAIGNS_SQL: &str = include_str!("sql/list_live_campaigns.sql");
const UPDATE_CAMPAIGN_SQL: &str = include_str!("sql/update_campaign.sql");
const GET_CAMPAIGN_STATUS_FOR_UPDATE_SQL: &str =
    include_str!("sql/get_campaign_status_for_update.sql");
const TRANSITION_CAMPAIGN_SQL: &str = include_str!("sql/transition_campaign.sql");
const SOFT_DELETE_CAMPAIGN_SQL: &str = include_str!("sql/soft_delete_campaign.sql");
const CAMPAIGN_STATS_SQL: &str = include_str!("sql/campaign_stats.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCampaignsRepository;

impl PgCampaignsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_campaign(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        campaign: NewCampaign,
    ) -> Result<CampaignRecord, sqlx::Error> {
        let discount = DiscountSqlValues::try_from_rule(campaign.discount)?;

        let minimum_purchase =
            try_optional_i64_from_u64(campaign.minimum_purchase, COLUMN_MINIMUM_PURCHASE)?;
        let maximum_discount =
            try_optional_i64_from_u64(campaign.maximum_discount, COLUMN_MAXIMUM_DISCOUNT)?;
        let max_uses_total =
            try_optional_i64_from_u64(campaign.max_uses_total, COLUMN_MAX_USES_TOTAL)?;
        let max_uses_per_user =
            try_i32_from_u32(campaign.max_uses_per_user, COLUMN_MAX_USES_PER_USER)?;

        query_as::<Postgres, CampaignRecord>(CREATE_CAMPAIGN_SQL)
            .bind(campaign.uuid.into_uuid())
            .bind(campaign.name)
            .bind(campaign.description)
            .bind(discount.kind)
            .bind(discount.percent)
            .bind(discount.amount)
            .bind(discount.buy_quantity)
            .bind(discount.get_quantity)
            .bind(discount.percent_off)
            .bind(minimum_purchase)
            .bind(maximum_discount)
            .bind(campaign.applicability.applies_to)
            .bind(campaign.applicability.applicable_products)
            .bind(campaign.applicability.applicable_categories)
            .bind(campaign.applicability.excluded_products)
            .bind(campaign.applicability.excluded_categories)
            .bind(campaign.code_settings.format)
            .bind(campaign.code_settings.prefix)
            .bind(campaign.code_settings.suffix)
            .bind(i32::from(campaign.code_settings.length))
            .bind(campaign.code_settings.custom_alphabet)
            .bind(campaign.starts_at.map(SqlxTimestamp::from))
            .bind(campaign.expires_at.map(SqlxTimestamp::from))
            .bind(max_uses_total)
            .bind(max_uses_per_user)
            .bind(campaign.is_combinable)
            .bind(campaign.is_first_purchase_only)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_campaign(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: CampaignUuid,
    ) -> Result<CampaignRecord, sqlx::Error> {
        query_as::<Postgres, CampaignRecord>(GET_CAMPAIGN_SQL)
            .bind(uuid.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_campaigns(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        status: Option<CampaignStatus>,
    ) -> Result<Vec<CampaignRecord>, sqlx::Error> {
        query_as::<Postgres, CampaignRecord>(LIST_CAMPAIGNS_SQL)
            .bind(status)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn list_live_campaigns(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<CampaignRecord>, sqlx::Error> {
        query_as::<Postgres, CampaignRecord>(LIST_LIVE_CAMPAIGNS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn update_campaign(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: CampaignUuid,
        update: CampaignUpdate,
    ) -> Result<CampaignRecord, sqlx::Error> {
        let minimum_purchase =
            try_optional_i64_from_u64(update.minimum_purchase, COLUMN_MINIMUM_PURCHASE)?;
        let maximum_discount =
            try_optional_i64_from_u64(update.maximum_discount, COLUMN_MAXIMUM_DISCOUNT)?;
        let max_uses_per_user =
            try_optional_i32_from_u32(update.max_uses_per_user, COLUMN_MAX_USES_PER_USER)?;

        query_as::<Postgres, CampaignRecord>(UPDATE_CAMPAIGN_SQL)
            .bind(uuid.into_uuid())
            .bind(update.name)
            .bind(update.description)
            .bind(minimum_purchase)
            .bind(maximum_discount)
            .bind(update.starts_at.map(SqlxTimestamp::from))
            .bind(update.expires_at.map(SqlxTimestamp::from))
            .bind(max_uses_per_user)
            .bind(update.is_combinable)
            .bind(update.is_first_purchase_only)
            .fetch_one(&mut **tx)
            .await
    }

    /// Reads the current status and row-locks the campaign for the rest of
    /// the transaction.
    pub(crate) async fn get_campaign_status_for_update(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: CampaignUuid,
    ) -> Result<CampaignStatus, sqlx::Error> {
        let (status,): (CampaignStatus,) = query_as(GET_CAMPAIGN_STATUS_FOR_UPDATE_SQL)
            .bind(uuid.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        Ok(status)
    }

    pub(crate) async fn transition_campaign(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: CampaignUuid,
        to: CampaignStatus,
    ) -> Result<CampaignRecord, sqlx::Error> {
        query_as::<Postgres, CampaignRecord>(TRANSITION_CAMPAIGN_SQL)
            .bind(uuid.into_uuid())
            .bind(to)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn soft_delete_campaign(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: CampaignUuid,
    ) -> Result<u64, sqlx::Error> {
        let result = query(SOFT_DELETE_CAMPAIGN_SQL)
            .bind(uuid.into_uuid())
            .execute(&mut **tx)
            .await?;

        Ok(result.rows_affected())
    }

    pub(crate) async fn campaign_stats(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: CampaignUuid,
    ) -> Result<CampaignStats, sqlx::Error> {
        let row = query(CAMPAIGN_STATS_SQL)
            .bind(uuid.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        Ok(CampaignStats {
            total_codes: try_u64_from_i64(row.try_get(COLUMN_TOTAL_CODES)?, COLUMN_TOTAL_CODES)?,
            active_codes: try_u64_from_i64(
                row.try_get(COLUMN_ACTIVE_CODES)?,
                COLUMN_ACTIVE_CODES,
            )?,
            used_codes: try_u64_from_i64(row.try_get(COLUMN_USED_CODES)?, COLUMN_USED_CODES)?,
            total_redemptions: try_u64_from_i64(
                row.try_get(COLUMN_TOTAL_REDEMPTIONS)?,
                COLUMN_TOTAL_REDEMPTIONS,
            )?,
            total_discount_given: try_u64_from_i64(
                row.try_get(COLUMN_TOTAL_DISCOUNT_GIVEN)?,
                COLUMN_TOTAL_DISCOUNT_GIVEN,
            )?,
            total_order_value: try_u64_from_i64(
                row.try_get(COLUMN_TOTAL_ORDER_VALUE)?,
                COLUMN_TOTAL_ORDER_VALUE,
            )?,
        })
    }
}

/// Discount rule decomposed into the nullable columns that store it.
struct DiscountSqlValues {
    kind: DiscountKind,
    percent: Option<Decimal>,
    amount: Option<i64>,
    buy_quantity: Option<i32>,
    get_quantity: Option<i32>,
    percent_off: Option<Decimal>,
}

impl DiscountSqlValues {
    fn try_from_rule(rule: DiscountRule) -> Result<Self, sqlx::Error> {
        let mut values = Self {
            kind: rule.kind(),
            percent: None,
            amount: None,
            buy_quantity: None,
            get_quantity: None,
            percent_off: None,
        };

        match rule {
            DiscountRule::Percentage { percent } => values.percent = Some(percent),
            DiscountRule::Fixed { amount } => {
                values.amount = Some(try_i64_from_u64(amount, COLUMN_DISCOUNT_AMOUNT)?);
            }
            DiscountRule::FreeShipping => {}
            DiscountRule::BuyXGetY {
                buy_quantity,
                get_quantity,
                percent_off,
            } => {
                values.buy_quantity =
                    Some(try_i32_from_u32(buy_quantity, COLUMN_BXGY_BUY_QUANTITY)?);
                values.get_quantity =
                    Some(try_i32_from_u32(get_quantity, COLUMN_BXGY_GET_QUANTITY)?);
                values.percent_off = Some(percent_off);
            }
        }

        Ok(values)
    }
}

fn discount_from_row(row: &PgRow) -> Result<DiscountRule, sqlx::Error> {
    let kind: DiscountKind = row.try_get("discount_kind")?;

    Ok(match kind {
        DiscountKind::Percentage => DiscountRule::Percentage {
            percent: require_column(
                row.try_get(COLUMN_DISCOUNT_PERCENT)?,
                COLUMN_DISCOUNT_PERCENT,
            )?,
        },
        DiscountKind::Fixed => {
            let amount: i64 =
                require_column(row.try_get(COLUMN_DISCOUNT_AMOUNT)?, COLUMN_DISCOUNT_AMOUNT)?;

            DiscountRule::Fixed {
                amount: try_u64_from_i64(amount, COLUMN_DISCOUNT_AMOUNT)?,
            }
        }
        DiscountKind::FreeShipping => DiscountRule::FreeShipping,
        DiscountKind::BuyXGetY => {
            let buy_quantity: i32 = require_column(
                row.try_get(COLUMN_BXGY_BUY_QUANTITY)?,
                COLUMN_BXGY_BUY_QUANTITY,
            )?;
            let get_quantity: i32 = require_column(
                row.try_get(COLUMN_BXGY_GET_QUANTITY)?,
                COLUMN_BXGY_GET_QUANTITY,
            )?;

            DiscountRule::BuyXGetY {
                buy_quantity: try_u32_from_i32(buy_quantity, COLUMN_BXGY_BUY_QUANTITY)?,
                get_quantity: try_u32_from_i32(get_quantity, COLUMN_BXGY_GET_QUANTITY)?,
                percent_off: require_column(
                    row.try_get(COLUMN_BXGY_PERCENT_OFF)?,
                    COLUMN_BXGY_PERCENT_OFF,
                )?,
            }
        }
    })
}

fn require_column<T>(value: Option<T>, column: &'static str) -> Result<T, sqlx::Error> {
    value.ok_or_else(|| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: format!("{column} must be set for this discount kind").into(),
    })
}

fn try_optional_i64_from_u64(
    value: Option<u64>,
    column: &'static str,
) -> Result<Option<i64>, sqlx::Error> {
    value.map(|v| try_i64_from_u64(v, column)).transpose()
}

fn try_i64_from_u64(value: u64, column: &'static str) -> Result<i64, sqlx::Error> {
    i64::try_from(value).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
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

fn try_optional_i32_from_u32(
    value: Option<u32>,
    column: &'static str,
) -> Result<Option<i32>, sqlx::Error> {
    value.map(|v| try_i32_from_u32(v, column)).transpose()
}

fn try_i32_from_u32(value: u32, column: &'static str) -> Result<i32, sqlx::Error> {
    i32::try_from(value).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

fn try_u32_from_i32(value: i32, column: &'static str) -> Result<u32, sqlx::Error> {
    u32::try_from(value).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

fn try_u8_from_i32(value: i32, column: &'static str) -> Result<u8, sqlx::Error> {
    u8::try_from(value).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

impl<'r> FromRow<'r, PgRow> for CampaignRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let discount = discount_from_row(row)?;

        let applicability = Applicability {
            applies_to: row.try_get("applies_to")?,
            applicable_products: row.try_get("applicable_products")?,
            applicable_categories: row.try_get("applicable_categories")?,
            excluded_products: row.try_get("excluded_products")?,
            excluded_categories: row.try_get("excluded_categories")?,
        };

        let code_settings = CodeSettings {
            format: row.try_get("code_format")?,
            custom_alphabet: row.try_get("custom_alphabet")?,
            prefix: row.try_get("code_prefix")?,
            suffix: row.try_get("code_suffix")?,
            length: try_u8_from_i32(row.try_get(COLUMN_CODE_LENGTH)?, COLUMN_CODE_LENGTH)?,
        };

        Ok(Self {
            uuid: CampaignUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            discount,
            minimum_purchase: try_optional_u64_from_i64(
                row.try_get(COLUMN_MINIMUM_PURCHASE)?,
                COLUMN_MINIMUM_PURCHASE,
            )?,
            maximum_discount: try_optional_u64_from_i64(
                row.try_get(COLUMN_MAXIMUM_DISCOUNT)?,
                COLUMN_MAXIMUM_DISCOUNT,
            )?,
            applicability,
            code_settings,
            starts_at: row
                .try_get::<Option<SqlxTimestamp>, _>("starts_at")?
                .map(SqlxTimestamp::to_jiff),
            expires_at: row
                .try_get::<Option<SqlxTimestamp>, _>("expires_at")?
                .map(SqlxTimestamp::to_jiff),
            max_uses_total: try_optional_u64_from_i64(
                row.try_get(COLUMN_MAX_USES_TOTAL)?,
                COLUMN_MAX_USES_TOTAL,
            )?,
            max_uses_per_user: try_u32_from_i32(
                row.try_get(COLUMN_MAX_USES_PER_USER)?,
                COLUMN_MAX_USES_PER_USER,
            )?,
            is_combinable: row.try_get("is_combinable")?,
            is_first_purchase_only: row.try_get("is_first_purchase_only")?,
            status: row.try_get("status")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            deleted_at: row
                .try_get::<Option<SqlxTimestamp>, _>("deleted_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}
