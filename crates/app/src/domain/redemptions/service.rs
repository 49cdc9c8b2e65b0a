//! Redemptions Service

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use tracing::{Span, info, warn};
use uuid::Uuid;

use crate::{
    database::Db,
    domain::{
        campaigns::PgCampaignsRepository,
        codes::{generator, records::CodeUuid},
        redemptions::{
            PgRedemptionsRepository, RedemptionsServiceError,
            data::{NewRedemption, RedemptionFilter},
            records::{RedemptionOutcome, RedemptionRecord, RedemptionUuid},
        },
        tenants::records::TenantUuid,
        validation::{
            PgValidationRepository,
            checks::{self, Rejection, ValidationOutcome},
            data::{NewValidationAttempt, ValidationContext},
            records::{ResolvedCode, ValidationAttemptUuid},
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgRedemptionsService {
    db: Db,
    campaigns: PgCampaignsRepository,
    validation: PgValidationRepository,
    redemptions: PgRedemptionsRepository,
}

impl PgRedemptionsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            campaigns: PgCampaignsRepository::new(),
            validation: PgValidationRepository::new(),
            redemptions: PgRedemptionsRepository::new(),
        }
    }

    /// Hands a rejection back as a non-error outcome, logging the attempt
    /// first. The ledger transaction has already been rolled back here.
    async fn reject(
        &self,
        tenant: TenantUuid,
        entered: String,
        code_uuid: Option<CodeUuid>,
        context: &ValidationContext,
        rejection: Rejection,
    ) -> Result<RedemptionOutcome, RedemptionsServiceError> {
        self.append_attempt(
            tenant,
            NewValidationAttempt {
                uuid: ValidationAttemptUuid::new(),
                code_uuid,
                code_entered: entered,
                user_uuid: context.user_uuid,
                cart_total: Some(context.cart_total),
                is_valid: false,
                rejection: Some(rejection.code().to_string()),
            },
        )
        .await;

        info!(rejection = %rejection, "redemption rejected");

        Ok(RedemptionOutcome::Rejected(rejection))
    }

    /// The ledger outcome is already settled when the attempt is appended,
    /// so a failed append downgrades to a warning.
    async fn append_attempt(&self, tenant: TenantUuid, attempt: NewValidationAttempt) {
        if let Err(error) = self.try_append_attempt(tenant, attempt).await {
            warn!(%error, "failed to log redemption attempt");
        }
    }

    async fn try_append_attempt(
        &self,
        tenant: TenantUuid,
        attempt: NewValidationAttempt,
    ) -> Result<(), sqlx::Error> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        self.validation.insert_attempt(&mut tx, attempt).await?;

        tx.commit().await
    }
}

#[async_trait]
impl RedemptionsService for PgRedemptionsService {
    #[tracing::instrument(
        name = "redemptions.service.redeem_code",
        skip(self, order_uuid, context),
        fields(tenant_uuid = %tenant, code = %code, redemption_uuid = tracing::field::Empty),
        err
    )]
    async fn redeem_code(
        &self,
        tenant: TenantUuid,
        code: String,
        order_uuid: Option<Uuid>,
        context: ValidationContext,
    ) -> Result<RedemptionOutcome, RedemptionsServiceError> {
        let entered = generator::normalize_code(&code);
        let now = Timestamp::now();

        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        // Lock the code row so the check chain and the decrement see one
        // consistent counter even under concurrent redemptions.
        let Some(code) = self
            .redemptions
            .get_code_by_text_for_update(&mut tx, &entered)
            .await?
        else {
            tx.rollback().await?;

            return self
                .reject(tenant, entered, None, &context, Rejection::InvalidCode)
                .await;
        };

        let campaign = self.campaigns.get_campaign(&mut tx, code.campaign_uuid).await?;
        let resolved = ResolvedCode { code, campaign };

        let user_redemptions = match context.user_uuid {
            Some(user_uuid) => {
                self.validation
                    .count_user_redemptions(&mut tx, resolved.code.uuid, user_uuid)
                    .await?
            }
            None => 0,
        };

        let quote = match checks::evaluate(Some(&resolved), user_redemptions, &context, now) {
            ValidationOutcome::Valid(quote) => quote,
            ValidationOutcome::Rejected(rejection) => {
                tx.rollback().await?;

                return self
                    .reject(tenant, entered, Some(resolved.code.uuid), &context, rejection)
                    .await;
            }
        };

        // The counter guard re-fires here if another transaction spent the
        // last use between our lock acquisition attempts.
        if self
            .redemptions
            .decrement_code_use(&mut tx, resolved.code.uuid)
            .await?
            .is_none()
        {
            tx.rollback().await?;

            return self
                .reject(
                    tenant,
                    entered,
                    Some(resolved.code.uuid),
                    &context,
                    Rejection::MaxUsesReached,
                )
                .await;
        }

        let record = self
            .redemptions
            .insert_redemption(
                &mut tx,
                NewRedemption {
                    uuid: RedemptionUuid::new(),
                    code_uuid: resolved.code.uuid,
                    user_uuid: context.user_uuid,
                    order_uuid,
                    order_total: context.cart_total,
                    discount_amount: quote.discount_amount,
                },
            )
            .await?;

        tx.commit().await?;

        Span::current().record("redemption_uuid", tracing::field::display(record.uuid));

        self.append_attempt(
            tenant,
            NewValidationAttempt {
                uuid: ValidationAttemptUuid::new(),
                code_uuid: Some(record.code_uuid),
                code_entered: entered,
                user_uuid: context.user_uuid,
                cart_total: Some(context.cart_total),
                is_valid: true,
                rejection: None,
            },
        )
        .await;

        info!(
            redemption_uuid = %record.uuid,
            campaign_uuid = %quote.campaign_uuid,
            discount_amount = record.discount_amount,
            "redeemed code"
        );

        Ok(RedemptionOutcome::Redeemed(record))
    }

    #[tracing::instrument(
        name = "redemptions.service.reverse_redemption",
        skip(self),
        fields(tenant_uuid = %tenant, redemption_uuid = %uuid),
        err
    )]
    async fn reverse_redemption(
        &self,
        tenant: TenantUuid,
        uuid: RedemptionUuid,
    ) -> Result<RedemptionRecord, RedemptionsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let Some(record) = self.redemptions.reverse_redemption(&mut tx, uuid).await? else {
            // Zero rows either means a repeat reversal or a redemption that
            // never existed; a lookup tells the two apart.
            self.redemptions.get_redemption(&mut tx, uuid).await?;

            return Err(RedemptionsServiceError::AlreadyReversed);
        };

        let code = self
            .redemptions
            .restore_code_use(&mut tx, record.code_uuid)
            .await?;

        tx.commit().await?;

        info!(code_uuid = %code.uuid, "reversed redemption");

        Ok(record)
    }

    #[tracing::instrument(
        name = "redemptions.service.get_redemption",
        skip(self),
        fields(tenant_uuid = %tenant, redemption_uuid = %uuid),
        err
    )]
    async fn get_redemption(
        &self,
        tenant: TenantUuid,
        uuid: RedemptionUuid,
    ) -> Result<RedemptionRecord, RedemptionsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let record = self.redemptions.get_redemption(&mut tx, uuid).await?;

        tx.commit().await?;

        Ok(record)
    }

    #[tracing::instrument(
        name = "redemptions.service.list_redemptions",
        skip(self, filter),
        fields(tenant_uuid = %tenant),
        err
    )]
    async fn list_redemptions(
        &self,
        tenant: TenantUuid,
        filter: RedemptionFilter,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<RedemptionRecord>, RedemptionsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let records = self
            .redemptions
            .list_redemptions(&mut tx, filter, i64::from(limit), i64::from(offset))
            .await?;

        tx.commit().await?;

        Ok(records)
    }
}

#[automock]
#[async_trait]
/// The append-only ledger of redemptions and their reversals.
pub trait RedemptionsService: Send + Sync {
    /// Redeems a code against an order in one transaction: re-runs the full
    /// check chain under a row lock, spends one use and writes the ledger
    /// row. A failing check comes back as a rejected outcome, not an error.
    async fn redeem_code(
        &self,
        tenant: TenantUuid,
        code: String,
        order_uuid: Option<Uuid>,
        context: ValidationContext,
    ) -> Result<RedemptionOutcome, RedemptionsServiceError>;

    /// Undoes a redemption exactly once, restoring the spent use and
    /// reactivating an exhausted code.
    async fn reverse_redemption(
        &self,
        tenant: TenantUuid,
        uuid: RedemptionUuid,
    ) -> Result<RedemptionRecord, RedemptionsServiceError>;

    async fn get_redemption(
        &self,
        tenant: TenantUuid,
        uuid: RedemptionUuid,
    ) -> Result<RedemptionRecord, RedemptionsServiceError>;

    /// Ledger page, newest first. Reversed rows are hidden unless the
    /// filter asks for them.
    async fn list_redemptions(
        &self,
        tenant: TenantUuid,
        filter: RedemptionFilter,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<RedemptionRecord>, RedemptionsServiceError>;
}
