//! Validation Service

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use sqlx::{Postgres, Transaction};
use tracing::info;

use crate::{
    database::Db,
    domain::{
        campaigns::PgCampaignsRepository,
        codes::generator,
        tenants::records::TenantUuid,
        validation::{
            PgValidationRepository, ValidationServiceError,
            checks::{self, ValidationOutcome},
            data::{NewValidationAttempt, ValidationContext},
            records::{ResolvedCode, ValidationAttemptUuid},
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgValidationService {
    db: Db,
    campaigns: PgCampaignsRepository,
    validation: PgValidationRepository,
}

impl PgValidationService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            campaigns: PgCampaignsRepository::new(),
            validation: PgValidationRepository::new(),
        }
    }

    async fn resolve_code(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        entered: &str,
    ) -> Result<Option<ResolvedCode>, ValidationServiceError> {
        let Some(code) = self.validation.get_code_by_text(tx, entered).await? else {
            return Ok(None);
        };

        let campaign = self.campaigns.get_campaign(tx, code.campaign_uuid).await?;

        Ok(Some(ResolvedCode { code, campaign }))
    }

    async fn user_redemption_count(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        resolved: Option<&ResolvedCode>,
        context: &ValidationContext,
    ) -> Result<u64, ValidationServiceError> {
        let (Some(resolved), Some(user_uuid)) = (resolved, context.user_uuid) else {
            return Ok(0);
        };

        let count = self
            .validation
            .count_user_redemptions(tx, resolved.code.uuid, user_uuid)
            .await?;

        Ok(count)
    }
}

#[async_trait]
impl ValidationService for PgValidationService {
    #[tracing::instrument(
        name = "validation.service.validate_code",
        skip(self, context),
        fields(tenant_uuid = %tenant, code = %code),
        err
    )]
    async fn validate_code(
        &self,
        tenant: TenantUuid,
        code: String,
        context: ValidationContext,
    ) -> Result<ValidationOutcome, ValidationServiceError> {
        let entered = generator::normalize_code(&code);
        let now = Timestamp::now();

        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let resolved = self.resolve_code(&mut tx, &entered).await?;
        let user_redemptions = self
            .user_redemption_count(&mut tx, resolved.as_ref(), &context)
            .await?;

        let outcome = checks::evaluate(resolved.as_ref(), user_redemptions, &context, now);

        self.validation
            .insert_attempt(
                &mut tx,
                NewValidationAttempt {
                    uuid: ValidationAttemptUuid::new(),
                    code_uuid: resolved.as_ref().map(|r| r.code.uuid),
                    code_entered: entered,
                    user_uuid: context.user_uuid,
                    cart_total: Some(context.cart_total),
                    is_valid: outcome.is_valid(),
                    rejection: outcome.rejection_code().map(str::to_string),
                },
            )
            .await?;

        tx.commit().await?;

        match &outcome {
            ValidationOutcome::Valid(quote) => info!(
                campaign_uuid = %quote.campaign_uuid,
                discount_amount = quote.discount_amount,
                "code validated"
            ),
            ValidationOutcome::Rejected(rejection) => {
                info!(rejection = %rejection, "code rejected");
            }
        }

        Ok(outcome)
    }
}

#[automock]
#[async_trait]
/// Runs the check chain against a cart and logs every attempt.
pub trait ValidationService: Send + Sync {
    /// Validates entered code text for a tenant, returning either a discount
    /// quote or the first failing check. The attempt is logged in the same
    /// transaction either way.
    async fn validate_code(
        &self,
        tenant: TenantUuid,
        code: String,
        context: ValidationContext,
    ) -> Result<ValidationOutcome, ValidationServiceError>;
}
