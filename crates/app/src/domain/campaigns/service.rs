//! Campaigns Service

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use tracing::{Span, info};

use crate::{
    database::Db,
    domain::{
        campaigns::{
            CampaignsServiceError,
            data::{CampaignUpdate, NewCampaign},
            records::{CampaignRecord, CampaignStats, CampaignStatus, CampaignUuid},
            repository::PgCampaignsRepository,
        },
        tenants::records::TenantUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgCampaignsService {
    db: Db,
    campaigns: PgCampaignsRepository,
}

impl PgCampaignsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            campaigns: PgCampaignsRepository::new(),
        }
    }

    /// Applies a status transition after validating it against the current
    /// status, which is row-locked for the duration of the transaction.
    async fn transition(
        &self,
        tenant: TenantUuid,
        uuid: CampaignUuid,
        to: CampaignStatus,
    ) -> Result<CampaignRecord, CampaignsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let from = self
            .campaigns
            .get_campaign_status_for_update(&mut tx, uuid)
            .await?;

        if !from.can_transition_to(to) {
            return Err(CampaignsServiceError::InvalidTransition { from, to });
        }

        let record = self.campaigns.transition_campaign(&mut tx, uuid, to).await?;

        tx.commit().await?;

        info!(campaign_uuid = %uuid, from = %from, to = %to, "transitioned campaign");

        Ok(record)
    }
}

#[async_trait]
impl CampaignsService for PgCampaignsService {
    #[tracing::instrument(
        name = "campaigns.service.create_campaign",
        skip(self, campaign),
        fields(tenant_uuid = %tenant, campaign_uuid = tracing::field::Empty),
        err
    )]
    async fn create_campaign(
        &self,
        tenant: TenantUuid,
        campaign: NewCampaign,
    ) -> Result<CampaignRecord, CampaignsServiceError> {
        Span::current().record("campaign_uuid", tracing::field::display(campaign.uuid));

        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let record = self.campaigns.create_campaign(&mut tx, campaign).await?;

        tx.commit().await?;

        info!(campaign_uuid = %record.uuid, "created campaign");

        Ok(record)
    }

    #[tracing::instrument(
        name = "campaigns.service.get_campaign",
        skip(self),
        fields(tenant_uuid = %tenant, campaign_uuid = %uuid),
        err
    )]
    async fn get_campaign(
        &self,
        tenant: TenantUuid,
        uuid: CampaignUuid,
    ) -> Result<CampaignRecord, CampaignsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let record = self.campaigns.get_campaign(&mut tx, uuid).await?;

        tx.commit().await?;

        Ok(record)
    }

    #[tracing::instrument(
        name = "campaigns.service.list_campaigns",
        skip(self),
        fields(tenant_uuid = %tenant),
        err
    )]
    async fn list_campaigns(
        &self,
        tenant: TenantUuid,
        status: Option<CampaignStatus>,
    ) -> Result<Vec<CampaignRecord>, CampaignsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let records = self.campaigns.list_campaigns(&mut tx, status).await?;

        tx.commit().await?;

        Ok(records)
    }

    #[tracing::instrument(
        name = "campaigns.service.list_live_campaigns",
        skip(self),
        fields(tenant_uuid = %tenant),
        err
    )]
    async fn list_live_campaigns(
        &self,
        tenant: TenantUuid,
        now: Timestamp,
    ) -> Result<Vec<CampaignRecord>, CampaignsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let records = self.campaigns.list_live_campaigns(&mut tx).await?;

        tx.commit().await?;

        // SQL narrows to active campaigns; the schedule window is applied
        // here so listing and validation share one `is_live` predicate.
        Ok(records.into_iter().filter(|c| c.is_live(now)).collect())
    }

    #[tracing::instrument(
        name = "campaigns.service.update_campaign",
        skip(self, update),
        fields(tenant_uuid = %tenant, campaign_uuid = %uuid),
        err
    )]
    async fn update_campaign(
        &self,
        tenant: TenantUuid,
        uuid: CampaignUuid,
        update: CampaignUpdate,
    ) -> Result<CampaignRecord, CampaignsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let record = self.campaigns.update_campaign(&mut tx, uuid, update).await?;

        tx.commit().await?;

        info!(campaign_uuid = %uuid, "updated campaign");

        Ok(record)
    }

    #[tracing::instrument(
        name = "campaigns.service.activate_campaign",
        skip(self),
        fields(tenant_uuid = %tenant, campaign_uuid = %uuid),
        err
    )]
    async fn activate_campaign(
        &self,
        tenant: TenantUuid,
        uuid: CampaignUuid,
    ) -> Result<CampaignRecord, CampaignsServiceError> {
        self.transition(tenant, uuid, CampaignStatus::Active).await
    }

    #[tracing::instrument(
        name = "campaigns.service.pause_campaign",
        skip(self),
        fields(tenant_uuid = %tenant, campaign_uuid = %uuid),
        err
    )]
    async fn pause_campaign(
        &self,
        tenant: TenantUuid,
        uuid: CampaignUuid,
    ) -> Result<CampaignRecord, CampaignsServiceError> {
        self.transition(tenant, uuid, CampaignStatus::Paused).await
    }

    #[tracing::instrument(
        name = "campaigns.service.expire_campaign",
        skip(self),
        fields(tenant_uuid = %tenant, campaign_uuid = %uuid),
        err
    )]
    async fn expire_campaign(
        &self,
        tenant: TenantUuid,
        uuid: CampaignUuid,
    ) -> Result<CampaignRecord, CampaignsServiceError> {
        self.transition(tenant, uuid, CampaignStatus::Expired).await
    }

    #[tracing::instrument(
        name = "campaigns.service.delete_campaign",
        skip(self),
        fields(tenant_uuid = %tenant, campaign_uuid = %uuid),
        err
    )]
    async fn delete_campaign(
        &self,
        tenant: TenantUuid,
        uuid: CampaignUuid,
    ) -> Result<(), CampaignsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let deleted = self.campaigns.soft_delete_campaign(&mut tx, uuid).await?;

        if deleted == 0 {
            return Err(CampaignsServiceError::NotFound);
        }

        tx.commit().await?;

        info!(campaign_uuid = %uuid, "deleted campaign");

        Ok(())
    }

    #[tracing::instrument(
        name = "campaigns.service.campaign_stats",
        skip(self),
        fields(tenant_uuid = %tenant, campaign_uuid = %uuid),
        err
    )]
    async fn campaign_stats(
        &self,
        tenant: TenantUuid,
        uuid: CampaignUuid,
    ) -> Result<CampaignStats, CampaignsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        // Surface NotFound for unknown or soft-deleted campaigns before
        // aggregating, which would otherwise report zeros.
        self.campaigns.get_campaign(&mut tx, uuid).await?;

        let stats = self.campaigns.campaign_stats(&mut tx, uuid).await?;

        tx.commit().await?;

        Ok(stats)
    }
}

#[automock]
#[async_trait]
/// Campaign lifecycle and reporting operations.
pub trait CampaignsService: Send + Sync {
    /// Creates a campaign in draft status.
    async fn create_campaign(
        &self,
        tenant: TenantUuid,
        campaign: NewCampaign,
    ) -> Result<CampaignRecord, CampaignsServiceError>;

    /// Fetches a campaign that has not been soft-deleted.
    async fn get_campaign(
        &self,
        tenant: TenantUuid,
        uuid: CampaignUuid,
    ) -> Result<CampaignRecord, CampaignsServiceError>;

    /// Lists campaigns, optionally filtered by status, newest first.
    async fn list_campaigns(
        &self,
        tenant: TenantUuid,
        status: Option<CampaignStatus>,
    ) -> Result<Vec<CampaignRecord>, CampaignsServiceError>;

    /// Lists active campaigns whose scheduled window contains `now`.
    async fn list_live_campaigns(
        &self,
        tenant: TenantUuid,
        now: Timestamp,
    ) -> Result<Vec<CampaignRecord>, CampaignsServiceError>;

    /// Merges the provided attributes into an existing campaign.
    async fn update_campaign(
        &self,
        tenant: TenantUuid,
        uuid: CampaignUuid,
        update: CampaignUpdate,
    ) -> Result<CampaignRecord, CampaignsServiceError>;

    /// Transitions a draft or paused campaign to active.
    async fn activate_campaign(
        &self,
        tenant: TenantUuid,
        uuid: CampaignUuid,
    ) -> Result<CampaignRecord, CampaignsServiceError>;

    /// Transitions an active campaign to paused.
    async fn pause_campaign(
        &self,
        tenant: TenantUuid,
        uuid: CampaignUuid,
    ) -> Result<CampaignRecord, CampaignsServiceError>;

    /// Transitions a campaign to its terminal expired status.
    async fn expire_campaign(
        &self,
        tenant: TenantUuid,
        uuid: CampaignUuid,
    ) -> Result<CampaignRecord, CampaignsServiceError>;

    /// Soft-deletes a campaign.
    async fn delete_campaign(
        &self,
        tenant: TenantUuid,
        uuid: CampaignUuid,
    ) -> Result<(), CampaignsServiceError>;

    /// Aggregated code and redemption counters for one campaign.
    async fn campaign_stats(
        &self,
        tenant: TenantUuid,
        uuid: CampaignUuid,
    ) -> Result<CampaignStats, CampaignsServiceError>;
}
