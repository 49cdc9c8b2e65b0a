//! Campaign Records

use jiff::Timestamp;

use crate::{
    domain::campaigns::data::{
        applicability::Applicability, codes::CodeSettings, discounts::DiscountRule,
    },
    uuids::TypedUuid,
};

/// Campaign UUID
pub type CampaignUuid = TypedUuid<CampaignRecord>;

/// Campaign lifecycle state.
///
/// Allowed transitions: `Draft -> Active`, `Active <-> Paused`, and any
/// non-terminal state to `Expired`. `Expired` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "campaign_status", rename_all = "snake_case")]
pub enum CampaignStatus {
    Draft,
    Active,
    Paused,
    Expired,
}

impl CampaignStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Expired => "expired",
        }
    }

    /// Whether the lifecycle state machine permits moving to `next`.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Draft, Self::Active)
                | (Self::Active, Self::Paused)
                | (Self::Paused, Self::Active)
                | (Self::Draft | Self::Active | Self::Paused, Self::Expired)
        )
    }
}

impl std::fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Position of an instant relative to a campaign's scheduled window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowState {
    /// Before `starts_at`.
    NotStarted,
    /// Inside the half-open `[starts_at, expires_at)` window.
    Within,
    /// At or past `expires_at`.
    Ended,
}

/// Campaign Record
#[derive(Debug, Clone)]
pub struct CampaignRecord {
    /// Unique campaign identifier.
    pub uuid: CampaignUuid,

    /// Display name shown to operators.
    pub name: String,

    /// Optional free-text description.
    pub description: Option<String>,

    /// The discount this campaign's codes grant.
    pub discount: DiscountRule,

    /// Minimum cart total (minor units) required to redeem, if any.
    pub minimum_purchase: Option<u64>,

    /// Cap on the computed discount (minor units), if any.
    pub maximum_discount: Option<u64>,

    /// Which cart items the campaign applies to.
    pub applicability: Applicability,

    /// How codes for this campaign are shaped and generated.
    pub code_settings: CodeSettings,

    /// Schedule start; `None` means immediately live once active.
    pub starts_at: Option<Timestamp>,

    /// Schedule end (exclusive); `None` means no expiry.
    pub expires_at: Option<Timestamp>,

    /// Per-code use budget copied onto generated codes; `None` is unlimited.
    pub max_uses_total: Option<u64>,

    /// Maximum non-reversed redemptions per user per code.
    pub max_uses_per_user: u32,

    /// Whether the discount may stack with other promotions.
    pub is_combinable: bool,

    /// Restrict redemption to first-time purchasers.
    pub is_first_purchase_only: bool,

    /// Current lifecycle state.
    pub status: CampaignStatus,

    /// Campaign creation timestamp.
    pub created_at: Timestamp,

    /// Last update timestamp.
    pub updated_at: Timestamp,

    /// Soft-delete timestamp when deleted.
    pub deleted_at: Option<Timestamp>,
}

impl CampaignRecord {
    /// Where `now` falls relative to the scheduled window.
    #[must_use]
    pub fn window_state(&self, now: Timestamp) -> WindowState {
        if let Some(starts_at) = self.starts_at
            && now < starts_at
        {
            return WindowState::NotStarted;
        }

        if let Some(expires_at) = self.expires_at
            && now >= expires_at
        {
            return WindowState::Ended;
        }

        WindowState::Within
    }

    /// Active and inside the scheduled window.
    ///
    /// The store listing and the validation chain share this predicate so a
    /// campaign can never be listed as redeemable yet rejected on schedule
    /// grounds in the same instant.
    #[must_use]
    pub fn is_live(&self, now: Timestamp) -> bool {
        self.status == CampaignStatus::Active && self.window_state(now) == WindowState::Within
    }
}

/// Aggregated counters for one campaign.
///
/// Redemption figures count non-reversed redemptions only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampaignStats {
    /// Codes minted for the campaign.
    pub total_codes: u64,

    /// Codes currently redeemable.
    pub active_codes: u64,

    /// Codes that exhausted their use budget.
    pub used_codes: u64,

    /// Non-reversed redemptions recorded.
    pub total_redemptions: u64,

    /// Sum of discount granted (minor units).
    pub total_discount_given: u64,

    /// Sum of order totals at redemption time (minor units).
    pub total_order_value: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn campaign_with_window(
        starts_at: Option<Timestamp>,
        expires_at: Option<Timestamp>,
        status: CampaignStatus,
    ) -> CampaignRecord {
        use crate::domain::campaigns::data::discounts::DiscountRule;
        use rust_decimal::Decimal;

        CampaignRecord {
            uuid: CampaignUuid::new(),
            name: "Window Test".to_string(),
            description: None,
            discount: DiscountRule::Percentage {
                percent: Decimal::TEN,
            },
            minimum_purchase: None,
            maximum_discount: None,
            applicability: Applicability::default(),
            code_settings: CodeSettings::default(),
            starts_at,
            expires_at,
            max_uses_total: None,
            max_uses_per_user: 1,
            is_combinable: false,
            is_first_purchase_only: false,
            status,
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
            deleted_at: None,
        }
    }

    fn ts(s: &str) -> Timestamp {
        s.parse().unwrap()
    }

    #[test]
    fn window_state_open_ended_is_always_within() {
        let campaign = campaign_with_window(None, None, CampaignStatus::Active);

        assert_eq!(
            campaign.window_state(ts("2026-01-01T00:00:00Z")),
            WindowState::Within
        );
    }

    #[test]
    fn window_state_before_start_is_not_started() {
        let campaign = campaign_with_window(
            Some(ts("2026-06-01T00:00:00Z")),
            None,
            CampaignStatus::Active,
        );

        assert_eq!(
            campaign.window_state(ts("2026-05-31T23:59:59Z")),
            WindowState::NotStarted
        );
    }

    #[test]
    fn window_state_boundaries_are_half_open() {
        let campaign = campaign_with_window(
            Some(ts("2026-06-01T00:00:00Z")),
            Some(ts("2026-07-01T00:00:00Z")),
            CampaignStatus::Active,
        );

        // Inclusive at the start instant
        assert_eq!(
            campaign.window_state(ts("2026-06-01T00:00:00Z")),
            WindowState::Within
        );

        // Exclusive at the expiry instant
        assert_eq!(
            campaign.window_state(ts("2026-07-01T00:00:00Z")),
            WindowState::Ended
        );
    }

    #[test]
    fn is_live_requires_active_status() {
        let campaign = campaign_with_window(None, None, CampaignStatus::Paused);

        assert!(!campaign.is_live(ts("2026-01-01T00:00:00Z")));
    }

    #[test]
    fn transitions_follow_the_state_machine() {
        use CampaignStatus::{Active, Draft, Expired, Paused};

        assert!(Draft.can_transition_to(Active));
        assert!(Active.can_transition_to(Paused));
        assert!(Paused.can_transition_to(Active));
        assert!(Draft.can_transition_to(Expired));
        assert!(Active.can_transition_to(Expired));
        assert!(Paused.can_transition_to(Expired));

        assert!(!Draft.can_transition_to(Paused));
        assert!(!Active.can_transition_to(Draft));
        assert!(!Paused.can_transition_to(Draft));
        assert!(!Expired.can_transition_to(Active));
        assert!(!Expired.can_transition_to(Draft));
        assert!(!Expired.can_transition_to(Paused));
        assert!(!Active.can_transition_to(Active), "self-transitions are rejected");
    }
}
