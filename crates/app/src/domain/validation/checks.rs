//! Validation Check Chain
//!
//! The ordered checks a code must pass before it can be quoted or redeemed.
//! Evaluation is pure so the same chain runs inside a redemption transaction
//! without re-reading anything.

use jiff::Timestamp;

use crate::domain::{
    campaigns::{
        data::discounts::DiscountRule,
        records::{CampaignStatus, CampaignUuid, WindowState},
    },
    codes::records::CodeStatus,
    validation::{data::ValidationContext, records::ResolvedCode},
};

/// Why a code was turned down.
///
/// Variants are ordered the way the chain tests them; the first failing
/// check wins, so a code that is both inactive and expired always reports
/// `CodeInactive`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// No code with that text exists for the tenant.
    InvalidCode,
    /// The code itself is inactive or used up.
    CodeInactive,
    /// The owning campaign is not in the active state.
    CampaignInactive,
    /// The campaign's scheduled window has not opened yet.
    NotStarted,
    /// The campaign's scheduled window has closed.
    Expired,
    /// The code's remaining-use counter is at zero.
    MaxUsesReached,
    /// The user already redeemed this code the allowed number of times.
    UserLimitReached,
    /// The cart total is below the campaign's minimum purchase.
    MinimumNotMet { minimum_purchase: u64 },
    /// The campaign only applies to a user's first purchase.
    FirstPurchaseOnly,
    /// The code is reserved for a different user.
    NotAssigned,
    /// No cart item falls inside the campaign's targeting.
    NoApplicableItems,
}

impl Rejection {
    /// Stable machine code, used in responses and the attempts log.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::InvalidCode => "invalid_code",
            Self::CodeInactive => "code_inactive",
            Self::CampaignInactive => "campaign_inactive",
            Self::NotStarted => "not_started",
            Self::Expired => "expired",
            Self::MaxUsesReached => "max_uses_reached",
            Self::UserLimitReached => "user_limit_reached",
            Self::MinimumNotMet { .. } => "minimum_not_met",
            Self::FirstPurchaseOnly => "first_purchase_only",
            Self::NotAssigned => "not_assigned",
            Self::NoApplicableItems => "no_applicable_items",
        }
    }

    /// User-facing explanation.
    #[must_use]
    pub fn message(self) -> String {
        match self {
            Self::InvalidCode => "The coupon code is invalid.".to_string(),
            Self::CodeInactive => "This coupon code is no longer active.".to_string(),
            Self::CampaignInactive => "This promotion is no longer available.".to_string(),
            Self::NotStarted => "This promotion has not started yet.".to_string(),
            Self::Expired => "This coupon code has expired.".to_string(),
            Self::MaxUsesReached => "This coupon code has reached its usage limit.".to_string(),
            Self::UserLimitReached => {
                "You have already used this coupon code the maximum number of times.".to_string()
            }
            Self::MinimumNotMet { minimum_purchase } => {
                format!("Minimum purchase of {minimum_purchase} required.")
            }
            Self::FirstPurchaseOnly => {
                "This coupon is only valid for first-time purchases.".to_string()
            }
            Self::NotAssigned => "This coupon code is assigned to another user.".to_string(),
            Self::NoApplicableItems => {
                "This coupon does not apply to any items in your cart.".to_string()
            }
        }
    }
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// What a valid code is worth against the presented cart.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    /// The code text as stored.
    pub code: String,

    /// Owning campaign.
    pub campaign_uuid: CampaignUuid,

    /// Campaign display name, for receipts and cart UIs.
    pub campaign_name: String,

    /// The rule the amount was computed from.
    pub discount: DiscountRule,

    /// Discount in minor units, clamped to the campaign's maximum discount
    /// and to the cart total.
    pub discount_amount: u64,

    /// Whether the discount may stack with other promotions.
    pub is_combinable: bool,

    pub minimum_purchase: Option<u64>,
    pub maximum_discount: Option<u64>,
}

impl Quote {
    fn for_cart(resolved: &ResolvedCode, context: &ValidationContext) -> Self {
        let campaign = &resolved.campaign;

        let mut amount = campaign
            .discount
            .raw_discount(context.cart_total, context.shipping_cost);

        if let Some(maximum) = campaign.maximum_discount {
            amount = amount.min(maximum);
        }

        amount = amount.min(context.cart_total);

        Self {
            code: resolved.code.code.clone(),
            campaign_uuid: campaign.uuid,
            campaign_name: campaign.name.clone(),
            discount: campaign.discount.clone(),
            discount_amount: amount,
            is_combinable: campaign.is_combinable,
            minimum_purchase: campaign.minimum_purchase,
            maximum_discount: campaign.maximum_discount,
        }
    }
}

/// Result of running the chain.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    Valid(Quote),
    Rejected(Rejection),
}

impl ValidationOutcome {
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    /// Machine rejection code, if rejected.
    #[must_use]
    pub const fn rejection_code(&self) -> Option<&'static str> {
        match self {
            Self::Valid(_) => None,
            Self::Rejected(rejection) => Some(rejection.code()),
        }
    }
}

/// Run the full chain against a resolved code.
///
/// `user_redemptions` is the caller's non-reversed redemption count for this
/// code; pass zero when the context has no user. `now` is pinned by the
/// caller so a redemption transaction evaluates at a single instant.
pub(crate) fn evaluate(
    resolved: Option<&ResolvedCode>,
    user_redemptions: u64,
    context: &ValidationContext,
    now: Timestamp,
) -> ValidationOutcome {
    let Some(resolved) = resolved else {
        return ValidationOutcome::Rejected(Rejection::InvalidCode);
    };

    let code = &resolved.code;
    let campaign = &resolved.campaign;

    if code.status != CodeStatus::Active {
        return ValidationOutcome::Rejected(Rejection::CodeInactive);
    }

    if campaign.status != CampaignStatus::Active {
        return ValidationOutcome::Rejected(Rejection::CampaignInactive);
    }

    match campaign.window_state(now) {
        WindowState::NotStarted => return ValidationOutcome::Rejected(Rejection::NotStarted),
        WindowState::Ended => return ValidationOutcome::Rejected(Rejection::Expired),
        WindowState::Within => {}
    }

    if code.uses_remaining.is_some_and(|left| left == 0) {
        return ValidationOutcome::Rejected(Rejection::MaxUsesReached);
    }

    if context.user_uuid.is_some() && user_redemptions >= u64::from(campaign.max_uses_per_user) {
        return ValidationOutcome::Rejected(Rejection::UserLimitReached);
    }

    if let Some(minimum_purchase) = campaign.minimum_purchase
        && context.cart_total < minimum_purchase
    {
        return ValidationOutcome::Rejected(Rejection::MinimumNotMet { minimum_purchase });
    }

    if campaign.is_first_purchase_only && context.has_previous_purchases {
        return ValidationOutcome::Rejected(Rejection::FirstPurchaseOnly);
    }

    if let Some(assigned_to) = code.assigned_to
        && context.user_uuid != Some(assigned_to)
    {
        return ValidationOutcome::Rejected(Rejection::NotAssigned);
    }

    // An empty cart cannot be scoped, so applicability only applies when
    // there are items to inspect.
    if !context.cart_items.is_empty()
        && !context
            .cart_items
            .iter()
            .any(|item| campaign.applicability.covers(item.product_uuid, item.category_uuid))
    {
        return ValidationOutcome::Rejected(Rejection::NoApplicableItems);
    }

    ValidationOutcome::Valid(Quote::for_cart(resolved, context))
}
