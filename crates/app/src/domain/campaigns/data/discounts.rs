//! Campaign Discount Rules

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};

/// Storage tag for a discount rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "discount_kind", rename_all = "snake_case")]
pub enum DiscountKind {
    Percentage,
    Fixed,
    FreeShipping,
    BuyXGetY,
}

/// Discount Rule Data
///
/// One variant per supported discount type; adding a type means adding a
/// variant and handling it in every `match` below.
#[derive(Debug, Clone, PartialEq)]
pub enum DiscountRule {
    /// Percentage off the cart total, e.g. `percent = 20` for 20% off.
    Percentage { percent: Decimal },

    /// Fixed amount off the cart total, in minor units.
    Fixed { amount: u64 },

    /// Waives the shipping cost supplied in the validation context.
    FreeShipping,

    /// Buy X items, get Y items discounted by `percent_off`.
    ///
    /// Item-level semantics are not settled yet, so this rule currently
    /// grants no amount. Campaigns may still be created with it and their
    /// codes validate normally.
    BuyXGetY {
        buy_quantity: u32,
        get_quantity: u32,
        percent_off: Decimal,
    },
}

impl DiscountRule {
    #[must_use]
    pub const fn kind(&self) -> DiscountKind {
        match self {
            Self::Percentage { .. } => DiscountKind::Percentage,
            Self::Fixed { .. } => DiscountKind::Fixed,
            Self::FreeShipping => DiscountKind::FreeShipping,
            Self::BuyXGetY { .. } => DiscountKind::BuyXGetY,
        }
    }

    /// The unclamped discount this rule grants, in minor units.
    ///
    /// Callers are responsible for clamping to the campaign's maximum
    /// discount and to the cart total.
    #[must_use]
    pub fn raw_discount(&self, cart_total: u64, shipping_cost: u64) -> u64 {
        match self {
            Self::Percentage { percent } => percent_of_minor(*percent, cart_total),
            Self::Fixed { amount } => *amount,
            Self::FreeShipping => shipping_cost,
            Self::BuyXGetY { .. } => 0,
        }
    }
}

/// Percentage of an amount in minor units, rounded half away from zero.
fn percent_of_minor(percent: Decimal, minor: u64) -> u64 {
    let applied = (percent * Decimal::from(minor)) / Decimal::ONE_HUNDRED;

    applied
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u64()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_rounds_midpoint_away_from_zero() {
        let rule = DiscountRule::Percentage {
            percent: Decimal::from(15),
        };

        // 15% of 103 = 15.45 -> 15
        assert_eq!(rule.raw_discount(103, 0), 15);

        // 15% of 110 = 16.5 -> 17
        assert_eq!(rule.raw_discount(110, 0), 17);
    }

    #[test]
    fn percentage_of_whole_amounts() {
        let rule = DiscountRule::Percentage {
            percent: Decimal::from(20),
        };

        assert_eq!(rule.raw_discount(40_000, 0), 8_000);
        assert_eq!(rule.raw_discount(0, 0), 0);
    }

    #[test]
    fn fixed_ignores_cart_total() {
        let rule = DiscountRule::Fixed { amount: 500 };

        assert_eq!(rule.raw_discount(100, 0), 500);
        assert_eq!(rule.raw_discount(100_000, 0), 500);
    }

    #[test]
    fn free_shipping_grants_the_shipping_cost() {
        let rule = DiscountRule::FreeShipping;

        assert_eq!(rule.raw_discount(10_000, 799), 799);
        assert_eq!(rule.raw_discount(10_000, 0), 0);
    }

    #[test]
    fn buy_x_get_y_grants_nothing() {
        let rule = DiscountRule::BuyXGetY {
            buy_quantity: 2,
            get_quantity: 1,
            percent_off: Decimal::ONE_HUNDRED,
        };

        assert_eq!(rule.raw_discount(10_000, 0), 0);
    }
}
