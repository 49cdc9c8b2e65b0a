//! Campaign Discount Bodies

use rust_decimal::Decimal;
use salvo::{http::StatusError, oapi::ToSchema};
use serde::{Deserialize, Serialize};

use tessera_app::domain::campaigns::data::discounts::DiscountRule;

/// Wire shape of a discount rule.
///
/// Decimal values travel as strings so percentages survive JSON number
/// round-tripping intact.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub(crate) enum DiscountRuleBody {
    Percentage {
        percent: String,
    },
    Fixed {
        amount: u64,
    },
    FreeShipping,
    BuyXGetY {
        buy_quantity: u32,
        get_quantity: u32,
        percent_off: String,
    },
}

impl TryFrom<DiscountRuleBody> for DiscountRule {
    type Error = StatusError;

    fn try_from(body: DiscountRuleBody) -> Result<Self, StatusError> {
        Ok(match body {
            DiscountRuleBody::Percentage { percent } => DiscountRule::Percentage {
                percent: parse_decimal(&percent)?,
            },
            DiscountRuleBody::Fixed { amount } => DiscountRule::Fixed { amount },
            DiscountRuleBody::FreeShipping => DiscountRule::FreeShipping,
            DiscountRuleBody::BuyXGetY {
                buy_quantity,
                get_quantity,
                percent_off,
            } => DiscountRule::BuyXGetY {
                buy_quantity,
                get_quantity,
                percent_off: parse_decimal(&percent_off)?,
            },
        })
    }
}

impl From<DiscountRule> for DiscountRuleBody {
    fn from(rule: DiscountRule) -> Self {
        match rule {
            DiscountRule::Percentage { percent } => DiscountRuleBody::Percentage {
                percent: percent.to_string(),
            },
            DiscountRule::Fixed { amount } => DiscountRuleBody::Fixed { amount },
            DiscountRule::FreeShipping => DiscountRuleBody::FreeShipping,
            DiscountRule::BuyXGetY {
                buy_quantity,
                get_quantity,
                percent_off,
            } => DiscountRuleBody::BuyXGetY {
                buy_quantity,
                get_quantity,
                percent_off: percent_off.to_string(),
            },
        }
    }
}

fn parse_decimal(text: &str) -> Result<Decimal, StatusError> {
    text.parse::<Decimal>()
        .map_err(|_ignored| StatusError::bad_request().brief(format!("Invalid decimal: {text}")))
}
