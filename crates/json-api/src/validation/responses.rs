//! Validation Result Bodies

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tessera_app::domain::validation::checks::{Quote, Rejection, ValidationOutcome};

use crate::campaigns::requests::discounts::DiscountRuleBody;

/// Outcome of checking a code against a cart.
///
/// Both shapes travel with HTTP 200 from the validate endpoint; a rejected
/// code is an answer, not an error. Quote fields are present when `valid`,
/// `error` and `message` when not.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub(crate) struct ValidationResultResponse {
    pub valid: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub campaign_uuid: Option<Uuid>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub campaign_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount: Option<DiscountRuleBody>,

    /// Discount in minor units, already clamped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_amount: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_combinable: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_purchase: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum_discount: Option<u64>,

    /// Stable machine rejection code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// User-facing rejection text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ValidationResultResponse {
    pub(crate) fn valid(quote: Quote) -> Self {
        Self {
            valid: true,
            code: Some(quote.code),
            campaign_uuid: Some(quote.campaign_uuid.into_uuid()),
            campaign_name: Some(quote.campaign_name),
            discount: Some(quote.discount.into()),
            discount_amount: Some(quote.discount_amount),
            is_combinable: Some(quote.is_combinable),
            minimum_purchase: quote.minimum_purchase,
            maximum_discount: quote.maximum_discount,
            error: None,
            message: None,
        }
    }

    pub(crate) fn rejected(rejection: Rejection) -> Self {
        Self {
            valid: false,
            code: None,
            campaign_uuid: None,
            campaign_name: None,
            discount: None,
            discount_amount: None,
            is_combinable: None,
            minimum_purchase: None,
            maximum_discount: None,
            error: Some(rejection.code().to_string()),
            message: Some(rejection.message()),
        }
    }
}

impl From<ValidationOutcome> for ValidationResultResponse {
    fn from(outcome: ValidationOutcome) -> Self {
        match outcome {
            ValidationOutcome::Valid(quote) => Self::valid(quote),
            ValidationOutcome::Rejected(rejection) => Self::rejected(rejection),
        }
    }
}
