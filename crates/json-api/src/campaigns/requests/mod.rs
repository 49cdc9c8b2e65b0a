//! Campaigns Requests

use jiff::Timestamp;
use salvo::{http::StatusError, oapi::ToSchema};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tessera_app::domain::campaigns::{
    data::{CampaignUpdate, NewCampaign},
    records::CampaignUuid,
};

use crate::campaigns::requests::{
    applicability::ApplicabilityBody, codes::CodeSettingsBody, discounts::DiscountRuleBody,
};

pub(crate) mod applicability;
pub(crate) mod codes;
pub(crate) mod discounts;

/// Create Campaign Request
///
/// Timestamps are RFC 3339 strings; money fields are integer minor units.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub(crate) struct CreateCampaignRequest {
    pub uuid: Uuid,

    pub name: String,

    pub description: Option<String>,

    pub discount: DiscountRuleBody,

    pub minimum_purchase: Option<u64>,

    pub maximum_discount: Option<u64>,

    #[serde(default)]
    pub applicability: ApplicabilityBody,

    #[serde(default)]
    pub code_settings: CodeSettingsBody,

    pub starts_at: Option<String>,

    pub expires_at: Option<String>,

    /// Per-code use budget copied onto generated codes; omitted means
    /// unlimited.
    pub max_uses_total: Option<u64>,

    #[serde(default = "default_max_uses_per_user")]
    pub max_uses_per_user: u32,

    #[serde(default)]
    pub is_combinable: bool,

    #[serde(default)]
    pub is_first_purchase_only: bool,
}

fn default_max_uses_per_user() -> u32 {
    1
}

impl TryFrom<CreateCampaignRequest> for NewCampaign {
    type Error = StatusError;

    fn try_from(request: CreateCampaignRequest) -> Result<Self, StatusError> {
        Ok(NewCampaign {
            uuid: CampaignUuid::from_uuid(request.uuid),
            name: request.name,
            description: request.description,
            discount: request.discount.try_into()?,
            minimum_purchase: request.minimum_purchase,
            maximum_discount: request.maximum_discount,
            applicability: request.applicability.into(),
            code_settings: request.code_settings.into(),
            starts_at: parse_timestamp(request.starts_at.as_deref())?,
            expires_at: parse_timestamp(request.expires_at.as_deref())?,
            max_uses_total: request.max_uses_total,
            max_uses_per_user: request.max_uses_per_user,
            is_combinable: request.is_combinable,
            is_first_purchase_only: request.is_first_purchase_only,
        })
    }
}

/// Update Campaign Request
///
/// Only the provided fields are changed; status moves through the dedicated
/// transition endpoints instead.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq)]
pub(crate) struct UpdateCampaignRequest {
    pub name: Option<String>,

    pub description: Option<String>,

    pub minimum_purchase: Option<u64>,

    pub maximum_discount: Option<u64>,

    pub starts_at: Option<String>,

    pub expires_at: Option<String>,

    pub max_uses_per_user: Option<u32>,

    pub is_combinable: Option<bool>,

    pub is_first_purchase_only: Option<bool>,
}

impl TryFrom<UpdateCampaignRequest> for CampaignUpdate {
    type Error = StatusError;

    fn try_from(request: UpdateCampaignRequest) -> Result<Self, StatusError> {
        Ok(CampaignUpdate {
            name: request.name,
            description: request.description,
            minimum_purchase: request.minimum_purchase,
            maximum_discount: request.maximum_discount,
            starts_at: parse_timestamp(request.starts_at.as_deref())?,
            expires_at: parse_timestamp(request.expires_at.as_deref())?,
            max_uses_per_user: request.max_uses_per_user,
            is_combinable: request.is_combinable,
            is_first_purchase_only: request.is_first_purchase_only,
        })
    }
}

pub(crate) fn parse_timestamp(value: Option<&str>) -> Result<Option<Timestamp>, StatusError> {
    value
        .map(|text| {
            text.parse::<Timestamp>().map_err(|_ignored| {
                StatusError::bad_request().brief(format!("Invalid timestamp: {text}"))
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rust_decimal::Decimal;
    use testresult::TestResult;
    use tessera_app::domain::campaigns::data::discounts::DiscountRule;

    use crate::campaigns::requests::applicability::AppliesToBody;

    use super::*;

    #[test]
    fn create_campaign_request_parse() -> TestResult {
        let json = r#"
            {
                "uuid": "019c8e08-0000-7000-8000-000000000001",
                "name": "Spring Sale",
                "description": "20% off everything",
                "discount": {
                    "type": "percentage",
                    "percent": "20"
                },
                "minimum_purchase": 5000,
                "maximum_discount": 10000,
                "applicability": {
                    "applies_to": "specific_products",
                    "applicable_products": ["019c8e09-321a-7b0e-8ad1-27a98a4e4dc5"]
                },
                "code_settings": {
                    "format": "alphanumeric",
                    "prefix": "SPRING-",
                    "length": 6
                },
                "starts_at": "2026-03-01T00:00:00Z",
                "expires_at": "2026-04-01T00:00:00Z",
                "max_uses_total": 100,
                "max_uses_per_user": 2,
                "is_combinable": true
            }
        "#;

        let request: CreateCampaignRequest = serde_json::from_str(json)?;

        assert_eq!(request.name, "Spring Sale");
        assert_eq!(
            request.discount,
            DiscountRuleBody::Percentage {
                percent: "20".to_string(),
            }
        );
        assert_eq!(request.applicability.applies_to, AppliesToBody::SpecificProducts);
        assert_eq!(request.code_settings.prefix.as_deref(), Some("SPRING-"));
        assert_eq!(request.code_settings.length, 6);
        assert_eq!(request.max_uses_per_user, 2);
        assert!(request.is_combinable, "expected is_combinable to parse");
        assert!(
            !request.is_first_purchase_only,
            "expected omitted flag to default to false"
        );

        let campaign: NewCampaign = request.try_into()?;

        assert_eq!(
            campaign.uuid,
            CampaignUuid::from_uuid(Uuid::from_str("019c8e08-0000-7000-8000-000000000001")?)
        );
        assert_eq!(
            campaign.discount,
            DiscountRule::Percentage {
                percent: Decimal::from(20),
            }
        );
        assert_eq!(campaign.starts_at, Some("2026-03-01T00:00:00Z".parse()?));
        assert_eq!(campaign.max_uses_total, Some(100));

        Ok(())
    }

    #[test]
    fn minimal_create_request_fills_defaults() -> TestResult {
        let json = r#"
            {
                "uuid": "019c8e08-0000-7000-8000-000000000002",
                "name": "Flat Tenner",
                "discount": {
                    "type": "fixed",
                    "amount": 1000
                }
            }
        "#;

        let request: CreateCampaignRequest = serde_json::from_str(json)?;
        let campaign: NewCampaign = request.try_into()?;

        assert_eq!(campaign.max_uses_per_user, 1);
        assert_eq!(campaign.code_settings.length, 8);
        assert!(campaign.starts_at.is_none(), "expected no schedule");
        assert!(
            campaign.applicability.applicable_products.is_empty(),
            "expected default applicability"
        );

        Ok(())
    }

    #[test]
    fn bad_timestamp_is_rejected() {
        let request = UpdateCampaignRequest {
            starts_at: Some("next tuesday".to_string()),
            ..UpdateCampaignRequest::default()
        };

        let result: Result<CampaignUpdate, StatusError> = request.try_into();

        assert!(result.is_err(), "expected a bad request, got {result:?}");
    }
}
