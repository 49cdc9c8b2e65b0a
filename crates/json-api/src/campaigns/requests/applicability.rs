//! Campaign Applicability Bodies

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tessera_app::domain::campaigns::data::applicability::{Applicability, AppliesTo};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub(crate) enum AppliesToBody {
    #[default]
    All,
    SpecificProducts,
    Categories,
}

impl From<AppliesToBody> for AppliesTo {
    fn from(body: AppliesToBody) -> Self {
        match body {
            AppliesToBody::All => AppliesTo::All,
            AppliesToBody::SpecificProducts => AppliesTo::SpecificProducts,
            AppliesToBody::Categories => AppliesTo::Categories,
        }
    }
}

impl From<AppliesTo> for AppliesToBody {
    fn from(scope: AppliesTo) -> Self {
        match scope {
            AppliesTo::All => AppliesToBody::All,
            AppliesTo::SpecificProducts => AppliesToBody::SpecificProducts,
            AppliesTo::Categories => AppliesToBody::Categories,
        }
    }
}

/// Item targeting for a campaign; omitted fields fall back to "applies to
/// everything, excludes nothing".
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub(crate) struct ApplicabilityBody {
    #[serde(default)]
    pub applies_to: AppliesToBody,

    #[serde(default)]
    pub applicable_products: Vec<Uuid>,

    #[serde(default)]
    pub applicable_categories: Vec<Uuid>,

    #[serde(default)]
    pub excluded_products: Vec<Uuid>,

    #[serde(default)]
    pub excluded_categories: Vec<Uuid>,
}

impl From<ApplicabilityBody> for Applicability {
    fn from(body: ApplicabilityBody) -> Self {
        Applicability {
            applies_to: body.applies_to.into(),
            applicable_products: body.applicable_products,
            applicable_categories: body.applicable_categories,
            excluded_products: body.excluded_products,
            excluded_categories: body.excluded_categories,
        }
    }
}

impl From<Applicability> for ApplicabilityBody {
    fn from(applicability: Applicability) -> Self {
        ApplicabilityBody {
            applies_to: applicability.applies_to.into(),
            applicable_products: applicability.applicable_products,
            applicable_categories: applicability.applicable_categories,
            excluded_products: applicability.excluded_products,
            excluded_categories: applicability.excluded_categories,
        }
    }
}
