//! Campaign Applicability

use uuid::Uuid;

/// Which portion of a cart a campaign targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "applies_to_scope", rename_all = "snake_case")]
pub enum AppliesTo {
    /// Every item, minus exclusions.
    All,
    /// Only items in `applicable_products`.
    SpecificProducts,
    /// Only items in `applicable_categories`.
    Categories,
}

/// Item targeting for a campaign.
///
/// Exclusion lists apply under every scope, including [`AppliesTo::All`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applicability {
    pub applies_to: AppliesTo,
    pub applicable_products: Vec<Uuid>,
    pub applicable_categories: Vec<Uuid>,
    pub excluded_products: Vec<Uuid>,
    pub excluded_categories: Vec<Uuid>,
}

impl Default for Applicability {
    fn default() -> Self {
        Self {
            applies_to: AppliesTo::All,
            applicable_products: Vec::new(),
            applicable_categories: Vec::new(),
            excluded_products: Vec::new(),
            excluded_categories: Vec::new(),
        }
    }
}

impl Applicability {
    /// Whether an item with the given product and category falls inside the
    /// campaign's targeting.
    #[must_use]
    pub fn covers(&self, product_uuid: Uuid, category_uuid: Option<Uuid>) -> bool {
        if self.excluded_products.contains(&product_uuid) {
            return false;
        }

        if let Some(category) = category_uuid
            && self.excluded_categories.contains(&category)
        {
            return false;
        }

        match self.applies_to {
            AppliesTo::All => true,
            AppliesTo::SpecificProducts => self.applicable_products.contains(&product_uuid),
            AppliesTo::Categories => {
                category_uuid.is_some_and(|category| self.applicable_categories.contains(&category))
            }
        }
    }
}
