//! Validation Inputs

use uuid::Uuid;

use crate::domain::{
    codes::records::CodeUuid, validation::records::ValidationAttemptUuid,
};

/// One line of the cart being checked out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItem {
    pub product_uuid: Uuid,
    pub category_uuid: Option<Uuid>,

    /// Unit price in minor units.
    pub unit_price: u64,

    pub quantity: u32,
}

/// Everything the validation chain needs to know about the caller's cart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationContext {
    /// User the code is being validated for, when the caller is signed in.
    pub user_uuid: Option<Uuid>,

    /// Cart total in minor units, before any discount.
    pub cart_total: u64,

    /// Cart lines, used for applicability scoping. An empty cart skips
    /// the applicability check.
    pub cart_items: Vec<CartItem>,

    /// Whether the user has completed a purchase before.
    pub has_previous_purchases: bool,

    /// Shipping cost in minor units, used by free-shipping discounts.
    pub shipping_cost: u64,
}

/// Data for one audit row in the attempts log.
#[derive(Debug, Clone)]
pub struct NewValidationAttempt {
    pub uuid: ValidationAttemptUuid,
    pub code_uuid: Option<CodeUuid>,
    pub code_entered: String,
    pub user_uuid: Option<Uuid>,
    pub cart_total: Option<u64>,
    pub is_valid: bool,
    pub rejection: Option<String>,
}
