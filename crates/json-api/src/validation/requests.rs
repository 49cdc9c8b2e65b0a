//! Validation Request Bodies

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tessera_app::domain::validation::data::{CartItem, ValidationContext};

/// One cart line as submitted by the storefront.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartItemBody {
    pub product_uuid: Uuid,
    pub category_uuid: Option<Uuid>,

    /// Unit price in minor units.
    pub unit_price: u64,

    pub quantity: u32,
}

impl From<CartItemBody> for CartItem {
    fn from(body: CartItemBody) -> Self {
        Self {
            product_uuid: body.product_uuid,
            category_uuid: body.category_uuid,
            unit_price: body.unit_price,
            quantity: body.quantity,
        }
    }
}

/// Cart snapshot a code is checked against. Every field is optional on the
/// wire; an anonymous caller with an empty cart sends `{}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub(crate) struct ValidationContextBody {
    pub user_uuid: Option<Uuid>,

    /// Cart total in minor units, before any discount.
    pub cart_total: u64,

    pub cart_items: Vec<CartItemBody>,
    pub has_previous_purchases: bool,

    /// Shipping cost in minor units, used by free-shipping discounts.
    pub shipping_cost: u64,
}

impl From<ValidationContextBody> for ValidationContext {
    fn from(body: ValidationContextBody) -> Self {
        Self {
            user_uuid: body.user_uuid,
            cart_total: body.cart_total,
            cart_items: body.cart_items.into_iter().map(Into::into).collect(),
            has_previous_purchases: body.has_previous_purchases,
            shipping_cost: body.shipping_cost,
        }
    }
}
