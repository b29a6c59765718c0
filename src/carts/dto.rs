use serde::Serialize;

use super::repo_types::{Cart, CartItem};

/// What `add_to_cart` did to the item row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemChange {
    Inserted,
    Updated,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddOutcome {
    pub cart_id: i64,
    pub cart_created: bool,
    pub cart_item_id: i64,
    /// Quantity stored after the add.
    pub quantity: i64,
    pub change: ItemChange,
}

/// A user's active cart and everything in it, as printed by `show`.
#[derive(Debug, Serialize)]
pub struct CartContents {
    pub cart: Cart,
    pub items: Vec<CartItem>,
}
