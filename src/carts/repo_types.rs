use std::fmt;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Lifecycle of a cart: `active` until signed out, then `signed_out` for good.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum CartStatus {
    Active,
    SignedOut,
}

impl CartStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CartStatus::Active => "active",
            CartStatus::SignedOut => "signed_out",
        }
    }
}

impl fmt::Display for CartStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Cart {
    pub cart_id: i64,
    pub user_id: i64,
    pub status: CartStatus,
    /// Not stored; no totals are computed, so this stays 0.
    #[sqlx(default)]
    #[serde(default)]
    pub total_price: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct CartItem {
    pub cart_item_id: i64,
    pub cart_id: i64,
    pub product_id: i64,
    pub quantity: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_text_matches_stored_values() {
        assert_eq!(CartStatus::Active.to_string(), "active");
        assert_eq!(CartStatus::SignedOut.to_string(), "signed_out");
        assert_eq!(
            serde_json::to_string(&CartStatus::SignedOut).unwrap(),
            "\"signed_out\""
        );
    }

    #[test]
    fn cart_total_defaults_to_zero_when_absent() {
        let cart: Cart =
            serde_json::from_str(r#"{"cart_id":1,"user_id":2,"status":"active"}"#).unwrap();
        assert_eq!(cart.total_price, 0.0);
        assert_eq!(cart.status, CartStatus::Active);
    }
}
