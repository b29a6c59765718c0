use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Catalog entry; `price` is stored as REAL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub product_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
}
