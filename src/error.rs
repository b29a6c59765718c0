use thiserror::Error;

/// Failures of cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The cart item is missing or sits in another user's cart.
    #[error("Cart item does not belong to the user.")]
    NotOwned { user_id: i64, cart_item_id: i64 },

    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

pub type CartResult<T> = Result<T, CartError>;
