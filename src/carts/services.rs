use sqlx::SqlitePool;
use tracing::{info, instrument, warn};

use super::dto::{AddOutcome, CartContents, ItemChange};
use super::repo;
use super::repo_types::Cart;
use crate::error::{CartError, CartResult};

/// Cart operations over the shared pool.
///
/// Each call checks out one connection for its own transaction and hands it
/// back when the call returns, on success and on error alike. An uncommitted
/// transaction rolls back when dropped.
#[derive(Clone)]
pub struct CartService {
    db: SqlitePool,
}

impl CartService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Put `quantity` of `product_id` in the user's active cart, opening a cart
    /// if the user has none. Re-adding a product accumulates its quantity.
    ///
    /// Neither id is checked against User/Product, and quantity is taken as is.
    #[instrument(skip(self))]
    pub async fn add_to_cart(
        &self,
        user_id: i64,
        product_id: i64,
        quantity: i64,
    ) -> CartResult<AddOutcome> {
        let mut tx = self.db.begin().await?;

        let (cart_id, cart_created) = repo::ensure_active_cart_tx(&mut tx, user_id).await?;
        if cart_created {
            info!(cart_id, user_id, "cart created");
        }

        let (cart_item_id, quantity, change) =
            match repo::find_item_tx(&mut tx, cart_id, product_id).await? {
                Some(cart_item_id) => {
                    let total = repo::increment_item_tx(&mut tx, cart_item_id, quantity).await?;
                    (cart_item_id, total, ItemChange::Updated)
                }
                None => {
                    let cart_item_id =
                        repo::insert_item_tx(&mut tx, cart_id, product_id, quantity).await?;
                    (cart_item_id, quantity, ItemChange::Inserted)
                }
            };

        tx.commit().await?;
        info!(cart_id, cart_item_id, quantity, change = ?change, "cart item saved");

        Ok(AddOutcome {
            cart_id,
            cart_created,
            cart_item_id,
            quantity,
            change,
        })
    }

    /// Delete a cart item, provided it sits in one of `user_id`'s carts.
    #[instrument(skip(self))]
    pub async fn remove_from_cart(&self, user_id: i64, cart_item_id: i64) -> CartResult<()> {
        let mut tx = self.db.begin().await?;

        match repo::item_owner_tx(&mut tx, cart_item_id).await? {
            Some(owner) if owner == user_id => {}
            owner => {
                warn!(user_id, cart_item_id, owner = ?owner, "cart item not owned by user");
                return Err(CartError::NotOwned {
                    user_id,
                    cart_item_id,
                });
            }
        }

        repo::delete_item_tx(&mut tx, cart_item_id).await?;
        tx.commit().await?;
        info!(user_id, cart_item_id, "cart item removed");
        Ok(())
    }

    /// Sign out the user's active cart. Returns how many carts changed; zero
    /// means there was nothing to sign out.
    #[instrument(skip(self))]
    pub async fn sign_out_cart(&self, user_id: i64) -> CartResult<u64> {
        let changed = repo::sign_out_active(&self.db, user_id).await?;
        info!(user_id, changed, "cart signed out");
        Ok(changed)
    }

    pub async fn active_cart(&self, user_id: i64) -> CartResult<Option<Cart>> {
        Ok(repo::find_active_cart(&self.db, user_id).await?)
    }

    /// The user's active cart with its items, or `None` if no cart is active.
    pub async fn active_cart_contents(&self, user_id: i64) -> CartResult<Option<CartContents>> {
        let Some(cart) = self.active_cart(user_id).await? else {
            return Ok(None);
        };
        let items = repo::list_items(&self.db, cart.cart_id).await?;
        Ok(Some(CartContents { cart, items }))
    }

    /// Every cart the user ever had, oldest first.
    pub async fn carts(&self, user_id: i64) -> CartResult<Vec<Cart>> {
        Ok(repo::list_carts_by_user(&self.db, user_id).await?)
    }
}
