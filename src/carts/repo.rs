use sqlx::{Sqlite, SqlitePool, Transaction};

use super::repo_types::{Cart, CartItem, CartStatus};

// ---- Writes (inside the caller's transaction) ----

/// Make sure `user_id` has an active cart and return `(cart_id, created)`.
///
/// The insert runs first so the transaction holds the write lock before it
/// reads; the partial unique index on active carts turns a second active cart
/// into an ignored insert.
pub async fn ensure_active_cart_tx(
    tx: &mut Transaction<'_, Sqlite>,
    user_id: i64,
) -> sqlx::Result<(i64, bool)> {
    let inserted = sqlx::query(
        r#"
        INSERT OR IGNORE INTO Cart (user_id, status)
        VALUES (?, ?)
        "#,
    )
    .bind(user_id)
    .bind(CartStatus::Active)
    .execute(&mut **tx)
    .await?
    .rows_affected();

    let cart_id = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT cart_id
          FROM Cart
         WHERE user_id = ? AND status = ?
        "#,
    )
    .bind(user_id)
    .bind(CartStatus::Active)
    .fetch_one(&mut **tx)
    .await?;

    Ok((cart_id, inserted == 1))
}

pub async fn find_item_tx(
    tx: &mut Transaction<'_, Sqlite>,
    cart_id: i64,
    product_id: i64,
) -> sqlx::Result<Option<i64>> {
    sqlx::query_scalar::<_, i64>(
        r#"
        SELECT cart_item_id
          FROM CartItem
         WHERE cart_id = ? AND product_id = ?
        "#,
    )
    .bind(cart_id)
    .bind(product_id)
    .fetch_optional(&mut **tx)
    .await
}

/// Add `quantity` to an existing row and return the new total.
pub async fn increment_item_tx(
    tx: &mut Transaction<'_, Sqlite>,
    cart_item_id: i64,
    quantity: i64,
) -> sqlx::Result<i64> {
    sqlx::query_scalar::<_, i64>(
        r#"
        UPDATE CartItem
           SET quantity = quantity + ?
         WHERE cart_item_id = ?
        RETURNING quantity
        "#,
    )
    .bind(quantity)
    .bind(cart_item_id)
    .fetch_one(&mut **tx)
    .await
}

pub async fn insert_item_tx(
    tx: &mut Transaction<'_, Sqlite>,
    cart_id: i64,
    product_id: i64,
    quantity: i64,
) -> sqlx::Result<i64> {
    sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO CartItem (cart_id, product_id, quantity)
        VALUES (?, ?, ?)
        RETURNING cart_item_id
        "#,
    )
    .bind(cart_id)
    .bind(product_id)
    .bind(quantity)
    .fetch_one(&mut **tx)
    .await
}

/// Owner of the cart holding `cart_item_id`, if the item exists.
pub async fn item_owner_tx(
    tx: &mut Transaction<'_, Sqlite>,
    cart_item_id: i64,
) -> sqlx::Result<Option<i64>> {
    sqlx::query_scalar::<_, i64>(
        r#"
        SELECT Cart.user_id
          FROM CartItem
          JOIN Cart ON CartItem.cart_id = Cart.cart_id
         WHERE CartItem.cart_item_id = ?
        "#,
    )
    .bind(cart_item_id)
    .fetch_optional(&mut **tx)
    .await
}

pub async fn delete_item_tx(
    tx: &mut Transaction<'_, Sqlite>,
    cart_item_id: i64,
) -> sqlx::Result<u64> {
    let res = sqlx::query("DELETE FROM CartItem WHERE cart_item_id = ?")
        .bind(cart_item_id)
        .execute(&mut **tx)
        .await?;
    Ok(res.rows_affected())
}

// ---- Single statements ----

/// Move every active cart of `user_id` to `signed_out`; returns rows changed.
pub async fn sign_out_active(db: &SqlitePool, user_id: i64) -> sqlx::Result<u64> {
    let res = sqlx::query(
        r#"
        UPDATE Cart
           SET status = ?
         WHERE user_id = ? AND status = ?
        "#,
    )
    .bind(CartStatus::SignedOut)
    .bind(user_id)
    .bind(CartStatus::Active)
    .execute(db)
    .await?;
    Ok(res.rows_affected())
}

// ---- Queries ----

pub async fn find_active_cart(db: &SqlitePool, user_id: i64) -> sqlx::Result<Option<Cart>> {
    sqlx::query_as::<_, Cart>(
        r#"
        SELECT cart_id, user_id, status
          FROM Cart
         WHERE user_id = ? AND status = ?
        "#,
    )
    .bind(user_id)
    .bind(CartStatus::Active)
    .fetch_optional(db)
    .await
}

pub async fn list_items(db: &SqlitePool, cart_id: i64) -> sqlx::Result<Vec<CartItem>> {
    sqlx::query_as::<_, CartItem>(
        r#"
        SELECT cart_item_id, cart_id, product_id, quantity
          FROM CartItem
         WHERE cart_id = ?
         ORDER BY cart_item_id ASC
        "#,
    )
    .bind(cart_id)
    .fetch_all(db)
    .await
}

pub async fn list_carts_by_user(db: &SqlitePool, user_id: i64) -> sqlx::Result<Vec<Cart>> {
    sqlx::query_as::<_, Cart>(
        r#"
        SELECT cart_id, user_id, status
          FROM Cart
         WHERE user_id = ?
         ORDER BY cart_id ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await
}
