use anyhow::Context;
use sqlx::SqlitePool;

use super::repo_types::Product;

impl Product {
    pub async fn create(
        db: &SqlitePool,
        name: &str,
        description: Option<&str>,
        price: f64,
    ) -> anyhow::Result<Product> {
        anyhow::ensure!(price.is_finite(), "price must be a finite number");

        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO Product (name, description, price)
            VALUES (?, ?, ?)
            RETURNING product_id, name, description, price
            "#,
        )
        .bind(name)
        .bind(description)
        .bind(price)
        .fetch_one(db)
        .await
        .with_context(|| format!("insert product {name}"))?;
        Ok(product)
    }

    pub async fn find_by_id(db: &SqlitePool, product_id: i64) -> anyhow::Result<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT product_id, name, description, price
            FROM Product
            WHERE product_id = ?
            "#,
        )
        .bind(product_id)
        .fetch_optional(db)
        .await?;
        Ok(product)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::testing::fresh_state;

    #[tokio::test]
    async fn create_and_find() {
        let (_dir, state) = fresh_state().await;
        let tea = Product::create(&state.db, "Tea", Some("loose leaf"), 4.5)
            .await
            .expect("create");
        let cup = Product::create(&state.db, "Cup", None, 12.0)
            .await
            .expect("create");
        assert_ne!(tea.product_id, cup.product_id);

        let found = Product::find_by_id(&state.db, tea.product_id)
            .await
            .expect("find")
            .expect("present");
        assert_eq!(found, tea);
        assert_eq!(found.description.as_deref(), Some("loose leaf"));

        let cup = Product::find_by_id(&state.db, cup.product_id)
            .await
            .expect("find")
            .expect("present");
        assert!(cup.description.is_none());
    }

    #[tokio::test]
    async fn rejects_nan_price() {
        let (_dir, state) = fresh_state().await;
        let err = Product::create(&state.db, "Ghost", None, f64::NAN)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("finite"));
    }
}
