use std::{str::FromStr, time::Duration};

use anyhow::Context;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};

use crate::config::AppConfig;

/// Opens the pool described by `config`, creating the database file if missing.
///
/// Foreign-key enforcement follows `DB_FOREIGN_KEYS`; it is off by default so
/// carts may reference users and products that were never inserted.
pub async fn connect(config: &AppConfig) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&config.database_url)
        .with_context(|| format!("parse database url {}", config.database_url))?
        .create_if_missing(true)
        .foreign_keys(config.db.foreign_keys)
        .busy_timeout(Duration::from_secs(config.db.busy_timeout_secs));

    let db = SqlitePoolOptions::new()
        .max_connections(config.db.max_connections)
        .connect_with(options)
        .await
        .context("connect to database")?;

    tracing::debug!(
        url = %config.database_url,
        foreign_keys = config.db.foreign_keys,
        "database pool ready"
    );
    Ok(db)
}

/// Creates the User, Product, Cart and CartItem tables if they do not exist.
///
/// Safe to call repeatedly, and safe against a database file that already
/// holds these tables without any migration bookkeeping.
pub async fn init_schema(db: &SqlitePool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations")
        .run(db)
        .await
        .context("initialize schema")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DbConfig;

    fn config_for(path: &std::path::Path) -> AppConfig {
        AppConfig {
            database_url: format!("sqlite://{}", path.display()),
            db: DbConfig {
                max_connections: 2,
                foreign_keys: false,
                busy_timeout_secs: 1,
            },
        }
    }

    async fn table_names(db: &SqlitePool) -> Vec<String> {
        sqlx::query_scalar::<_, String>(
            r#"
            SELECT name FROM sqlite_master
             WHERE type = 'table' AND name NOT LIKE '\_%' ESCAPE '\' AND name NOT LIKE 'sqlite%'
             ORDER BY name
            "#,
        )
        .fetch_all(db)
        .await
        .expect("list tables")
    }

    #[tokio::test]
    async fn init_schema_creates_tables_and_is_idempotent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let db = connect(&config_for(&dir.path().join("shop.db")))
            .await
            .expect("connect");

        init_schema(&db).await.expect("first init");
        init_schema(&db).await.expect("second init");

        assert_eq!(
            table_names(&db).await,
            vec!["Cart", "CartItem", "Product", "User"]
        );
    }

    #[tokio::test]
    async fn init_schema_accepts_preexisting_tables() {
        let dir = tempfile::tempdir().expect("tempdir");
        let db = connect(&config_for(&dir.path().join("legacy.db")))
            .await
            .expect("connect");

        // a file laid out by an earlier tool, without migration bookkeeping
        sqlx::query(
            r#"CREATE TABLE Cart (
                   cart_id INTEGER PRIMARY KEY,
                   user_id INTEGER NOT NULL,
                   status TEXT NOT NULL DEFAULT 'active'
               )"#,
        )
        .execute(&db)
        .await
        .expect("legacy table");
        sqlx::query("INSERT INTO Cart (user_id, status) VALUES (7, 'signed_out')")
            .execute(&db)
            .await
            .expect("legacy row");

        init_schema(&db).await.expect("init over legacy file");

        let carts: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM Cart")
            .fetch_one(&db)
            .await
            .expect("count");
        assert_eq!(carts, 1);
        assert_eq!(table_names(&db).await.len(), 4);
    }

    #[tokio::test]
    async fn init_schema_keeps_newest_of_duplicate_active_carts() {
        let dir = tempfile::tempdir().expect("tempdir");
        let db = connect(&config_for(&dir.path().join("raced.db")))
            .await
            .expect("connect");

        // two concurrent first adds could each open a cart for the same user
        sqlx::query(
            r#"CREATE TABLE Cart (
                   cart_id INTEGER PRIMARY KEY,
                   user_id INTEGER NOT NULL,
                   status TEXT NOT NULL DEFAULT 'active'
               )"#,
        )
        .execute(&db)
        .await
        .expect("legacy table");
        sqlx::query(
            r#"INSERT INTO Cart (cart_id, user_id, status)
               VALUES (1, 1, 'active'), (2, 1, 'active'), (3, 2, 'active'), (4, 1, 'signed_out')"#,
        )
        .execute(&db)
        .await
        .expect("legacy rows");

        init_schema(&db).await.expect("init over duplicate active carts");

        let rows: Vec<(i64, String)> =
            sqlx::query_as("SELECT cart_id, status FROM Cart ORDER BY cart_id")
                .fetch_all(&db)
                .await
                .expect("carts");
        let rows: Vec<(i64, &str)> = rows.iter().map(|(id, s)| (*id, s.as_str())).collect();
        assert_eq!(
            rows,
            vec![
                (1, "signed_out"),
                (2, "active"),
                (3, "active"),
                (4, "signed_out"),
            ]
        );
    }

    #[tokio::test]
    async fn connect_creates_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("fresh.db");
        assert!(!path.exists());
        let db = connect(&config_for(&path)).await.expect("connect");
        init_schema(&db).await.expect("init");
        assert!(path.exists());
    }
}
