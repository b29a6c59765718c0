use crate::config::AppConfig;
use crate::db;
use sqlx::SqlitePool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Opens the store and runs schema setup once.
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let config = Arc::new(config);
        let db = db::connect(&config).await?;
        db::init_schema(&db).await?;
        Ok(Self { db, config })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::AppState;
    use crate::config::{AppConfig, DbConfig};

    /// Fresh schema in a throwaway file; keep the `TempDir` alive for the test.
    pub(crate) async fn fresh_state() -> (tempfile::TempDir, AppState) {
        fresh_state_with(false).await
    }

    pub(crate) async fn fresh_state_with(foreign_keys: bool) -> (tempfile::TempDir, AppState) {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = AppConfig {
            database_url: format!("sqlite://{}", dir.path().join("shop.db").display()),
            db: DbConfig {
                max_connections: 4,
                foreign_keys,
                busy_timeout_secs: 5,
            },
        };
        let state = AppState::init(config).await.expect("state init");
        (dir, state)
    }
}
