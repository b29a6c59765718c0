use serde::Deserialize;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://shopping_website.db";

#[derive(Debug, Clone, Deserialize)]
pub struct DbConfig {
    pub max_connections: u32,
    pub foreign_keys: bool,
    pub busy_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub db: DbConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key/value source; `from_env` passes the process env.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.into());
        check_database_url(&database_url)?;

        let db = DbConfig {
            max_connections: lookup("DB_MAX_CONNECTIONS")
                .and_then(|v| v.parse::<u32>().ok())
                .filter(|n| *n > 0)
                .unwrap_or(5),
            foreign_keys: lookup("DB_FOREIGN_KEYS")
                .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
                .unwrap_or(false),
            busy_timeout_secs: lookup("DB_BUSY_TIMEOUT_SECS")
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(5),
        };
        Ok(Self { database_url, db })
    }

    /// Replaces the database url, e.g. with a `--database-url` flag.
    pub fn with_database_url(mut self, database_url: String) -> anyhow::Result<Self> {
        check_database_url(&database_url)?;
        self.database_url = database_url;
        Ok(self)
    }
}

fn check_database_url(url: &str) -> anyhow::Result<()> {
    anyhow::ensure!(
        url.starts_with("sqlite:"),
        "DATABASE_URL must be a sqlite url, got {url}"
    );
    Ok(())
}
