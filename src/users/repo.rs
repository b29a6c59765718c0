use anyhow::Context;
use sqlx::SqlitePool;

use super::password::{hash_password, is_valid_email};
use super::repo_types::User;

impl User {
    /// Insert a user, storing an Argon2 hash of `password`.
    ///
    /// Duplicate usernames or emails are rejected by the table's unique constraints.
    pub async fn create(
        db: &SqlitePool,
        username: &str,
        password: &str,
        email: &str,
    ) -> anyhow::Result<User> {
        let email = email.trim().to_lowercase();
        anyhow::ensure!(is_valid_email(&email), "invalid email: {email}");
        let hash = hash_password(password)?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO User (username, password, email)
            VALUES (?, ?, ?)
            RETURNING user_id, username, password, email
            "#,
        )
        .bind(username)
        .bind(&hash)
        .bind(&email)
        .fetch_one(db)
        .await
        .with_context(|| format!("insert user {username}"))?;
        Ok(user)
    }

    pub async fn find_by_id(db: &SqlitePool, user_id: i64) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, username, password, email
            FROM User
            WHERE user_id = ?
            "#,
        )
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// False for rows written by older tools that stored the password as is.
    pub fn password_is_hashed(&self) -> bool {
        self.password.starts_with("$argon2")
    }
}
