//! User repository for database operations

use anyhow::Result;
use common::{error::DatabaseResult, slug};
use sqlx::PgPool;
use std::collections::HashSet;
use tracing::info;
use uuid::Uuid;

use crate::models::{NewUser, UpdateUser, User};

const USER_COLUMNS: &str = "id, email, username, password_hash, role, is_active, is_staff, \
                            is_superuser, last_login, date_joined, updated_at";

/// User repository
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Pick a free username derived from the email's local part
    async fn derive_username(&self, email: &str) -> DatabaseResult<String> {
        let base = slug::username_base(email);

        let taken: HashSet<String> = sqlx::query_scalar(
            r#"
            SELECT username FROM users
            WHERE left(username, length($1)) = $1
            "#,
        )
        .bind(&base)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .collect();

        Ok(slug::first_available(&base, "", &taken))
    }

    /// Create a new user, deriving the username when none is given
    pub async fn create(&self, new_user: &NewUser) -> DatabaseResult<User> {
        let username = match &new_user.username {
            Some(username) => username.clone(),
            None => self.derive_username(&new_user.email).await?,
        };
        info!("Creating new user: {}", username);

        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (email, username, password_hash, role, is_staff, is_superuser)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&new_user.email)
        .bind(&username)
        .bind(&new_user.password_hash)
        .bind(new_user.role)
        .bind(new_user.is_staff)
        .bind(new_user.is_superuser)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Create a superuser, enforcing the role/staff/superuser invariant
    pub async fn create_superuser(&self, new_user: &NewUser) -> Result<User> {
        new_user
            .check_superuser_flags()
            .map_err(|message| anyhow::anyhow!(message))?;
        Ok(self.create(new_user).await?)
    }

    /// Find a user by email
    pub async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find a user by ID
    pub async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Apply an account update; absent fields keep their value
    pub async fn update(&self, id: Uuid, update: &UpdateUser) -> DatabaseResult<User> {
        info!("Updating user: {}", id);

        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET email = COALESCE($2, email),
                username = COALESCE($3, username),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(update.email.as_deref())
        .bind(update.username.as_deref())
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Replace the password hash of a user
    pub async fn set_password_hash(&self, id: Uuid, password_hash: &str) -> DatabaseResult<()> {
        info!("Changing password of user: {}", id);

        sqlx::query("UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Stamp a successful login
    pub async fn record_login(&self, id: Uuid) -> DatabaseResult<()> {
        sqlx::query("UPDATE users SET last_login = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Soft-delete a user; returns false if no such user exists
    pub async fn deactivate(&self, id: Uuid) -> DatabaseResult<bool> {
        info!("Deactivating user: {}", id);

        let result = sqlx::query(
            "UPDATE users SET is_active = FALSE, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
