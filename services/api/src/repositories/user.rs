//! Read access to user accounts

use common::error::DatabaseResult;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{
    ListQuery,
    user::{AuthUser, UserSummary},
};

const SUMMARY_COLUMNS: &str =
    "id, email, username, role, is_active, is_staff, is_superuser, last_login, date_joined";

/// User repository for database operations
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Load the fields needed to authorize a request
    pub async fn find_auth_user(&self, id: Uuid) -> DatabaseResult<Option<AuthUser>> {
        let user = sqlx::query_as::<_, AuthUser>(
            "SELECT id, username, role, is_active, is_superuser FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Page through all accounts, newest first
    pub async fn list(&self, query: &ListQuery) -> DatabaseResult<(Vec<UserSummary>, i64)> {
        let users = sqlx::query_as::<_, UserSummary>(&format!(
            r#"
            SELECT {SUMMARY_COLUMNS}
            FROM users
            ORDER BY date_joined DESC
            LIMIT $1 OFFSET $2
            "#
        ))
        .bind(query.limit() as i64)
        .bind(query.offset())
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok((users, total))
    }

    /// Find an account by ID
    pub async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<UserSummary>> {
        let user = sqlx::query_as::<_, UserSummary>(&format!(
            "SELECT {SUMMARY_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}
