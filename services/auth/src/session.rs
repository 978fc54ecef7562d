//! Session management using Redis
//!
//! A user has at most one live session: the refresh token issued by the
//! latest login or refresh. Presenting any other refresh token fails.

use anyhow::Result;
use common::cache::RedisPool;
use tracing::info;
use uuid::Uuid;

/// Session manager for handling user sessions in Redis
#[derive(Clone)]
pub struct SessionManager {
    redis_pool: RedisPool,
    ttl_seconds: u64,
}

impl SessionManager {
    /// Create a new session manager; sessions live as long as a refresh token
    pub fn new(redis_pool: RedisPool, ttl_seconds: u64) -> Self {
        Self {
            redis_pool,
            ttl_seconds,
        }
    }

    fn session_key(user_id: Uuid) -> String {
        format!("session:{}", user_id)
    }

    /// Store `refresh_token` as the user's session, replacing any previous one
    pub async fn store_session(&self, user_id: Uuid, refresh_token: &str) -> Result<()> {
        info!("Storing session for user: {}", user_id);

        self.redis_pool
            .set_ex(&Self::session_key(user_id), refresh_token, self.ttl_seconds)
            .await
    }

    /// Get the current refresh token of a user
    pub async fn get_session(&self, user_id: Uuid) -> Result<Option<String>> {
        self.redis_pool.get(&Self::session_key(user_id)).await
    }

    /// Delete the session of a user
    pub async fn delete_session(&self, user_id: Uuid) -> Result<()> {
        info!("Deleting session for user: {}", user_id);

        self.redis_pool.delete(&Self::session_key(user_id)).await
    }

    /// Check that `refresh_token` is the user's current session
    pub async fn is_session_valid(&self, user_id: Uuid, refresh_token: &str) -> Result<bool> {
        let stored_token = self.get_session(user_id).await?;
        Ok(stored_token.as_deref() == Some(refresh_token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::cache::RedisConfig;

    fn manager() -> SessionManager {
        let pool = RedisPool::new(&RedisConfig {
            url: "redis://localhost:6379".to_string(),
            key_prefix: "marketplace-test".to_string(),
        })
        .unwrap();
        SessionManager::new(pool, 60)
    }

    #[test]
    fn session_keys_are_per_user() {
        let id = Uuid::nil();
        assert_eq!(
            SessionManager::session_key(id),
            "session:00000000-0000-0000-0000-000000000000"
        );
    }

    #[tokio::test]
    #[ignore = "requires a running Redis server"]
    async fn newer_session_replaces_older_one() -> Result<()> {
        let sessions = manager();
        let user_id = Uuid::new_v4();

        sessions.store_session(user_id, "first").await?;
        sessions.store_session(user_id, "second").await?;

        assert!(!sessions.is_session_valid(user_id, "first").await?);
        assert!(sessions.is_session_valid(user_id, "second").await?);

        sessions.delete_session(user_id).await?;
        assert!(!sessions.is_session_valid(user_id, "second").await?);
        Ok(())
    }
}
