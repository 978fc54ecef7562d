//! Users as seen by the catalog service

use chrono::{DateTime, Utc};
use common::{Principal, Role};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// The caller behind a verified access token
#[derive(Debug, Clone, FromRow)]
pub struct AuthUser {
    pub id: Uuid,
    pub username: String,
    pub role: Role,
    pub is_active: bool,
    pub is_superuser: bool,
}

impl AuthUser {
    pub fn principal(&self) -> Principal {
        Principal {
            user_id: self.id,
            role: self.role,
            is_superuser: self.is_superuser,
        }
    }
}

/// Account summary for the admin listing
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct UserSummary {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub role: Role,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub date_joined: DateTime<Utc>,
}
