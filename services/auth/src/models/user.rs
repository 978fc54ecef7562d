//! User model and related functionality

use chrono::{DateTime, Utc};
use common::Role;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// User entity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub date_joined: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New user creation payload
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub username: Option<String>,
    pub password_hash: String,
    pub role: Role,
    pub is_staff: bool,
    pub is_superuser: bool,
}

impl NewUser {
    /// A regular account; the username is derived from the email on insert.
    pub fn new(email: &str, password_hash: &str, role: Role) -> Self {
        Self {
            email: normalize_email(email),
            username: None,
            password_hash: password_hash.to_string(),
            role,
            is_staff: false,
            is_superuser: false,
        }
    }

    /// A superuser account with the flags the invariant requires.
    pub fn superuser(email: &str, password_hash: &str) -> Self {
        Self {
            is_staff: true,
            is_superuser: true,
            ..Self::new(email, password_hash, Role::Administrator)
        }
    }

    /// Superusers must be staff administrators; each broken flag has its own message.
    pub fn check_superuser_flags(&self) -> Result<(), String> {
        if self.role != Role::Administrator {
            return Err("Superuser must have role of Administrator.".to_string());
        }
        if !self.is_staff {
            return Err("Superuser must have is_staff=True.".to_string());
        }
        if !self.is_superuser {
            return Err("Superuser must have is_superuser=True.".to_string());
        }
        Ok(())
    }
}

/// User update payload
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateUser {
    pub email: Option<String>,
    pub username: Option<String>,
}

impl UpdateUser {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.username.is_none()
    }
}

/// Lower-case the domain part of an email, keeping the local part as typed.
pub fn normalize_email(email: &str) -> String {
    let email = email.trim();
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{}@{}", local, domain.to_lowercase()),
        None => email.to_string(),
    }
}
