//! Policy checks for handlers
//!
//! Handlers call [`authorize`] before touching storage and
//! [`authorize_object`] once the target row is loaded; either one failing
//! stops the request before any write.

use common::{Action, Policy};
use tracing::warn;
use uuid::Uuid;

use crate::{error::ApiError, models::user::AuthUser};

pub fn authorize(policy: Policy, user: &AuthUser, action: Action) -> Result<(), ApiError> {
    if policy.has_permission(Some(&user.principal()), action) {
        Ok(())
    } else {
        warn!("{:?} denied {:?} to user {}", policy, action, user.id);
        Err(ApiError::Forbidden)
    }
}

pub fn authorize_object(
    policy: Policy,
    user: &AuthUser,
    action: Action,
    owner: Option<Uuid>,
) -> Result<(), ApiError> {
    if policy.has_object_permission(Some(&user.principal()), action, owner) {
        Ok(())
    } else {
        warn!(
            "{:?} denied {:?} on an object of {:?} to user {}",
            policy, action, owner, user.id
        );
        Err(ApiError::Forbidden)
    }
}
