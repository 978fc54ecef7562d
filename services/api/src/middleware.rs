//! Authentication middleware for JWT token validation

use anyhow::Result;
use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use common::token::{TokenType, TokenVerifier, blacklist_key, load_pem};
use tracing::{error, warn};

use crate::{error::ApiError, state::AppState};

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Public key for verifying tokens
    pub public_key: String,
}

impl JwtConfig {
    /// Create a new JwtConfig from environment variables
    ///
    /// # Environment Variables
    /// - `JWT_PUBLIC_KEY`: public key (PEM format) or path to the public key file
    pub fn from_env() -> Result<Self> {
        let public_key = std::env::var("JWT_PUBLIC_KEY")
            .map_err(|_| anyhow::anyhow!("JWT_PUBLIC_KEY environment variable not set"))?;
        let public_key = load_pem(&public_key, env!("CARGO_MANIFEST_DIR"))?;

        Ok(JwtConfig { public_key })
    }

    pub fn verifier(&self) -> Result<TokenVerifier> {
        TokenVerifier::from_rsa_pem(&self.public_key)
    }
}

/// Authentication middleware
///
/// Accepts an unrevoked access token whose user still exists and is active,
/// and hands the user to the handlers as an [`crate::models::user::AuthUser`]
/// extension.
pub async fn auth_middleware(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let TypedHeader(Authorization(bearer)) = bearer.ok_or(ApiError::Unauthorized)?;
    let token = bearer.token();

    let claims = state
        .token_verifier
        .verify(token, TokenType::Access)
        .map_err(|e| {
            warn!("Failed to validate token: {}", e);
            ApiError::Unauthorized
        })?;

    let is_blacklisted = state
        .redis_pool
        .exists(&blacklist_key(token))
        .await
        .map_err(|e| ApiError::internal("Failed to check if token is blacklisted", e))?;
    if is_blacklisted {
        return Err(ApiError::Unauthorized);
    }

    let user = match state.user_repository.find_auth_user(claims.sub).await {
        Ok(Some(user)) if user.is_active => user,
        Ok(_) => return Err(ApiError::Unauthorized),
        Err(e) => {
            error!("Failed to load user {}: {}", claims.sub, e);
            return Err(ApiError::InternalServerError);
        }
    };

    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}
