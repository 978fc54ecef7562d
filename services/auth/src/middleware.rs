//! Middleware for JWT token validation and authentication

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use common::token::{Claims, TokenType};
use tracing::error;

use crate::{AppState, error::AuthError};

/// The verified access token of the current request
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub claims: Claims,
    pub token: String,
}

/// Extract and validate the bearer access token
pub async fn auth_middleware(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let TypedHeader(Authorization(bearer)) = bearer.ok_or(AuthError::Unauthorized)?;
    let token = bearer.token();

    let claims = state
        .jwt_service
        .validate_token(token, TokenType::Access)
        .map_err(|e| {
            error!("Failed to validate token: {}", e);
            AuthError::Unauthorized
        })?;

    let is_blacklisted = state
        .jwt_service
        .is_token_blacklisted(&state.redis_pool, token)
        .await
        .map_err(|e| AuthError::internal("Failed to check if token is blacklisted", e))?;

    if is_blacklisted {
        return Err(AuthError::Unauthorized);
    }

    req.extensions_mut().insert(AuthSession {
        claims,
        token: token.to_string(),
    });

    Ok(next.run(req).await)
}
