//! Error type of the authentication service

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::{FieldErrors, error::DatabaseError, validation::NON_FIELD_ERRORS};
use std::error::Error as _;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Custom error type for authentication errors
#[derive(Error, Debug)]
pub enum AuthError {
    /// Missing, invalid, revoked or expired token
    #[error("Unauthorized")]
    Unauthorized,

    /// Unknown email, wrong password or inactive account
    #[error("No active account found with the given credentials")]
    InvalidCredentials,

    /// Field-scoped validation failure
    #[error("Validation failed")]
    Validation(FieldErrors),

    /// Too many login attempts
    #[error("Too many requests")]
    TooManyRequests,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Internal server error
    #[error("Internal server error")]
    InternalServerError,
}

impl From<FieldErrors> for AuthError {
    fn from(errors: FieldErrors) -> Self {
        AuthError::Validation(errors)
    }
}

impl From<JsonRejection> for AuthError {
    fn from(rejection: JsonRejection) -> Self {
        let errors = match rejection {
            JsonRejection::JsonDataError(err) => FieldErrors::from_deserialize_error(
                &err.source().map_or_else(|| err.body_text(), ToString::to_string),
            ),
            other => FieldErrors::single(NON_FIELD_ERRORS, other.body_text()),
        };
        AuthError::Validation(errors)
    }
}

impl AuthError {
    /// Log an unexpected failure and hide it behind a 500
    pub fn internal(context: &str, err: impl std::fmt::Display) -> Self {
        error!("{}: {}", context, err);
        AuthError::InternalServerError
    }

    /// Turn a unique violation on `constraint` into a field error on `field`
    pub fn unique_as_field(
        err: DatabaseError,
        constraint: &str,
        field: &str,
        message: &str,
    ) -> Self {
        match err.violated_constraint() {
            Some(violated) if violated == constraint => {
                AuthError::Validation(FieldErrors::single(field, message))
            }
            _ => AuthError::Database(err),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AuthError::Unauthorized => (StatusCode::UNAUTHORIZED, json!({"error": "Unauthorized"})),
            AuthError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                json!({"error": "No active account found with the given credentials"}),
            ),
            AuthError::Validation(fields) => (
                StatusCode::BAD_REQUEST,
                json!({"error": "Validation failed", "fields": fields}),
            ),
            AuthError::TooManyRequests => (
                StatusCode::TOO_MANY_REQUESTS,
                json!({"error": "Too many login attempts, try again later"}),
            ),
            AuthError::Database(DatabaseError::UniqueViolation { constraint }) => {
                error!("Unmapped unique violation: {}", constraint);
                (
                    StatusCode::CONFLICT,
                    json!({"error": "Resource already exists"}),
                )
            }
            AuthError::Database(err) => {
                error!("Database error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({"error": "Internal server error"}),
                )
            }
            AuthError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({"error": "Internal server error"}),
            ),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        assert_eq!(
            AuthError::Unauthorized.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::InvalidCredentials.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::Validation(FieldErrors::single("email", "bad"))
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AuthError::TooManyRequests.into_response().status(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            AuthError::Database(DatabaseError::UniqueViolation {
                constraint: "users_username_key".to_string()
            })
            .into_response()
            .status(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn known_constraint_becomes_field_error() {
        let err = AuthError::unique_as_field(
            DatabaseError::UniqueViolation {
                constraint: "users_email_key".to_string(),
            },
            "users_email_key",
            "email",
            "user with this Email already exists.",
        );
        match err {
            AuthError::Validation(fields) => assert!(fields.contains("email")),
            other => panic!("unexpected {:?}", other),
        }

        let err = AuthError::unique_as_field(
            DatabaseError::UniqueViolation {
                constraint: "users_username_key".to_string(),
            },
            "users_email_key",
            "email",
            "user with this Email already exists.",
        );
        assert!(matches!(err, AuthError::Database(_)));
    }
}
