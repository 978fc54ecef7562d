//! Custom error types for the API service

use axum::{
    Json,
    extract::{
        path::ErrorKind,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::{FieldErrors, error::DatabaseError, validation::NON_FIELD_ERRORS};
use std::error::Error as _;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Custom error type for the API service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Missing, invalid or revoked token, or an unknown/inactive account
    #[error("Unauthorized")]
    Unauthorized,

    /// Authenticated, but the policy denies the action
    #[error("Forbidden")]
    Forbidden,

    /// The addressed resource does not exist
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Field-scoped validation failure
    #[error("Validation failed")]
    Validation(FieldErrors),

    /// Internal server error
    #[error("Internal server error")]
    InternalServerError,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

impl From<FieldErrors> for ApiError {
    fn from(errors: FieldErrors) -> Self {
        ApiError::Validation(errors)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let errors = match rejection {
            JsonRejection::JsonDataError(err) => FieldErrors::from_deserialize_error(
                &err.source().map_or_else(|| err.body_text(), ToString::to_string),
            ),
            other => FieldErrors::single(NON_FIELD_ERRORS, other.body_text()),
        };
        ApiError::Validation(errors)
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        let errors = match rejection {
            QueryRejection::FailedToDeserializeQueryString(err) => {
                FieldErrors::from_deserialize_error(
                    &err.source().map_or_else(|| err.body_text(), ToString::to_string),
                )
            }
            other => FieldErrors::single(NON_FIELD_ERRORS, other.body_text()),
        };
        ApiError::Validation(errors)
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        match rejection {
            PathRejection::FailedToDeserializePathParams(err) => {
                let errors = match err.kind() {
                    ErrorKind::ParseErrorAtKey { key, value, .. } => FieldErrors::single(
                        key,
                        format!("\"{}\" is not a valid identifier.", value),
                    ),
                    ErrorKind::ParseError { value, .. } => FieldErrors::single(
                        NON_FIELD_ERRORS,
                        format!("\"{}\" is not a valid identifier.", value),
                    ),
                    _ => FieldErrors::single(NON_FIELD_ERRORS, err.body_text()),
                };
                ApiError::Validation(errors)
            }
            other => ApiError::internal("Path extraction failed", other.body_text()),
        }
    }
}

impl ApiError {
    /// Log an unexpected failure and hide it behind a 500
    pub fn internal(context: &str, err: impl std::fmt::Display) -> Self {
        error!("{}: {}", context, err);
        ApiError::InternalServerError
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
                ApiError::Validation(FieldErrors::single(field, message))
            }
            _ => ApiError::Database(err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, json!({"error": "Unauthorized"})),
            ApiError::Forbidden => (StatusCode::FORBIDDEN, json!({"error": "Forbidden"})),
            ApiError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                json!({"error": format!("{} not found", resource)}),
            ),
            ApiError::Validation(fields) => (
                StatusCode::BAD_REQUEST,
                json!({"error": "Validation failed", "fields": fields}),
            ),
            ApiError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({"error": "Internal server error"}),
            ),
            ApiError::Database(DatabaseError::UniqueViolation { constraint }) => {
                error!("Unmapped unique violation: {}", constraint);
                (
                    StatusCode::CONFLICT,
                    json!({"error": "Resource already exists"}),
                )
            }
            ApiError::Database(err) => {
                error!("Database error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({"error": "Internal server error"}),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        assert_eq!(
            ApiError::Unauthorized.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Forbidden.into_response().status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::NotFound("Product").into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Validation(FieldErrors::single("price", "bad"))
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Database(DatabaseError::UniqueViolation {
                constraint: "products_slug_key".to_string()
            })
            .into_response()
            .status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::Database(DatabaseError::Configuration("boom".to_string()))
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn not_found_names_the_resource() {
        let response = ApiError::NotFound("Category").into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Category not found");
    }

    #[test]
    fn known_constraint_becomes_field_error() {
        let err = ApiError::unique_as_field(
            DatabaseError::UniqueViolation {
                constraint: "product_categories_name_key".to_string(),
            },
            "product_categories_name_key",
            "name",
            "product category with this name already exists.",
        );
        assert!(matches!(err, ApiError::Validation(ref fields) if fields.contains("name")));
    }
}
