//! Extractors whose rejections come back as field errors

use axum::{
    extract::{FromRequest, FromRequestParts},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::error::ApiError;

/// `axum::Json` rejecting with [`ApiError::Validation`]
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct Path<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct Query<T>(pub T);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ListQuery, catalog::ProductRequest};
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
        routing::{get, post},
    };
    use serde_json::Value;
    use tower::ServiceExt;
    use uuid::Uuid;

    fn app() -> Router {
        Router::new()
            .route(
                "/products",
                post(|Json(payload): Json<ProductRequest>| async move {
                    Json(payload.name)
                })
                .get(|Query(query): Query<ListQuery>| async move {
                    Json(query.page())
                }),
            )
            .route(
                "/vendor-profile/:user_id",
                get(|Path(user_id): Path<Uuid>| async move { Json(user_id) }),
            )
    }

    async fn fields(request: Request<Body>) -> Value {
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Validation failed");
        body["fields"].clone()
    }

    fn post_json(body: &str) -> Request<Body> {
        Request::post("/products")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn wrongly_typed_body_fields_are_keyed() {
        let errors = fields(post_json(r#"{"name": "Mug", "price": "cheap"}"#)).await;
        assert!(errors["price"].is_array());

        let errors = fields(post_json(r#"{"category_id": "nope"}"#)).await;
        assert!(errors["category_id"].is_array());
    }

    #[tokio::test]
    async fn unparsable_body_is_a_non_field_error() {
        let errors = fields(post_json("{")).await;
        assert!(errors["non_field_errors"].is_array());

        let request = Request::post("/products")
            .body(Body::from(r#"{"name": "Mug"}"#))
            .unwrap();
        let errors = fields(request).await;
        assert!(errors["non_field_errors"].is_array());
    }

    #[tokio::test]
    async fn bad_query_and_path_values_are_field_errors() {
        let request = Request::get("/products?page=abc").body(Body::empty()).unwrap();
        assert!(fields(request).await.is_object());

        let request = Request::get("/vendor-profile/not-a-uuid")
            .body(Body::empty())
            .unwrap();
        assert!(fields(request).await.is_object());
    }

    #[tokio::test]
    async fn valid_input_passes_through() {
        let response = app()
            .oneshot(post_json(r#"{"name": "Mug", "price": "12.50"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let id = Uuid::new_v4();
        let response = app()
            .oneshot(
                Request::get(format!("/vendor-profile/{}", id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
