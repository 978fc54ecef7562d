//! Category and product endpoints

use axum::{
    Extension,
    extract::State,
    http::{Method, StatusCode},
    response::IntoResponse,
};
use common::{Action, FieldErrors, Policy};
use uuid::Uuid;

use crate::{
    access::{authorize, authorize_object},
    error::{ApiError, ApiResult},
    extract::{Json, Path, Query},
    models::{
        ListQuery, ListResponse,
        catalog::{CategoryRequest, ProductQuery, ProductRequest},
        user::AuthUser,
    },
    state::AppState,
    validation::{validate_category, validate_product},
};

const CATEGORY: &str = "Category";
const PRODUCT: &str = "Product";
const CATEGORY_NAME_TAKEN: &str = "product category with this name already exists.";

fn name_taken(err: common::error::DatabaseError) -> ApiError {
    ApiError::unique_as_field(err, "product_categories_name_key", "name", CATEGORY_NAME_TAKEN)
}

/// Reject a product whose category does not exist
async fn ensure_category(state: &AppState, category_id: Uuid) -> ApiResult<()> {
    if state.category_repository.exists(category_id).await? {
        Ok(())
    } else {
        Err(FieldErrors::single(
            "category_id",
            format!("Invalid pk \"{}\" - object does not exist.", category_id),
        )
        .into())
    }
}

pub async fn list_categories(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<ListQuery>,
) -> ApiResult<impl IntoResponse> {
    authorize(Policy::VendorOrAdminWrite, &user, Action::Read)?;

    let (categories, total) = state.category_repository.list(&query).await?;
    Ok(Json(ListResponse::new(categories, &query, total)))
}

pub async fn create_category(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CategoryRequest>,
) -> ApiResult<impl IntoResponse> {
    authorize(Policy::VendorOrAdminWrite, &user, Action::Create)?;

    let fields = validate_category(&payload, None)?;
    let category = state
        .category_repository
        .create(&fields)
        .await
        .map_err(name_taken)?;

    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn get_category(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(slug): Path<String>,
) -> ApiResult<impl IntoResponse> {
    authorize(Policy::VendorOrAdminWrite, &user, Action::Read)?;

    let category = state
        .category_repository
        .find_by_slug(&slug)
        .await?
        .ok_or(ApiError::NotFound(CATEGORY))?;
    authorize_object(Policy::VendorOrAdminWrite, &user, Action::Read, None)?;

    Ok(Json(category))
}

/// PUT and PATCH; the slug stays what it was at creation
pub async fn update_category(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    method: Method,
    Path(slug): Path<String>,
    Json(payload): Json<CategoryRequest>,
) -> ApiResult<impl IntoResponse> {
    let action = Action::from_method(method.as_str());
    authorize(Policy::VendorOrAdminWrite, &user, action)?;

    let current = state
        .category_repository
        .find_by_slug(&slug)
        .await?
        .ok_or(ApiError::NotFound(CATEGORY))?;
    authorize_object(Policy::VendorOrAdminWrite, &user, action, None)?;

    let fields = validate_category(&payload, Some(&current))?;
    let category = state
        .category_repository
        .update(current.id, &fields)
        .await
        .map_err(name_taken)?;

    Ok(Json(category))
}

pub async fn delete_category(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(slug): Path<String>,
) -> ApiResult<impl IntoResponse> {
    authorize(Policy::VendorOrAdminWrite, &user, Action::Modify)?;

    let current = state
        .category_repository
        .find_by_slug(&slug)
        .await?
        .ok_or(ApiError::NotFound(CATEGORY))?;
    authorize_object(Policy::VendorOrAdminWrite, &user, Action::Modify, None)?;

    state.category_repository.delete(current.id).await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_products(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<ProductQuery>,
) -> ApiResult<impl IntoResponse> {
    authorize(Policy::VendorOwner, &user, Action::Read)?;

    let (products, total) = state.product_repository.list(&query).await?;
    Ok(Json(ListResponse::new(products, &query.pagination(), total)))
}

/// List a product under the calling vendor
pub async fn create_product(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<ProductRequest>,
) -> ApiResult<impl IntoResponse> {
    authorize(Policy::VendorOwner, &user, Action::Create)?;

    let fields = validate_product(&payload, None)?;
    ensure_category(&state, fields.category_id).await?;

    let product = state
        .product_repository
        .create(user.id, &user.username, &fields)
        .await?;

    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn get_product(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(slug): Path<String>,
) -> ApiResult<impl IntoResponse> {
    authorize(Policy::VendorOwner, &user, Action::Read)?;

    let product = state
        .product_repository
        .find_by_slug(&slug)
        .await?
        .ok_or(ApiError::NotFound(PRODUCT))?;
    authorize_object(Policy::VendorOwner, &user, Action::Read, Some(product.vendor_id))?;

    Ok(Json(product))
}

/// PUT and PATCH; the discounted price is recomputed from the merged fields
pub async fn update_product(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    method: Method,
    Path(slug): Path<String>,
    Json(payload): Json<ProductRequest>,
) -> ApiResult<impl IntoResponse> {
    let action = Action::from_method(method.as_str());
    authorize(Policy::VendorOwner, &user, action)?;

    let current = state
        .product_repository
        .find_by_slug(&slug)
        .await?
        .ok_or(ApiError::NotFound(PRODUCT))?;
    authorize_object(Policy::VendorOwner, &user, action, Some(current.vendor_id))?;

    let fields = validate_product(&payload, Some(&current))?;
    if fields.category_id != current.category_id {
        ensure_category(&state, fields.category_id).await?;
    }

    let product = state.product_repository.update(current.id, &fields).await?;

    Ok(Json(product))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(slug): Path<String>,
) -> ApiResult<impl IntoResponse> {
    authorize(Policy::VendorOwner, &user, Action::Modify)?;

    let current = state
        .product_repository
        .find_by_slug(&slug)
        .await?
        .ok_or(ApiError::NotFound(PRODUCT))?;
    authorize_object(Policy::VendorOwner, &user, Action::Modify, Some(current.vendor_id))?;

    state.product_repository.delete(current.id).await?;

    Ok(StatusCode::NO_CONTENT)
}
