//! User address endpoints

use axum::{
    Extension,
    extract::State,
    http::{Method, StatusCode},
    response::IntoResponse,
};
use common::{Action, Policy};
use uuid::Uuid;

use crate::{
    access::{authorize, authorize_object},
    error::{ApiError, ApiResult},
    extract::{Json, Path, Query},
    models::{ListQuery, ListResponse, address::UserAddressRequest, user::AuthUser},
    state::AppState,
    validation::validate_address,
};

const POLICY: Policy = Policy::CustomerOrVendorOwner;
const ADDRESS: &str = "Address";

pub async fn list_addresses(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<ListQuery>,
) -> ApiResult<impl IntoResponse> {
    authorize(POLICY, &user, Action::Read)?;

    let (addresses, total) = state.address_repository.list(&query).await?;
    Ok(Json(ListResponse::new(addresses, &query, total)))
}

/// Create the caller's own address
pub async fn create_address(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<UserAddressRequest>,
) -> ApiResult<impl IntoResponse> {
    authorize(POLICY, &user, Action::Create)?;

    let fields = validate_address(&payload, None)?;
    let address = state
        .address_repository
        .create(user.id, &fields)
        .await
        .map_err(|e| {
            ApiError::unique_as_field(
                e,
                "user_addresses_pkey",
                "user_id",
                "user address with this user already exists.",
            )
        })?;

    Ok((StatusCode::CREATED, Json(address)))
}

pub async fn get_address(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    authorize(POLICY, &user, Action::Read)?;

    let address = state
        .address_repository
        .find(user_id)
        .await?
        .ok_or(ApiError::NotFound(ADDRESS))?;
    authorize_object(POLICY, &user, Action::Read, Some(address.user_id))?;

    Ok(Json(address))
}

/// PUT and PATCH
pub async fn update_address(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    method: Method,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<UserAddressRequest>,
) -> ApiResult<impl IntoResponse> {
    let action = Action::from_method(method.as_str());
    authorize(POLICY, &user, action)?;

    let current = state
        .address_repository
        .find(user_id)
        .await?
        .ok_or(ApiError::NotFound(ADDRESS))?;
    authorize_object(POLICY, &user, action, Some(current.user_id))?;

    let fields = validate_address(&payload, Some(&current))?;
    let address = state
        .address_repository
        .update(current.user_id, &fields)
        .await?;

    Ok(Json(address))
}

pub async fn delete_address(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    authorize(POLICY, &user, Action::Modify)?;

    let current = state
        .address_repository
        .find(user_id)
        .await?
        .ok_or(ApiError::NotFound(ADDRESS))?;
    authorize_object(POLICY, &user, Action::Modify, Some(current.user_id))?;

    state.address_repository.delete(current.user_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
