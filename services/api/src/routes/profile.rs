//! Vendor and customer profile endpoints

use axum::{
    Extension,
    extract::State,
    http::{Method, StatusCode},
    response::IntoResponse,
};
use chrono::Utc;
use common::{Action, Policy};
use uuid::Uuid;

use crate::{
    access::{authorize, authorize_object},
    error::{ApiError, ApiResult},
    extract::{Json, Path, Query},
    models::{
        ListQuery, ListResponse,
        profile::{CustomerProfileRequest, CustomerProfileResponse, VendorProfileRequest},
        user::AuthUser,
    },
    state::AppState,
    validation::{validate_customer_profile, validate_vendor_profile},
};

const VENDOR_PROFILE: &str = "Vendor profile";
const CUSTOMER_PROFILE: &str = "Customer profile";

pub async fn list_vendor_profiles(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<ListQuery>,
) -> ApiResult<impl IntoResponse> {
    authorize(Policy::VendorOwner, &user, Action::Read)?;

    let (profiles, total) = state.vendor_profile_repository.list(&query).await?;
    Ok(Json(ListResponse::new(profiles, &query, total)))
}

/// Create the caller's own vendor profile
pub async fn create_vendor_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<VendorProfileRequest>,
) -> ApiResult<impl IntoResponse> {
    authorize(Policy::VendorOwner, &user, Action::Create)?;

    let fields = validate_vendor_profile(&payload, None)?;
    let profile = state
        .vendor_profile_repository
        .create(user.id, &fields)
        .await
        .map_err(|e| {
            ApiError::unique_as_field(
                e,
                "vendor_profiles_pkey",
                "user_id",
                "vendor profile with this user already exists.",
            )
        })?;

    Ok((StatusCode::CREATED, Json(profile)))
}

pub async fn get_vendor_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    authorize(Policy::VendorOwner, &user, Action::Read)?;

    let profile = state
        .vendor_profile_repository
        .find(user_id)
        .await?
        .ok_or(ApiError::NotFound(VENDOR_PROFILE))?;
    authorize_object(Policy::VendorOwner, &user, Action::Read, Some(profile.user_id))?;

    Ok(Json(profile))
}

/// PUT and PATCH
pub async fn update_vendor_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    method: Method,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<VendorProfileRequest>,
) -> ApiResult<impl IntoResponse> {
    let action = Action::from_method(method.as_str());
    authorize(Policy::VendorOwner, &user, action)?;

    let current = state
        .vendor_profile_repository
        .find(user_id)
        .await?
        .ok_or(ApiError::NotFound(VENDOR_PROFILE))?;
    authorize_object(Policy::VendorOwner, &user, action, Some(current.user_id))?;

    let fields = validate_vendor_profile(&payload, Some(&current))?;
    let profile = state
        .vendor_profile_repository
        .update(current.user_id, &fields)
        .await?;

    Ok(Json(profile))
}

pub async fn delete_vendor_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    authorize(Policy::VendorOwner, &user, Action::Modify)?;

    let current = state
        .vendor_profile_repository
        .find(user_id)
        .await?
        .ok_or(ApiError::NotFound(VENDOR_PROFILE))?;
    authorize_object(Policy::VendorOwner, &user, Action::Modify, Some(current.user_id))?;

    state
        .vendor_profile_repository
        .delete(current.user_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_customer_profiles(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<ListQuery>,
) -> ApiResult<impl IntoResponse> {
    authorize(Policy::CustomerOwner, &user, Action::Read)?;

    let today = Utc::now().date_naive();
    let (profiles, total) = state.customer_profile_repository.list(&query).await?;
    let profiles: Vec<_> = profiles
        .into_iter()
        .map(|profile| CustomerProfileResponse::new(profile, today))
        .collect();

    Ok(Json(ListResponse::new(profiles, &query, total)))
}

/// Create the caller's own customer profile
pub async fn create_customer_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CustomerProfileRequest>,
) -> ApiResult<impl IntoResponse> {
    authorize(Policy::CustomerOwner, &user, Action::Create)?;

    let today = Utc::now().date_naive();
    let fields = validate_customer_profile(&payload, None, today)?;
    let profile = state
        .customer_profile_repository
        .create(user.id, &fields)
        .await
        .map_err(|e| {
            ApiError::unique_as_field(
                e,
                "customer_profiles_pkey",
                "user_id",
                "customer profile with this user already exists.",
            )
        })?;

    Ok((
        StatusCode::CREATED,
        Json(CustomerProfileResponse::new(profile, today)),
    ))
}

pub async fn get_customer_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    authorize(Policy::CustomerOwner, &user, Action::Read)?;

    let profile = state
        .customer_profile_repository
        .find(user_id)
        .await?
        .ok_or(ApiError::NotFound(CUSTOMER_PROFILE))?;
    authorize_object(Policy::CustomerOwner, &user, Action::Read, Some(profile.user_id))?;

    Ok(Json(CustomerProfileResponse::new(
        profile,
        Utc::now().date_naive(),
    )))
}

/// PUT and PATCH
pub async fn update_customer_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    method: Method,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<CustomerProfileRequest>,
) -> ApiResult<impl IntoResponse> {
    let action = Action::from_method(method.as_str());
    authorize(Policy::CustomerOwner, &user, action)?;

    let current = state
        .customer_profile_repository
        .find(user_id)
        .await?
        .ok_or(ApiError::NotFound(CUSTOMER_PROFILE))?;
    authorize_object(Policy::CustomerOwner, &user, action, Some(current.user_id))?;

    let today = Utc::now().date_naive();
    let fields = validate_customer_profile(&payload, Some(&current), today)?;
    let profile = state
        .customer_profile_repository
        .update(current.user_id, &fields)
        .await?;

    Ok(Json(CustomerProfileResponse::new(profile, today)))
}

pub async fn delete_customer_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    authorize(Policy::CustomerOwner, &user, Action::Modify)?;

    let current = state
        .customer_profile_repository
        .find(user_id)
        .await?
        .ok_or(ApiError::NotFound(CUSTOMER_PROFILE))?;
    authorize_object(Policy::CustomerOwner, &user, Action::Modify, Some(current.user_id))?;

    state
        .customer_profile_repository
        .delete(current.user_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
