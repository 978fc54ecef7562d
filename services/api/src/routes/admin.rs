//! Superuser-only account listing

use axum::{
    Extension,
    extract::State,
    response::IntoResponse,
};
use common::{Action, Policy};
use uuid::Uuid;

use crate::{
    access::{authorize, authorize_object},
    error::{ApiError, ApiResult},
    extract::{Json, Path, Query},
    models::{ListQuery, ListResponse, user::AuthUser},
    state::AppState,
};

pub async fn list_users(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<ListQuery>,
) -> ApiResult<impl IntoResponse> {
    authorize(Policy::SuperuserReadOnly, &user, Action::Read)?;

    let (users, total) = state.user_repository.list(&query).await?;
    Ok(Json(ListResponse::new(users, &query, total)))
}

pub async fn get_user(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    authorize(Policy::SuperuserReadOnly, &user, Action::Read)?;

    let account = state
        .user_repository
        .find_by_id(id)
        .await?
        .ok_or(ApiError::NotFound("User"))?;
    authorize_object(Policy::SuperuserReadOnly, &user, Action::Read, Some(account.id))?;

    Ok(Json(account))
}
