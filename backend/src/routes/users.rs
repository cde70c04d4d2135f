//! User account endpoints
//!
//! `/me` is open to any authenticated caller. Listing, updating and deleting
//! other accounts require the admin role.

use crate::auth::{AdminUser, CurrentUser};
use crate::error::ApiResult;
use crate::services::UserService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use blog_admin_shared::{
    AdminUpdateUserRequest, MessageResponse, Pagination, UpdateProfileRequest, UserResponse,
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users))
        .route("/me", get(read_me).put(update_me))
        .route("/:id", get(read_user).put(update_user).delete(delete_user))
}

/// GET /api/v1/users/me
async fn read_me(current: CurrentUser) -> Json<UserResponse> {
    Json(current.user.into())
}

/// PUT /api/v1/users/me
async fn update_me(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<Json<UserResponse>> {
    let user = UserService::update_me(state.db(), &current, req).await?;
    Ok(Json(user))
}

/// GET /api/v1/users?skip=&limit=
async fn list_users(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(page): Query<Pagination>,
) -> ApiResult<Json<Vec<UserResponse>>> {
    let users = UserService::list(state.db(), &page).await?;
    Ok(Json(users))
}

/// GET /api/v1/users/:id
async fn read_user(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<UserResponse>> {
    let user = UserService::get_visible(state.db(), &current, id).await?;
    Ok(Json(user))
}

/// PUT /api/v1/users/:id
async fn update_user(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<i64>,
    Json(req): Json<AdminUpdateUserRequest>,
) -> ApiResult<Json<UserResponse>> {
    let user = UserService::update_by_admin(state.db(), &admin, id, req).await?;
    Ok(Json(user))
}

/// DELETE /api/v1/users/:id
async fn delete_user(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<MessageResponse>> {
    let message = UserService::deactivate(state.db(), &admin, id).await?;
    Ok(Json(message))
}
