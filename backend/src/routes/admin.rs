//! Admin-only dashboard and account creation

use crate::auth::AdminUser;
use crate::error::ApiResult;
use crate::services::UserService;
use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use blog_admin_shared::{AdminCreateUserRequest, DashboardResponse, UserResponse, UserStats};

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/users", post(create_user))
        .route("/users/stats", get(user_stats))
}

/// GET /api/v1/admin/dashboard
async fn dashboard(
    State(state): State<AppState>,
    admin: AdminUser,
) -> ApiResult<Json<DashboardResponse>> {
    Ok(Json(UserService::dashboard(state.db(), &admin).await?))
}

/// GET /api/v1/admin/users/stats
async fn user_stats(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> ApiResult<Json<UserStats>> {
    Ok(Json(UserService::stats(state.db()).await?))
}

/// POST /api/v1/admin/users
async fn create_user(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(req): Json<AdminCreateUserRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    let user = UserService::create_by_admin(state.db(), req).await?;
    Ok((StatusCode::CREATED, Json(user)))
}
