//! Blog endpoints
//!
//! Any signed-in user may read, create and edit blogs. Deletion is admin-only.

use crate::auth::{AdminUser, CurrentUser};
use crate::error::ApiResult;
use crate::services::BlogService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use blog_admin_shared::{BlogQuery, BlogResponse, CreateBlogRequest, UpdateBlogRequest};

pub fn blog_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_blogs).post(create_blog))
        .route("/:id", get(get_blog).put(update_blog).delete(delete_blog))
}

/// GET /api/v1/blogs?skip=&limit=&category_id=&tag_id=
async fn list_blogs(
    State(state): State<AppState>,
    _user: CurrentUser,
    Query(query): Query<BlogQuery>,
) -> ApiResult<Json<Vec<BlogResponse>>> {
    Ok(Json(BlogService::list(state.db(), &query).await?))
}

/// POST /api/v1/blogs
async fn create_blog(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<CreateBlogRequest>,
) -> ApiResult<(StatusCode, Json<BlogResponse>)> {
    tracing::debug!(user_id = user.id(), "Creating blog");
    let blog = BlogService::create(state.db(), req).await?;
    Ok((StatusCode::CREATED, Json(blog)))
}

/// GET /api/v1/blogs/:id
async fn get_blog(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<BlogResponse>> {
    Ok(Json(BlogService::get(state.db(), id).await?))
}

/// PUT /api/v1/blogs/:id
async fn update_blog(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<i64>,
    Json(req): Json<UpdateBlogRequest>,
) -> ApiResult<Json<BlogResponse>> {
    Ok(Json(BlogService::update(state.db(), id, req).await?))
}

/// DELETE /api/v1/blogs/:id
async fn delete_blog(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    BlogService::delete(state.db(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
