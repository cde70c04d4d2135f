//! Category and tag endpoints
//!
//! Reads need a signed-in user; writes need an admin.

use crate::auth::{AdminUser, CurrentUser};
use crate::error::ApiResult;
use crate::services::{CategoryService, TagService};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use blog_admin_shared::{Category, CategoryRequest, Tag, TagRequest};

pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route(
            "/:id",
            get(get_category).put(rename_category).delete(delete_category),
        )
}

pub fn tag_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_tags).post(create_tag))
        .route("/:id", get(get_tag).put(rename_tag).delete(delete_tag))
}

async fn list_categories(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> ApiResult<Json<Vec<Category>>> {
    Ok(Json(CategoryService::list(state.db()).await?))
}

async fn get_category(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<Category>> {
    Ok(Json(CategoryService::get(state.db(), id).await?))
}

async fn create_category(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(req): Json<CategoryRequest>,
) -> ApiResult<(StatusCode, Json<Category>)> {
    let category = CategoryService::create(state.db(), req).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

async fn rename_category(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<i64>,
    Json(req): Json<CategoryRequest>,
) -> ApiResult<Json<Category>> {
    Ok(Json(CategoryService::rename(state.db(), id, req).await?))
}

/// 409 while blogs still use the category
async fn delete_category(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    CategoryService::delete(state.db(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_tags(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> ApiResult<Json<Vec<Tag>>> {
    Ok(Json(TagService::list(state.db()).await?))
}

async fn get_tag(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<Tag>> {
    Ok(Json(TagService::get(state.db(), id).await?))
}

async fn create_tag(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(req): Json<TagRequest>,
) -> ApiResult<(StatusCode, Json<Tag>)> {
    let tag = TagService::create(state.db(), req).await?;
    Ok((StatusCode::CREATED, Json(tag)))
}

async fn rename_tag(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<i64>,
    Json(req): Json<TagRequest>,
) -> ApiResult<Json<Tag>> {
    Ok(Json(TagService::rename(state.db(), id, req).await?))
}

async fn delete_tag(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    TagService::delete(state.db(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
