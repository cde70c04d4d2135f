//! Category and tag management

use crate::error::{ApiError, ApiResult};
use crate::repositories::{CategoryRepository, TagRepository};
use blog_admin_shared::{
    validation::{normalize_text, MAX_LABEL_LEN},
    Category, CategoryRequest, Tag, TagRequest,
};
use sqlx::PgPool;
use tracing::info;
use validator::Validate;

fn label(name: &str) -> ApiResult<String> {
    normalize_text("Name", name, MAX_LABEL_LEN).map_err(|msg| ApiError::invalid_field("name", msg))
}

pub struct CategoryService;

impl CategoryService {
    pub async fn list(pool: &PgPool) -> ApiResult<Vec<Category>> {
        Ok(CategoryRepository::list(pool).await?)
    }

    pub async fn get(pool: &PgPool, id: i64) -> ApiResult<Category> {
        Ok(CategoryRepository::find_by_id(pool, id).await?)
    }

    pub async fn create(pool: &PgPool, req: CategoryRequest) -> ApiResult<Category> {
        req.validate()?;
        let category = CategoryRepository::create(pool, &label(&req.name)?).await?;
        info!(category_id = category.id, name = %category.name, "Category created");
        Ok(category)
    }

    pub async fn rename(pool: &PgPool, id: i64, req: CategoryRequest) -> ApiResult<Category> {
        req.validate()?;
        Ok(CategoryRepository::rename(pool, id, &label(&req.name)?).await?)
    }

    pub async fn delete(pool: &PgPool, id: i64) -> ApiResult<()> {
        CategoryRepository::delete(pool, id).await?;
        info!(category_id = id, "Category deleted");
        Ok(())
    }
}

pub struct TagService;

impl TagService {
    pub async fn list(pool: &PgPool) -> ApiResult<Vec<Tag>> {
        Ok(TagRepository::list(pool).await?)
    }

    pub async fn get(pool: &PgPool, id: i64) -> ApiResult<Tag> {
        Ok(TagRepository::find_by_id(pool, id).await?)
    }

    pub async fn create(pool: &PgPool, req: TagRequest) -> ApiResult<Tag> {
        req.validate()?;
        let tag = TagRepository::create(pool, &label(&req.name)?).await?;
        info!(tag_id = tag.id, name = %tag.name, "Tag created");
        Ok(tag)
    }

    pub async fn rename(pool: &PgPool, id: i64, req: TagRequest) -> ApiResult<Tag> {
        req.validate()?;
        Ok(TagRepository::rename(pool, id, &label(&req.name)?).await?)
    }

    pub async fn delete(pool: &PgPool, id: i64) -> ApiResult<()> {
        TagRepository::delete(pool, id).await?;
        info!(tag_id = id, "Tag deleted");
        Ok(())
    }
}
