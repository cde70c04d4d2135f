//! Blog management
//!
//! Text is trimmed here; reference checks on category and tags happen in the
//! repository inside the write transaction.

use crate::error::{ApiError, ApiResult};
use crate::repositories::{BlogChanges, BlogRepository, NewBlog};
use blog_admin_shared::{
    validation::{clamp_pagination, normalize_text, MAX_TEXT_LEN},
    BlogQuery, BlogResponse, CreateBlogRequest, UpdateBlogRequest,
};
use sqlx::PgPool;
use tracing::{info, instrument};
use validator::Validate;

fn text(field: &'static str, label: &str, value: &str) -> ApiResult<String> {
    normalize_text(label, value, MAX_TEXT_LEN).map_err(|msg| ApiError::invalid_field(field, msg))
}

fn optional_text(field: &'static str, label: &str, value: Option<&str>) -> ApiResult<Option<String>> {
    value.map(|v| text(field, label, v)).transpose()
}

pub struct BlogService;

impl BlogService {
    pub async fn list(pool: &PgPool, query: &BlogQuery) -> ApiResult<Vec<BlogResponse>> {
        let page = clamp_pagination(&query.pagination());
        Ok(BlogRepository::list(pool, query.category_id, query.tag_id, page.skip, page.limit).await?)
    }

    pub async fn get(pool: &PgPool, id: i64) -> ApiResult<BlogResponse> {
        Ok(BlogRepository::find_by_id(pool, id).await?)
    }

    /// Create a blog; a missing category or any missing tag rejects the whole request
    #[instrument(skip(pool, req), fields(category_id = req.category_id))]
    pub async fn create(pool: &PgPool, req: CreateBlogRequest) -> ApiResult<BlogResponse> {
        req.validate()?;

        let new = NewBlog {
            title: text("title", "Title", &req.title)?,
            author: text("author", "Author", &req.author)?,
            category_id: req.category_id,
            tag_ids: req.tag_ids,
        };

        let blog = BlogRepository::create(pool, &new).await?;
        info!(blog_id = blog.id, tags = blog.tags.len(), "Blog created");
        Ok(blog)
    }

    #[instrument(skip(pool, req))]
    pub async fn update(pool: &PgPool, id: i64, req: UpdateBlogRequest) -> ApiResult<BlogResponse> {
        req.validate()?;

        let changes = BlogChanges {
            title: optional_text("title", "Title", req.title.as_deref())?,
            author: optional_text("author", "Author", req.author.as_deref())?,
            category_id: req.category_id,
            tag_ids: req.tag_ids,
        };

        Ok(BlogRepository::update(pool, id, &changes).await?)
    }

    pub async fn delete(pool: &PgPool, id: i64) -> ApiResult<()> {
        BlogRepository::delete(pool, id).await?;
        info!(blog_id = id, "Blog deleted");
        Ok(())
    }
}
