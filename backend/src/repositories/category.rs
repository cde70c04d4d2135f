//! Category repository

use blog_admin_shared::Category;
use sqlx::PgPool;

use super::{conflict_on_unique, RepoResult, RepositoryError};
use crate::db::is_foreign_key_violation;

const NAME_TAKEN: &str = "Category name already exists";

fn not_found(id: i64) -> RepositoryError {
    RepositoryError::NotFound(format!("Category {} not found", id))
}

pub struct CategoryRepository;

impl CategoryRepository {
    pub async fn create(pool: &PgPool, name: &str) -> RepoResult<Category> {
        sqlx::query_as::<_, Category>("INSERT INTO categories (name) VALUES ($1) RETURNING id, name")
            .bind(name)
            .fetch_one(pool)
            .await
            .map_err(|e| conflict_on_unique(e, NAME_TAKEN))
    }

    pub async fn find_by_id(pool: &PgPool, id: i64) -> RepoResult<Category> {
        sqlx::query_as::<_, Category>("SELECT id, name FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| not_found(id))
    }

    pub async fn list(pool: &PgPool) -> RepoResult<Vec<Category>> {
        let categories =
            sqlx::query_as::<_, Category>("SELECT id, name FROM categories ORDER BY name")
                .fetch_all(pool)
                .await?;
        Ok(categories)
    }

    pub async fn rename(pool: &PgPool, id: i64, name: &str) -> RepoResult<Category> {
        sqlx::query_as::<_, Category>(
            "UPDATE categories SET name = $2 WHERE id = $1 RETURNING id, name",
        )
        .bind(id)
        .bind(name)
        .fetch_optional(pool)
        .await
        .map_err(|e| conflict_on_unique(e, NAME_TAKEN))?
        .ok_or_else(|| not_found(id))
    }

    /// Hard delete; refused while any blog still uses the category
    pub async fn delete(pool: &PgPool, id: i64) -> RepoResult<()> {
        let in_use = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM blogs WHERE category_id = $1")
            .bind(id)
            .fetch_one(pool)
            .await?;
        if in_use > 0 {
            return Err(RepositoryError::Conflict(format!(
                "Category is used by {} blog(s)",
                in_use
            )));
        }

        // The RESTRICT foreign key covers a blog inserted after the count
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    RepositoryError::Conflict("Category is used by existing blogs".to_string())
                } else {
                    RepositoryError::Database(e)
                }
            })?;

        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }
}
