//! Tag repository

use blog_admin_shared::Tag;
use sqlx::PgPool;

use super::{conflict_on_unique, RepoResult, RepositoryError};

const NAME_TAKEN: &str = "Tag name already exists";

fn not_found(id: i64) -> RepositoryError {
    RepositoryError::NotFound(format!("Tag {} not found", id))
}

pub struct TagRepository;

impl TagRepository {
    pub async fn create(pool: &PgPool, name: &str) -> RepoResult<Tag> {
        sqlx::query_as::<_, Tag>("INSERT INTO tags (name) VALUES ($1) RETURNING id, name")
            .bind(name)
            .fetch_one(pool)
            .await
            .map_err(|e| conflict_on_unique(e, NAME_TAKEN))
    }

    pub async fn find_by_id(pool: &PgPool, id: i64) -> RepoResult<Tag> {
        sqlx::query_as::<_, Tag>("SELECT id, name FROM tags WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| not_found(id))
    }

    pub async fn list(pool: &PgPool) -> RepoResult<Vec<Tag>> {
        let tags = sqlx::query_as::<_, Tag>("SELECT id, name FROM tags ORDER BY name")
            .fetch_all(pool)
            .await?;
        Ok(tags)
    }

    pub async fn rename(pool: &PgPool, id: i64, name: &str) -> RepoResult<Tag> {
        sqlx::query_as::<_, Tag>("UPDATE tags SET name = $2 WHERE id = $1 RETURNING id, name")
            .bind(id)
            .bind(name)
            .fetch_optional(pool)
            .await
            .map_err(|e| conflict_on_unique(e, NAME_TAKEN))?
            .ok_or_else(|| not_found(id))
    }

    /// Hard delete; blog associations go with it, the blogs stay
    pub async fn delete(pool: &PgPool, id: i64) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM tags WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }
}
