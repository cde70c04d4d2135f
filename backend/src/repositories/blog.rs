//! Blog repository
//!
//! Blogs reference one category and any number of tags through `blog_tags`.
//! Writes validate every referenced id inside the same transaction as the
//! insert/update, so a request naming one missing tag changes nothing.

use blog_admin_shared::{validation::dedup_ids, BlogResponse, Category, ContentStats, Tag};
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};

use super::{RepoResult, RepositoryError};
use crate::db::is_foreign_key_violation;

/// Input for creating a blog; text fields are already trimmed
#[derive(Debug, Clone)]
pub struct NewBlog {
    pub title: String,
    pub author: String,
    pub category_id: i64,
    pub tag_ids: Vec<i64>,
}

/// Partial blog update; `tag_ids: Some(..)` replaces the tag set
#[derive(Debug, Clone, Default)]
pub struct BlogChanges {
    pub title: Option<String>,
    pub author: Option<String>,
    pub category_id: Option<i64>,
    pub tag_ids: Option<Vec<i64>>,
}

/// Flat row produced by the joined blog query
#[derive(Debug, sqlx::FromRow)]
struct BlogRow {
    id: i64,
    title: String,
    author: String,
    category_id: i64,
    category_name: String,
    tag_ids: Vec<i64>,
    tag_names: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<BlogRow> for BlogResponse {
    fn from(row: BlogRow) -> Self {
        let tags = row
            .tag_ids
            .into_iter()
            .zip(row.tag_names)
            .map(|(id, name)| Tag { id, name })
            .collect();

        Self {
            id: row.id,
            title: row.title,
            author: row.author,
            category: Category {
                id: row.category_id,
                name: row.category_name,
            },
            tags,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

// Both aggregates share one ORDER BY so ids and names stay aligned
const BLOG_SELECT: &str = r#"
    SELECT
        b.id,
        b.title,
        b.author,
        b.category_id,
        c.name::TEXT AS category_name,
        COALESCE(
            array_agg(t.id ORDER BY t.name, t.id) FILTER (WHERE t.id IS NOT NULL),
            '{}'::BIGINT[]
        ) AS tag_ids,
        COALESCE(
            array_agg(t.name::TEXT ORDER BY t.name, t.id) FILTER (WHERE t.id IS NOT NULL),
            '{}'::TEXT[]
        ) AS tag_names,
        b.created_at,
        b.updated_at
    FROM blogs b
    JOIN categories c ON c.id = b.category_id
    LEFT JOIN blog_tags bt ON bt.blog_id = b.id
    LEFT JOIN tags t ON t.id = bt.tag_id
"#;

fn blog_not_found(id: i64) -> RepositoryError {
    RepositoryError::NotFound(format!("Blog {} not found", id))
}

fn missing_reference(err: sqlx::Error) -> RepositoryError {
    if is_foreign_key_violation(&err) {
        RepositoryError::NotFound("Referenced category or tag no longer exists".to_string())
    } else {
        RepositoryError::Database(err)
    }
}

pub struct BlogRepository;

impl BlogRepository {
    /// Insert a blog and its tag links atomically
    pub async fn create(pool: &PgPool, new: &NewBlog) -> RepoResult<BlogResponse> {
        let tag_ids = dedup_ids(&new.tag_ids);
        let mut tx = pool.begin().await?;

        Self::ensure_category(&mut tx, new.category_id).await?;
        Self::ensure_tags(&mut tx, &tag_ids).await?;

        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO blogs (title, author, category_id)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(&new.title)
        .bind(&new.author)
        .bind(new.category_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(missing_reference)?;

        Self::link_tags(&mut tx, id, &tag_ids).await?;
        let blog = Self::fetch(&mut tx, id).await?.ok_or_else(|| blog_not_found(id))?;

        tx.commit().await?;
        Ok(blog)
    }

    /// Apply a partial update atomically
    pub async fn update(pool: &PgPool, id: i64, changes: &BlogChanges) -> RepoResult<BlogResponse> {
        let mut tx = pool.begin().await?;

        // Lock the row so a concurrent delete waits for us
        let exists = sqlx::query_scalar::<_, i64>("SELECT id FROM blogs WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Err(blog_not_found(id));
        }

        if let Some(category_id) = changes.category_id {
            Self::ensure_category(&mut tx, category_id).await?;
        }
        let tag_ids = changes.tag_ids.as_deref().map(dedup_ids);
        if let Some(tag_ids) = &tag_ids {
            Self::ensure_tags(&mut tx, tag_ids).await?;
        }

        sqlx::query(
            r#"
            UPDATE blogs SET
                title = COALESCE($2, title),
                author = COALESCE($3, author),
                category_id = COALESCE($4, category_id),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&changes.title)
        .bind(&changes.author)
        .bind(changes.category_id)
        .execute(&mut *tx)
        .await
        .map_err(missing_reference)?;

        if let Some(tag_ids) = &tag_ids {
            sqlx::query("DELETE FROM blog_tags WHERE blog_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            Self::link_tags(&mut tx, id, tag_ids).await?;
        }

        let blog = Self::fetch(&mut tx, id).await?.ok_or_else(|| blog_not_found(id))?;
        tx.commit().await?;
        Ok(blog)
    }

    pub async fn find_by_id(pool: &PgPool, id: i64) -> RepoResult<BlogResponse> {
        let row = sqlx::query_as::<_, BlogRow>(&format!(
            "{BLOG_SELECT} WHERE b.id = $1 GROUP BY b.id, c.name"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        row.map(BlogResponse::from).ok_or_else(|| blog_not_found(id))
    }

    /// Newest first, optionally narrowed to a category and/or a tag
    pub async fn list(
        pool: &PgPool,
        category_id: Option<i64>,
        tag_id: Option<i64>,
        skip: i64,
        limit: i64,
    ) -> RepoResult<Vec<BlogResponse>> {
        let rows = sqlx::query_as::<_, BlogRow>(&format!(
            r#"{BLOG_SELECT}
            WHERE ($1::BIGINT IS NULL OR b.category_id = $1)
              AND ($2::BIGINT IS NULL OR EXISTS (
                    SELECT 1 FROM blog_tags f WHERE f.blog_id = b.id AND f.tag_id = $2))
            GROUP BY b.id, c.name
            ORDER BY b.created_at DESC, b.id DESC
            OFFSET $3 LIMIT $4
            "#
        ))
        .bind(category_id)
        .bind(tag_id)
        .bind(skip)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().map(BlogResponse::from).collect())
    }

    /// Hard delete; tag links cascade
    pub async fn delete(pool: &PgPool, id: i64) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM blogs WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(blog_not_found(id));
        }
        Ok(())
    }

    /// Row counts for the admin dashboard
    pub async fn content_stats(pool: &PgPool) -> RepoResult<ContentStats> {
        let (categories, tags, blogs) = sqlx::query_as::<_, (i64, i64, i64)>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM categories),
                (SELECT COUNT(*) FROM tags),
                (SELECT COUNT(*) FROM blogs)
            "#,
        )
        .fetch_one(pool)
        .await?;

        Ok(ContentStats {
            categories,
            tags,
            blogs,
        })
    }

    async fn fetch(
        tx: &mut Transaction<'_, Postgres>,
        id: i64,
    ) -> RepoResult<Option<BlogResponse>> {
        let row = sqlx::query_as::<_, BlogRow>(&format!(
            "{BLOG_SELECT} WHERE b.id = $1 GROUP BY b.id, c.name"
        ))
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?;

        Ok(row.map(BlogResponse::from))
    }

    async fn ensure_category(tx: &mut Transaction<'_, Postgres>, id: i64) -> RepoResult<()> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1)")
                .bind(id)
                .fetch_one(&mut **tx)
                .await?;

        if exists {
            Ok(())
        } else {
            Err(RepositoryError::NotFound(format!("Category {} not found", id)))
        }
    }

    /// Every id must exist; the error lists the ones that do not
    async fn ensure_tags(tx: &mut Transaction<'_, Postgres>, ids: &[i64]) -> RepoResult<()> {
        if ids.is_empty() {
            return Ok(());
        }

        let found = sqlx::query_scalar::<_, i64>("SELECT id FROM tags WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&mut **tx)
            .await?;

        let missing = missing_ids(ids, &found);
        if missing.is_empty() {
            Ok(())
        } else {
            Err(RepositoryError::NotFound(format!(
                "Tag(s) not found: {}",
                missing
                    .iter()
                    .map(i64::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            )))
        }
    }

    async fn link_tags(
        tx: &mut Transaction<'_, Postgres>,
        blog_id: i64,
        tag_ids: &[i64],
    ) -> RepoResult<()> {
        if tag_ids.is_empty() {
            return Ok(());
        }

        sqlx::query(
            r#"
            INSERT INTO blog_tags (blog_id, tag_id)
            SELECT $1, UNNEST($2::BIGINT[])
            "#,
        )
        .bind(blog_id)
        .bind(tag_ids)
        .execute(&mut **tx)
        .await
        .map_err(missing_reference)?;

        Ok(())
    }
}

/// Ids from `requested` that are absent from `found`
fn missing_ids(requested: &[i64], found: &[i64]) -> Vec<i64> {
    requested
        .iter()
        .copied()
        .filter(|id| !found.contains(id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_ids() {
        assert_eq!(missing_ids(&[1, 2, 3], &[1, 3]), vec![2]);
        assert!(missing_ids(&[1, 2], &[2, 1]).is_empty());
        assert!(missing_ids(&[], &[]).is_empty());
    }

    #[test]
    fn test_row_keeps_tag_pairs_aligned() {
        let now = Utc::now();
        let row = BlogRow {
            id: 1,
            title: "Post1".to_string(),
            author: "Ann".to_string(),
            category_id: 2,
            category_name: "Tech".to_string(),
            tag_ids: vec![5, 3],
            tag_names: vec!["AI".to_string(), "Rust".to_string()],
            created_at: now,
            updated_at: now,
        };

        let blog = BlogResponse::from(row);
        assert_eq!(blog.category.name, "Tech");
        assert_eq!(blog.tags[0].id, 5);
        assert_eq!(blog.tags[0].name, "AI");
        assert_eq!(blog.tags[1].name, "Rust");
    }
}
