//! User repository for database operations

use blog_admin_shared::{Role, UserResponse, UserStats};
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::{conflict_on_unique, RepoResult, RepositoryError};

const EMAIL_TAKEN: &str = "Email already registered";

/// User record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRecord {
    pub id: i64,
    pub email: String,
    pub hashed_password: String,
    pub full_name: Option<String>,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserRecord> for UserResponse {
    fn from(user: UserRecord) -> Self {
        Self {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            role: user.role,
            is_active: user.is_active,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Input for creating a user; the password is already hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub hashed_password: String,
    pub full_name: Option<String>,
    pub role: Role,
}

/// Partial update; `None` leaves the column unchanged
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub email: Option<String>,
    pub hashed_password: Option<String>,
    /// `Some(None)` clears the name
    pub full_name: Option<Option<String>>,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
}

const USER_COLUMNS: &str =
    "id, email, hashed_password, full_name, role, is_active, created_at, updated_at";

/// User repository for database operations
pub struct UserRepository;

impl UserRepository {
    /// Insert a user; a taken email is a conflict
    pub async fn create(pool: &PgPool, new: &NewUser) -> RepoResult<UserRecord> {
        sqlx::query_as::<_, UserRecord>(&format!(
            r#"
            INSERT INTO users (email, hashed_password, full_name, role)
            VALUES ($1, $2, $3, $4)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&new.email)
        .bind(&new.hashed_password)
        .bind(&new.full_name)
        .bind(new.role)
        .fetch_one(pool)
        .await
        .map_err(|e| conflict_on_unique(e, EMAIL_TAKEN))
    }

    /// Insert a user unless the email is already present
    ///
    /// Returns `None` when a row with that email existed.
    pub async fn insert_if_absent(pool: &PgPool, new: &NewUser) -> RepoResult<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(&format!(
            r#"
            INSERT INTO users (email, hashed_password, full_name, role)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (email) DO NOTHING
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&new.email)
        .bind(&new.hashed_password)
        .bind(&new.full_name)
        .bind(new.role)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Find user by email (exact match)
    pub async fn find_by_email(pool: &PgPool, email: &str) -> RepoResult<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Find user by ID
    pub async fn find_by_id(pool: &PgPool, id: i64) -> RepoResult<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Page through all users, inactive ones included
    pub async fn list(pool: &PgPool, skip: i64, limit: i64) -> RepoResult<Vec<UserRecord>> {
        let users = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY id OFFSET $1 LIMIT $2"
        ))
        .bind(skip)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(users)
    }

    /// Apply a partial update and bump `updated_at`
    pub async fn update(pool: &PgPool, id: i64, changes: &UserChanges) -> RepoResult<UserRecord> {
        sqlx::query_as::<_, UserRecord>(&format!(
            r#"
            UPDATE users SET
                email = COALESCE($2, email),
                hashed_password = COALESCE($3, hashed_password),
                full_name = CASE WHEN $7 THEN $4 ELSE full_name END,
                role = COALESCE($5, role),
                is_active = COALESCE($6, is_active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&changes.email)
        .bind(&changes.hashed_password)
        .bind(changes.full_name.as_ref().and_then(|name| name.as_deref()))
        .bind(changes.role)
        .bind(changes.is_active)
        .bind(changes.full_name.is_some())
        .fetch_optional(pool)
        .await
        .map_err(|e| conflict_on_unique(e, EMAIL_TAKEN))?
        .ok_or_else(|| RepositoryError::NotFound("User not found".to_string()))
    }

    /// Soft delete: the row stays, the account can no longer authenticate
    pub async fn deactivate(pool: &PgPool, id: i64) -> RepoResult<UserRecord> {
        Self::update(
            pool,
            id,
            &UserChanges {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
    }

    /// Check if email exists
    pub async fn email_exists(pool: &PgPool, email: &str) -> RepoResult<bool> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
                .bind(email)
                .fetch_one(pool)
                .await?;

        Ok(exists)
    }

    /// Account counts by state and role
    pub async fn stats(pool: &PgPool) -> RepoResult<UserStats> {
        let (total_users, active_users, admin_count) = sqlx::query_as::<_, (i64, i64, i64)>(
            r#"
            SELECT
                COUNT(*),
                COUNT(*) FILTER (WHERE is_active),
                COUNT(*) FILTER (WHERE role = 'admin')
            FROM users
            "#,
        )
        .fetch_one(pool)
        .await?;

        Ok(UserStats {
            total_users,
            active_users,
            inactive_users: total_users - active_users,
            admin_count,
            user_count: total_users - admin_count,
        })
    }
}
