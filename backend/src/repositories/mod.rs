//! Database repositories
//!
//! Unit structs with static async functions taking a `&PgPool`. Constraint
//! violations raised by Postgres are classified here, so callers see
//! [`RepositoryError::Conflict`] or [`RepositoryError::NotFound`] rather than
//! raw driver errors.

pub mod blog;
pub mod category;
pub mod tag;
pub mod user;

use thiserror::Error;

pub use blog::{BlogChanges, BlogRepository, NewBlog};
pub use category::CategoryRepository;
pub use tag::TagRepository;
pub use user::{NewUser, UserChanges, UserRecord, UserRepository};

/// Storage-level failure
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// A uniqueness or in-use rule rejected the write
    #[error("{0}")]
    Conflict(String),

    /// A referenced row does not exist
    #[error("{0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type RepoResult<T> = Result<T, RepositoryError>;

/// Map a unique violation to a conflict, pass anything else through
pub(crate) fn conflict_on_unique(err: sqlx::Error, message: impl Into<String>) -> RepositoryError {
    if crate::db::is_unique_violation(&err) {
        RepositoryError::Conflict(message.into())
    } else {
        RepositoryError::Database(err)
    }
}
