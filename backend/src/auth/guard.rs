//! Request identity resolution
//!
//! Turns an `Authorization` header into a live user:
//! header -> token decode -> account lookup -> active check, then an optional
//! role check. Every failure before the role check is reported as
//! unauthenticated; only the role check yields `Forbidden`.

use async_trait::async_trait;
use blog_admin_shared::{AuthError, Role};
use sqlx::PgPool;
use tracing::debug;

use super::jwt::TokenService;
use crate::repositories::{UserRecord, UserRepository};

/// Source of user records for the guard
#[async_trait]
pub trait UserLookup: Send + Sync {
    async fn find_user(&self, id: i64) -> anyhow::Result<Option<UserRecord>>;
}

#[async_trait]
impl UserLookup for PgPool {
    async fn find_user(&self, id: i64) -> anyhow::Result<Option<UserRecord>> {
        Ok(UserRepository::find_by_id(self, id).await?)
    }
}

/// Failure while resolving the caller
#[derive(Debug)]
pub enum GuardError {
    Auth(AuthError),
    /// The account store could not be reached
    Lookup(anyhow::Error),
}

impl From<AuthError> for GuardError {
    fn from(err: AuthError) -> Self {
        GuardError::Auth(err)
    }
}

/// Authenticated, active caller
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: UserRecord,
}

impl CurrentUser {
    #[inline]
    pub fn id(&self) -> i64 {
        self.user.id
    }

    #[inline]
    pub fn role(&self) -> Role {
        self.user.role
    }

    #[inline]
    pub fn is_admin(&self) -> bool {
        self.user.role.is_admin()
    }
}

/// Pull the token out of an `Authorization` header value
///
/// The `Bearer` scheme is optional; a bare token is accepted.
pub fn extract_bearer(header: Option<&str>) -> Result<&str, AuthError> {
    let value = header.unwrap_or_default().trim_start();
    let token = value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))
        .unwrap_or(value)
        .trim();

    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }
    Ok(token)
}

/// Resolve the caller behind an `Authorization` header
pub async fn resolve_user<L>(
    lookup: &L,
    tokens: &TokenService,
    header: Option<&str>,
) -> Result<CurrentUser, GuardError>
where
    L: UserLookup + ?Sized,
{
    let token = extract_bearer(header)?;
    let identity = tokens.decode(token)?;

    let user = lookup
        .find_user(identity.user_id)
        .await
        .map_err(GuardError::Lookup)?
        .ok_or(AuthError::UnknownAccount)?;

    if !user.is_active {
        debug!(user_id = user.id, "Token presented for inactive account");
        return Err(AuthError::InactiveAccount.into());
    }

    Ok(CurrentUser { user })
}

/// Role check for admin-gated operations
///
/// Uses the role stored on the account, not the one in the token, so a
/// demotion takes effect immediately.
pub fn require_admin(user: &CurrentUser) -> Result<(), AuthError> {
    if user.is_admin() {
        Ok(())
    } else {
        Err(AuthError::Forbidden)
    }
}

/// True when an admin is about to disable their own account
#[inline]
pub fn is_self_action(actor: &CurrentUser, target_id: i64) -> bool {
    actor.id() == target_id
}
