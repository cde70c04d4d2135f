//! Startup seeding of the administrator account

use anyhow::{Context, Result};
use blog_admin_shared::{validation::validate_email, Role};
use secrecy::ExposeSecret;
use sqlx::PgPool;
use tracing::{debug, info};

use crate::auth::PasswordService;
use crate::config::AdminConfig;
use crate::repositories::{NewUser, UserRepository};

/// Create the configured admin unless an account with that email exists
///
/// Safe to run on every start and from several instances at once: the insert
/// is `ON CONFLICT DO NOTHING`. An existing account is left untouched, even if
/// it has since been demoted or deactivated.
pub async fn ensure_admin(pool: &PgPool, admin: &AdminConfig) -> Result<bool> {
    validate_email(&admin.email)
        .map_err(|e| anyhow::anyhow!("Invalid admin.email {:?}: {}", admin.email, e))?;

    if UserRepository::email_exists(pool, &admin.email).await? {
        debug!(email = %admin.email, "Admin account already present");
        return Ok(false);
    }

    let new = NewUser {
        email: admin.email.clone(),
        hashed_password: PasswordService::hash_async(admin.password.expose_secret().clone())
            .await
            .context("Failed to hash admin password")?,
        full_name: Some(admin.full_name.clone()),
        role: Role::Admin,
    };

    match UserRepository::insert_if_absent(pool, &new).await? {
        Some(user) => {
            info!(user_id = user.id, email = %user.email, "Admin account created");
            Ok(true)
        }
        None => Ok(false),
    }
}
