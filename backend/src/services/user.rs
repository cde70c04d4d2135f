//! User service: registration, login, and account management
//!
//! Password hashing and verification run on the blocking thread pool. The
//! token service is passed by reference so its keys are never re-derived.

use crate::auth::{is_self_action, CurrentUser, PasswordService, TokenService};
use crate::error::{ApiError, ApiResult};
use crate::repositories::{BlogRepository, NewUser, UserChanges, UserRepository};
use blog_admin_shared::{
    validation::{clamp_pagination, normalize_optional_name, validate_email, validate_password},
    AdminCreateUserRequest, AdminUpdateUserRequest, AuthError, DashboardResponse, LoginRequest,
    MessageResponse, Pagination, RegisterRequest, Role, TokenResponse, UpdateProfileRequest,
    UserResponse, UserStats,
};
use sqlx::PgPool;
use tracing::{info, instrument, warn};
use validator::Validate;

/// Shape checks shared by every path that accepts credentials
fn check_credentials(email: &str, password: &str) -> ApiResult<()> {
    validate_email(email).map_err(|msg| ApiError::invalid_field("email", msg))?;
    validate_password(password).map_err(|msg| ApiError::invalid_field("password", msg))
}

fn clean_name(name: Option<&str>) -> ApiResult<Option<String>> {
    normalize_optional_name(name).map_err(|msg| ApiError::invalid_field("full_name", msg))
}

async fn hash(password: &str) -> ApiResult<String> {
    Ok(PasswordService::hash_async(password.to_string()).await?)
}

pub struct UserService;

impl UserService {
    /// Self-service sign up; always creates a plain user
    #[instrument(skip(pool, req), fields(email = %req.email))]
    pub async fn register(pool: &PgPool, req: RegisterRequest) -> ApiResult<UserResponse> {
        req.validate()?;
        Self::create(
            pool,
            &req.email,
            &req.password,
            req.full_name.as_deref(),
            Role::User,
        )
        .await
    }

    /// Check credentials and issue a bearer token
    #[instrument(skip(pool, tokens, req), fields(email = %req.email))]
    pub async fn login(
        pool: &PgPool,
        tokens: &TokenService,
        req: LoginRequest,
    ) -> ApiResult<TokenResponse> {
        let user = UserRepository::find_by_email(pool, &req.email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let valid =
            PasswordService::verify_async(req.password, user.hashed_password.clone()).await?;
        if !valid {
            warn!(user_id = user.id, "Login with wrong password");
            return Err(AuthError::InvalidCredentials.into());
        }

        // Checked after the password so the flag is only revealed to the owner
        if !user.is_active {
            return Err(ApiError::BadRequest("Inactive user account".to_string()));
        }

        let access_token = tokens.issue(user.id, user.role)?;
        info!(user_id = user.id, "User logged in");

        Ok(TokenResponse {
            access_token,
            token_type: "bearer".to_string(),
            expires_in: tokens.expires_in_secs(),
        })
    }

    /// Update the caller's own email, name or password
    #[instrument(skip(pool, current, req), fields(user_id = current.id()))]
    pub async fn update_me(
        pool: &PgPool,
        current: &CurrentUser,
        req: UpdateProfileRequest,
    ) -> ApiResult<UserResponse> {
        req.validate()?;
        let changes = Self::base_changes(req.email, req.full_name, req.password).await?;
        let user = UserRepository::update(pool, current.id(), &changes).await?;
        Ok(user.into())
    }

    /// Admin account creation with an explicit role
    #[instrument(skip(pool, req), fields(email = %req.email, role = %req.role))]
    pub async fn create_by_admin(
        pool: &PgPool,
        req: AdminCreateUserRequest,
    ) -> ApiResult<UserResponse> {
        req.validate()?;
        Self::create(
            pool,
            &req.email,
            &req.password,
            req.full_name.as_deref(),
            req.role,
        )
        .await
    }

    pub async fn list(pool: &PgPool, page: &Pagination) -> ApiResult<Vec<UserResponse>> {
        let page = clamp_pagination(page);
        let users = UserRepository::list(pool, page.skip, page.limit).await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    /// Users may read their own record; admins may read any
    pub async fn get_visible(pool: &PgPool, actor: &CurrentUser, id: i64) -> ApiResult<UserResponse> {
        if actor.id() != id && !actor.is_admin() {
            return Err(ApiError::Forbidden("Not enough permissions".to_string()));
        }

        let user = UserRepository::find_by_id(pool, id)
            .await?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;
        Ok(user.into())
    }

    /// Admin update of any account, role and active flag included
    #[instrument(skip(pool, actor, req), fields(actor_id = actor.id()))]
    pub async fn update_by_admin(
        pool: &PgPool,
        actor: &CurrentUser,
        id: i64,
        req: AdminUpdateUserRequest,
    ) -> ApiResult<UserResponse> {
        req.validate()?;
        if req.is_active == Some(false) && is_self_action(actor, id) {
            return Err(ApiError::SelfActionConflict(
                "Cannot deactivate your own account".to_string(),
            ));
        }

        let mut changes = Self::base_changes(req.email, req.full_name, req.password).await?;
        changes.role = req.role;
        changes.is_active = req.is_active;

        let user = UserRepository::update(pool, id, &changes).await?;
        info!(user_id = id, "User updated by admin");
        Ok(user.into())
    }

    /// Soft delete another account
    #[instrument(skip(pool, actor), fields(actor_id = actor.id()))]
    pub async fn deactivate(
        pool: &PgPool,
        actor: &CurrentUser,
        id: i64,
    ) -> ApiResult<MessageResponse> {
        if is_self_action(actor, id) {
            return Err(ApiError::SelfActionConflict(
                "Cannot delete your own account".to_string(),
            ));
        }

        UserRepository::deactivate(pool, id).await?;
        info!(user_id = id, "User deactivated");

        Ok(MessageResponse {
            message: "User deactivated successfully".to_string(),
        })
    }

    pub async fn stats(pool: &PgPool) -> ApiResult<UserStats> {
        Ok(UserRepository::stats(pool).await?)
    }

    pub async fn dashboard(pool: &PgPool, actor: &CurrentUser) -> ApiResult<DashboardResponse> {
        let statistics = UserRepository::stats(pool).await?;
        let content = BlogRepository::content_stats(pool).await?;
        let name = actor.user.full_name.as_deref().unwrap_or(&actor.user.email);

        Ok(DashboardResponse {
            message: format!("Welcome to the admin dashboard, {}", name),
            statistics,
            content,
        })
    }

    async fn create(
        pool: &PgPool,
        email: &str,
        password: &str,
        full_name: Option<&str>,
        role: Role,
    ) -> ApiResult<UserResponse> {
        check_credentials(email, password)?;
        let full_name = clean_name(full_name)?;

        if UserRepository::email_exists(pool, email).await? {
            return Err(ApiError::Conflict("Email already registered".to_string()));
        }

        let new = NewUser {
            email: email.to_string(),
            hashed_password: hash(password).await?,
            full_name,
            role,
        };
        // The unique constraint still catches a concurrent insert
        let user = UserRepository::create(pool, &new).await?;
        info!(user_id = user.id, %role, "User created");

        Ok(user.into())
    }

    /// Changes reachable by both self-service and admin updates
    async fn base_changes(
        email: Option<String>,
        full_name: Option<String>,
        password: Option<String>,
    ) -> ApiResult<UserChanges> {
        if let Some(email) = &email {
            validate_email(email).map_err(|msg| ApiError::invalid_field("email", msg))?;
        }

        let hashed_password = match password {
            Some(password) => {
                validate_password(&password)
                    .map_err(|msg| ApiError::invalid_field("password", msg))?;
                Some(hash(&password).await?)
            }
            None => None,
        };

        Ok(UserChanges {
            email,
            hashed_password,
            full_name: full_name
                .map(|name| clean_name(Some(&name)))
                .transpose()?,
            ..Default::default()
        })
    }
}
