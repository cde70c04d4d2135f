//! Authentication extractors
//!
//! Handlers take [`CurrentUser`] or [`AdminUser`] as arguments; the guard runs
//! before the handler body and the resolved identity is passed in explicitly.

use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use std::ops::Deref;

use super::guard::{require_admin, resolve_user, CurrentUser, GuardError};

impl From<GuardError> for ApiError {
    fn from(err: GuardError) -> Self {
        match err {
            GuardError::Auth(e) => e.into(),
            GuardError::Lookup(e) => ApiError::Internal(e),
        }
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        // A header that is not valid UTF-8 counts as absent
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok());

        Ok(resolve_user(app_state.db(), app_state.tokens(), header).await?)
    }
}

/// Caller that passed the admin role check
#[derive(Debug, Clone)]
pub struct AdminUser(pub CurrentUser);

impl Deref for AdminUser {
    type Target = CurrentUser;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = CurrentUser::from_request_parts(parts, state).await?;
        require_admin(&user)?;
        Ok(AdminUser(user))
    }
}
