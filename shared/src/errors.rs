//! Error types shared between the auth core and its callers

use thiserror::Error;

/// Authentication and authorization failures
///
/// Every variant except `Forbidden` is surfaced to clients as the same
/// unauthenticated response, so callers cannot learn which check failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Missing token")]
    MissingToken,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Unknown account")]
    UnknownAccount,

    #[error("Inactive account")]
    InactiveAccount,

    #[error("Insufficient role")]
    Forbidden,
}

impl AuthError {
    /// True when the failure means "who are you?" rather than "not allowed"
    pub fn is_unauthenticated(&self) -> bool {
        !matches!(self, AuthError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_forbidden_is_authenticated() {
        assert!(AuthError::MissingToken.is_unauthenticated());
        assert!(AuthError::InvalidToken.is_unauthenticated());
        assert!(AuthError::InactiveAccount.is_unauthenticated());
        assert!(AuthError::UnknownAccount.is_unauthenticated());
        assert!(!AuthError::Forbidden.is_unauthenticated());
    }
}
