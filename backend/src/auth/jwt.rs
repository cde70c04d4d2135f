//! Bearer token issuance and validation
//!
//! Tokens are HMAC-signed JWTs carrying the user id and role. Keys are derived
//! once from the configured secret and shared behind `Arc`.

use anyhow::{bail, Result};
use blog_admin_shared::{AuthError, Role};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::config::JwtConfig;

/// Longest accepted token lifetime (one year)
pub const MAX_LIFETIME_MINUTES: i64 = 365 * 24 * 60;

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,
    pub role: Role,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Identity recovered from a valid token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenIdentity {
    pub user_id: i64,
    pub role: Role,
}

/// Parse a configured algorithm name; only HMAC variants are usable with a
/// shared secret
pub fn parse_algorithm(name: &str) -> Result<Algorithm> {
    match name.trim().to_ascii_uppercase().as_str() {
        "HS256" => Ok(Algorithm::HS256),
        "HS384" => Ok(Algorithm::HS384),
        "HS512" => Ok(Algorithm::HS512),
        other => bail!("Unsupported JWT algorithm: {}", other),
    }
}

/// Token service with pre-computed keys
#[derive(Clone)]
pub struct TokenService {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
    algorithm: Algorithm,
    lifetime: Duration,
}

impl TokenService {
    pub fn new(secret: &str, algorithm: Algorithm, lifetime_minutes: i64) -> Self {
        Self {
            encoding: Arc::new(EncodingKey::from_secret(secret.as_bytes())),
            decoding: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
            algorithm,
            lifetime: Duration::try_minutes(lifetime_minutes).unwrap_or(Duration::MAX),
        }
    }

    /// Build from configuration, rejecting unknown algorithms and lifetimes
    /// outside one minute to one year
    pub fn from_config(config: &JwtConfig) -> Result<Self> {
        let algorithm = parse_algorithm(&config.algorithm)?;
        if !(1..=MAX_LIFETIME_MINUTES).contains(&config.access_token_expire_minutes) {
            bail!(
                "jwt.access_token_expire_minutes must be between 1 and {}",
                MAX_LIFETIME_MINUTES
            );
        }
        Ok(Self::new(
            config.secret.expose_secret(),
            algorithm,
            config.access_token_expire_minutes,
        ))
    }

    /// Issue a token for a user, valid from now
    #[inline]
    pub fn issue(&self, user_id: i64, role: Role) -> Result<String> {
        self.issue_at(user_id, role, Utc::now())
    }

    /// Issue a token as if it had been created at `issued_at`
    pub fn issue_at(&self, user_id: i64, role: Role, issued_at: DateTime<Utc>) -> Result<String> {
        let expires_at = issued_at
            .checked_add_signed(self.lifetime)
            .ok_or_else(|| anyhow::anyhow!("Token expiry is out of range"))?;
        let claims = Claims {
            sub: user_id.to_string(),
            role,
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(self.algorithm), &claims, &self.encoding)
            .map_err(|e| anyhow::anyhow!("Failed to sign token: {}", e))?;
        debug!(user_id, %role, "Issued access token");
        Ok(token)
    }

    /// Validate a token and recover the identity it carries
    pub fn decode(&self, token: &str) -> Result<TokenIdentity, AuthError> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            debug!("Token rejected: {}", e);
            AuthError::InvalidToken
        })?;

        let user_id = data.claims.sub.parse::<i64>().map_err(|_| {
            debug!("Token subject is not a user id");
            AuthError::InvalidToken
        })?;

        Ok(TokenIdentity {
            user_id,
            role: data.claims.role,
        })
    }

    /// Token lifetime in seconds, as reported to clients
    #[inline]
    pub fn expires_in_secs(&self) -> i64 {
        self.lifetime.num_seconds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn service() -> TokenService {
        TokenService::new("test-secret-with-enough-length-000", Algorithm::HS256, 30)
    }

    #[test]
    fn test_issue_and_decode() {
        let tokens = service();
        let token = tokens.issue(42, Role::Admin).unwrap();

        let identity = tokens.decode(&token).unwrap();
        assert_eq!(identity, TokenIdentity { user_id: 42, role: Role::Admin });
        assert_eq!(tokens.expires_in_secs(), 30 * 60);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let tokens = service();
        let issued = Utc::now() - Duration::minutes(31);
        let token = tokens.issue_at(7, Role::User, issued).unwrap();

        assert_eq!(tokens.decode(&token), Err(AuthError::InvalidToken));
    }

    #[test]
    fn test_tampered_token_is_rejected() {
        let tokens = service();
        let token = tokens.issue(7, Role::User).unwrap();

        // Swap the payload for one claiming admin, keep the old signature
        let forged = TokenService::new("other", Algorithm::HS256, 30)
            .issue(7, Role::Admin)
            .unwrap();
        let mut parts: Vec<&str> = token.split('.').collect();
        let forged_parts: Vec<&str> = forged.split('.').collect();
        parts[1] = forged_parts[1];

        assert_eq!(tokens.decode(&parts.join(".")), Err(AuthError::InvalidToken));
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = TokenService::new("secret-a", Algorithm::HS256, 30)
            .issue(1, Role::User)
            .unwrap();
        let result = TokenService::new("secret-b", Algorithm::HS256, 30).decode(&token);
        assert_eq!(result, Err(AuthError::InvalidToken));
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert_eq!(service().decode("not.a.token"), Err(AuthError::InvalidToken));
        assert_eq!(service().decode(""), Err(AuthError::InvalidToken));
    }

    #[test]
    fn test_algorithm_must_match() {
        let token = TokenService::new("s", Algorithm::HS512, 30)
            .issue(1, Role::User)
            .unwrap();
        let result = TokenService::new("s", Algorithm::HS256, 30).decode(&token);
        assert_eq!(result, Err(AuthError::InvalidToken));
    }

    #[test]
    fn test_parse_algorithm() {
        assert_eq!(parse_algorithm("HS256").unwrap(), Algorithm::HS256);
        assert_eq!(parse_algorithm("hs384").unwrap(), Algorithm::HS384);
        assert_eq!(parse_algorithm("HS512").unwrap(), Algorithm::HS512);
        assert!(parse_algorithm("RS256").is_err());
        assert!(parse_algorithm("none").is_err());
    }

    #[test]
    fn test_from_config_rejects_bad_settings() {
        let mut config = JwtConfig {
            secret: SecretString::new("s".to_string()),
            algorithm: "ES256".to_string(),
            access_token_expire_minutes: 30,
        };
        assert!(TokenService::from_config(&config).is_err());

        config.algorithm = "HS256".to_string();
        config.access_token_expire_minutes = 0;
        assert!(TokenService::from_config(&config).is_err());

        config.access_token_expire_minutes = 200_000_000_000;
        assert!(TokenService::from_config(&config).is_err());

        config.access_token_expire_minutes = MAX_LIFETIME_MINUTES;
        let tokens = TokenService::from_config(&config).unwrap();
        assert!(tokens.issue(1, Role::User).is_ok());

        config.access_token_expire_minutes = 15;
        let tokens = TokenService::from_config(&config).unwrap();
        assert_eq!(tokens.expires_in_secs(), 900);
    }

    #[test]
    fn test_out_of_range_lifetime_errors_instead_of_panicking() {
        let tokens = TokenService::new("s", Algorithm::HS256, 200_000_000_000);
        assert!(tokens.issue(1, Role::User).is_err());

        let tokens = TokenService::new("s", Algorithm::HS256, i64::MAX);
        assert!(tokens.issue(1, Role::User).is_err());
    }
}
