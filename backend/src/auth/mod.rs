//! Authentication module
//!
//! Argon2 credential hashing, JWT bearer tokens, and the request guard that
//! resolves callers into live accounts.

mod guard;
mod jwt;
mod middleware;
mod password;

pub use guard::{
    extract_bearer, is_self_action, require_admin, resolve_user, CurrentUser, GuardError,
    UserLookup,
};
pub use jwt::{parse_algorithm, Claims, TokenIdentity, TokenService};
pub use middleware::AdminUser;
pub use password::PasswordService;
