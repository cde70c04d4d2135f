//! Business logic services
//!
//! Services sit between route handlers and repositories: they validate and
//! normalize input, apply account rules, and log lifecycle events.

pub mod blog;
pub mod bootstrap;
pub mod taxonomy;
pub mod user;

pub use blog::BlogService;
pub use bootstrap::ensure_admin;
pub use taxonomy::{CategoryService, TagService};
pub use user::UserService;
