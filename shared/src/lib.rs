//! Blog Admin Shared Library
//!
//! Domain models, API request/response types, and validation helpers used by
//! the backend and by any client of its HTTP API.

pub mod errors;
pub mod models;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use errors::*;
pub use models::{Category, Role, Tag};
pub use types::*;
