//! API request and response types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{Category, Role, Tag};

/// Offset pagination parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    100
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: default_limit(),
        }
    }
}

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Plain acknowledgement body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

// ============================================================================
// Authentication
// ============================================================================

/// Login request
///
/// Not validated: a malformed email simply matches no account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Registration request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email, length(max = 255))]
    pub email: String,
    #[validate(length(min = 6, max = 128))]
    pub password: String,
    #[serde(default)]
    #[validate(length(max = 255))]
    pub full_name: Option<String>,
}

/// Issued bearer token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    /// Lifetime of the token in seconds
    pub expires_in: i64,
}

// ============================================================================
// Users
// ============================================================================

/// Public view of a user account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub full_name: Option<String>,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Self-service profile update; role and active flag are not reachable here
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(email, length(max = 255))]
    pub email: Option<String>,
    #[validate(length(max = 255))]
    pub full_name: Option<String>,
    #[validate(length(min = 6, max = 128))]
    pub password: Option<String>,
}

/// Admin-initiated account creation
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AdminCreateUserRequest {
    #[validate(email, length(max = 255))]
    pub email: String,
    #[validate(length(min = 6, max = 128))]
    pub password: String,
    #[serde(default)]
    #[validate(length(max = 255))]
    pub full_name: Option<String>,
    #[serde(default)]
    pub role: Role,
}

/// Admin update of any account
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct AdminUpdateUserRequest {
    #[validate(email, length(max = 255))]
    pub email: Option<String>,
    #[validate(length(max = 255))]
    pub full_name: Option<String>,
    #[validate(length(min = 6, max = 128))]
    pub password: Option<String>,
    pub is_active: Option<bool>,
    pub role: Option<Role>,
}

/// Aggregate account counts
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserStats {
    pub total_users: i64,
    pub active_users: i64,
    pub inactive_users: i64,
    pub admin_count: i64,
    pub user_count: i64,
}

/// Aggregate content counts
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContentStats {
    pub categories: i64,
    pub tags: i64,
    pub blogs: i64,
}

/// Admin dashboard payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub message: String,
    pub statistics: UserStats,
    pub content: ContentStats,
}

// ============================================================================
// Categories and tags
// ============================================================================

/// Create or rename a category
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CategoryRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
}

/// Create or rename a tag
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TagRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
}

// ============================================================================
// Blogs
// ============================================================================

/// Blog creation request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateBlogRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(length(min = 1, max = 255))]
    pub author: String,
    pub category_id: i64,
    #[serde(default)]
    pub tag_ids: Vec<i64>,
}

/// Partial blog update; `tag_ids`, when present, replaces the whole tag set
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateBlogRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub author: Option<String>,
    pub category_id: Option<i64>,
    pub tag_ids: Option<Vec<i64>>,
}

/// Blog list filters
// Kept flat: serde(flatten) breaks numeric fields in query strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogQuery {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
    pub category_id: Option<i64>,
    pub tag_id: Option<i64>,
}

impl BlogQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            skip: self.skip,
            limit: self.limit,
        }
    }
}

/// Blog with its category and tags resolved
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogResponse {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub category: Category,
    pub tags: Vec<Tag>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
