//! Input validation functions
//!
//! Request types carry `validator` derives for shape checks. The helpers here
//! cover the rules a derive cannot express (trimming, combined email checks,
//! pagination bounds).

use validator::ValidateEmail;

use crate::types::Pagination;

/// Maximum length of category and tag names
pub const MAX_LABEL_LEN: usize = 100;
/// Maximum length of blog titles and authors
pub const MAX_TEXT_LEN: usize = 255;
/// Hard cap on page size
pub const MAX_PAGE_SIZE: i64 = 100;

/// Validate email format
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email cannot be empty".to_string());
    }
    if email.len() > 255 {
        return Err("Email too long".to_string());
    }
    if !email.contains('.') || !email.validate_email() {
        return Err("Invalid email format".to_string());
    }
    Ok(())
}

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.len() < 6 {
        return Err("Password must be at least 6 characters".to_string());
    }
    if password.len() > 128 {
        return Err("Password too long".to_string());
    }
    Ok(())
}

/// Trim a required text field and check its length
///
/// Returns the trimmed value so callers store what they validated.
pub fn normalize_text(field: &str, value: &str, max_len: usize) -> Result<String, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(format!("{} cannot be empty", field));
    }
    if trimmed.chars().count() > max_len {
        return Err(format!("{} must be at most {} characters", field, max_len));
    }
    Ok(trimmed.to_string())
}

/// Trim an optional display name; blank names collapse to `None`
pub fn normalize_optional_name(value: Option<&str>) -> Result<Option<String>, String> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(name) if name.chars().count() > MAX_TEXT_LEN => Err(format!(
            "Name must be at most {} characters",
            MAX_TEXT_LEN
        )),
        Some(name) => Ok(Some(name.to_string())),
    }
}

/// Clamp pagination into a safe window
pub fn clamp_pagination(p: &Pagination) -> Pagination {
    Pagination {
        skip: p.skip.max(0),
        limit: p.limit.clamp(1, MAX_PAGE_SIZE),
    }
}

/// Sort and deduplicate a list of referenced ids
pub fn dedup_ids(ids: &[i64]) -> Vec<i64> {
    let mut ids = ids.to_vec();
    ids.sort_unstable();
    ids.dedup();
    ids
}
