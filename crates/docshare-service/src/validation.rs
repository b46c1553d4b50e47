//! Input normalization and validation shared by the services.

use validator::ValidateEmail;

use docshare_core::error::AppError;

/// Minimum length of a link password.
pub const MIN_PASSWORD_LEN: usize = 4;

/// Trim and lower-case an email, rejecting malformed addresses.
pub fn normalize_email(field: &str, raw: &str) -> Result<String, AppError> {
    let email = raw.trim().to_lowercase();
    if email.is_empty() {
        return Err(AppError::validation(format!("{field} is required")));
    }
    if !email.validate_email() {
        return Err(AppError::validation(format!("{field} is not a valid email: '{raw}'")));
    }
    Ok(email)
}

/// Reject blank identifiers.
pub fn require_non_empty(field: &str, value: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

/// Slugs are 3 to 64 characters of `a-z`, `0-9` and `-`.
pub fn validate_slug(slug: &str) -> Result<(), AppError> {
    let valid_len = (3..=64).contains(&slug.len());
    let valid_chars = slug
        .bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-');
    if valid_len && valid_chars {
        Ok(())
    } else {
        Err(AppError::validation(
            "custom_slug must be 3-64 characters of a-z, 0-9 or '-'",
        ))
    }
}

/// Link passwords need a minimum length.
pub fn validate_password(password: &str) -> Result<(), AppError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

/// Trim an optional app name; blank means unset.
pub fn normalize_app(app: Option<&str>) -> Option<String> {
    app.map(str::trim)
        .filter(|a| !a.is_empty())
        .map(str::to_string)
}
