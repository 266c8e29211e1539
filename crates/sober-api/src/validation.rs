//! Field checks applied to request bodies before anything is hashed or stored.
//! Limits follow the column sizes of the original schema.

use crate::error::ApiError;

const USERNAME_MIN: usize = 3;
const USERNAME_MAX: usize = 150;
const EMAIL_MAX: usize = 200;
const PASSWORD_MIN: usize = 6;
const PASSWORD_MAX: usize = 256;
const SOBER_DATE_MAX: usize = 50;

pub fn username(raw: &str) -> Result<String, ApiError> {
    let value = raw.trim();
    let len = value.chars().count();
    if !(USERNAME_MIN..=USERNAME_MAX).contains(&len) {
        return Err(ApiError::validation(format!(
            "username must be between {USERNAME_MIN} and {USERNAME_MAX} characters"
        )));
    }
    Ok(value.to_string())
}

/// Trims and lowercases; requires a non-empty local part and a dotted domain.
pub fn email(raw: &str) -> Result<String, ApiError> {
    let value = raw.trim().to_lowercase();
    if value.is_empty() || value.chars().count() > EMAIL_MAX {
        return Err(ApiError::validation(format!(
            "email must be between 1 and {EMAIL_MAX} characters"
        )));
    }

    let valid = match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !value.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        return Err(ApiError::validation("email is not a valid address"));
    }
    Ok(value)
}

pub fn password(raw: &str) -> Result<(), ApiError> {
    let len = raw.chars().count();
    if !(PASSWORD_MIN..=PASSWORD_MAX).contains(&len) {
        return Err(ApiError::validation(format!(
            "password must be between {PASSWORD_MIN} and {PASSWORD_MAX} characters"
        )));
    }
    Ok(())
}

pub fn required(field: &str, raw: &str) -> Result<String, ApiError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(ApiError::validation(format!("{field} must not be empty")));
    }
    Ok(value.to_string())
}

pub fn sober_date(raw: &str) -> Result<String, ApiError> {
    let value = required("soberDate", raw)?;
    if value.chars().count() > SOBER_DATE_MAX {
        return Err(ApiError::validation(format!(
            "soberDate must be at most {SOBER_DATE_MAX} characters"
        )));
    }
    Ok(value)
}

pub fn user_id(id: i64) -> Result<i64, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation("userId must be a positive integer"));
    }
    Ok(id)
}
