//! Input rules the core re-checks even when an upstream validation layer
//! has already run.

use std::sync::OnceLock;

use regex::Regex;

use crate::errors::{PlaceError, Result};
use crate::model::NewPlace;

/// Default minimum password length
pub const MIN_PASSWORD_LEN: usize = 6;

fn require_non_empty(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(PlaceError::EmptyField { field }.into());
    }
    Ok(())
}

/// Title, description and address of a new Place must be non-empty
pub fn validate_new_place(fields: &NewPlace) -> Result<()> {
    require_non_empty("title", &fields.title)?;
    require_non_empty("description", &fields.description)?;
    require_non_empty("address", &fields.address)?;
    Ok(())
}

/// Both fields of an update are required
pub fn validate_revision(title: &str, description: &str) -> Result<()> {
    require_non_empty("title", title)?;
    require_non_empty("description", description)?;
    Ok(())
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
    })
}

/// Trim and lower-case an email address
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}

/// Signup rules: non-empty name, well-formed email, long enough password
pub fn validate_signup(name: &str, email: &str, password: &str, min_password_len: usize) -> Result<()> {
    require_non_empty("name", name)?;
    if !is_valid_email(email) {
        return Err(PlaceError::InvalidEmail {
            email: email.to_string(),
        }
        .into());
    }
    if password.chars().count() < min_password_len {
        return Err(PlaceError::PasswordTooShort {
            min_len: min_password_len,
        }
        .into());
    }
    Ok(())
}

/// Login only requires both credentials to be present
pub fn validate_login(email: &str, password: &str) -> Result<()> {
    require_non_empty("email", email)?;
    if password.is_empty() {
        return Err(PlaceError::EmptyField { field: "password" }.into());
    }
    Ok(())
}
