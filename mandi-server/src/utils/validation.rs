//! Input validation helpers
//!
//! Centralized text length constants and validation functions.

use rust_decimal::Decimal;

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: product names, request names
pub const MAX_NAME_LEN: usize = 200;

/// Usernames
pub const MAX_USERNAME_LEN: usize = 64;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

/// Minimum password length
pub const MIN_PASSWORD_LEN: usize = 6;

/// Notes, descriptions, offer messages
pub const MAX_NOTE_LEN: usize = 500;

/// Locations
pub const MAX_LOCATION_LEN: usize = 100;

/// Delivery addresses
pub const MAX_ADDRESS_LEN: usize = 500;

/// Image references (URLs or data URIs are truncated upstream)
pub const MAX_IMAGE_REF_LEN: usize = 2048;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

/// Validate that a quantity is strictly positive.
pub fn validate_positive_quantity(value: i64, field: &str) -> Result<(), AppError> {
    if value <= 0 {
        return Err(AppError::validation(format!(
            "{field} must be a positive integer"
        )));
    }
    Ok(())
}

/// Validate that a price is strictly positive.
pub fn validate_positive_price(value: Decimal, field: &str) -> Result<(), AppError> {
    if value <= Decimal::ZERO {
        return Err(AppError::validation(format!("{field} must be positive")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_text_rejects_empty_and_whitespace() {
        assert!(validate_required_text("", "name", MAX_NAME_LEN).is_err());
        assert!(validate_required_text("   ", "name", MAX_NAME_LEN).is_err());
        assert!(validate_required_text("Rice", "name", MAX_NAME_LEN).is_ok());
    }

    #[test]
    fn required_text_enforces_max_len() {
        let long = "x".repeat(MAX_NAME_LEN + 1);
        assert!(validate_required_text(&long, "name", MAX_NAME_LEN).is_err());
    }

    #[test]
    fn optional_text_allows_none() {
        assert!(validate_optional_text(&None, "description", MAX_NOTE_LEN).is_ok());
        let long = Some("x".repeat(MAX_NOTE_LEN + 1));
        assert!(validate_optional_text(&long, "description", MAX_NOTE_LEN).is_err());
    }

    #[test]
    fn quantity_and_price_must_be_positive() {
        assert!(validate_positive_quantity(0, "quantity").is_err());
        assert!(validate_positive_quantity(-3, "quantity").is_err());
        assert!(validate_positive_quantity(50, "quantity").is_ok());

        assert!(validate_positive_price(Decimal::ZERO, "price").is_err());
        assert!(validate_positive_price(Decimal::new(-100, 2), "price").is_err());
        assert!(validate_positive_price(Decimal::new(2000, 2), "price").is_ok());
    }
}
