//! Data access for each area of the marketplace. Every function takes any
//! `ConnectionTrait`, so handlers run them inside one transaction and commit
//! once at the end.

pub mod accounts;
pub mod catalog;
pub mod favorites;
pub mod orders;
pub mod reviews;

use crate::error::ServiceError;

/// Trimmed copy of a required text field.
pub(crate) fn require(value: &str, field: &str) -> Result<String, ServiceError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::Validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

/// Blank strings from forms count as missing.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_required_field_is_rejected() {
        assert!(require("   ", "address").is_err());
        assert_eq!(require(" Dhaka ", "address"), Ok("Dhaka".to_string()));
    }

    #[test]
    fn blank_optional_field_becomes_none() {
        assert_eq!(non_blank(Some("  ".to_string())), None);
        assert_eq!(non_blank(Some(" 38 ".to_string())), Some("38".to_string()));
        assert_eq!(non_blank(None), None);
    }
}
