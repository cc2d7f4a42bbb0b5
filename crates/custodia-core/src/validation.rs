//! Input validation helpers shared by every store operation.
//!
//! All validation runs before any ledger call: a caller that receives a
//! [`ValidationError`] can be certain nothing was read from or written to
//! the underlying state.

use std::fmt;

/// Maximum length of a record identifier, in bytes.
///
/// Oversized ids are rejected before they reach the ledger.
pub const MAX_ID_LEN: usize = 64;

/// Errors that can occur during input validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The field that failed validation (e.g., `userId`).
    pub field: String,
    /// A human-readable description of the validation failure.
    pub message: String,
    /// The kind of validation that failed.
    pub kind: ValidationErrorKind,
}

impl ValidationError {
    /// Creates a new validation error.
    pub fn new(
        field: impl Into<String>,
        message: impl Into<String>,
        kind: ValidationErrorKind,
    ) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            kind,
        }
    }

    /// Creates a validation error for a required field that is missing or empty.
    pub fn required(field: impl Into<String>) -> Self {
        let field = field.into();
        Self {
            message: format!("'{field}' is required"),
            field,
            kind: ValidationErrorKind::Required,
        }
    }

    /// Creates a validation error for a value exceeding its length limit.
    pub fn length(field: impl Into<String>, max: usize) -> Self {
        let field = field.into();
        Self {
            message: format!("'{field}' exceeds maximum length of {max} characters"),
            field,
            kind: ValidationErrorKind::Length,
        }
    }

    /// Creates a validation error for a value out of range.
    pub fn range(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            kind: ValidationErrorKind::Range,
        }
    }

    /// Creates a validation error for a value outside an enumerated set.
    pub fn membership(field: impl Into<String>, value: &str, allowed: &[&str]) -> Self {
        Self {
            field: field.into(),
            message: format!("invalid value '{value}', expected one of: {}", allowed.join(", ")),
            kind: ValidationErrorKind::Membership,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation error for '{}': {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// The category of validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationErrorKind {
    /// A required field was not provided or was empty.
    Required,
    /// The value exceeds a length limit.
    Length,
    /// The value is outside the allowed numeric range.
    Range,
    /// The value is not a member of an enumerated set.
    Membership,
}

impl fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required => write!(f, "required"),
            Self::Length => write!(f, "length"),
            Self::Range => write!(f, "range"),
            Self::Membership => write!(f, "membership"),
        }
    }
}

/// Checks that a field is non-empty.
///
/// # Errors
///
/// Returns [`ValidationErrorKind::Required`] if `value` is empty.
pub fn require_non_empty(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::required(field));
    }
    Ok(())
}

/// Checks that an identifier does not exceed [`MAX_ID_LEN`].
///
/// # Errors
///
/// Returns [`ValidationErrorKind::Length`] if `value` is too long.
pub fn check_id_length(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.len() > MAX_ID_LEN {
        return Err(ValidationError::length(field, MAX_ID_LEN));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_non_empty_accepts_value() {
        assert!(require_non_empty("id", "audit-001").is_ok());
    }

    #[test]
    fn test_require_non_empty_rejects_empty() {
        let err = require_non_empty("id", "").unwrap_err();
        assert_eq!(err.field, "id");
        assert_eq!(err.kind, ValidationErrorKind::Required);
    }

    #[test]
    fn test_check_id_length_at_limit() {
        let id = "a".repeat(MAX_ID_LEN);
        assert!(check_id_length("id", &id).is_ok());
    }

    #[test]
    fn test_check_id_length_over_limit() {
        let id = "a".repeat(MAX_ID_LEN + 1);
        let err = check_id_length("id", &id).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::Length);
        assert!(err.message.contains("64"));
    }

    #[test]
    fn test_membership_error_lists_allowed_values() {
        let err = ValidationError::membership("role", "ROOT", &["ADMIN", "AUDITOR", "USER"]);
        assert_eq!(err.kind, ValidationErrorKind::Membership);
        assert!(err.message.contains("ROOT"));
        assert!(err.message.contains("ADMIN, AUDITOR, USER"));
    }

    #[test]
    fn test_display_includes_field() {
        let err = ValidationError::required("userId");
        let display = format!("{err}");
        assert!(display.contains("userId"));
    }
}
