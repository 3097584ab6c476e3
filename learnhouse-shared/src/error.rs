/// Error taxonomy for the install wizard
///
/// Every install operation returns `InstallResult<T>`. The API crate maps
/// each variant onto an HTTP status:
///
/// | Variant | Status |
/// | --- | --- |
/// | `Forbidden` | 403 |
/// | `NotFound` | 404 |
/// | `Conflict` | 409 |
/// | `Validation` | 422 |
/// | `Password`, `Store` | 500 |
use crate::auth::password::PasswordError;
use crate::store::StoreError;
use serde::{Deserialize, Serialize};

/// Install result type alias
pub type InstallResult<T> = Result<T, InstallError>;

/// A single field that failed shape validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

/// Errors raised by install operations
#[derive(Debug, thiserror::Error)]
pub enum InstallError {
    /// Install mode is switched off
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The requested record does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Duplicate or missing prerequisite (roles seeded, org missing, username/email taken)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Input did not conform to the expected shape
    #[error("Validation failed: {} errors", .0.len())]
    Validation(Vec<FieldError>),

    /// Password hashing failed
    #[error(transparent)]
    Password(#[from] PasswordError),

    /// Storage backend failure
    #[error("Storage error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for InstallError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UniqueViolation(constraint) => {
                InstallError::Conflict(conflict_message(&constraint))
            }
            other => InstallError::Store(other),
        }
    }
}

impl From<validator::ValidationErrors> for InstallError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut details: Vec<FieldError> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| FieldError {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value ({})", error.code)),
                })
            })
            .collect();
        details.sort_by(|a, b| a.field.cmp(&b.field));
        InstallError::Validation(details)
    }
}

/// Human-readable message for a unique constraint name
fn conflict_message(constraint: &str) -> String {
    if constraint.contains("username") {
        "Username already exists".to_string()
    } else if constraint.contains("email") {
        "Email already exists".to_string()
    } else if constraint.contains("slug") {
        "Organization slug already exists".to_string()
    } else if constraint.starts_with("roles") {
        "Default roles already exist".to_string()
    } else {
        format!("Constraint violation: {}", constraint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = InstallError::Forbidden("Install mode is not enabled".to_string());
        assert_eq!(err.to_string(), "Forbidden: Install mode is not enabled");

        let err = InstallError::Validation(vec![FieldError {
            field: "email".to_string(),
            message: "Invalid email format".to_string(),
        }]);
        assert_eq!(err.to_string(), "Validation failed: 1 errors");
    }

    #[test]
    fn test_unique_violation_becomes_conflict() {
        let err: InstallError = StoreError::UniqueViolation("users_username_key".to_string()).into();
        assert!(matches!(err, InstallError::Conflict(ref m) if m == "Username already exists"));

        let err: InstallError = StoreError::UniqueViolation("users_email_key".to_string()).into();
        assert!(matches!(err, InstallError::Conflict(ref m) if m == "Email already exists"));

        let err: InstallError =
            StoreError::UniqueViolation("organizations_slug_key".to_string()).into();
        assert!(matches!(err, InstallError::Conflict(ref m) if m == "Organization slug already exists"));

        let err: InstallError = StoreError::UniqueViolation("roles_pkey".to_string()).into();
        assert!(matches!(err, InstallError::Conflict(ref m) if m == "Default roles already exist"));
    }

    #[test]
    fn test_backend_errors_stay_internal() {
        let err: InstallError = StoreError::Backend("connection reset".to_string()).into();
        assert!(matches!(err, InstallError::Store(_)));
    }
}
