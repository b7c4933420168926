use thiserror::Error;

use crate::codes;

/// Error taxonomy shared by every FoodLog crate.
///
/// All variants are terminal: none of them is retried by the engine, and each
/// request produces exactly one of them (or a success).
#[derive(Error, Debug)]
pub enum FoodLogError {
    /// No principal, or a principal that could not be verified
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    /// A required field is missing or malformed
    #[error("Validation error on `{field}`: {message}")]
    Validation { field: String, message: String },

    /// The resource does not exist, or exists under another account and is masked
    #[error("{resource} not found")]
    NotFound { resource: String },

    /// The resource exists and is addressable, but the principal does not own it
    #[error("Not authorized to {action} this {resource}")]
    Forbidden { resource: String, action: String },

    /// A uniqueness rule was violated (duplicate registration)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Opaque persistence or infrastructure failure
    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FoodLogError {
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::Unauthenticated(message.into())
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    pub fn forbidden(resource: impl Into<String>, action: impl Into<String>) -> Self {
        Self::Forbidden {
            resource: resource.into(),
            action: action.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            FoodLogError::Unauthenticated(_) => codes::authentication::TOKEN_INVALID,
            FoodLogError::Validation { .. } => codes::validation::MISSING_REQUIRED_FIELD,
            FoodLogError::NotFound { .. } => codes::resource::NOT_FOUND,
            FoodLogError::Forbidden { .. } => codes::authorization::ACCESS_DENIED,
            FoodLogError::Conflict(_) => codes::authentication::EMAIL_ALREADY_EXISTS,
            FoodLogError::Internal(_) => codes::internal::STORAGE_FAILURE,
            FoodLogError::Other(_) => codes::internal::UNEXPECTED,
        }
    }

    /// Short error type string used in API bodies and log fields
    pub fn error_type(&self) -> &'static str {
        match self {
            FoodLogError::Unauthenticated(_) => "authentication_error",
            FoodLogError::Validation { .. } => "validation_error",
            FoodLogError::NotFound { .. } => "not_found",
            FoodLogError::Forbidden { .. } => "authorization_error",
            FoodLogError::Conflict(_) => "conflict",
            FoodLogError::Internal(_) | FoodLogError::Other(_) => "internal_error",
        }
    }

    /// The field a validation error points at, if any
    pub fn field(&self) -> Option<&str> {
        match self {
            FoodLogError::Validation { field, .. } => Some(field),
            _ => None,
        }
    }
}

/// Result type alias for FoodLog operations
pub type Result<T> = std::result::Result<T, FoodLogError>;

/// Log an error with its taxonomy fields attached
pub fn log_error(context: &str, error: &FoodLogError) {
    tracing::error!(
        context = context,
        error_code = error.code(),
        error_type = error.error_type(),
        error = %error,
        "FoodLog error occurred"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_carries_field() {
        let err = FoodLogError::validation("dateOfBirth", "Date of birth is required");
        assert_eq!(err.field(), Some("dateOfBirth"));
        assert_eq!(err.error_type(), "validation_error");
        assert_eq!(err.code(), codes::validation::MISSING_REQUIRED_FIELD);
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(FoodLogError::not_found("Child").to_string(), "Child not found");
        assert_eq!(
            FoodLogError::forbidden("food entry", "update").to_string(),
            "Not authorized to update this food entry"
        );
    }

    #[test]
    fn test_anyhow_is_internal() {
        let err: FoodLogError = anyhow::anyhow!("connection reset").into();
        assert_eq!(err.error_type(), "internal_error");
        assert_eq!(err.code(), codes::internal::UNEXPECTED);
    }
}
