//! Request validation utilities for consistent validation across handlers
//!
//! This module provides a `RequestValidation` trait and helper macros so that
//! every rejected payload names the offending field the same way.

use crate::error::ApiError;

/// Trait for validating request payloads before they reach the record service
///
/// # Example
///
/// ```rust
/// use foodlog_server::{validate_present, error::ApiError, validation::RequestValidation};
///
/// struct RenameRequest {
///     name: Option<String>,
/// }
///
/// impl RequestValidation for RenameRequest {
///     fn validate(&self) -> Result<(), ApiError> {
///         validate_present!(self.name, "name");
///         Ok(())
///     }
/// }
///
/// assert!(RenameRequest { name: None }.validate().is_err());
/// ```
pub trait RequestValidation {
    fn validate(&self) -> Result<(), ApiError>;
}

/// Reject the request with a field error unless `$predicate` holds
///
/// ```rust,ignore
/// validate_field!("foodId", food_id.is_some(), "foodId must be an integer");
/// ```
#[macro_export]
macro_rules! validate_field {
    ($field:expr, $predicate:expr, $message:expr) => {
        if !$predicate {
            return Err($crate::error::ApiError::field_validation($field, $message));
        }
    };
}

/// Reject the request when an optional field is absent
#[macro_export]
macro_rules! validate_present {
    ($value:expr, $field:literal) => {
        $crate::validate_field!($field, $value.is_some(), concat!($field, " is required"));
    };
}

/// Reject the request when an optional string field is absent or blank
#[macro_export]
macro_rules! validate_required {
    ($value:expr, $field:literal) => {
        $crate::validate_field!(
            $field,
            $value.as_deref().is_some_and(|v: &str| !v.trim().is_empty()),
            concat!($field, " is required")
        );
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Probe {
        id: Option<String>,
        count: Option<i64>,
    }

    impl RequestValidation for Probe {
        fn validate(&self) -> Result<(), ApiError> {
            validate_required!(self.id, "id");
            validate_present!(self.count, "count");
            validate_field!("count", self.count.is_some_and(|c| c >= 0), "count must not be negative");
            Ok(())
        }
    }

    #[test]
    fn test_first_failing_field_is_reported() {
        let err = Probe { id: Some("  ".into()), count: None }.validate().unwrap_err();
        assert_eq!(err.to_string(), "id is required");

        let err = Probe { id: Some("a".into()), count: None }.validate().unwrap_err();
        assert_eq!(err.to_string(), "count is required");

        let err = Probe { id: Some("a".into()), count: Some(-1) }.validate().unwrap_err();
        assert_eq!(err.to_string(), "count must not be negative");

        assert!(Probe { id: Some("a".into()), count: Some(0) }.validate().is_ok());
    }
}
